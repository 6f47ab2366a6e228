//! Draw and modify handling: bounds feedback, measurement, end-of-draw
//! validation and live buffer previews.

use geo::Geometry;
use geoedit_core::{AppEvent, DrawEvent, FeatureId, LayerId, MeasureKind, Mode};

use super::{Continuation, DrawSession, MapEditor};
use crate::backend::{MapBackend, SketchStyle};
use crate::interactions::InteractionKind;
use crate::model::{geometry_kind, Feature, Properties};
use crate::pipeline;

impl<B: MapBackend> MapEditor<B> {
    /// Whether the active mode installs a draw interaction.
    fn mode_draws(&self) -> bool {
        self.registry.kinds(self.mode).is_some_and(|kinds| {
            kinds
                .iter()
                .any(|kind| matches!(kind, InteractionKind::Draw(_)))
        })
    }

    pub(super) fn draw_start(&mut self) {
        if !self.mode_draws() {
            tracing::debug!("Ignoring draw start in {}", self.mode);
            return;
        }
        self.draw = Some(DrawSession::default());
    }

    pub(super) fn draw_update(&mut self, geometry: Geometry<f64>) {
        if !self.mode_draws() {
            return;
        }
        if self.draw.is_none() {
            self.draw = Some(DrawSession::default());
        }

        match self.mode {
            Mode::MeasureLine => self.emit_measure(MeasureKind::Length, &geometry),
            Mode::MeasureArea => self.emit_measure(MeasureKind::Area, &geometry),
            mode if mode.draws_features() => {
                let error = self
                    .bounds
                    .as_ref()
                    .is_some_and(|bounds| !bounds.contains_partial(&geometry));
                self.set_draw_error(error);
                if self.buffer.armed {
                    self.update_draw_preview(&geometry);
                }
            }
            _ => {}
        }
    }

    pub(super) fn draw_end(&mut self, geometry: Geometry<f64>) {
        if !self.mode_draws() {
            tracing::debug!("Ignoring draw end in {}", self.mode);
            return;
        }
        self.set_draw_error(false);
        self.draw = None;

        match self.mode {
            Mode::MeasureLine | Mode::MeasureArea => {
                let kind = if self.mode == Mode::MeasureLine {
                    MeasureKind::Length
                } else {
                    MeasureKind::Area
                };
                self.emit_measure(kind, &geometry);
                self.measure.clear();
                self.measure.insert(Feature::new(geometry));
            }
            Mode::CutFeaturesDraw if self.can_edit() => {
                self.finish_cut(&geometry);
            }
            mode if mode.draws_features() && self.can_edit() => self.finish_feature_draw(geometry),
            _ => {}
        }
    }

    /// Drops the sketch in progress. `by_user` also tells the backend to
    /// abort its draw interaction.
    pub(super) fn abort_draw(&mut self, by_user: bool) {
        let Some(session) = self.draw.take() else {
            return;
        };
        if by_user {
            self.backend.abort_drawing();
        }
        if let Some(preview) = session.preview {
            self.sketch.remove(preview);
        }
        if session.error {
            self.backend.set_sketch_style(SketchStyle::Normal);
        }
        tracing::debug!("Drawing aborted in {}", self.mode);
        self.emit(AppEvent::Draw(DrawEvent::Aborted));
    }

    fn finish_feature_draw(&mut self, drawn: Geometry<f64>) {
        let inside = self
            .bounds
            .as_ref()
            .is_none_or(|bounds| bounds.contains_geometry(&drawn));

        let geometry = if self.buffer.armed {
            match pipeline::compute_buffer(
                self.engine.as_ref(),
                &drawn,
                self.buffer.radius,
                self.buffer.segments,
                self.bounds.as_ref(),
            ) {
                Ok(buffered) => buffered,
                Err(e) => {
                    tracing::warn!("Buffering the drawn geometry failed: {}", e);
                    drawn.clone()
                }
            }
        } else {
            drawn.clone()
        };

        let id = self.add_feature(geometry, Properties::new());

        if !inside {
            tracing::warn!(
                "Drawn {} {} leaves the bounds, reverting",
                geometry_kind(&drawn),
                id
            );
            self.pending.push(Continuation::RemoveFeature(id));
            self.emit(AppEvent::Draw(DrawEvent::OutOfBounds {
                message: self.config.bounds_message.clone(),
            }));
        }
        self.pending.push(Continuation::ClearSketch);
    }

    pub(super) fn modify_end(&mut self, layer: LayerId, features: Vec<(FeatureId, Geometry<f64>)>) {
        if !self.can_edit() {
            tracing::debug!("Ignoring modification in read-only {}", self.mode);
            return;
        }
        match (&layer, self.mode) {
            (LayerId::Edit, Mode::ModifyFeatures) => {
                let mut reverted = 0;
                {
                    let mut batch = self.batch();
                    for (id, geometry) in features {
                        if !batch.edit.get(id).is_some_and(|f| f.editable) {
                            continue;
                        }
                        if !batch.within_bounds(&geometry) {
                            reverted += 1;
                            continue;
                        }
                        batch.set_feature_geometry(id, geometry);
                    }
                }
                if reverted > 0 {
                    self.report_out_of_bounds(reverted);
                }
            }
            (LayerId::Sketch, Mode::BufferFeaturesEdit) => {
                let mut reverted = 0;
                for (id, geometry) in features {
                    if !self.previews.iter().any(|preview| preview.preview == id) {
                        continue;
                    }
                    if !self.within_bounds(&geometry) {
                        reverted += 1;
                        continue;
                    }
                    self.sketch.set_geometry(id, geometry);
                }
                if reverted > 0 {
                    self.report_out_of_bounds(reverted);
                }
            }
            _ => tracing::debug!("Ignoring modification of {} in {}", layer, self.mode),
        }
    }

    fn within_bounds(&self, geometry: &Geometry<f64>) -> bool {
        self.bounds
            .as_ref()
            .is_none_or(|bounds| bounds.contains_geometry(geometry))
    }

    fn report_out_of_bounds(&self, reverted: usize) {
        tracing::warn!("Reverted {} modification(s) leaving the bounds", reverted);
        self.emit(AppEvent::Draw(DrawEvent::OutOfBounds {
            message: self.config.bounds_message.clone(),
        }));
    }

    fn set_draw_error(&mut self, error: bool) {
        let Some(session) = self.draw.as_mut() else {
            return;
        };
        if session.error != error {
            session.error = error;
            self.backend.set_sketch_style(if error {
                SketchStyle::Error
            } else {
                SketchStyle::Normal
            });
        }
    }

    fn update_draw_preview(&mut self, geometry: &Geometry<f64>) {
        let buffered = match pipeline::compute_buffer(
            self.engine.as_ref(),
            geometry,
            self.buffer.radius,
            self.buffer.segments,
            self.bounds.as_ref(),
        ) {
            Ok(buffered) => buffered,
            Err(e) => {
                tracing::debug!("No buffer preview for the current sketch: {}", e);
                return;
            }
        };

        let existing = self.draw.as_ref().and_then(|session| session.preview);
        match existing {
            Some(id) if self.sketch.contains(id) => {
                self.sketch.set_geometry(id, buffered);
            }
            _ => {
                let id = self.sketch.insert(Feature::new(buffered));
                if let Some(session) = self.draw.as_mut() {
                    session.preview = Some(id);
                }
            }
        }
    }

    fn emit_measure(&self, kind: MeasureKind, geometry: &Geometry<f64>) {
        let value = match kind {
            MeasureKind::Length => self.engine.length(geometry),
            MeasureKind::Area => self.engine.area(geometry),
        };
        self.emit(AppEvent::Draw(DrawEvent::Measured { kind, value }));
    }
}
