//! Buffer previews and their acceptance.

use geoedit_core::{AppEvent, BufferEvent, FeatureId, GeometryError, Mode};

use super::MapEditor;
use crate::backend::MapBackend;
use crate::model::Feature;
use crate::pipeline;

/// Current buffer parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferState {
    /// Buffering requested for the drawing modes
    pub on: bool,
    /// Radius in map units; negative values shrink polygons
    pub radius: f64,
    /// Segments per quarter circle
    pub segments: u32,
    /// Whether sketches in the active mode are buffered
    pub(crate) armed: bool,
}

impl BufferState {
    pub fn new(radius: f64, segments: u32) -> Self {
        Self {
            on: false,
            radius,
            segments,
            armed: false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

/// A sketch layer feature previewing the buffer of an edit layer feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferPreview {
    pub target: FeatureId,
    pub preview: FeatureId,
}

impl<B: MapBackend> MapEditor<B> {
    pub fn buffer_state(&self) -> BufferState {
        self.buffer
    }

    pub fn buffer_previews(&self) -> &[BufferPreview] {
        &self.previews
    }

    /// Turns buffering of drawn features on or off.
    pub fn set_buffer(&mut self, on: bool) {
        self.buffer.on = on;
        self.buffer.armed = self.can_edit()
            && (self.mode == Mode::BufferFeaturesDynamic || (on && self.mode.draws_features()));
        tracing::debug!("Buffer {} (armed: {})", on, self.buffer.armed);
        self.emit(AppEvent::Buffer(BufferEvent::Toggled {
            on,
            radius: self.buffer.radius,
            segments: self.buffer.segments,
        }));
    }

    /// Changes radius and segment count and recomputes the previews.
    pub fn set_buffer_params(&mut self, radius: f64, segments: u32) -> Result<(), GeometryError> {
        if !radius.is_finite() || segments == 0 {
            return Err(GeometryError::InvalidBuffer { radius, segments });
        }
        self.buffer.radius = radius;
        self.buffer.segments = segments;

        if matches!(self.mode, Mode::BufferFeatures | Mode::BufferFeaturesEdit) {
            self.refresh_buffer_previews();
        }
        self.emit(AppEvent::Buffer(BufferEvent::Changed {
            on: self.buffer.on,
            radius,
            segments,
        }));
        Ok(())
    }

    /// Rebuilds one preview per selected feature.
    pub(crate) fn refresh_buffer_previews(&mut self) {
        self.clear_buffer_previews();

        let targets = self.selection.selected().to_vec();
        for target in targets {
            let Some(feature) = self.edit.get(target) else {
                continue;
            };
            match pipeline::compute_buffer(
                self.engine.as_ref(),
                &feature.geometry,
                self.buffer.radius,
                self.buffer.segments,
                self.bounds.as_ref(),
            ) {
                Ok(geometry) => {
                    let preview = self.sketch.insert(Feature::new(geometry));
                    self.previews.push(BufferPreview { target, preview });
                }
                Err(e) => tracing::warn!("No buffer preview for {}: {}", target, e),
            }
        }
    }

    pub(crate) fn clear_buffer_previews(&mut self) {
        for preview in self.previews.drain(..) {
            self.sketch.remove(preview.preview);
        }
    }

    /// Replaces every previewed target with its buffer. Returns the number
    /// of replaced features.
    pub fn accept_buffer(&mut self) -> usize {
        if !matches!(self.mode, Mode::BufferFeatures | Mode::BufferFeaturesEdit) {
            tracing::warn!("Nothing to accept in {}", self.mode);
            return 0;
        }
        if !self.can_edit() {
            tracing::warn!("Not accepting buffers: the edit layer is read-only");
            self.cancel_buffer();
            return 0;
        }

        let previews = std::mem::take(&mut self.previews);
        if self.selection.clear() {
            self.selection_changed();
        }

        let mut accepted = 0;
        let mut batch = self.batch();
        for preview in previews {
            let Some(buffered) = batch.sketch.remove(preview.preview) else {
                continue;
            };
            let Some(target) = batch.remove_feature(preview.target) else {
                continue;
            };
            batch.insert_feature(target.derive(buffered.geometry));
            accepted += 1;
        }
        drop(batch);

        tracing::info!("Accepted {} buffer(s)", accepted);
        accepted
    }

    /// Drops the previews and the selection they were built from.
    pub fn cancel_buffer(&mut self) {
        self.clear_buffer_previews();
        if self.selection.clear() {
            self.selection_changed();
        }
    }
}
