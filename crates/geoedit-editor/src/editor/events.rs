//! Backend events and their dispatch.

use geo::{BoundingRect, Geometry, Rect};
use geoedit_core::{AppEvent, FeatureEvent, FeatureId, FeatureInfo, LayerId, Mode, Pixel, SelectionEvent};

use super::MapEditor;
use crate::backend::{LayerHit, MapBackend};

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Multi-select modifier
    Shift,
    Escape,
    Delete,
    Other,
}

/// Everything the backend reports to the editor.
#[derive(Debug, Clone)]
pub enum MapEvent {
    PointerMove { pixel: Pixel },
    Click { pixel: Pixel },
    KeyDown(Key),
    KeyUp(Key),
    /// A draw interaction started a sketch.
    DrawStart,
    /// The sketch geometry changed.
    DrawUpdate { geometry: Geometry<f64> },
    /// The sketch was finished.
    DrawEnd { geometry: Geometry<f64> },
    /// The draw interaction dropped its sketch.
    DrawAbort,
    /// A modify interaction released its vertices.
    ModifyEnd {
        layer: LayerId,
        features: Vec<(FeatureId, Geometry<f64>)>,
    },
    /// A zoom box was released.
    BoxEnd { extent: Rect<f64> },
    /// The view settled after a pan, zoom or animation.
    ViewChanged,
    /// The interaction that fired the last event has finished its own handling.
    InteractionFinished,
}

impl<B: MapBackend> MapEditor<B> {
    /// Applies a backend event. Policy failures are logged, never returned.
    pub fn handle_event(&mut self, event: MapEvent) {
        tracing::trace!("{:?} in {}", event, self.mode);
        match event {
            MapEvent::PointerMove { pixel } => self.pointer_move(pixel),
            MapEvent::Click { pixel } => self.click(pixel),
            MapEvent::KeyDown(key) => self.key_down(key),
            MapEvent::KeyUp(key) => self.key_up(key),
            MapEvent::DrawStart => self.draw_start(),
            MapEvent::DrawUpdate { geometry } => self.draw_update(geometry),
            MapEvent::DrawEnd { geometry } => self.draw_end(geometry),
            MapEvent::DrawAbort => self.abort_draw(false),
            MapEvent::ModifyEnd { layer, features } => self.modify_end(layer, features),
            MapEvent::BoxEnd { extent } => {
                if self.mode == Mode::ZoomBox {
                    self.backend.fit(extent);
                }
            }
            MapEvent::ViewChanged => self.view_changed(),
            MapEvent::InteractionFinished => self.run_pending(),
        }
    }

    fn hit_test(&self, pixel: Pixel) -> Vec<LayerHit> {
        self.backend.hit_test(pixel, &self.layer_stack())
    }

    /// Topmost editable edit layer feature under the pointer.
    fn editable_hit(&self, pixel: Pixel) -> Option<FeatureId> {
        self.hit_test(pixel)
            .into_iter()
            .filter(|hit| hit.layer == LayerId::Edit)
            .map(|hit| hit.feature)
            .find(|id| self.edit.get(*id).is_some_and(|f| f.editable))
    }

    fn feature_info(&self, hit: &LayerHit, pixel: Pixel) -> Option<FeatureInfo> {
        let feature = self.find_feature(&hit.layer, hit.feature)?;
        let coord = self.backend.coordinate_at(pixel);
        Some(FeatureInfo {
            pixel,
            coords: (coord.x, coord.y),
            layer_id: hit.layer.clone(),
            properties: feature.properties.clone(),
        })
    }

    fn pointer_move(&mut self, pixel: Pixel) {
        if self.draw.is_some() {
            return;
        }

        let top = self.hit_test(pixel).into_iter().next();
        if top == self.hovered {
            return;
        }

        if let Some(previous) = self.hovered.take() {
            if let Some(info) = self.feature_info(&previous, pixel) {
                self.emit(AppEvent::Feature(FeatureEvent::Leave(info)));
            }
        }
        if let Some(hit) = &top {
            if let Some(info) = self.feature_info(hit, pixel) {
                self.emit(AppEvent::Feature(FeatureEvent::Hover(info)));
            }
        }
        self.hovered = top;
    }

    fn click(&mut self, pixel: Pixel) {
        match self.mode {
            Mode::View => {
                if let Some(hit) = self.hit_test(pixel).into_iter().next() {
                    if let Some(info) = self.feature_info(&hit, pixel) {
                        self.emit(AppEvent::Feature(FeatureEvent::Click(info)));
                    }
                }
            }
            Mode::SearchParcel => self.search_parcel(pixel),
            Mode::DeleteFeatures if self.can_edit() => {
                if let Some(id) = self.editable_hit(pixel) {
                    tracing::debug!("Deleting feature {}", id);
                    self.remove_feature(id);
                }
            }
            Mode::ModifyFeatures | Mode::BufferFeatures | Mode::CutFeatures
                if self.can_edit() =>
            {
                let hit = self.editable_hit(pixel);
                if self.selection.toggle(hit) {
                    self.selection_changed();
                    if self.mode == Mode::BufferFeatures {
                        self.refresh_buffer_previews();
                    }
                }
            }
            _ => {}
        }
    }

    fn search_parcel(&mut self, pixel: Pixel) {
        let hit = self
            .hit_test(pixel)
            .into_iter()
            .find(|hit| matches!(hit.layer, LayerId::Reference(_)));
        let Some(hit) = hit else {
            return;
        };

        let extent = self
            .find_feature(&hit.layer, hit.feature)
            .and_then(|feature| feature.geometry.bounding_rect());
        if let Some(info) = self.feature_info(&hit, pixel) {
            self.emit(AppEvent::Feature(FeatureEvent::Click(info)));
        }
        if let Some(extent) = extent {
            self.backend.fit(extent);
        }
    }

    fn key_down(&mut self, key: Key) {
        match key {
            Key::Shift => {
                if self.selection.set_multi(true) {
                    self.emit(AppEvent::Selection(SelectionEvent::MultiSelect { on: true }));
                }
            }
            Key::Escape => {
                if self.draw.is_some() {
                    self.abort_draw(true);
                } else if matches!(self.mode, Mode::BufferFeatures | Mode::BufferFeaturesEdit) {
                    self.cancel_buffer();
                }
            }
            Key::Delete => {
                if self.mode == Mode::ModifyFeatures && self.can_edit() {
                    self.delete_selected();
                }
            }
            Key::Other => {}
        }
    }

    fn key_up(&mut self, key: Key) {
        if key == Key::Shift && self.selection.set_multi(false) {
            self.emit(AppEvent::Selection(SelectionEvent::MultiSelect { on: false }));
        }
    }
}
