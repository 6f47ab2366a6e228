//! Map backend capability interface.
//!
//! The editing core never renders. Everything it needs from the map engine
//! (installing interactions, styling, hit-testing, view control) goes
//! through [`MapBackend`].

use geo::{Coord, Rect};
use geoedit_core::{FeatureId, LayerId, Pixel, ViewSnapshot};

use crate::interactions::Interaction;
use crate::model::FeatureStore;

/// A feature under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerHit {
    pub layer: LayerId,
    pub feature: FeatureId,
}

/// Hit-testable layers, topmost first.
#[derive(Debug, Default)]
pub struct LayerStack<'a> {
    layers: Vec<(LayerId, &'a FeatureStore)>,
}

impl<'a> LayerStack<'a> {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Appends a layer below the ones already pushed.
    pub fn push(&mut self, layer: LayerId, store: &'a FeatureStore) {
        self.layers.push((layer, store));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LayerId, &'a FeatureStore)> + '_ {
        self.layers.iter().map(|(id, store)| (id, *store))
    }
}

/// Style function of the edit layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditStyle {
    /// Plain rendering
    #[default]
    Default,
    /// Hover and selection aware rendering, see `MapEditor::feature_style`
    Interactive,
}

/// Style of the sketch/preview layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SketchStyle {
    #[default]
    Normal,
    /// The geometry being drawn leaves the bounds
    Error,
}

/// Per-feature style resolved by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureStyle {
    Default,
    Hover,
    Selected,
}

/// Animated view change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTarget {
    pub center: (f64, f64),
    pub zoom: f64,
    pub duration_ms: u32,
}

pub trait MapBackend {
    /// Installs the interactions of a mode, in priority order.
    fn install_interactions(&mut self, interactions: Vec<Interaction>);

    fn clear_interactions(&mut self);

    /// Swaps the mode marker on the map container.
    fn set_mode_marker(&mut self, marker: &'static str);

    fn set_edit_style(&mut self, style: EditStyle);

    fn set_sketch_style(&mut self, style: SketchStyle);

    /// Aborts the drawing in progress, if any.
    fn abort_drawing(&mut self);

    /// Features at `pixel`, topmost first.
    fn hit_test(&self, pixel: Pixel, layers: &LayerStack<'_>) -> Vec<LayerHit>;

    fn coordinate_at(&self, pixel: Pixel) -> Coord<f64>;

    fn fit(&mut self, extent: Rect<f64>);

    fn animate(&mut self, target: ViewTarget);

    fn view(&self) -> ViewSnapshot;

    /// Map units per pixel.
    fn resolution(&self) -> f64;
}
