//! A [`MapBackend`] without rendering.
//!
//! Keeps the view state, the installed interactions and styles in memory and
//! hit-tests geometrically. Used by the command line tool and the tests.

use geo::{Coord, Rect};
use geoedit_core::{Pixel, ViewSnapshot};

use crate::backend::{EditStyle, LayerHit, LayerStack, MapBackend, SketchStyle, ViewTarget};
use crate::geometry::measure;
use crate::interactions::{Interaction, InteractionKind};
use crate::viewport::MapViewport;

#[derive(Debug)]
pub struct HeadlessBackend {
    viewport: MapViewport,
    interactions: Vec<Interaction>,
    marker: Option<&'static str>,
    edit_style: EditStyle,
    sketch_style: SketchStyle,
    hit_tolerance: f64,
    aborted_draws: usize,
}

impl HeadlessBackend {
    /// `hit_tolerance` is in pixels.
    pub fn new(viewport: MapViewport, hit_tolerance: f64) -> Self {
        Self {
            viewport,
            interactions: Vec::new(),
            marker: None,
            edit_style: EditStyle::Default,
            sketch_style: SketchStyle::Normal,
            hit_tolerance,
            aborted_draws: 0,
        }
    }

    pub fn viewport(&self) -> &MapViewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut MapViewport {
        &mut self.viewport
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    pub fn interaction_kinds(&self) -> Vec<InteractionKind> {
        self.interactions.iter().map(Interaction::kind).collect()
    }

    pub fn marker(&self) -> Option<&'static str> {
        self.marker
    }

    pub fn edit_style(&self) -> EditStyle {
        self.edit_style
    }

    pub fn sketch_style(&self) -> SketchStyle {
        self.sketch_style
    }

    pub fn aborted_draws(&self) -> usize {
        self.aborted_draws
    }

    /// Applies the installed `Snap` interaction to a map coordinate.
    /// The tolerance is converted from pixels at the current resolution.
    pub fn snap(&self, coord: Coord<f64>) -> Coord<f64> {
        let resolution = self.viewport.resolution();
        self.interactions
            .iter()
            .find_map(|interaction| match interaction {
                Interaction::Snap {
                    features,
                    tolerance,
                } => features.snap(coord, tolerance * resolution),
                _ => None,
            })
            .unwrap_or(coord)
    }

    /// Moves the view without an animation.
    pub fn set_view(&mut self, snapshot: ViewSnapshot) {
        self.viewport.apply(&snapshot);
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new(MapViewport::default(), 5.0)
    }
}

impl MapBackend for HeadlessBackend {
    fn install_interactions(&mut self, interactions: Vec<Interaction>) {
        self.interactions = interactions;
    }

    fn clear_interactions(&mut self) {
        self.interactions.clear();
    }

    fn set_mode_marker(&mut self, marker: &'static str) {
        self.marker = Some(marker);
    }

    fn set_edit_style(&mut self, style: EditStyle) {
        self.edit_style = style;
    }

    fn set_sketch_style(&mut self, style: SketchStyle) {
        self.sketch_style = style;
    }

    fn abort_drawing(&mut self) {
        self.aborted_draws += 1;
    }

    fn hit_test(&self, pixel: Pixel, layers: &LayerStack<'_>) -> Vec<LayerHit> {
        let coord = self.viewport.pixel_to_coord(pixel);
        let tolerance = self.hit_tolerance * self.viewport.resolution();

        let mut hits = Vec::new();
        for (layer, store) in layers.iter() {
            for feature in store.iter().rev() {
                if measure::distance_to(&feature.geometry, coord) <= tolerance {
                    hits.push(LayerHit {
                        layer: layer.clone(),
                        feature: feature.id,
                    });
                }
            }
        }
        hits
    }

    fn coordinate_at(&self, pixel: Pixel) -> Coord<f64> {
        self.viewport.pixel_to_coord(pixel)
    }

    fn fit(&mut self, extent: Rect<f64>) {
        self.viewport.fit(extent);
    }

    fn animate(&mut self, target: ViewTarget) {
        self.viewport
            .apply(&ViewSnapshot::new(target.center, target.zoom));
    }

    fn view(&self) -> ViewSnapshot {
        self.viewport.snapshot()
    }

    fn resolution(&self) -> f64 {
        self.viewport.resolution()
    }
}
