//! Snap index.
//!
//! A shared, mutable set of snappable features drawn from the visible vector
//! layers. The set is handed to the backend inside the `Snap` interaction, so
//! it sits behind an `Arc<RwLock>`: the index mutates it while the backend
//! reads it.

use geo::{Coord, Geometry};
use geoedit_core::{FeatureId, LayerId};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::geometry::measure;
use crate::model::Feature;

#[derive(Debug, Clone, PartialEq)]
pub struct SnapTarget {
    pub layer: LayerId,
    pub feature: FeatureId,
    pub geometry: Geometry<f64>,
}

/// Shared handle on the snappable features.
#[derive(Debug, Clone, Default)]
pub struct SnapFeatureSet(Arc<RwLock<Vec<SnapTarget>>>);

impl SnapFeatureSet {
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    pub fn contains(&self, layer: &LayerId, feature: FeatureId) -> bool {
        self.0
            .read()
            .iter()
            .any(|t| &t.layer == layer && t.feature == feature)
    }

    /// Snaps `coord` to the nearest vertex within `tolerance`, or failing
    /// that to the nearest point on an edge within `tolerance`.
    pub fn snap(&self, coord: Coord<f64>, tolerance: f64) -> Option<Coord<f64>> {
        let targets = self.0.read();

        let mut best_vertex: Option<(f64, Coord<f64>)> = None;
        for target in targets.iter() {
            for vertex in measure::vertices(&target.geometry) {
                let d = measure::distance(vertex, coord);
                if d <= tolerance && best_vertex.is_none_or(|(best, _)| d < best) {
                    best_vertex = Some((d, vertex));
                }
            }
        }
        if let Some((_, vertex)) = best_vertex {
            return Some(vertex);
        }

        let mut best_edge: Option<(f64, Coord<f64>)> = None;
        for target in targets.iter() {
            measure::for_each_segment(&target.geometry, |a, b| {
                let candidate = measure::closest_on_segment(coord, a, b);
                let d = measure::distance(candidate, coord);
                if d <= tolerance && best_edge.is_none_or(|(best, _)| d < best) {
                    best_edge = Some((d, candidate));
                }
            });
        }
        best_edge.map(|(_, c)| c)
    }
}

/// Keeps the [`SnapFeatureSet`] in step with layers and features.
#[derive(Debug, Default)]
pub struct SnapIndex {
    set: SnapFeatureSet,
}

impl SnapIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared set given to `Snap` interactions.
    pub fn shared(&self) -> SnapFeatureSet {
        self.set.clone()
    }

    /// Pushes a layer's current features. Transient layers are ignored.
    pub fn add_layer<'a>(&self, layer: &LayerId, features: impl IntoIterator<Item = &'a Feature>) {
        if layer.is_transient() {
            return;
        }
        self.remove_layer(layer);
        let mut targets = self.set.0.write();
        let before = targets.len();
        targets.extend(features.into_iter().map(|f| SnapTarget {
            layer: layer.clone(),
            feature: f.id,
            geometry: f.geometry.clone(),
        }));
        tracing::debug!("Snap index: added {} feature(s) of {}", targets.len() - before, layer);
    }

    pub fn remove_layer(&self, layer: &LayerId) {
        self.set.0.write().retain(|t| &t.layer != layer);
    }

    pub fn insert_feature(&self, layer: &LayerId, feature: &Feature) {
        if layer.is_transient() {
            return;
        }
        let mut targets = self.set.0.write();
        targets.retain(|t| !(&t.layer == layer && t.feature == feature.id));
        targets.push(SnapTarget {
            layer: layer.clone(),
            feature: feature.id,
            geometry: feature.geometry.clone(),
        });
    }

    pub fn update_feature(&self, layer: &LayerId, feature: &Feature) {
        self.insert_feature(layer, feature);
    }

    pub fn remove_feature(&self, layer: &LayerId, feature: FeatureId) {
        self.set
            .0
            .write()
            .retain(|t| !(&t.layer == layer && t.feature == feature));
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn contains(&self, layer: &LayerId, feature: FeatureId) -> bool {
        self.set.contains(layer, feature)
    }
}
