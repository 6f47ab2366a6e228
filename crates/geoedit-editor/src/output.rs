//! Output synchronizer.
//!
//! Serializes the whole edit layer to GeoJSON, sums the polygon areas and
//! publishes an [`OutputEvent::Changed`]. Every sync starts from the current
//! layer contents; nothing is diffed.

use geo::Geometry;
use geoedit_core::{AppEvent, EventBus, EventBusError, OutputEvent};
use std::sync::Arc;

use crate::geometry::{io, GeometryEngine};
use crate::model::FeatureStore;

/// Last published output.
#[derive(Debug, Clone, PartialEq)]
pub struct EditOutput {
    pub geojson: String,
    pub total_area: f64,
}

pub struct OutputSynchronizer {
    bus: Arc<EventBus>,
    engine: Arc<dyn GeometryEngine>,
    crs: String,
    last: Option<EditOutput>,
    sync_count: usize,
}

impl OutputSynchronizer {
    pub fn new(bus: Arc<EventBus>, engine: Arc<dyn GeometryEngine>, crs: impl Into<String>) -> Self {
        Self {
            bus,
            engine,
            crs: crs.into(),
            last: None,
            sync_count: 0,
        }
    }

    /// Recomputes the output from `store` and notifies listeners.
    pub fn sync(&mut self, store: &FeatureStore) -> Option<&EditOutput> {
        let geojson = match io::feature_collection(store.iter(), &self.crs) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Failed to serialize edit layer: {}", e);
                return None;
            }
        };

        let total_area = store
            .iter()
            .filter(|f| {
                matches!(
                    f.geometry,
                    Geometry::Polygon(_) | Geometry::MultiPolygon(_)
                )
            })
            .map(|f| self.engine.area(&f.geometry))
            .sum();

        self.sync_count += 1;
        tracing::debug!(
            "Edit layer synced: {} feature(s), area {:.2}",
            store.len(),
            total_area
        );

        let output = EditOutput {
            geojson,
            total_area,
        };
        match self.bus.publish(AppEvent::Output(OutputEvent::Changed {
            geojson: output.geojson.clone(),
            total_area,
        })) {
            Ok(_) | Err(EventBusError::NoSubscribers) => {}
            Err(e) => tracing::warn!("Output notification failed: {}", e),
        }

        self.last = Some(output);
        self.last.as_ref()
    }

    pub fn last(&self) -> Option<&EditOutput> {
        self.last.as_ref()
    }

    /// Number of syncs performed so far.
    pub fn sync_count(&self) -> usize {
        self.sync_count
    }

    pub fn crs(&self) -> &str {
        &self.crs
    }
}

impl std::fmt::Debug for OutputSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSynchronizer")
            .field("crs", &self.crs)
            .field("sync_count", &self.sync_count)
            .finish()
    }
}
