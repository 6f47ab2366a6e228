//! Geometry transform pipeline.
//!
//! Stateless operations built on the [`GeometryEngine`]: bounds-clipped
//! buffering, cutting, and splitting multi-polygons into single polygons.

use geo::Geometry;
use geoedit_core::{FeatureId, GeometryError};

use crate::bounds::BoundsValidator;
use crate::geometry::GeometryEngine;
use crate::model::FeatureStore;

/// Buffers `geometry` and clips the result to the bounds it overlaps.
///
/// Each overlapping bounds polygon is intersected in turn; they are not
/// unioned first. Without bounds the raw engine result is returned.
pub fn compute_buffer(
    engine: &dyn GeometryEngine,
    geometry: &Geometry<f64>,
    radius: f64,
    segments: u32,
    bounds: Option<&BoundsValidator>,
) -> Result<Geometry<f64>, GeometryError> {
    let raw = engine.buffer(geometry, radius, segments)?;
    let Some(bounds) = bounds else {
        return Ok(raw);
    };

    let overlapping: Vec<Geometry<f64>> = bounds
        .overlapping(&raw)
        .map(|polygon| Geometry::Polygon(polygon.clone()))
        .collect();

    let mut clipped = raw;
    for polygon in &overlapping {
        clipped = engine.intersection(&clipped, polygon)?;
    }
    Ok(clipped)
}

/// Removes `cutter` from `target`. Points cannot be cut.
pub fn cut(
    engine: &dyn GeometryEngine,
    target: &Geometry<f64>,
    cutter: &Geometry<f64>,
) -> Result<Geometry<f64>, GeometryError> {
    if matches!(target, Geometry::Point(_) | Geometry::MultiPoint(_)) {
        tracing::warn!("Skipping cut: {}", GeometryError::CutPoint);
        return Err(GeometryError::CutPoint);
    }
    engine.difference(target, cutter)
}

/// Replacement of one multi-polygon feature by its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub removed: FeatureId,
    pub added: Vec<FeatureId>,
}

/// Replaces every MultiPolygon feature in `store` with one Polygon feature
/// per part. Parts inherit properties and the editable flag; feature
/// identity is not preserved.
pub fn split_multi_polygons(store: &mut FeatureStore) -> Vec<Split> {
    let multi_ids: Vec<FeatureId> = store
        .iter()
        .filter(|f| matches!(f.geometry, Geometry::MultiPolygon(_)))
        .map(|f| f.id)
        .collect();

    let mut splits = Vec::with_capacity(multi_ids.len());
    for id in multi_ids {
        let Some(original) = store.remove(id) else {
            continue;
        };
        let Geometry::MultiPolygon(parts) = &original.geometry else {
            continue;
        };

        let added = parts
            .iter()
            .map(|part| store.insert(original.derive(Geometry::Polygon(part.clone()))))
            .collect();
        splits.push(Split { removed: id, added });
    }

    if !splits.is_empty() {
        tracing::debug!("Split {} multi-polygon feature(s)", splits.len());
    }
    splits
}
