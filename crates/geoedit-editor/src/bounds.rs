//! Bounds validator.
//!
//! Holds the configured boundary polygons and answers the containment
//! queries used as live draw feedback and as end-of-draw validation. The
//! polygon set is loaded once and never mutated.

use geo::{Coord, Geometry, Polygon};
use geoedit_core::ConfigError;
use std::sync::Arc;

use crate::geometry::{as_multi_polygon, io, measure, GeometryEngine};

pub struct BoundsValidator {
    polygons: Vec<Polygon<f64>>,
    engine: Arc<dyn GeometryEngine>,
}

impl BoundsValidator {
    pub fn new(polygons: Vec<Polygon<f64>>, engine: Arc<dyn GeometryEngine>) -> Self {
        Self { polygons, engine }
    }

    /// Builds the validator from a GeoJSON Geometry, Feature or
    /// FeatureCollection. Non-polygonal members are rejected.
    pub fn from_geojson(
        value: &serde_json::Value,
        engine: Arc<dyn GeometryEngine>,
    ) -> Result<Self, ConfigError> {
        let geometries = io::parse_geometries(value).map_err(|e| ConfigError::InvalidBounds {
            reason: e.to_string(),
        })?;

        let mut polygons = Vec::new();
        for geometry in &geometries {
            let multi = as_multi_polygon(geometry).ok_or_else(|| ConfigError::InvalidBounds {
                reason: format!("{} is not a polygon", crate::model::geometry_kind(geometry)),
            })?;
            polygons.extend(multi.0);
        }

        if polygons.is_empty() {
            return Err(ConfigError::InvalidBounds {
                reason: "no polygons found".to_string(),
            });
        }

        tracing::info!("Loaded {} bounds polygon(s)", polygons.len());
        Ok(Self::new(polygons, engine))
    }

    pub fn polygons(&self) -> &[Polygon<f64>] {
        &self.polygons
    }

    pub fn contains_point(&self, coord: Coord<f64>) -> bool {
        self.polygons
            .iter()
            .any(|polygon| self.engine.point_in_polygon(polygon, coord))
    }

    /// True if any single bounds polygon contains the whole geometry.
    pub fn contains_geometry(&self, geometry: &Geometry<f64>) -> bool {
        self.polygons.iter().any(|polygon| {
            self.engine
                .contains(&Geometry::Polygon(polygon.clone()), geometry)
        })
    }

    /// Containment for a geometry that is still being drawn.
    ///
    /// Geometries too short to be valid (a line with fewer than two vertices,
    /// a ring with fewer than three) are tested vertex by vertex.
    pub fn contains_partial(&self, geometry: &Geometry<f64>) -> bool {
        if is_partial(geometry) {
            measure::vertices(geometry)
                .into_iter()
                .all(|coord| self.contains_point(coord))
        } else {
            self.contains_geometry(geometry)
        }
    }

    /// Bounds polygons sharing any point with `geometry`.
    pub fn overlapping<'a>(
        &'a self,
        geometry: &'a Geometry<f64>,
    ) -> impl Iterator<Item = &'a Polygon<f64>> + 'a {
        self.polygons.iter().filter(move |polygon| {
            self.engine
                .intersects(&Geometry::Polygon((*polygon).clone()), geometry)
        })
    }
}

impl std::fmt::Debug for BoundsValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundsValidator")
            .field("polygons", &self.polygons.len())
            .finish()
    }
}

fn is_partial(geometry: &Geometry<f64>) -> bool {
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => true,
        Geometry::LineString(line) => line.0.len() < 2,
        Geometry::Polygon(polygon) => {
            let mut ring = polygon.exterior().0.clone();
            ring.dedup();
            if ring.len() > 1 && ring.first() == ring.last() {
                ring.pop();
            }
            ring.len() < 3
        }
        _ => false,
    }
}
