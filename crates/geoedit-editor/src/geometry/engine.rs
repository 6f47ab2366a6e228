//! Geometry engine adapter.
//!
//! [`GeometryEngine`] is the seam the editing core uses for every topological
//! operation. [`GeoEngine`] implements it on top of the `geo` crate: boolean
//! operations come from `BooleanOps`, predicates from `Contains`/`Intersects`.
//! Buffering is assembled from those primitives as the union of a disc per
//! vertex and a rectangle per segment.

use geo::{
    Area, BooleanOps, Contains, Coord, Geometry, Intersects, LineString, MultiLineString,
    MultiPolygon, Polygon,
};
use geoedit_core::GeometryError;
use std::f64::consts::PI;

use crate::geometry::measure;
use crate::model::geometry_kind;

/// Segments shorter than this are ignored when building buffer rectangles.
const MIN_SEGMENT_LENGTH: f64 = 1e-12;

/// Topology operations required by the editing core.
pub trait GeometryEngine: Send + Sync {
    /// Dilates `geometry` by `radius`, approximating arcs with `segments`
    /// points per quarter circle. Negative radii shrink polygons.
    fn buffer(
        &self,
        geometry: &Geometry<f64>,
        radius: f64,
        segments: u32,
    ) -> Result<Geometry<f64>, GeometryError>;

    /// `a` minus `b`. `b` must be polygonal.
    fn difference(
        &self,
        a: &Geometry<f64>,
        b: &Geometry<f64>,
    ) -> Result<Geometry<f64>, GeometryError>;

    /// `a` intersected with `b`. `b` must be polygonal.
    fn intersection(
        &self,
        a: &Geometry<f64>,
        b: &Geometry<f64>,
    ) -> Result<Geometry<f64>, GeometryError>;

    /// Whether `container` fully contains `geometry`.
    fn contains(&self, container: &Geometry<f64>, geometry: &Geometry<f64>) -> bool;

    /// Whether the two geometries share any point.
    fn intersects(&self, a: &Geometry<f64>, b: &Geometry<f64>) -> bool;

    /// Whether `coord` lies inside or on the boundary of `polygon`.
    fn point_in_polygon(&self, polygon: &Polygon<f64>, coord: Coord<f64>) -> bool;

    /// Planar area of the polygonal parts of `geometry`.
    fn area(&self, geometry: &Geometry<f64>) -> f64;

    /// Planar length of the linear parts of `geometry`.
    fn length(&self, geometry: &Geometry<f64>) -> f64;
}

/// [`GeometryEngine`] backed by the `geo` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoEngine;

impl GeoEngine {
    pub fn new() -> Self {
        Self
    }
}

impl GeometryEngine for GeoEngine {
    fn buffer(
        &self,
        geometry: &Geometry<f64>,
        radius: f64,
        segments: u32,
    ) -> Result<Geometry<f64>, GeometryError> {
        if segments == 0 || !radius.is_finite() {
            return Err(GeometryError::InvalidBuffer { radius, segments });
        }

        let polygonal = as_multi_polygon(geometry);

        if radius == 0.0 {
            return match polygonal {
                Some(area) => Ok(simplify_polygons(area)),
                None => Err(GeometryError::InvalidBuffer { radius, segments }),
            };
        }

        if radius < 0.0 {
            let area = polygonal.ok_or_else(|| unsupported("negative buffer", geometry))?;
            let boundary = boundary_buffer(&area, -radius, segments);
            return Ok(simplify_polygons(area.difference(&boundary)));
        }

        let mut pieces = Vec::new();
        measure::for_each_segment(geometry, |a, b| {
            if let Some(quad) = segment_rect(a, b, radius) {
                pieces.push(quad);
            }
        });
        pieces.extend(
            measure::vertices(geometry)
                .into_iter()
                .map(|c| disc(c, radius, segments)),
        );
        if let Some(area) = polygonal {
            pieces.extend(area.0);
        }

        if pieces.is_empty() {
            return Err(unsupported("buffer", geometry));
        }
        Ok(simplify_polygons(union_all(pieces)))
    }

    fn difference(
        &self,
        a: &Geometry<f64>,
        b: &Geometry<f64>,
    ) -> Result<Geometry<f64>, GeometryError> {
        let cutter = as_multi_polygon(b).ok_or_else(|| unsupported("difference", b))?;
        if let Some(area) = as_multi_polygon(a) {
            return Ok(simplify_polygons(area.difference(&cutter)));
        }
        if let Some(lines) = as_multi_line_string(a) {
            return Ok(simplify_lines(cutter.clip(&lines, true)));
        }
        Err(unsupported("difference", a))
    }

    fn intersection(
        &self,
        a: &Geometry<f64>,
        b: &Geometry<f64>,
    ) -> Result<Geometry<f64>, GeometryError> {
        let mask = as_multi_polygon(b).ok_or_else(|| unsupported("intersection", b))?;
        if let Some(area) = as_multi_polygon(a) {
            return Ok(simplify_polygons(area.intersection(&mask)));
        }
        if let Some(lines) = as_multi_line_string(a) {
            return Ok(simplify_lines(mask.clip(&lines, false)));
        }
        Err(unsupported("intersection", a))
    }

    fn contains(&self, container: &Geometry<f64>, geometry: &Geometry<f64>) -> bool {
        match as_multi_polygon(container) {
            Some(area) => area
                .0
                .iter()
                .any(|polygon| polygon_contains(polygon, geometry)),
            None => false,
        }
    }

    fn intersects(&self, a: &Geometry<f64>, b: &Geometry<f64>) -> bool {
        a.intersects(b)
    }

    fn point_in_polygon(&self, polygon: &Polygon<f64>, coord: Coord<f64>) -> bool {
        polygon.intersects(&coord)
    }

    fn area(&self, geometry: &Geometry<f64>) -> f64 {
        geometry.unsigned_area()
    }

    fn length(&self, geometry: &Geometry<f64>) -> f64 {
        measure::length(geometry)
    }
}

/// Polygonal view of a geometry, if it has one.
pub fn as_multi_polygon(geometry: &Geometry<f64>) -> Option<MultiPolygon<f64>> {
    match geometry {
        Geometry::Polygon(polygon) => Some(MultiPolygon::new(vec![polygon.clone()])),
        Geometry::MultiPolygon(multi) => Some(multi.clone()),
        Geometry::Rect(rect) => Some(MultiPolygon::new(vec![rect.to_polygon()])),
        Geometry::Triangle(triangle) => Some(MultiPolygon::new(vec![triangle.to_polygon()])),
        Geometry::GeometryCollection(collection) => {
            let polygons: Vec<Polygon<f64>> = collection
                .iter()
                .filter_map(as_multi_polygon)
                .flat_map(|multi| multi.0)
                .collect();
            (!polygons.is_empty()).then(|| MultiPolygon::new(polygons))
        }
        _ => None,
    }
}

fn as_multi_line_string(geometry: &Geometry<f64>) -> Option<MultiLineString<f64>> {
    match geometry {
        Geometry::Line(line) => Some(MultiLineString::new(vec![LineString::from(vec![
            line.start, line.end,
        ])])),
        Geometry::LineString(line) => Some(MultiLineString::new(vec![line.clone()])),
        Geometry::MultiLineString(multi) => Some(multi.clone()),
        _ => None,
    }
}

fn polygon_contains(polygon: &Polygon<f64>, geometry: &Geometry<f64>) -> bool {
    match geometry {
        Geometry::Point(point) => polygon.contains(point),
        Geometry::Line(line) => polygon.contains(line),
        Geometry::LineString(line) => polygon.contains(line),
        Geometry::Polygon(other) => polygon.contains(other),
        Geometry::MultiPoint(points) => points.iter().all(|p| polygon.contains(p)),
        Geometry::MultiLineString(lines) => lines.iter().all(|l| polygon.contains(l)),
        Geometry::MultiPolygon(polygons) => polygons.iter().all(|p| polygon.contains(p)),
        Geometry::Rect(rect) => polygon.contains(&rect.to_polygon()),
        Geometry::Triangle(triangle) => polygon.contains(&triangle.to_polygon()),
        Geometry::GeometryCollection(collection) => {
            !collection.0.is_empty() && collection.iter().all(|g| polygon_contains(polygon, g))
        }
    }
}

/// Regular polygon with `4 * segments` corners around `center`.
fn disc(center: Coord<f64>, radius: f64, segments: u32) -> Polygon<f64> {
    let steps = segments as usize * 4;
    let mut ring: Vec<Coord<f64>> = (0..steps)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / steps as f64;
            Coord {
                x: center.x + radius * angle.cos(),
                y: center.y + radius * angle.sin(),
            }
        })
        .collect();
    ring.push(ring[0]);
    Polygon::new(LineString::from(ring), vec![])
}

/// Rectangle covering every point within `radius` of the segment's interior.
fn segment_rect(a: Coord<f64>, b: Coord<f64>, radius: f64) -> Option<Polygon<f64>> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = dx.hypot(dy);
    if len < MIN_SEGMENT_LENGTH {
        return None;
    }
    let nx = -dy / len * radius;
    let ny = dx / len * radius;
    let ring = vec![
        Coord { x: a.x + nx, y: a.y + ny },
        Coord { x: b.x + nx, y: b.y + ny },
        Coord { x: b.x - nx, y: b.y - ny },
        Coord { x: a.x - nx, y: a.y - ny },
        Coord { x: a.x + nx, y: a.y + ny },
    ];
    Some(Polygon::new(LineString::from(ring), vec![]))
}

/// Buffer of the rings of `area`, used to erode polygons.
fn boundary_buffer(area: &MultiPolygon<f64>, radius: f64, segments: u32) -> MultiPolygon<f64> {
    let rings: Vec<LineString<f64>> = area
        .iter()
        .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
        .cloned()
        .collect();
    let outline = Geometry::MultiLineString(MultiLineString::new(rings));

    let mut pieces = Vec::new();
    measure::for_each_segment(&outline, |a, b| {
        if let Some(quad) = segment_rect(a, b, radius) {
            pieces.push(quad);
        }
    });
    pieces.extend(
        measure::vertices(&outline)
            .into_iter()
            .map(|c| disc(c, radius, segments)),
    );
    union_all(pieces)
}

/// Pairwise union, halving the number of operands on every pass.
fn union_all(polygons: Vec<Polygon<f64>>) -> MultiPolygon<f64> {
    let mut layer: Vec<MultiPolygon<f64>> = polygons
        .into_iter()
        .map(|p| MultiPolygon::new(vec![p]))
        .collect();

    while layer.len() > 1 {
        let mut next = Vec::with_capacity(layer.len().div_ceil(2));
        let mut iter = layer.into_iter();
        while let Some(first) = iter.next() {
            match iter.next() {
                Some(second) => next.push(first.union(&second)),
                None => next.push(first),
            }
        }
        layer = next;
    }

    layer.pop().unwrap_or_else(|| MultiPolygon::new(vec![]))
}

fn simplify_polygons(mut multi: MultiPolygon<f64>) -> Geometry<f64> {
    if multi.0.len() == 1 {
        Geometry::Polygon(multi.0.remove(0))
    } else {
        Geometry::MultiPolygon(multi)
    }
}

fn simplify_lines(mut multi: MultiLineString<f64>) -> Geometry<f64> {
    if multi.0.len() == 1 {
        Geometry::LineString(multi.0.remove(0))
    } else {
        Geometry::MultiLineString(multi)
    }
}

fn unsupported(operation: &str, geometry: &Geometry<f64>) -> GeometryError {
    GeometryError::Unsupported {
        operation: operation.to_string(),
        kind: geometry_kind(geometry).to_string(),
    }
}

/// True when the geometry has nothing left after a boolean operation.
pub fn is_empty(geometry: &Geometry<f64>) -> bool {
    match geometry {
        Geometry::Polygon(polygon) => polygon.exterior().0.is_empty(),
        Geometry::MultiPolygon(multi) => multi.0.is_empty(),
        Geometry::LineString(line) => line.0.is_empty(),
        Geometry::MultiLineString(multi) => multi.0.is_empty(),
        Geometry::MultiPoint(points) => points.0.is_empty(),
        Geometry::GeometryCollection(collection) => collection.0.is_empty(),
        _ => false,
    }
}
