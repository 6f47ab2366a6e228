//! Planar measurements: segment walks, lengths, and point-to-geometry distance.

use geo::{Coord, Geometry, Intersects, LineString, Polygon};

/// Calls `f` for every segment of the geometry's lines and rings.
pub fn for_each_segment(geometry: &Geometry<f64>, mut f: impl FnMut(Coord<f64>, Coord<f64>)) {
    walk_segments(geometry, &mut f);
}

fn walk_segments(geometry: &Geometry<f64>, f: &mut impl FnMut(Coord<f64>, Coord<f64>)) {
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => {}
        Geometry::Line(line) => f(line.start, line.end),
        Geometry::LineString(line) => line_segments(line, f),
        Geometry::MultiLineString(lines) => lines.iter().for_each(|l| line_segments(l, f)),
        Geometry::Polygon(polygon) => polygon_segments(polygon, f),
        Geometry::MultiPolygon(polygons) => polygons.iter().for_each(|p| polygon_segments(p, f)),
        Geometry::Rect(rect) => polygon_segments(&rect.to_polygon(), f),
        Geometry::Triangle(triangle) => polygon_segments(&triangle.to_polygon(), f),
        Geometry::GeometryCollection(collection) => {
            collection.iter().for_each(|g| walk_segments(g, f))
        }
    }
}

fn line_segments(line: &LineString<f64>, f: &mut impl FnMut(Coord<f64>, Coord<f64>)) {
    for segment in line.lines() {
        f(segment.start, segment.end);
    }
}

fn polygon_segments(polygon: &Polygon<f64>, f: &mut impl FnMut(Coord<f64>, Coord<f64>)) {
    line_segments(polygon.exterior(), f);
    for ring in polygon.interiors() {
        line_segments(ring, f);
    }
}

/// Every vertex, without the duplicated closing vertex of rings.
pub fn vertices(geometry: &Geometry<f64>) -> Vec<Coord<f64>> {
    let mut out = Vec::new();
    collect_vertices(geometry, &mut out);
    out
}

fn collect_vertices(geometry: &Geometry<f64>, out: &mut Vec<Coord<f64>>) {
    match geometry {
        Geometry::Point(point) => out.push(point.0),
        Geometry::MultiPoint(points) => out.extend(points.iter().map(|p| p.0)),
        Geometry::Line(line) => out.extend([line.start, line.end]),
        Geometry::LineString(line) => out.extend(line.coords().copied()),
        Geometry::MultiLineString(lines) => {
            out.extend(lines.iter().flat_map(|l| l.coords().copied()))
        }
        Geometry::Polygon(polygon) => ring_vertices(polygon, out),
        Geometry::MultiPolygon(polygons) => polygons.iter().for_each(|p| ring_vertices(p, out)),
        Geometry::Rect(rect) => ring_vertices(&rect.to_polygon(), out),
        Geometry::Triangle(triangle) => ring_vertices(&triangle.to_polygon(), out),
        Geometry::GeometryCollection(collection) => {
            collection.iter().for_each(|g| collect_vertices(g, out))
        }
    }
}

fn ring_vertices(polygon: &Polygon<f64>, out: &mut Vec<Coord<f64>>) {
    for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
        let coords = &ring.0;
        let open = match (coords.first(), coords.last()) {
            (Some(first), Some(last)) if coords.len() > 1 && first == last => {
                &coords[..coords.len() - 1]
            }
            _ => &coords[..],
        };
        out.extend_from_slice(open);
    }
}

/// Sum of segment lengths over lines. Rings are not counted.
pub fn length(geometry: &Geometry<f64>) -> f64 {
    match geometry {
        Geometry::Line(line) => line.dx().hypot(line.dy()),
        Geometry::LineString(line) => line_length(line),
        Geometry::MultiLineString(lines) => lines.iter().map(line_length).sum(),
        Geometry::GeometryCollection(collection) => collection.iter().map(length).sum(),
        _ => 0.0,
    }
}

fn line_length(line: &LineString<f64>) -> f64 {
    line.lines().map(|l| l.dx().hypot(l.dy())).sum()
}

/// Closest point to `p` on the segment `a`-`b`.
pub fn closest_on_segment(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> Coord<f64> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return a;
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    Coord {
        x: a.x + t * dx,
        y: a.y + t * dy,
    }
}

pub fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Distance from `coord` to the geometry; zero inside polygons.
pub fn distance_to(geometry: &Geometry<f64>, coord: Coord<f64>) -> f64 {
    let inside_area = match geometry {
        Geometry::Polygon(_)
        | Geometry::MultiPolygon(_)
        | Geometry::Rect(_)
        | Geometry::Triangle(_) => geometry.intersects(&coord),
        _ => false,
    };
    if inside_area {
        return 0.0;
    }

    let mut best = f64::INFINITY;
    for vertex in vertices(geometry) {
        best = best.min(distance(vertex, coord));
    }
    for_each_segment(geometry, |a, b| {
        best = best.min(distance(closest_on_segment(coord, a, b), coord));
    });
    if let Geometry::GeometryCollection(collection) = geometry {
        for member in collection.iter() {
            best = best.min(distance_to(member, coord));
        }
    }
    best
}
