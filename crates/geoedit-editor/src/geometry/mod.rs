//! Geometry module
//!
//! - [`engine`]: the [`GeometryEngine`] seam and its `geo`-backed implementation
//! - [`io`]: GeoJSON import/export of features
//! - [`measure`]: planar lengths, vertices and distances

pub mod engine;
pub mod io;
pub mod measure;

pub use engine::{as_multi_polygon, is_empty, GeoEngine, GeometryEngine};
