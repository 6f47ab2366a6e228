//! Viewport and coordinate transformation for the map.
//!
//! Handles conversion between pixel coordinates (screen space) and map
//! coordinates. The view is a center plus a zoom level; the resolution (map
//! units per pixel) halves with every zoom step.

use geo::{Coord, Rect};
use geoedit_core::{Pixel, ViewSnapshot};
use std::fmt;

/// Resolution at zoom 0 (the whole Web Mercator world in 256 pixels).
pub const MAX_RESOLUTION: f64 = 156_543.033_928_040_97;
pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 28.0;
/// Fraction of the map kept free on each side by [`MapViewport::fit`].
pub const FIT_PADDING: f64 = 0.05;

/// Represents the map view state (center and zoom).
#[derive(Debug, Clone)]
pub struct MapViewport {
    center: Coord<f64>,
    zoom: f64,
    width: f64,
    height: f64,
}

impl MapViewport {
    /// Creates a viewport of the given pixel size centered on the origin.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            center: Coord { x: 0.0, y: 0.0 },
            zoom: MIN_ZOOM,
            width,
            height,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Sets the map size (typically called when the container resizes).
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn center(&self) -> Coord<f64> {
        self.center
    }

    pub fn set_center(&mut self, center: Coord<f64>) {
        self.center = center;
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level, clamped to the supported range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Map units per pixel at the current zoom.
    pub fn resolution(&self) -> f64 {
        MAX_RESOLUTION / 2f64.powf(self.zoom)
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot::new((self.center.x, self.center.y), self.zoom)
    }

    /// Moves to a stored view.
    pub fn apply(&mut self, snapshot: &ViewSnapshot) {
        self.center = Coord {
            x: snapshot.center.0,
            y: snapshot.center.1,
        };
        self.set_zoom(snapshot.zoom);
    }

    /// Converts pixel coordinates to map coordinates.
    ///
    /// Pixel coordinates are in screen space (0,0 at top-left, +Y down).
    /// Map coordinates have +Y up.
    ///
    /// Formula:
    /// ```text
    /// x = center_x + (pixel_x - width / 2) * resolution
    /// y = center_y - (pixel_y - height / 2) * resolution
    /// ```
    pub fn pixel_to_coord(&self, pixel: Pixel) -> Coord<f64> {
        let resolution = self.resolution();
        Coord {
            x: self.center.x + (pixel.x - self.width / 2.0) * resolution,
            y: self.center.y - (pixel.y - self.height / 2.0) * resolution,
        }
    }

    /// Converts map coordinates to pixel coordinates.
    pub fn coord_to_pixel(&self, coord: Coord<f64>) -> Pixel {
        let resolution = self.resolution();
        Pixel::new(
            self.width / 2.0 + (coord.x - self.center.x) / resolution,
            self.height / 2.0 - (coord.y - self.center.y) / resolution,
        )
    }

    /// Fits the given extent into the view with padding.
    ///
    /// Centers the extent and picks the largest zoom that shows all of it.
    /// A degenerate extent (a point) only recenters.
    pub fn fit_to_bounds(&mut self, extent: Rect<f64>, padding: f64) {
        self.center = extent.center();

        let padding_factor = 1.0 - padding * 2.0;
        if extent.width() <= 0.0 && extent.height() <= 0.0 {
            return;
        }
        if padding_factor <= 0.0 || self.width <= 0.0 || self.height <= 0.0 {
            return;
        }

        let resolution_x = extent.width() / (self.width * padding_factor);
        let resolution_y = extent.height() / (self.height * padding_factor);
        let resolution = resolution_x.max(resolution_y);

        self.set_zoom((MAX_RESOLUTION / resolution).log2());
    }

    /// Equivalent to `fit_to_bounds` with the default padding.
    pub fn fit(&mut self, extent: Rect<f64>) {
        self.fit_to_bounds(extent, FIT_PADDING);
    }

    /// Map extent currently visible.
    pub fn extent(&self) -> Rect<f64> {
        let min = self.pixel_to_coord(Pixel::new(0.0, self.height));
        let max = self.pixel_to_coord(Pixel::new(self.width, 0.0));
        Rect::new(min, max)
    }
}

impl fmt::Display for MapViewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2} | Center: ({:.1}, {:.1})",
            self.zoom, self.center.x, self.center.y
        )
    }
}

impl Default for MapViewport {
    fn default() -> Self {
        Self::new(1200.0, 800.0)
    }
}
