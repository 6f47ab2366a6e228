//! Data models shared by every GeoEdit crate
//!
//! This module provides:
//! - The editor [`Mode`] with its per-mode capabilities
//! - Layer and feature identifiers
//! - Screen pixels and viewport snapshots

use serde::{Deserialize, Serialize};
use std::fmt;

/// The single active interaction/editing state of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Mode {
    /// Pan, zoom and feature inspection
    #[default]
    View,
    /// Drag a box to zoom into
    ZoomBox,
    /// Measure the length of a drawn line
    MeasureLine,
    /// Measure the area of a drawn polygon
    MeasureArea,
    /// Draw point features
    DrawPoints,
    /// Draw line features
    DrawLines,
    /// Draw polygon features
    DrawPolygons,
    /// Move vertices of selected features
    ModifyFeatures,
    /// Remove features by clicking them
    DeleteFeatures,
    /// Pick features to buffer
    BufferFeatures,
    /// Edit the buffer outline before accepting it
    BufferFeaturesEdit,
    /// Draw lines that are buffered while drawing
    BufferFeaturesDynamic,
    /// Pick features to cut
    CutFeatures,
    /// Draw the cutter polygon
    CutFeaturesDraw,
    /// Look up parcels on reference layers
    SearchParcel,
}

impl Mode {
    /// Every mode, in declaration order.
    pub const ALL: [Mode; 15] = [
        Mode::View,
        Mode::ZoomBox,
        Mode::MeasureLine,
        Mode::MeasureArea,
        Mode::DrawPoints,
        Mode::DrawLines,
        Mode::DrawPolygons,
        Mode::ModifyFeatures,
        Mode::DeleteFeatures,
        Mode::BufferFeatures,
        Mode::BufferFeaturesEdit,
        Mode::BufferFeaturesDynamic,
        Mode::CutFeatures,
        Mode::CutFeaturesDraw,
        Mode::SearchParcel,
    ];

    /// Whether a selection is meaningful while this mode is active.
    pub fn is_selectable(self) -> bool {
        matches!(
            self,
            Mode::ModifyFeatures
                | Mode::BufferFeatures
                | Mode::BufferFeaturesEdit
                | Mode::CutFeatures
                | Mode::CutFeaturesDraw
        )
    }

    /// Whether the snap interaction may be installed in this mode.
    pub fn supports_snapping(self) -> bool {
        matches!(
            self,
            Mode::DrawPoints
                | Mode::DrawLines
                | Mode::DrawPolygons
                | Mode::ModifyFeatures
                | Mode::BufferFeaturesEdit
                | Mode::BufferFeaturesDynamic
                | Mode::CutFeaturesDraw
        )
    }

    /// Modes whose drawn geometry ends up in the edit layer.
    pub fn draws_features(self) -> bool {
        matches!(
            self,
            Mode::DrawPoints | Mode::DrawLines | Mode::DrawPolygons | Mode::BufferFeaturesDynamic
        )
    }

    /// Modes that mutate edit layer features.
    pub fn is_editing(self) -> bool {
        !matches!(
            self,
            Mode::View | Mode::ZoomBox | Mode::MeasureLine | Mode::MeasureArea | Mode::SearchParcel
        )
    }

    /// State marker swapped on the map container so cursors and toolbars can react.
    pub fn marker(self) -> &'static str {
        match self {
            Mode::View => "mode-view",
            Mode::ZoomBox => "mode-zoom-box",
            Mode::MeasureLine => "mode-measure-line",
            Mode::MeasureArea => "mode-measure-area",
            Mode::DrawPoints => "mode-draw-points",
            Mode::DrawLines => "mode-draw-lines",
            Mode::DrawPolygons => "mode-draw-polygons",
            Mode::ModifyFeatures => "mode-modify-features",
            Mode::DeleteFeatures => "mode-delete-features",
            Mode::BufferFeatures => "mode-buffer-features",
            Mode::BufferFeaturesEdit => "mode-buffer-features-edit",
            Mode::BufferFeaturesDynamic => "mode-buffer-features-dynamic",
            Mode::CutFeatures => "mode-cut-features",
            Mode::CutFeaturesDraw => "mode-cut-features-draw",
            Mode::SearchParcel => "mode-search-parcel",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Stable identity of a feature, unchanged by geometry mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureId(pub u64);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifies a feature collection on the map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerId {
    /// The mutable layer the user edits
    Edit,
    /// Transient sketch/preview geometry
    Sketch,
    /// Measurement geometry
    Measure,
    /// Configured bounds polygons
    Bounds,
    /// A read-only reference layer
    Reference(String),
}

impl LayerId {
    /// Layers that never take part in snapping.
    pub fn is_transient(&self) -> bool {
        matches!(self, LayerId::Sketch | LayerId::Measure | LayerId::Bounds)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerId::Edit => write!(f, "edit"),
            LayerId::Sketch => write!(f, "sketch"),
            LayerId::Measure => write!(f, "measure"),
            LayerId::Bounds => write!(f, "bounds"),
            LayerId::Reference(name) => write!(f, "{}", name),
        }
    }
}

/// Screen position in CSS pixels, origin at the top-left of the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Pixel {
    pub x: f64,
    pub y: f64,
}

impl Pixel {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Viewport state as stored in the view history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    /// Map center in map units
    pub center: (f64, f64),
    /// Zoom level
    pub zoom: f64,
}

impl ViewSnapshot {
    pub fn new(center: (f64, f64), zoom: f64) -> Self {
        Self { center, zoom }
    }

    /// True when both center axes and the zoom differ by no more than the epsilons.
    pub fn is_near(&self, other: &ViewSnapshot, center_epsilon: f64, zoom_epsilon: f64) -> bool {
        (self.center.0 - other.center.0).abs() <= center_epsilon
            && (self.center.1 - other.center.1).abs() <= center_epsilon
            && (self.zoom - other.zoom).abs() <= zoom_epsilon
    }
}
