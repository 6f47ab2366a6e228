//! Event type definitions for the event bus.
//!
//! This module defines every event the editing core emits, organized by
//! category. Events are cloneable and serializable for logging/replay.

use serde::{Deserialize, Serialize};

use crate::data::{LayerId, Mode, Pixel};

/// Root event enum for all editor events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    /// Mode transitions
    Mode(ModeEvent),
    /// Edit layer output changes
    Output(OutputEvent),
    /// Feature hover/click/leave
    Feature(FeatureEvent),
    /// Selection and multi-select changes
    Selection(SelectionEvent),
    /// Buffer preview toggles and parameter changes
    Buffer(BufferEvent),
    /// Snapping toggles
    Snap(SnapEvent),
    /// Viewport navigation
    View(ViewEvent),
    /// Drawing feedback
    Draw(DrawEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Mode(_) => EventCategory::Mode,
            AppEvent::Output(_) => EventCategory::Output,
            AppEvent::Feature(_) => EventCategory::Feature,
            AppEvent::Selection(_) => EventCategory::Selection,
            AppEvent::Buffer(_) => EventCategory::Buffer,
            AppEvent::Snap(_) => EventCategory::Snap,
            AppEvent::View(_) => EventCategory::View,
            AppEvent::Draw(_) => EventCategory::Draw,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Mode(e) => e.description(),
            AppEvent::Output(e) => e.description(),
            AppEvent::Feature(e) => e.description(),
            AppEvent::Selection(e) => e.description(),
            AppEvent::Buffer(e) => e.description(),
            AppEvent::Snap(e) => e.description(),
            AppEvent::View(e) => e.description(),
            AppEvent::Draw(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Mode transitions.
    Mode,
    /// Edit layer output.
    Output,
    /// Feature hover/click/leave.
    Feature,
    /// Selection changes.
    Selection,
    /// Buffer preview.
    Buffer,
    /// Snapping.
    Snap,
    /// View navigation.
    View,
    /// Drawing feedback.
    Draw,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Mode => write!(f, "Mode"),
            EventCategory::Output => write!(f, "Output"),
            EventCategory::Feature => write!(f, "Feature"),
            EventCategory::Selection => write!(f, "Selection"),
            EventCategory::Buffer => write!(f, "Buffer"),
            EventCategory::Snap => write!(f, "Snap"),
            EventCategory::View => write!(f, "View"),
            EventCategory::Draw => write!(f, "Draw"),
        }
    }
}

/// Mode transition events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ModeEvent {
    /// The active mode changed (also sent when re-entering the same mode).
    Changed {
        /// The mode that is now active.
        mode: Mode,
    },
}

impl ModeEvent {
    fn description(&self) -> String {
        match self {
            ModeEvent::Changed { mode } => format!("Mode changed to {}", mode),
        }
    }
}

/// Output synchronization events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputEvent {
    /// The edit layer serialization changed.
    Changed {
        /// Full GeoJSON FeatureCollection of the edit layer.
        geojson: String,
        /// Sum of all polygon areas in map units.
        total_area: f64,
    },
}

impl OutputEvent {
    fn description(&self) -> String {
        match self {
            OutputEvent::Changed { geojson, total_area } => format!(
                "Output changed ({} bytes, area {:.2})",
                geojson.len(),
                total_area
            ),
        }
    }
}

/// Information about a feature under the pointer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureInfo {
    /// Pointer position on screen.
    pub pixel: Pixel,
    /// Pointer position in map units.
    pub coords: (f64, f64),
    /// Layer the feature belongs to.
    pub layer_id: LayerId,
    /// The feature's property map.
    pub properties: serde_json::Map<String, serde_json::Value>,
}

/// Feature pointer events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FeatureEvent {
    /// Pointer entered a feature.
    Hover(FeatureInfo),
    /// A feature was clicked.
    Click(FeatureInfo),
    /// Pointer left a feature.
    Leave(FeatureInfo),
}

impl FeatureEvent {
    fn description(&self) -> String {
        match self {
            FeatureEvent::Hover(info) => format!("Hover on {}", info.layer_id),
            FeatureEvent::Click(info) => format!("Click on {}", info.layer_id),
            FeatureEvent::Leave(info) => format!("Leave {}", info.layer_id),
        }
    }
}

/// Selection events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SelectionEvent {
    /// Multi-select was switched on or off.
    MultiSelect {
        /// Whether multi-select is active.
        on: bool,
    },
    /// Selection membership changed.
    Changed {
        /// Number of selected features.
        count: usize,
    },
}

impl SelectionEvent {
    fn description(&self) -> String {
        match self {
            SelectionEvent::MultiSelect { on } => format!("Multi-select {}", on_off(*on)),
            SelectionEvent::Changed { count } => format!("Selection has {} feature(s)", count),
        }
    }
}

/// Buffer preview events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BufferEvent {
    /// Buffering was armed or disarmed.
    Toggled {
        /// Whether buffering is active.
        on: bool,
        /// Buffer radius in map units.
        radius: f64,
        /// Segments per quarter circle.
        segments: u32,
    },
    /// Buffer parameters changed.
    Changed {
        /// Whether buffering is active.
        on: bool,
        /// Buffer radius in map units.
        radius: f64,
        /// Segments per quarter circle.
        segments: u32,
    },
}

impl BufferEvent {
    fn description(&self) -> String {
        match self {
            BufferEvent::Toggled { on, radius, .. } => {
                format!("Buffer {} (radius {})", on_off(*on), radius)
            }
            BufferEvent::Changed {
                radius, segments, ..
            } => format!("Buffer radius {} with {} segments", radius, segments),
        }
    }
}

/// Snapping events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SnapEvent {
    /// Snapping was switched on or off.
    Toggled {
        /// Whether snapping is active.
        on: bool,
    },
}

impl SnapEvent {
    fn description(&self) -> String {
        match self {
            SnapEvent::Toggled { on } => format!("Snapping {}", on_off(*on)),
        }
    }
}

/// View navigation events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ViewEvent {
    /// The viewport moved.
    Navigated {
        /// Map center in map units.
        center: (f64, f64),
        /// Zoom level.
        zoom: f64,
        /// Map scale denominator.
        scale: f64,
    },
}

impl ViewEvent {
    fn description(&self) -> String {
        match self {
            ViewEvent::Navigated { zoom, scale, .. } => {
                format!("View at zoom {:.2} (1:{:.0})", zoom, scale)
            }
        }
    }
}

/// Kind of measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasureKind {
    /// Planar length of a line.
    Length,
    /// Planar area of a polygon.
    Area,
}

/// Drawing feedback events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DrawEvent {
    /// A drawn or modified geometry left the bounds and was reverted.
    OutOfBounds {
        /// The configured bounds message.
        message: String,
    },
    /// A measurement was updated.
    Measured {
        /// What was measured.
        kind: MeasureKind,
        /// The measured value in map units.
        value: f64,
    },
    /// An in-progress draw was aborted.
    Aborted,
}

impl DrawEvent {
    fn description(&self) -> String {
        match self {
            DrawEvent::OutOfBounds { message } => format!("Out of bounds: {}", message),
            DrawEvent::Measured { kind, value } => format!("Measured {:?}: {:.2}", kind, value),
            DrawEvent::Aborted => "Drawing aborted".to_string(),
        }
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
