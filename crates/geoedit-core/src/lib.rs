//! # GeoEdit Core
//!
//! Core types, errors and the typed event bus shared by the GeoEdit crates.
//! Provides the editor modes, layer/feature identifiers and the
//! publish/subscribe channel the editing core reports through.

pub mod data;
pub mod error;
pub mod event_bus;

pub use data::{FeatureId, LayerId, Mode, Pixel, ViewSnapshot};

pub use error::{ConfigError, Error, GeometryError, Result};

pub use event_bus::{
    AppEvent, BufferEvent, DrawEvent, EventBus, EventBusConfig, EventBusError, EventCategory,
    EventFilter, FeatureEvent, FeatureInfo, MeasureKind, ModeEvent, OutputEvent, SelectionEvent,
    SnapEvent, SubscriptionId, ViewEvent,
};
