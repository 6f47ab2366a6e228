//! # GeoEdit
//!
//! An interactive map-editing core for GIS clients with support for:
//! - Fifteen editor modes from plain viewing to drawing, buffering and cutting
//! - Snapping against the edit layer and visible reference layers
//! - Bounds constraints with live feedback and reverts
//! - A bounded, deduplicated view history
//!
//! ## Architecture
//!
//! GeoEdit is organized as a workspace with multiple crates:
//!
//! 1. **geoedit-core** - Modes, identifiers, errors and the event bus
//! 2. **geoedit-settings** - Editor configuration loading and validation
//! 3. **geoedit-editor** - Geometry pipeline, layers and the mode controller
//! 4. **geoedit** - This crate: re-exports and a command line tool

pub use geoedit_core::{
    AppEvent, ConfigError, Error, EventBus, EventFilter, FeatureId, GeometryError, LayerId, Mode,
    Pixel, Result, ViewSnapshot,
};
pub use geoedit_editor::{
    EditOutput, Feature, GeoEngine, GeometryEngine, HeadlessBackend, MapBackend, MapEditor,
    MapEvent, MapViewport, ReferenceLayer,
};
pub use geoedit_settings::{EditorConfig, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr so stdout stays free for results
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
