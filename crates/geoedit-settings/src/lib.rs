//! GeoEdit Settings Crate
//!
//! Handles the editor configuration: loading, validation and persistence.

pub mod config;
pub mod error;

pub use config::{
    config_path, BufferSettings, EditorConfig, SnappingSettings, ViewHistorySettings,
};
pub use error::{SettingsError, SettingsResult};
