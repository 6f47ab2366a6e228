//! Editor configuration for GeoEdit
//!
//! The configuration is read once at startup, validated, and then handed to
//! every component as an immutable value. Keys use camelCase so the option
//! names match what the embedding page passes in (`selectMultiReset`,
//! `buffer.defaultRadius`, ...). Supports JSON and TOML files.

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Buffer defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BufferSettings {
    /// Initial buffer radius in map units
    pub default_radius: f64,
    /// Initial number of segments per quarter circle
    pub default_segments: u32,
}

impl Default for BufferSettings {
    fn default() -> Self {
        Self {
            default_radius: 100.0,
            default_segments: 8,
        }
    }
}

/// Snapping preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnappingSettings {
    /// Whether the snapping toggle is offered at all
    pub show: bool,
    /// Whether snapping starts switched on
    pub active: bool,
    /// Snap tolerance in pixels
    pub tolerance: f64,
}

impl Default for SnappingSettings {
    fn default() -> Self {
        Self {
            show: true,
            active: true,
            tolerance: 10.0,
        }
    }
}

/// View history deduplication thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewHistorySettings {
    /// Maximum center delta per axis, in map units, for two entries to count as equal
    pub center_epsilon: f64,
    /// Maximum zoom delta for two entries to count as equal
    pub zoom_epsilon: f64,
}

impl Default for ViewHistorySettings {
    fn default() -> Self {
        Self {
            center_epsilon: 10.0,
            zoom_epsilon: 0.1,
        }
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Whether any editing mode is available
    pub editable: bool,
    /// Bounds polygon(s) as GeoJSON (Geometry, Feature or FeatureCollection)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<serde_json::Value>,
    /// Message reported when a drawing is reverted for leaving the bounds
    pub bounds_message: String,
    /// Buffer defaults
    pub buffer: BufferSettings,
    /// Snapping preferences
    pub snapping: SnappingSettings,
    /// Clear the selection on the first click after multi-select ends
    pub select_multi_reset: bool,
    /// Maximum number of view history entries
    pub max_view_history: usize,
    /// View history deduplication thresholds
    pub view_history: ViewHistorySettings,
    /// CRS annotation attached to the GeoJSON output
    pub crs: String,
    /// Hit-test tolerance in pixels
    pub hit_tolerance: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            editable: true,
            bounds: None,
            bounds_message: "The drawn geometry lies outside the permitted area.".to_string(),
            buffer: BufferSettings::default(),
            snapping: SnappingSettings::default(),
            select_multi_reset: false,
            max_view_history: 50,
            view_history: ViewHistorySettings::default(),
            crs: "EPSG:3857".to_string(),
            hit_tolerance: 5.0,
        }
    }
}

impl EditorConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from a JSON string
    pub fn from_json_str(content: &str) -> SettingsResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match extension(path) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(SettingsError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        config.validate()?;
        tracing::info!("Loaded editor configuration from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(SettingsError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Load from the platform config path, falling back to defaults when no file exists
    pub fn load_or_default() -> SettingsResult<Self> {
        let path = config_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.buffer.default_segments == 0 {
            return Err(SettingsError::invalid(
                "buffer.defaultSegments",
                "must be > 0",
            ));
        }

        if !self.buffer.default_radius.is_finite() {
            return Err(SettingsError::invalid(
                "buffer.defaultRadius",
                "must be a finite number",
            ));
        }

        if self.snapping.tolerance < 0.0 {
            return Err(SettingsError::invalid("snapping.tolerance", "must be >= 0"));
        }

        if self.max_view_history == 0 {
            return Err(SettingsError::invalid("maxViewHistory", "must be > 0"));
        }

        if self.view_history.center_epsilon < 0.0 || self.view_history.zoom_epsilon < 0.0 {
            return Err(SettingsError::invalid("viewHistory", "epsilons must be >= 0"));
        }

        if self.hit_tolerance < 0.0 {
            return Err(SettingsError::invalid("hitTolerance", "must be >= 0"));
        }

        if self.crs.trim().is_empty() {
            return Err(SettingsError::invalid("crs", "must not be empty"));
        }

        if let Some(bounds) = &self.bounds {
            if !bounds.is_object() {
                return Err(SettingsError::invalid("bounds", "must be a GeoJSON object"));
            }
        }

        Ok(())
    }

    /// Whether the snapping interaction may be used at all
    pub fn snapping_available(&self) -> bool {
        self.editable && self.snapping.show
    }
}

/// Platform-specific location of the editor configuration file
pub fn config_path() -> SettingsResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("geoedit").join("editor.toml"))
        .ok_or_else(|| SettingsError::ConfigDirectory("no config directory on this platform".into()))
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}
