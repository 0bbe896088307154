#![forbid(unsafe_code)]

//! Gesture configuration as data.
//!
//! [`TouchConfig`] groups every tunable the gesture runtime reads: the
//! thresholds and the region catalog. It loads from TOML or JSON when the
//! `config` feature is enabled.
//!
//! # Loading
//!
//! ```toml
//! # touchmouse.toml
//! [gesture]
//! rotate_distance = 40
//! tap_delay_ms = 30
//!
//! [regions.minimap]
//! ids = [160, 161]
//!
//! [regions.blocking]
//! ids = [548]
//! traversal = "root_only"
//! ```
//!
//! ```rust,ignore
//! let config = TouchConfig::from_toml_file("touchmouse.toml")?;
//! let thresholds = config.to_thresholds();
//! ```
//!
//! # Defaults
//!
//! Every omitted field keeps its [`Thresholds::default`] value, and every
//! omitted region set is empty.

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::region::RegionCatalog;
use crate::thresholds::Thresholds;

// ---------------------------------------------------------------------------
// TouchConfig
// ---------------------------------------------------------------------------

/// Complete gesture configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct TouchConfig {
    /// Threshold values.
    pub gesture: GestureSettings,

    /// Region sets consulted by the classifier.
    pub regions: RegionCatalog,
}

impl TouchConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(s)
            .map(Self::with_region_names)
            .map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(s)
            .map(Self::with_region_names)
            .map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        self.to_thresholds()
            .validate()
            .into_iter()
            .map(|e| format!("gesture.{e}"))
            .collect()
    }

    /// Validate, returning the config itself when clean.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Convert to a threshold snapshot.
    #[must_use]
    pub fn to_thresholds(&self) -> Thresholds {
        let g = &self.gesture;
        Thresholds {
            rotate_distance: g.rotate_distance,
            scroll_distance_per_tick: g.scroll_distance_per_tick,
            minimap_scroll_distance_per_tick: g.minimap_scroll_distance_per_tick,
            invert_scroll: g.invert_scroll,
            invert_zoom: g.invert_zoom,
            invert_minimap_zoom: g.invert_minimap_zoom,
            tap_delay: Duration::from_millis(g.tap_delay_ms),
            right_click_release_distance: g.right_click_release_distance,
            right_click_release_on_menus: g.right_click_release_on_menus,
            zoom_hold_point: g.zoom_hold_point,
        }
    }

    // Serde fills unnamed sets with an empty label; give them their field name.
    #[cfg(feature = "config")]
    fn with_region_names(mut self) -> Self {
        let r = &mut self.regions;
        for (set, name) in [
            (&mut r.quick, "quick"),
            (&mut r.item_containers, "item_containers"),
            (&mut r.minimap, "minimap"),
            (&mut r.scrollable, "scrollable"),
            (&mut r.blocking, "blocking"),
        ] {
            if set.name.is_empty() {
                set.name = name.to_owned();
            }
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Sub-config
// ---------------------------------------------------------------------------

/// The `[gesture]` table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct GestureSettings {
    /// Rotate distance in pixels. Default: 35.
    pub rotate_distance: i32,
    /// Content-scroll distance per tick. Default: 8.
    pub scroll_distance_per_tick: i32,
    /// Minimap-scroll distance per tick. Default: 5.
    pub minimap_scroll_distance_per_tick: i32,
    /// Default: false.
    pub invert_scroll: bool,
    /// Default: true.
    pub invert_zoom: bool,
    /// Default: false.
    pub invert_minimap_zoom: bool,
    /// Tap delay in milliseconds. Default: 0.
    pub tap_delay_ms: u64,
    /// Default: 14.
    pub right_click_release_distance: i32,
    /// Default: false.
    pub right_click_release_on_menus: bool,
    /// Default: (12, 12).
    pub zoom_hold_point: Point,
}

impl Default for GestureSettings {
    fn default() -> Self {
        let t = Thresholds::default();
        Self {
            rotate_distance: t.rotate_distance,
            scroll_distance_per_tick: t.scroll_distance_per_tick,
            minimap_scroll_distance_per_tick: t.minimap_scroll_distance_per_tick,
            invert_scroll: t.invert_scroll,
            invert_zoom: t.invert_zoom,
            invert_minimap_zoom: t.invert_minimap_zoom,
            tap_delay_ms: u64::try_from(t.tap_delay.as_millis()).unwrap_or(u64::MAX),
            right_click_release_distance: t.right_click_release_distance,
            right_click_release_on_menus: t.right_click_release_on_menus,
            zoom_hold_point: t.zoom_hold_point,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a gesture configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
