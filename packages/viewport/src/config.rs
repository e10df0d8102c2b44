//! Viewport tuning, loadable from TOML.

use std::path::Path;
use std::time::Duration;

use parcel_map_parcel_models::LatLng;
use parcel_map_viewport_models::Padding;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Roughly the middle of Massachusetts.
pub const DEFAULT_CENTER: LatLng = LatLng::new(42.2373, -71.5314);

/// Zoom that shows the whole state.
pub const DEFAULT_ZOOM: u8 = 8;

/// Errors loading a [`ViewportConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this struct.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Constants the viewport controller works with.
///
/// Every field is optional in TOML; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Center shown when there are no results.
    pub default_center: LatLng,
    /// Zoom shown when there are no results.
    pub default_zoom: u8,
    /// Padding kept around fitted results.
    pub fit_padding: Padding,
    /// Closest zoom a results fit may reach.
    pub fit_max_zoom: u8,
    /// Zoom used when centering on a selected parcel.
    pub selection_zoom: u8,
    /// How long to wait for the surface to lay out before fitting.
    pub settle_delay_ms: u64,
    /// Animate camera moves.
    pub animate: bool,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            default_center: DEFAULT_CENTER,
            default_zoom: DEFAULT_ZOOM,
            fit_padding: Padding { x: 50, y: 50 },
            fit_max_zoom: 16,
            selection_zoom: 14,
            settle_delay_ms: 300,
            animate: true,
        }
    }
}

impl ViewportConfig {
    /// The settle delay as a [`Duration`].
    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the text does not parse.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded viewport config from {}", path.display());
        Ok(config)
    }
}
