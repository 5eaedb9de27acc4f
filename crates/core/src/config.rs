use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Width the wrapped document lays itself out at.
pub const DESIGN_WIDTH: u32 = 800;
/// Margin kept free around the document before fitting.
pub const SCREEN_PADDING: u32 = 40;
/// Floor for the scale factor. Sits below `1 / DESIGN_WIDTH` so it only
/// engages once the available width reaches zero.
pub const MIN_SCALE: f64 = 0.001;

/// Geometry constants for fitting a fixed-width document to the viewport.
///
/// Deserializes from partial JSON; missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FitConfig {
    pub design_width: u32,
    pub screen_padding: u32,
    pub min_scale: f64,
}

impl FitConfig {
    /// Parse and validate a JSON config such as `{"design_width": 1024}`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: FitConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.design_width == 0 {
            return Err(ConfigError::InvalidDesignWidth(self.design_width));
        }
        if !(self.min_scale > 0.0 && self.min_scale <= 1.0) {
            return Err(ConfigError::InvalidMinScale(self.min_scale));
        }
        Ok(())
    }

    /// Smallest viewport width at which the document is shown unscaled.
    pub fn fit_width(&self) -> u32 {
        self.design_width.saturating_add(self.screen_padding)
    }
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            design_width: DESIGN_WIDTH,
            screen_padding: SCREEN_PADDING,
            min_scale: MIN_SCALE,
        }
    }
}
