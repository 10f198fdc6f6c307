//! Tunable engine constants.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Engine settings. Missing JSON fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Multiplicative step for one wheel tick or zoom shortcut.
    pub zoom_step: f64,
    /// Window in which wheel-zoom ticks are coalesced.
    pub wheel_debounce_ms: u64,
    /// Wheel deltas below this on both axes are treated as touchpad input.
    pub touchpad_delta_threshold: f64,
    pub touchpad_pan_scale: f64,
    pub mouse_pan_scale_x: f64,
    pub mouse_pan_scale_y: f64,
    pub arrow_pan_step: f64,
    /// Arrow pan step while Alt is held.
    pub precise_arrow_pan_step: f64,
    /// Container pixels left around content when fitting.
    pub fit_padding: f64,
    /// World units a press must travel before it becomes a drag.
    pub drag_threshold: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            min_zoom: crate::view_port::MIN_ZOOM,
            max_zoom: crate::view_port::MAX_ZOOM,
            zoom_step: 1.1,
            wheel_debounce_ms: 100,
            touchpad_delta_threshold: 10.0,
            touchpad_pan_scale: 10.0,
            mouse_pan_scale_x: 3.0,
            mouse_pan_scale_y: 2.0,
            arrow_pan_step: 5.0,
            precise_arrow_pan_step: 1.0,
            fit_padding: 50.0,
            drag_threshold: 3.0,
        }
    }
}

impl BoardConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(ConfigError::Invalid(format!(
                "zoom range {}..{} is empty or not positive",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.zoom_step <= 1.0 {
            return Err(ConfigError::Invalid(format!(
                "zoom step must be greater than 1, got {}",
                self.zoom_step
            )));
        }
        Ok(())
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    pub fn wheel_debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.wheel_debounce_ms)
    }
}
