#![forbid(unsafe_code)]

//! Tunables for the reorder controller.
//!
//! Every default reproduces the stock behavior, so `ReorderConfig::default()`
//! needs no file. With the `reorder-config` feature the struct can be loaded
//! from TOML or JSON:
//!
//! ```toml
//! scroll_step = 12.0
//! drop_duration_ms = 200
//! ```

#[cfg(feature = "reorder-config")]
use std::path::Path;

#[cfg(feature = "reorder-config")]
use serde::{Deserialize, Serialize};
use web_time::Duration;

use rowdrag_core::gesture::GestureConfig;

/// Reorder controller configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "reorder-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "reorder-config", serde(default))]
pub struct ReorderConfig {
    /// Points scrolled per frame at full scroll rate.
    pub scroll_step: f32,
    /// Each edge zone is `viewport_height / scroll_zone_divisor` tall.
    pub scroll_zone_divisor: f32,
    /// Upper bound on `|scroll_rate|`.
    pub max_scroll_rate: f32,
    /// How far below the content's bottom edge the proxy may travel.
    pub overscroll_margin: f32,
    /// Time for the proxy to settle onto its destination row after a drop.
    pub drop_duration_ms: u64,
    /// Opacity applied to the drag proxy.
    pub proxy_opacity: f32,
    /// Hold time before a press becomes a drag.
    pub long_press_ms: u64,
    /// Pointer travel tolerated before the press is recognized.
    pub press_slop: f32,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            scroll_step: 10.0,
            scroll_zone_divisor: 6.0,
            max_scroll_rate: 1.0,
            overscroll_margin: 30.0,
            drop_duration_ms: 300,
            proxy_opacity: 1.0,
            long_press_ms: 500,
            press_slop: 10.0,
        }
    }
}

impl ReorderConfig {
    #[must_use]
    pub fn drop_duration(&self) -> Duration {
        Duration::from_millis(self.drop_duration_ms)
    }

    /// Gesture recognizer thresholds derived from this config.
    #[must_use]
    pub fn gesture_config(&self) -> GestureConfig {
        GestureConfig {
            long_press_threshold: Duration::from_millis(self.long_press_ms),
            allowable_movement: self.press_slop,
        }
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(self.scroll_step.is_finite() && self.scroll_step >= 0.0) {
            errors.push(format!("scroll_step must be >= 0, got {}", self.scroll_step));
        }
        if !(self.scroll_zone_divisor.is_finite() && self.scroll_zone_divisor >= 2.0) {
            errors.push(format!(
                "scroll_zone_divisor must be >= 2 so the edge zones cannot overlap, got {}",
                self.scroll_zone_divisor
            ));
        }
        if !(self.max_scroll_rate > 0.0 && self.max_scroll_rate.is_finite()) {
            errors.push(format!(
                "max_scroll_rate must be > 0, got {}",
                self.max_scroll_rate
            ));
        }
        if !(self.overscroll_margin.is_finite() && self.overscroll_margin >= 0.0) {
            errors.push(format!(
                "overscroll_margin must be >= 0, got {}",
                self.overscroll_margin
            ));
        }
        if !(0.0..=1.0).contains(&self.proxy_opacity) {
            errors.push(format!(
                "proxy_opacity must be in [0, 1], got {}",
                self.proxy_opacity
            ));
        }
        if !(self.press_slop.is_finite() && self.press_slop >= 0.0) {
            errors.push(format!("press_slop must be >= 0, got {}", self.press_slop));
        }

        errors
    }

    /// Load from a TOML string and validate.
    #[cfg(feature = "reorder-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ReorderConfigError> {
        let config: Self = toml::from_str(s).map_err(ReorderConfigError::Toml)?;
        config.validated()
    }

    /// Load from a TOML file on disk and validate.
    #[cfg(feature = "reorder-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ReorderConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ReorderConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string and validate.
    #[cfg(feature = "reorder-config")]
    pub fn from_json_str(s: &str) -> Result<Self, ReorderConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ReorderConfigError::Json)?;
        config.validated()
    }

    /// Return `self` if valid, otherwise the collected validation errors.
    pub fn validated(self) -> Result<Self, ReorderConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ReorderConfigError::Validation(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a reorder configuration.
#[derive(Debug)]
pub enum ReorderConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "reorder-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "reorder-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ReorderConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "reorder-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "reorder-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ReorderConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "reorder-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "reorder-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
