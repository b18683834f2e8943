//! Dismiss controller configuration
//!
//! Every tunable lives in [`DismissConfig`]. Defaults match the shipped
//! behavior; a TOML file can override any subset:
//!
//! ```toml
//! allow_dismiss_when_nested = true
//! flick_velocity = 1400.0
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Thresholds, durations and policy flags for a dismiss controller
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DismissConfig {
    /// Permit dismissal when the presented view is not the root of its
    /// navigation stack
    pub allow_dismiss_when_nested: bool,
    /// Downward velocity (pt/s) a drag must exceed to arm an attempt
    pub admission_min_velocity: f32,
    /// Progress at which a slow release commits
    pub completion_threshold: f32,
    /// Downward release velocity (pt/s) that commits a short flick
    pub flick_velocity: f32,
    /// Minimum travel (pt) for the flick rule
    pub flick_min_distance: f32,
    /// Blocking window after a deep scroll, in milliseconds
    pub lockout_delay_ms: u32,
    pub slide_duration_ms: u32,
    pub scale_duration_ms: u32,
    /// Scrim fade after a cancelled scale dismiss; longer than the scale itself
    pub scale_cancel_fade_ms: u32,
    pub corner_radius_duration_ms: u32,
    pub snapshot_corner_radius: f32,
    /// Fraction of its size the scale snapshot shrinks by
    pub scale_shrink: f32,
}

impl Default for DismissConfig {
    fn default() -> Self {
        Self {
            allow_dismiss_when_nested: false,
            admission_min_velocity: 0.0,
            completion_threshold: 0.35,
            flick_velocity: 1280.0,
            flick_min_distance: 87.0,
            lockout_delay_ms: 500,
            slide_duration_ms: 400,
            scale_duration_ms: 300,
            scale_cancel_fade_ms: 350,
            corner_radius_duration_ms: 150,
            snapshot_corner_radius: 12.0,
            scale_shrink: 0.1,
        }
    }
}

impl DismissConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: DismissConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Builder: allow dismissing views that are not the root of their stack
    pub fn allow_nested(mut self, allow: bool) -> Self {
        self.allow_dismiss_when_nested = allow;
        self
    }

    /// Reject values the controller cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(self.completion_threshold > 0.0 && self.completion_threshold <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "completion_threshold must be in (0, 1], got {}",
                self.completion_threshold
            )));
        }
        if !(0.0..1.0).contains(&self.scale_shrink) {
            return Err(ConfigError::Invalid(format!(
                "scale_shrink must be in [0, 1), got {}",
                self.scale_shrink
            )));
        }
        for (name, value) in [
            ("admission_min_velocity", self.admission_min_velocity),
            ("flick_velocity", self.flick_velocity),
            ("flick_min_distance", self.flick_min_distance),
            ("snapshot_corner_radius", self.snapshot_corner_radius),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.slide_duration_ms == 0 || self.scale_duration_ms == 0 {
            return Err(ConfigError::Invalid(
                "transition durations must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
