//! Costume Settings
//!
//! Load-time and per-frame knobs shared by every costume.
//!
//! ```rust,ignore
//! use costume_core::settings::CostumeSettings;
//!
//! // Defaults: `item.cmp` as the fallback colormap, no frame clamp
//! let settings = CostumeSettings::default();
//!
//! // Clamp frame deltas after long stalls
//! let settings = CostumeSettings {
//!     max_frame_delta: Some(100.0),
//!     ..Default::default()
//! };
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Colormap installed as a costume's default when no previous costume supplies one.
pub const DEFAULT_COLORMAP: &str = "item.cmp";

/// Configuration applied when a costume is loaded and updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostumeSettings {
    /// Name of the colormap resolved as the costume default.
    pub default_colormap: String,

    /// Upper bound for the `dt` handed to `Costume::update`, in resource time
    /// units. `None` leaves `dt` untouched.
    pub max_frame_delta: Option<f32>,
}

impl Default for CostumeSettings {
    fn default() -> Self {
        Self {
            default_colormap: DEFAULT_COLORMAP.to_string(),
            max_frame_delta: None,
        }
    }
}

impl CostumeSettings {
    /// Parses settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Applies `max_frame_delta` to a frame interval. Negative input is treated as zero.
    #[must_use]
    pub fn clamp_frame_delta(&self, dt: f32) -> f32 {
        let dt = dt.max(0.0);
        match self.max_frame_delta {
            Some(max) => dt.min(max),
            None => dt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_partial_uses_defaults() {
        let settings = CostumeSettings::from_json(r#"{ "max_frame_delta": 50.0 }"#).unwrap();
        assert_eq!(settings.default_colormap, DEFAULT_COLORMAP);
        assert_eq!(settings.max_frame_delta, Some(50.0));
    }

    #[test]
    fn json_invalid_is_reported() {
        let err = CostumeSettings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, crate::errors::CostumeError::InvalidSettings(_)));
    }

    #[test]
    fn clamp_frame_delta() {
        let clamped = CostumeSettings {
            max_frame_delta: Some(10.0),
            ..Default::default()
        };
        assert_eq!(clamped.clamp_frame_delta(25.0), 10.0);
        assert_eq!(clamped.clamp_frame_delta(-1.0), 0.0);
        assert_eq!(CostumeSettings::default().clamp_frame_delta(25.0), 25.0);
    }
}
