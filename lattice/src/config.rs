//! Rendering environment injected into every measurement.
//!
//! Screen metrics are passed down explicitly instead of being read from
//! process-wide state, which keeps `measure` a pure function of its inputs.

use serde::{Deserialize, Serialize};

/// Display metrics for a layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingEnvironment {
    /// Device pixels per point. Offsets are snapped to this grid.
    pub scale: f64,
}

impl Default for RenderingEnvironment {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl RenderingEnvironment {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }

    /// Parse an environment from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Round down to the nearest device pixel.
    #[inline]
    pub fn floor_pixel(&self, value: f64) -> f64 {
        self.snap(value, f64::floor)
    }

    /// Round to the nearest device pixel.
    #[inline]
    pub fn round_pixel(&self, value: f64) -> f64 {
        self.snap(value, f64::round)
    }

    /// Round up to the nearest device pixel.
    #[inline]
    pub fn ceil_pixel(&self, value: f64) -> f64 {
        self.snap(value, f64::ceil)
    }

    #[inline]
    fn snap(&self, value: f64, op: fn(f64) -> f64) -> f64 {
        if !value.is_finite() || self.scale <= 0.0 {
            return value;
        }
        op(value * self.scale) / self.scale
    }
}
