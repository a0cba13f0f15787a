//! Range controller configuration.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeControllerConfig {
    /// Upper bound on measurements running at once across all items.
    pub max_concurrent_measurements: usize,
}

impl Default for RangeControllerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_measurements: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
        }
    }
}

impl RangeControllerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Permits handed to the measurement semaphore. Never zero.
    pub(crate) fn permits(&self) -> usize {
        self.max_concurrent_measurements.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_at_least_one() {
        assert!(RangeControllerConfig::default().max_concurrent_measurements >= 1);
    }

    #[test]
    fn test_from_json() {
        let config = RangeControllerConfig::from_json_str(r#"{ "max_concurrent_measurements": 3 }"#)
            .unwrap();
        assert_eq!(config.max_concurrent_measurements, 3);

        let config = RangeControllerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, RangeControllerConfig::default());
    }

    #[test]
    fn test_zero_permits_clamped() {
        let config = RangeControllerConfig {
            max_concurrent_measurements: 0,
        };
        assert_eq!(config.permits(), 1);
    }
}
