//! Page-level configuration
//!
//! The defaults reproduce the deployed Nakuru values. A page may embed a
//! JSON object overriding any subset of them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::attachment::MAX_ATTACHMENT_BYTES;
use crate::error::ReportError;
use crate::geo::{Coordinates, PositionOptions, RegionBounds, FALLBACK_COORDINATES};
use crate::retry::RetryPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Location used whenever no valid GPS fix exists
    pub fallback: Coordinates,
    /// Accepted region for captured positions
    pub region: RegionBounds,
    /// Attachment size ceiling in bytes
    pub max_attachment_bytes: u64,
    /// Options for the single position request
    pub geolocation: PositionOptions,
    /// Retry policy for translation fetches
    pub translation_retry: RetryPolicy,
    /// Admin dashboard statistics refresh period
    pub statistics_poll_secs: u64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            fallback: FALLBACK_COORDINATES,
            region: RegionBounds::KENYA,
            max_attachment_bytes: MAX_ATTACHMENT_BYTES,
            geolocation: PositionOptions::default(),
            translation_retry: RetryPolicy::default(),
            statistics_poll_secs: 30,
        }
    }
}

impl IntakeConfig {
    /// Parse configuration overrides from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ReportError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReportError> {
        if !self.region.contains(self.fallback) {
            return Err(ReportError::Config(
                "fallback coordinates must lie inside the region".to_string(),
            ));
        }
        if self.max_attachment_bytes == 0 {
            return Err(ReportError::Config(
                "max_attachment_bytes must be positive".to_string(),
            ));
        }
        if !self.region.is_well_formed() {
            return Err(ReportError::Config(
                "region bounds must be finite with min <= max".to_string(),
            ));
        }
        if self.statistics_poll_secs == 0 {
            return Err(ReportError::Config(
                "statistics_poll_secs must be positive".to_string(),
            ));
        }
        if self.translation_retry.max_attempts == 0 {
            return Err(ReportError::Config(
                "translation_retry.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn statistics_poll_interval(&self) -> Duration {
        Duration::from_secs(self.statistics_poll_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = IntakeConfig::default();
        assert_eq!(config.fallback, Coordinates::new(-0.3031, 36.0800));
        assert_eq!(config.max_attachment_bytes, 10 * 1024 * 1024);
        assert_eq!(config.geolocation.timeout_ms, 10_000);
        assert_eq!(config.geolocation.maximum_age_ms, 0);
        assert!(config.geolocation.enable_high_accuracy);
        assert_eq!(config.statistics_poll_interval(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_override() {
        let config =
            IntakeConfig::from_json(r#"{"translation_retry":{"max_attempts":5}}"#).unwrap();
        assert_eq!(config.translation_retry.max_attempts, 5);
        assert_eq!(config.translation_retry.delay_ms, 1500);
        assert_eq!(config.fallback, FALLBACK_COORDINATES);
    }

    #[test]
    fn test_rejects_fallback_outside_region() {
        let err = IntakeConfig::from_json(r#"{"fallback":{"lat":51.5,"lon":-0.12}}"#).unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }

    #[test]
    fn test_rejects_zero_poll_period() {
        let err = IntakeConfig::from_json(r#"{"statistics_poll_secs":0}"#).unwrap_err();
        assert_eq!(
            err,
            ReportError::Config("statistics_poll_secs must be positive".to_string())
        );
    }

    #[test]
    fn test_rejects_inverted_region() {
        let config = IntakeConfig {
            region: RegionBounds {
                min_lat: 5.0,
                max_lat: -5.0,
                min_lon: 33.0,
                max_lon: 42.0,
            },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ReportError::Config(_))));

        let config = IntakeConfig {
            region: RegionBounds {
                min_lon: f64::NAN,
                ..RegionBounds::KENYA
            },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ReportError::Config(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(IntakeConfig::from_json("{not json").is_err());
    }
}
