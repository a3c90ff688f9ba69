//! # Match Configuration
//!
//! Every tuning constant of the engine lives here.
//!
//! ## Presets
//! - `standard()`: five-minute halves, 15-59s stoppage
//! - `arcade()`: shorter halves, golden-goal overtime, auto start
//! - `quick()`: two-minute halves with a fixed stoppage, for demos and tests
//!
//! ## Usage
//! ```rust
//! use match_core::engine::config::MatchConfig;
//!
//! let config = MatchConfig::default();
//! let arcade = MatchConfig::arcade();
//! assert!(arcade.clock.half_seconds < config.clock.half_seconds);
//! ```

mod clock_config;
mod restart_config;
mod rules_config;

pub use clock_config::ClockConfig;
pub use restart_config::RestartConfig;
pub use rules_config::RulesConfig;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::boundary::FieldGeometry;
use crate::error::ConfigError;

/// Environment override for the half length (seconds)
pub const HALF_SECONDS_ENV: &str = "MATCH_HALF_SECONDS";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MatchConfig {
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub field: FieldGeometry,
    #[serde(default)]
    pub restart: RestartConfig,
    #[serde(default)]
    pub rules: RulesConfig,
}

impl MatchConfig {
    pub fn standard() -> Self {
        Self::default()
    }

    pub fn arcade() -> Self {
        let mut cfg = Self::default();
        cfg.clock.half_seconds = 180;
        cfg.clock.overtime_seconds = 90;
        cfg.rules.golden_goal = true;
        cfg.rules.auto_start = true;
        cfg.restart.goal_celebration_seconds = 2;
        cfg
    }

    /// Short halves with a fixed 20s stoppage
    pub fn quick() -> Self {
        let mut cfg = Self::default();
        cfg.clock.half_seconds = 120;
        cfg.clock.overtime_seconds = 60;
        cfg.clock.stoppage_min_seconds = 20;
        cfg.clock.stoppage_max_seconds = 20;
        cfg.restart.countdown_seconds = 2;
        cfg.restart.goal_celebration_seconds = 2;
        cfg
    }

    /// Load a configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Parse a configuration from a JSON string; missing sections use defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `MATCH_HALF_SECONDS` if set and parseable.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = std::env::var(HALF_SECONDS_ENV) {
            match raw.trim().parse::<i32>() {
                Ok(seconds) => self.clock.half_seconds = seconds,
                Err(_) => log::warn!("Ignoring {}={:?}: not an integer", HALF_SECONDS_ENV, raw),
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.clock.validate().map_err(ConfigError::Validation)?;
        self.field.validate().map_err(ConfigError::Validation)?;
        self.restart
            .validate(self.field.half_length())
            .map_err(ConfigError::Validation)?;
        self.rules.validate().map_err(ConfigError::Validation)?;
        Ok(())
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(MatchConfig::standard().validate().is_ok());
        assert!(MatchConfig::arcade().validate().is_ok());
        assert!(MatchConfig::quick().validate().is_ok());
    }

    #[test]
    fn test_arcade_is_shorter_with_golden_goal() {
        let standard = MatchConfig::standard();
        let arcade = MatchConfig::arcade();
        assert!(arcade.clock.half_seconds < standard.clock.half_seconds);
        assert!(arcade.rules.golden_goal);
        assert!(!standard.rules.golden_goal);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = MatchConfig::from_json(r#"{"clock": {"half_seconds": 90}}"#).unwrap();
        assert_eq!(config.clock.half_seconds, 90);
        assert_eq!(config.clock.stoppage_trigger_seconds, 60);
        assert_eq!(config.rules.team_streak_threshold, 2);
    }

    #[test]
    fn test_invalid_stoppage_range_rejected() {
        let result = MatchConfig::from_json(
            r#"{"clock": {"stoppage_min_seconds": 40, "stoppage_max_seconds": 10}}"#,
        );
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_kicker_inside_clearance_required() {
        let mut config = MatchConfig::default();
        config.restart.kicker_offset = config.restart.ten_yard_radius + 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_throw_in_margin_must_fit_inside_half() {
        let result = MatchConfig::from_json(r#"{"restart": {"throw_in_length_margin": 60.0}}"#);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
        let result = MatchConfig::from_json(r#"{"restart": {"throw_in_length_margin": 10.0}}"#);
        assert!(result.is_ok());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let result = MatchConfig::from_json("{not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("match.json");
        fs::write(&path, r#"{"rules": {"golden_goal": true}}"#).unwrap();

        let config = MatchConfig::load(&path).unwrap();
        assert!(config.rules.golden_goal);
        assert_eq!(config.clock.half_seconds, 300);

        let missing = MatchConfig::load(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_config_roundtrip() {
        let cfg = MatchConfig::arcade();
        let json = serde_json::to_string(&cfg).unwrap();
        let parsed = MatchConfig::from_json(&json).unwrap();
        assert_eq!(parsed.clock.half_seconds, cfg.clock.half_seconds);
        assert_eq!(parsed.field, cfg.field);
    }
}
