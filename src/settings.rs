//! Session settings and balance knobs
//!
//! Loaded from JSON; every field is optional and falls back to the
//! refined-balance default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to load or validate settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed for reproducibility
    pub seed: u64,

    // === Session ===
    /// Session length in seconds (4:11)
    pub total_time: f32,
    /// Seconds between spawn batches
    pub spawn_interval: f32,
    /// Seconds without a kill before the streak resets
    pub streak_timeout: f32,

    // === Player ===
    pub player_health: f32,
    /// Damage of one player projectile before the power multiplier
    pub player_base_damage: f32,
    /// Health lost to one opposite-color hit
    pub player_hit_damage: f32,

    // === Variants ===
    /// Spawn the boss when time runs out instead of ending the session
    pub boss_enabled: bool,
    /// Omni-pattern enemies fire an 8-way burst instead of floating
    pub legacy_omni_pattern: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5eed,

            total_time: 251.0,
            spawn_interval: 0.5,
            streak_timeout: 5.0,

            player_health: 300.0,
            player_base_damage: 1.0,
            player_hit_damage: 25.0,

            boss_enabled: false,
            legacy_omni_pattern: false,
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = |field: &'static str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SettingsError::Invalid {
                    field,
                    reason: "must be a positive finite number",
                })
            }
        };
        positive("total_time", self.total_time)?;
        positive("spawn_interval", self.spawn_interval)?;
        positive("streak_timeout", self.streak_timeout)?;
        positive("player_health", self.player_health)?;
        positive("player_base_damage", self.player_base_damage)?;
        positive("player_hit_damage", self.player_hit_damage)?;
        Ok(())
    }

    /// Same settings, different seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = Settings::from_json(r#"{ "seed": 7, "boss_enabled": true }"#).expect("valid");
        assert_eq!(s.seed, 7);
        assert!(s.boss_enabled);
        assert_eq!(s.total_time, 251.0);
        assert_eq!(s.spawn_interval, 0.5);
    }

    #[test]
    fn test_rejects_non_positive_timing() {
        let err = Settings::from_json(r#"{ "spawn_interval": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "spawn_interval",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            Settings::from_json("not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Settings::load("/definitely/not/here.json"),
            Err(SettingsError::Io(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let s = Settings::default().with_seed(42);
        let json = s.to_json().expect("serializable");
        assert_eq!(Settings::from_json(&json).expect("valid"), s);
    }
}
