//! Engine configuration file.

use serde::{Deserialize, Serialize};
use std::path::Path;

use makesound_synth::MODE_COUNT;

use crate::error::ConfigError;
use crate::validation::{Checks, ValidationResult};

/// Settings used to build and drive a voice pool.
///
/// Every field has a default, so an empty file is a valid configuration.
///
/// # TOML Format
///
/// ```toml
/// sample_rate = 48000
/// block_size = 512
/// channels = 2
/// multi_osc_voices = 8
/// pulse_voices = 4
/// volume = 0.5
/// volume_smoothing_seconds = 1.0
/// base_note = 24
/// mode = 0
/// pulse_speed = 1.0
/// seed = 1
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Samples rendered per block.
    pub block_size: usize,
    /// Output channel count. Every channel carries the same signal.
    pub channels: u16,
    /// Number of multi-oscillator voices (notes up to 35).
    pub multi_osc_voices: usize,
    /// Number of pulse voices (notes above 60).
    pub pulse_voices: usize,
    /// Master volume in `[0, 1]`.
    pub volume: f32,
    /// Ramp time for master volume changes.
    pub volume_smoothing_seconds: f32,
    /// Lowest MIDI note of the multi-oscillator key.
    pub base_note: u8,
    /// Church mode, Ionian (0) to Locrian (6).
    pub mode: usize,
    /// Pulse voice note changes per second.
    pub pulse_speed: f32,
    /// Seed for the first voice; later voices count up from it.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            block_size: 512,
            channels: 2,
            multi_osc_voices: 8,
            pulse_voices: 4,
            volume: 0.5,
            volume_smoothing_seconds: 1.0,
            base_note: 24,
            mode: 0,
            pulse_speed: 1.0,
            seed: 1,
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
        std::fs::write(path, self.to_toml()?).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Total number of voices.
    pub fn total_voices(&self) -> usize {
        self.multi_osc_voices + self.pulse_voices
    }

    /// Sample rate as the engine's float type.
    pub fn sample_rate_hz(&self) -> f32 {
        self.sample_rate as f32
    }

    /// Check every field, reporting all failures together.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut checks = Checks::new();
        checks.require(self.sample_rate > 0, "sample_rate", "must be positive");
        checks.require(self.block_size > 0, "block_size", "must be positive");
        checks.require(self.channels > 0, "channels", "must be at least 1");
        checks.require(self.total_voices() > 0, "voices", "at least one voice is required");
        checks.range("volume", f64::from(self.volume), 0.0, 1.0);
        checks.range(
            "volume_smoothing_seconds",
            f64::from(self.volume_smoothing_seconds),
            0.0,
            f64::from(f32::MAX),
        );
        checks.range("base_note", f64::from(self.base_note), 0.0, 127.0);
        checks.require(self.mode < MODE_COUNT, "mode", "must be 0 (Ionian) to 6 (Locrian)");
        checks.require(
            self.pulse_speed.is_finite() && self.pulse_speed > 0.0,
            "pulse_speed",
            "must be positive",
        );
        checks.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    #[test]
    fn empty_file_gives_defaults() {
        let config = EngineConfig::from_toml("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.total_voices(), 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_overrides_named_fields() {
        let config = EngineConfig::from_toml("channels = 1\nmode = 5\nseed = 99").unwrap();
        assert_eq!(config.channels, 1);
        assert_eq!(config.mode, 5);
        assert_eq!(config.seed, 99);
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.volume, 0.5);
    }

    #[test]
    fn toml_round_trip() {
        let config = EngineConfig {
            sample_rate: 44100,
            pulse_speed: 4.0,
            ..EngineConfig::default()
        };
        let text = config.to_toml().unwrap();
        assert!(text.contains("sample_rate = 44100"));
        assert_eq!(EngineConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn wrong_type_is_a_parse_error() {
        let err = EngineConfig::from_toml("sample_rate = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn rejects_mode_out_of_range() {
        let config = EngineConfig {
            mode: 7,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::Invalid { ref field, .. }) if field == "mode"
        ));
    }

    #[test]
    fn rejects_zero_voices_and_bad_volume() {
        let config = EngineConfig {
            multi_osc_voices: 0,
            pulse_voices: 0,
            volume: 1.5,
            ..EngineConfig::default()
        };
        match config.validate() {
            Err(ValidationError::Multiple(all)) => assert_eq!(all.len(), 2),
            other => panic!("expected two failures, got {other:?}"),
        }
    }

    #[test]
    fn rejects_each_bad_field() {
        let bad = [
            EngineConfig {
                sample_rate: 0,
                ..EngineConfig::default()
            },
            EngineConfig {
                block_size: 0,
                ..EngineConfig::default()
            },
            EngineConfig {
                channels: 0,
                ..EngineConfig::default()
            },
            EngineConfig {
                volume_smoothing_seconds: -0.1,
                ..EngineConfig::default()
            },
            EngineConfig {
                base_note: 128,
                ..EngineConfig::default()
            },
            EngineConfig {
                pulse_speed: 0.0,
                ..EngineConfig::default()
            },
            EngineConfig {
                pulse_speed: f32::NAN,
                ..EngineConfig::default()
            },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{config:?}");
        }
    }

    #[test]
    fn zero_smoothing_is_allowed() {
        let config = EngineConfig {
            volume_smoothing_seconds: 0.0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
