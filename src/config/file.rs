//! Configuration file management for bandscope.
//!
//! This module handles loading, validating and saving the TOML configuration.
//! The default file lives at `~/.config/bandscope/bandscope.toml`.

use crate::analyzer::{AnalyzerSettings, NormalizationMode};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Largest raw spectrum the analyzer accepts.
const MAX_NUMBER_OF_SAMPLES: usize = 32768;

fn default_frame_rate() -> f32 {
    60.0
}

/// Settings for driving the analyzer from a file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaybackConfig {
    /// Analysis frames per second
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f32,
    /// Channel to analyze; all channels are averaged when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<usize>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            channel: None,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BandscopeConfig {
    #[serde(default)]
    pub analyzer: AnalyzerSettings,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

impl BandscopeConfig {
    /// Loads configuration from `path`, or from the default location.
    ///
    /// A missing file at the default location yields the default configuration;
    /// a missing explicit path is an error.
    ///
    /// # Errors
    /// - If the config file cannot be read
    /// - If the TOML is malformed
    /// - If a value fails validation
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let path = default_config_path()?;
                if path.exists() {
                    Self::load_from(&path)?
                } else {
                    tracing::debug!("No config at {}, using defaults", path.display());
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a config file without validating it.
    ///
    /// # Errors
    /// - If the file cannot be read
    /// - If the TOML is malformed
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: BandscopeConfig = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Checks that every value is usable by the analyzer.
    ///
    /// # Errors
    /// - If `number_of_samples` is zero or larger than 32768
    /// - If `fall_speed` or `sensitivity` is negative or not finite
    /// - If a decaying normalization rate is not positive
    /// - If `frame_rate` is not positive
    pub fn validate(&self) -> anyhow::Result<()> {
        let analyzer = &self.analyzer;

        if analyzer.number_of_samples == 0 || analyzer.number_of_samples > MAX_NUMBER_OF_SAMPLES {
            return Err(anyhow!(
                "number_of_samples must be between 1 and {}, got {}",
                MAX_NUMBER_OF_SAMPLES,
                analyzer.number_of_samples
            ));
        }
        if !analyzer.number_of_samples.is_power_of_two() {
            tracing::warn!(
                "number_of_samples {} is not a power of two; spectrum sources may not support it",
                analyzer.number_of_samples
            );
        }
        if !analyzer.fall_speed.is_finite() || analyzer.fall_speed < 0.0 {
            return Err(anyhow!(
                "fall_speed must be a non-negative number, got {}",
                analyzer.fall_speed
            ));
        }
        if !analyzer.sensitivity.is_finite() || analyzer.sensitivity < 0.0 {
            return Err(anyhow!(
                "sensitivity must be a non-negative number, got {}",
                analyzer.sensitivity
            ));
        }
        if let NormalizationMode::Decaying { rate } = analyzer.normalization {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(anyhow!("Decaying normalization rate must be positive, got {rate}"));
            }
        }
        if !self.playback.frame_rate.is_finite() || self.playback.frame_rate <= 0.0 {
            return Err(anyhow!(
                "frame_rate must be positive, got {}",
                self.playback.frame_rate
            ));
        }

        Ok(())
    }

    /// Saves configuration to `path`, creating parent directories.
    ///
    /// # Errors
    /// - If the directory cannot be created
    /// - If the file cannot be written
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Saves configuration to the default location.
    ///
    /// # Errors
    /// - If the home directory cannot be determined
    /// - If the file cannot be written
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&default_config_path()?)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    /// - If serialization fails
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Retrieves the path to the default config file.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home.join(".config").join("bandscope").join("bandscope.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::SmoothingMode;
    use crate::layout::BandType;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: BandscopeConfig = toml::from_str(
            r#"
            [analyzer]
            band_type = "thirty-one-band"
            fall_speed = 0.2
            "#,
        )
        .unwrap();

        assert_eq!(config.analyzer.band_type, BandType::ThirtyOneBand);
        assert_eq!(config.analyzer.fall_speed, 0.2);
        assert_eq!(config.analyzer.number_of_samples, 1024);
        assert_eq!(config.analyzer.sensitivity, 8.0);
        assert_eq!(config.analyzer.normalization, NormalizationMode::Unbounded);
        assert_eq!(config.playback, PlaybackConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: BandscopeConfig = toml::from_str("").unwrap();
        assert_eq!(config, BandscopeConfig::default());
    }

    #[test]
    fn test_opt_in_modes() {
        let config: BandscopeConfig = toml::from_str(
            r#"
            [analyzer]
            smoothing = "corrected"
            normalization = { decaying = { rate = 0.25 } }

            [playback]
            frame_rate = 30.0
            channel = 1
            "#,
        )
        .unwrap();

        assert_eq!(config.analyzer.smoothing, SmoothingMode::Corrected);
        assert_eq!(
            config.analyzer.normalization,
            NormalizationMode::Decaying { rate: 0.25 }
        );
        assert_eq!(config.playback.channel, Some(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_band_type_is_rejected() {
        let result: Result<BandscopeConfig, _> = toml::from_str(
            r#"
            [analyzer]
            band_type = "seven-band"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = BandscopeConfig::default();
        config.analyzer.number_of_samples = 0;
        assert!(config.validate().is_err());

        let mut config = BandscopeConfig::default();
        config.analyzer.number_of_samples = 65536;
        assert!(config.validate().is_err());

        let mut config = BandscopeConfig::default();
        config.analyzer.fall_speed = -1.0;
        assert!(config.validate().is_err());

        let mut config = BandscopeConfig::default();
        config.analyzer.sensitivity = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = BandscopeConfig::default();
        config.analyzer.normalization = NormalizationMode::Decaying { rate: 0.0 };
        assert!(config.validate().is_err());

        let mut config = BandscopeConfig::default();
        config.playback.frame_rate = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_power_of_two_is_accepted() {
        let mut config = BandscopeConfig::default();
        config.analyzer.number_of_samples = 1000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("bandscope_config_{}", std::process::id()));
        let path = dir.join("nested").join("bandscope.toml");

        let mut config = BandscopeConfig::default();
        config.analyzer.band_type = BandType::EightBand;
        config.analyzer.normalization = NormalizationMode::Decaying { rate: 0.5 };
        config.save_to(&path).unwrap();

        let loaded = BandscopeConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let result = BandscopeConfig::load(Some(Path::new("/nonexistent/bandscope.toml")));
        assert!(result.is_err());
    }
}
