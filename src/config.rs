//! Persistent stream configuration
//!
//! Stores sample rate, chunk size, UDP target and the simulated sensor's
//! noise profile in a JSON file at `<data_dir>/imustream/config.json`.
//! The median window is a build-time constant and is not configurable.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Rejected configuration values
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Sample rate must be non-zero")]
    ZeroSampleRate,

    #[error("Maximum chunk size must be non-zero")]
    ZeroChunkSize,

    #[error("Spike probability must be within 0.0..=1.0, got {0}")]
    SpikeProbability(f64),

    #[error("Noise amplitude must be non-negative, got {0}")]
    NegativeNoise(i16),
}

fn default_sample_rate_hz() -> u32 {
    imustream_core::DEFAULT_SAMPLE_RATE_HZ
}

fn default_max_chunk_size() -> usize {
    imustream_core::DEFAULT_MAX_CHUNK_SIZE
}

fn default_target() -> String {
    "127.0.0.1:5556".to_string()
}

fn default_noise_counts() -> i16 {
    40
}

fn default_spike_probability() -> f64 {
    0.02
}

/// Persistent stream configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Control loop rate in Hz
    #[serde(default = "default_sample_rate_hz")]
    pub sample_rate_hz: u32,
    /// Largest single transport write in bytes
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,
    /// UDP peer receiving the chunks
    #[serde(default = "default_target")]
    pub target: String,
    /// Fixed seed for pivots and simulated noise (None = OS entropy)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Simulated sensor noise half-width in counts
    #[serde(default = "default_noise_counts")]
    pub noise_counts: i16,
    /// Simulated per-channel outlier probability
    #[serde(default = "default_spike_probability")]
    pub spike_probability: f64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: default_sample_rate_hz(),
            max_chunk_size: default_max_chunk_size(),
            target: default_target(),
            seed: None,
            noise_counts: default_noise_counts(),
            spike_probability: default_spike_probability(),
        }
    }
}

impl StreamConfig {
    /// Config file path: `<data_dir>/imustream/config.json`
    pub fn path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("imustream")
            .join("config.json")
    }

    /// Load config from the default path, falling back to defaults on any error
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from `path`, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Loaded config from disk");
                    config
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!(path = %path.display(), "No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Save config to disk, creating parent directories if needed
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), "Config saved to disk");
        Ok(())
    }

    /// Check values that would make the control loop misbehave
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.max_chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if !(0.0..=1.0).contains(&self.spike_probability) {
            return Err(ConfigError::SpikeProbability(self.spike_probability));
        }
        if self.noise_counts < 0 {
            return Err(ConfigError::NegativeNoise(self.noise_counts));
        }
        Ok(())
    }

    /// Loop period derived from the sample rate
    pub fn sample_interval(&self) -> Duration {
        Duration::from_secs(1) / self.sample_rate_hz.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StreamConfig::default();
        assert_eq!(config.sample_rate_hz, 50);
        assert_eq!(config.max_chunk_size, 20);
        assert_eq!(config.target, "127.0.0.1:5556");
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let json = r#"{"sample_rate_hz": 100, "seed": 7}"#;
        let config: StreamConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.sample_rate_hz, 100);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_chunk_size, 20);
        assert_eq!(config.noise_counts, 40);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: StreamConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, StreamConfig::default());
    }

    #[test]
    fn test_sample_interval() {
        let config = StreamConfig {
            sample_rate_hz: 50,
            ..Default::default()
        };
        assert_eq!(config.sample_interval(), Duration::from_millis(20));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_rate = StreamConfig {
            sample_rate_hz: 0,
            ..Default::default()
        };
        assert_eq!(zero_rate.validate(), Err(ConfigError::ZeroSampleRate));

        let zero_chunk = StreamConfig {
            max_chunk_size: 0,
            ..Default::default()
        };
        assert_eq!(zero_chunk.validate(), Err(ConfigError::ZeroChunkSize));

        let bad_probability = StreamConfig {
            spike_probability: 1.5,
            ..Default::default()
        };
        assert_eq!(
            bad_probability.validate(),
            Err(ConfigError::SpikeProbability(1.5))
        );

        let negative_noise = StreamConfig {
            noise_counts: -1,
            ..Default::default()
        };
        assert_eq!(negative_noise.validate(), Err(ConfigError::NegativeNoise(-1)));
    }

    #[test]
    fn test_load_from_unparseable_file_uses_defaults() {
        let dir = std::env::temp_dir().join("imustream-config-garbage-test");
        let path = dir.join("config.json");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "not json").unwrap();

        assert_eq!(StreamConfig::load_from(&path), StreamConfig::default());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
