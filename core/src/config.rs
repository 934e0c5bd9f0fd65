//! config.rs
//! Codec and render settings, loadable from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_BACKGROUND, DEFAULT_FOREGROUND, DEFAULT_REDUNDANCY_PERCENT, DEFAULT_RENDER_SIZE,
    FRAGMENT_LIMITS_HIGH, FRAGMENT_LIMITS_LOW, FRAGMENT_LIMITS_MEDIUM, SEGMENT_CHARS_HIGH,
    SEGMENT_CHARS_LOW, SEGMENT_CHARS_MEDIUM,
};

/// Upper bound on extra fountain parts, in percent of the pure ones.
const MAX_REDUNDANCY_PERCENT: u32 = 1000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config json: {0}")]
    Json(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Fragment and chunk sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    /// Small fragments: easy to scan, many frames.
    Low,
    #[default]
    Medium,
    /// Large fragments: dense symbols, few frames.
    High,
}

impl Density {
    /// `(max, min)` fountain fragment length in bytes.
    pub fn fragment_limits(self) -> (usize, usize) {
        match self {
            Density::Low => FRAGMENT_LIMITS_LOW,
            Density::Medium => FRAGMENT_LIMITS_MEDIUM,
            Density::High => FRAGMENT_LIMITS_HIGH,
        }
    }

    /// Characters per segmented frame, header included.
    pub fn segment_chars(self) -> usize {
        match self {
            Density::Low => SEGMENT_CHARS_LOW,
            Density::Medium => SEGMENT_CHARS_MEDIUM,
            Density::High => SEGMENT_CHARS_HIGH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Raster side in pixels.
    pub size: u32,
    /// ARGB.
    pub foreground: u32,
    pub background: u32,
    /// 0 picks the number of CPUs minus one.
    pub workers: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_RENDER_SIZE,
            foreground: DEFAULT_FOREGROUND,
            background: DEFAULT_BACKGROUND,
            workers: 0,
        }
    }
}

impl RenderOptions {
    /// Worker threads to use, leaving one core free.
    pub fn worker_count(&self) -> usize {
        match self.workers {
            0 => num_cpus::get().saturating_sub(1).max(1),
            n => n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub density: Density,
    /// Mixed fountain parts emitted after the pure ones, in percent.
    pub fountain_redundancy_percent: u32,
    pub render: RenderOptions,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            density: Density::default(),
            fountain_redundancy_percent: DEFAULT_REDUNDANCY_PERCENT,
            render: RenderOptions::default(),
        }
    }
}

impl CodecConfig {
    pub fn with_density(density: Density) -> Self {
        Self { density, ..Self::default() }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fountain_redundancy_percent > MAX_REDUNDANCY_PERCENT {
            return Err(ConfigError::Invalid(format!(
                "fountain_redundancy_percent {} above {MAX_REDUNDANCY_PERCENT}",
                self.fountain_redundancy_percent
            )));
        }
        if self.render.size == 0 {
            return Err(ConfigError::Invalid("render.size must be positive".into()));
        }
        Ok(())
    }

    /// Mixed parts to emit after `seq_len` pure ones.
    pub fn redundant_parts(&self, seq_len: usize) -> usize {
        (seq_len * self.fountain_redundancy_percent as usize).div_ceil(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_partial_json() {
        let config = CodecConfig::from_json_str(r#"{ "density": "high" }"#).unwrap();
        assert_eq!(config.density, Density::High);
        assert_eq!(config.fountain_redundancy_percent, DEFAULT_REDUNDANCY_PERCENT);
        assert_eq!(config.render, RenderOptions::default());
        assert_eq!(config.density.fragment_limits(), (400, 10));
    }

    #[test]
    fn json_round_trip_and_validation() {
        let config = CodecConfig::with_density(Density::Low);
        let json = config.to_json_string().unwrap();
        assert_eq!(CodecConfig::from_json_str(&json).unwrap(), config);

        assert!(matches!(
            CodecConfig::from_json_str(r#"{ "fountain_redundancy_percent": 5000 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(CodecConfig::from_json_str("{ nope"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn redundancy_rounds_up() {
        let config = CodecConfig { fountain_redundancy_percent: 50, ..CodecConfig::default() };
        assert_eq!(config.redundant_parts(3), 2);
        assert_eq!(config.redundant_parts(0), 0);
        assert!(RenderOptions::default().worker_count() >= 1);
    }
}
