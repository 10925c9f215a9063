use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Timing parameters applied to every conversion
    #[serde(default)]
    pub timing: TimingConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Timing parameters for timestamp conversion
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimingConfig {
    /// Frame rate assumed when the document does not declare one
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,

    /// Signed shift in milliseconds applied to every resolved timestamp
    #[serde(default)]
    pub shift_ms: i64,

    /// Source duration in seconds, for retiming (used together with target_duration_secs)
    #[serde(default)]
    pub source_duration_secs: Option<u64>,

    /// Target duration in seconds, for retiming
    #[serde(default)]
    pub target_duration_secs: Option<u64>,
}

impl TimingConfig {
    /// Retiming factor derived from the source/target duration pair.
    ///
    /// Defaults to 1.0 unless both durations are present and positive.
    pub fn scale(&self) -> f64 {
        match (self.source_duration_secs, self.target_duration_secs) {
            (Some(sdur), Some(tdur)) if sdur > 0 && tdur > 0 => tdur as f64 / sdur as f64,
            _ => 1.0,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            shift_ms: 0,
            source_duration_secs: None,
            target_duration_secs: None,
        }
    }
}

/// Output settings for SubRip files
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// File extension for generated subtitle files
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_frame_rate() -> f64 {
    23.976
}

fn default_extension() -> String {
    "srt".to_string()
}

impl Config {
    /// Validate configuration values after loading and CLI overrides
    pub fn validate(&self) -> Result<()> {
        if self.timing.frame_rate <= 0.0 {
            return Err(anyhow!(
                "Frame rate must be positive, got {}",
                self.timing.frame_rate
            ));
        }

        if self.timing.source_duration_secs.is_some() != self.timing.target_duration_secs.is_some()
        {
            return Err(anyhow!(
                "Source and target durations must be provided together for retiming"
            ));
        }

        if let Some(0) = self.timing.source_duration_secs {
            return Err(anyhow!("Source duration must be positive"));
        }
        if let Some(0) = self.timing.target_duration_secs {
            return Err(anyhow!("Target duration must be positive"));
        }

        if self.output.extension.is_empty() {
            return Err(anyhow!("Output extension must not be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            timing: TimingConfig::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
