//! Configuration for the SEQMEM engine.
//!
//! Maps directly to `seqmem.toml`:
//!
//! ```toml
//! [dial]
//! cell_count = 7
//! initial_decay = "random"
//! rng_seed = 42
//!
//! [memory]
//! feature_dim = 4
//! recognition_threshold = 0.0
//!
//! [telemetry]
//! track_latency = true
//! slow_operation_us = 500
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeqMemError};

/// Top-level SEQMEM configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeqMemConfig {
    /// Cell dial settings.
    #[serde(default)]
    pub dial: DialConfig,
    /// Feature store and recognition settings.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Telemetry & observability.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl SeqMemConfig {
    /// Load configuration from a TOML string.
    ///
    /// The result is validated before being returned.
    ///
    /// # Errors
    /// Returns `SeqMemError::Config` if the TOML is invalid or the values
    /// fail [`SeqMemConfig::validate`].
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| SeqMemError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Check that every value is usable by the engine.
    ///
    /// # Errors
    /// Returns `SeqMemError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.dial.cell_count == 0 {
            return Err(SeqMemError::Config(
                "dial.cell_count must be positive".to_string(),
            ));
        }
        if self.memory.feature_dim == 0 {
            return Err(SeqMemError::Config(
                "memory.feature_dim must be positive".to_string(),
            ));
        }
        if !self.memory.recognition_threshold.is_finite()
            || self.memory.recognition_threshold < 0.0
        {
            return Err(SeqMemError::Config(format!(
                "memory.recognition_threshold must be finite and >= 0 (got {})",
                self.memory.recognition_threshold
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// How the decay vector is filled before the first tic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialDecay {
    /// Every cell starts at 0.0; allocation order is fully deterministic.
    #[default]
    Zero,
    /// Every cell starts at a uniform value in `[0, 1)`.
    Random,
}

/// Cell dial configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialConfig {
    /// Number of addressable cells (`N`).
    #[serde(default = "default_cell_count")]
    pub cell_count: usize,
    /// Starting state of the decay vector.
    #[serde(default)]
    pub initial_decay: InitialDecay,
    /// Seed for [`InitialDecay::Random`]. `None` draws from OS entropy.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            cell_count: 7,
            initial_decay: InitialDecay::Zero,
            rng_seed: None,
        }
    }
}

/// Feature store and recognition configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Length of every feature vector.
    #[serde(default = "default_feature_dim")]
    pub feature_dim: usize,
    /// A content score must be strictly above this to count as recognized.
    #[serde(default)]
    pub recognition_threshold: f64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            feature_dim: 4,
            recognition_threshold: 0.0,
        }
    }
}

/// Telemetry and observability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Time recognition and pruning calls into a [`crate::metrics::LatencyMonitor`].
    #[serde(default)]
    pub track_latency: bool,
    /// Log any timed operation exceeding this threshold (microseconds).
    #[serde(default = "default_slow_operation_us")]
    pub slow_operation_us: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            track_latency: false,
            slow_operation_us: 500,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_cell_count() -> usize { 7 }
fn default_feature_dim() -> usize { 4 }
fn default_slow_operation_us() -> u64 { 500 }
