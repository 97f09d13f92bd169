//! Engine configuration
//!
//! Persisted as `engine.json` in the host's data directory. Missing
//! fields fall back to their defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::fs;

/// File name used by [`EngineConfig::load`] and [`EngineConfig::save`]
pub const CONFIG_FILE: &str = "engine.json";

/// Default values
pub mod defaults {
    /// Maximum number of past snapshots kept by the history
    pub const HISTORY_LIMIT: usize = 50;
    /// zstd level for history snapshots
    pub const SNAPSHOT_COMPRESSION_LEVEL: i32 = 3;
    /// Upper bound on how long a paused run waits before re-checking its state
    pub const PAUSE_CHECK_INTERVAL_MS: u64 = 100;
    pub const WORKFLOW_ID_PREFIX: &str = "workflow";
    pub const SIMULATED_LATENCY_MIN_MS: u64 = 500;
    pub const SIMULATED_LATENCY_MAX_MS: u64 = 1500;
}

/// Latency range of the simulated node executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for LatencyRange {
    fn default() -> Self {
        Self {
            min_ms: defaults::SIMULATED_LATENCY_MIN_MS,
            max_ms: defaults::SIMULATED_LATENCY_MAX_MS,
        }
    }
}

impl LatencyRange {
    /// A range that always yields the same latency
    pub fn fixed(ms: u64) -> Self {
        Self {
            min_ms: ms,
            max_ms: ms,
        }
    }

    /// Pick a latency inside the range from a seed
    pub fn pick(&self, seed: u64) -> Duration {
        let (lo, hi) = if self.min_ms <= self.max_ms {
            (self.min_ms, self.max_ms)
        } else {
            (self.max_ms, self.min_ms)
        };
        let span = (hi - lo).saturating_add(1);
        Duration::from_millis(lo + seed % span)
    }
}

fn default_history_limit() -> usize {
    defaults::HISTORY_LIMIT
}

fn default_compression_level() -> i32 {
    defaults::SNAPSHOT_COMPRESSION_LEVEL
}

fn default_pause_check_interval() -> u64 {
    defaults::PAUSE_CHECK_INTERVAL_MS
}

fn default_workflow_id_prefix() -> String {
    defaults::WORKFLOW_ID_PREFIX.to_string()
}

/// Full engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Cap on the undo history
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// zstd level for history snapshots
    #[serde(default = "default_compression_level")]
    pub snapshot_compression_level: i32,
    /// Pause re-check interval in milliseconds
    #[serde(default = "default_pause_check_interval")]
    pub pause_check_interval_ms: u64,
    /// Prefix for generated workflow run ids
    #[serde(default = "default_workflow_id_prefix")]
    pub workflow_id_prefix: String,
    /// Latency of the simulated executor
    #[serde(default)]
    pub simulated_latency: LatencyRange,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            snapshot_compression_level: default_compression_level(),
            pause_check_interval_ms: default_pause_check_interval(),
            workflow_id_prefix: default_workflow_id_prefix(),
            simulated_latency: LatencyRange::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from disk, or defaults if no file exists
    pub async fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = data_dir.join(CONFIG_FILE);

        if !config_path.exists() {
            log::debug!("No engine config at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .await
            .map_err(ConfigError::Io)?;

        serde_json::from_str(&contents).map_err(ConfigError::Parse)
    }

    /// Save configuration to disk
    pub async fn save(&self, data_dir: &Path) -> Result<(), ConfigError> {
        fs::create_dir_all(data_dir).await.map_err(ConfigError::Io)?;

        let config_path = data_dir.join(CONFIG_FILE);
        let contents = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        fs::write(&config_path, contents)
            .await
            .map_err(ConfigError::Io)?;

        log::info!("Engine configuration saved to {:?}", config_path);
        Ok(())
    }

    pub fn pause_check_interval(&self) -> Duration {
        Duration::from_millis(self.pause_check_interval_ms.max(1))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(serde_json::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(serde_json::Error),
}
