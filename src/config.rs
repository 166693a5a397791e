//! Runtime configuration -- defaults, CLI-sourced values, validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_SAMPLING_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_WINDOW_SIZE: usize = 60;
pub const DEFAULT_SIGMA_FACTOR: f64 = 3.0;
pub const DEFAULT_LOG_FILE: &str = "anomalies.log";
pub const DEFAULT_DISK_DEVICE: &str = "sda";
pub const DEFAULT_NET_INTERFACE: &str = "eth0";
/// Cycles to complete before detection starts. The sigma rule additionally
/// enforces its own per-series three-sample floor.
pub const DEFAULT_WARMUP_CYCLES: u64 = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("sampling interval must be greater than 0")]
    InvalidInterval,

    #[error("window size must be greater than 0")]
    InvalidWindow,

    #[error("sigma factor must be greater than 0")]
    InvalidSigmaFactor,
}

/// Daemon configuration, assembled from CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Seconds between sampling cycles.
    pub sampling_interval: u64,
    /// Rolling-window capacity per metric.
    pub window_size: usize,
    /// Multiplier on the standard deviation for the sigma envelope.
    pub sigma_factor: f64,
    /// Anomaly log file, appended one line per record.
    pub log_file: PathBuf,
    /// Block device watched in /proc/diskstats.
    pub disk_device: String,
    /// Interface watched in /proc/net/dev.
    pub net_interface: String,
    /// Cycles before detection starts.
    pub warmup_cycles: u64,
    /// Root of the proc pseudo-filesystem.
    pub proc_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sampling_interval: DEFAULT_SAMPLING_INTERVAL_SECS,
            window_size: DEFAULT_WINDOW_SIZE,
            sigma_factor: DEFAULT_SIGMA_FACTOR,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            disk_device: DEFAULT_DISK_DEVICE.to_string(),
            net_interface: DEFAULT_NET_INTERFACE.to_string(),
            warmup_cycles: DEFAULT_WARMUP_CYCLES,
            proc_root: PathBuf::from("/proc"),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sampling_interval == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        if self.window_size == 0 {
            return Err(ConfigError::InvalidWindow);
        }
        if !(self.sigma_factor > 0.0) {
            return Err(ConfigError::InvalidSigmaFactor);
        }
        Ok(())
    }
}
