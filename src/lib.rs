//! procsentry -- statistical anomaly detection for host /proc metrics.
//!
//! This crate provides the core library for the sampling daemon: the
//! `/proc` scrapers, the rolling per-metric statistics, the N-sigma and
//! static-threshold detection rules, and the anomaly log sink.

pub mod config;
pub mod daemon;
pub mod detect;
pub mod metrics;
pub mod sampler;
pub mod sink;

use anyhow::Result;

/// Start the detection daemon and run it until SIGINT or SIGTERM.
pub async fn run(config: config::Config) -> Result<()> {
    let daemon = daemon::Daemon::new(&config)?;
    daemon.run().await
}
