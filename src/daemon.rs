//! The driver loop -- sampling cycles, warm-up, and signal-driven shutdown.

use crate::config::Config;
use crate::detect::Detector;
use crate::metrics::MetricKind;
use crate::sampler::ProcSampler;
use crate::sink::LogSink;
use anyhow::{Context, Result};
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{debug, info, warn};

/// Owns the detector, sampler, and sink, and steps them cycle by cycle.
/// Single-threaded: no operation here is shared across tasks.
pub struct Daemon {
    detector: Detector,
    sampler: ProcSampler,
    sink: LogSink,
    interval: Duration,
    warmup_cycles: u64,
    cycle: u64,
}

impl Daemon {
    /// Build all components. Any failure here (bad parameters, unreadable
    /// initial `/proc` snapshots) aborts start-up.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let detector = Detector::new(config.window_size, config.sigma_factor)?;
        let sampler = ProcSampler::new(
            &config.proc_root,
            &config.disk_device,
            &config.net_interface,
        )
        .context("failed to take initial /proc snapshots")?;

        Ok(Self {
            detector,
            sampler,
            sink: LogSink::new(&config.log_file),
            interval: Duration::from_secs(config.sampling_interval),
            warmup_cycles: config.warmup_cycles,
            cycle: 0,
        })
    }

    /// Run until SIGINT or SIGTERM. The signal interrupts the inter-cycle
    /// sleep immediately; an in-flight cycle body always completes.
    pub async fn run(mut self) -> Result<()> {
        let mut sigint = signal(SignalKind::interrupt()).context("failed to install SIGINT handler")?;
        let mut sigterm =
            signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;

        info!(
            interval_secs = self.interval.as_secs(),
            window = self.detector.window(),
            sigma_factor = self.detector.sigma_factor(),
            log_file = %self.sink.path().display(),
            "detection loop started"
        );

        loop {
            self.step();

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = sigint.recv() => {
                    info!("received SIGINT, shutting down");
                    break;
                }
                _ = sigterm.recv() => {
                    info!("received SIGTERM, shutting down");
                    break;
                }
            }
        }

        info!(cycles = self.cycle, "detection loop stopped");
        Ok(())
    }

    /// Execute one sampling cycle: clear the buffer (after warm-up),
    /// observe every successful reading, then run both detection rules and
    /// sink whatever they emitted. Returns the number of anomalies.
    pub fn step(&mut self) -> usize {
        self.cycle += 1;
        let warmed_up = self.cycle >= self.warmup_cycles;
        if warmed_up {
            self.detector.reset_cycle();
        }

        for reading in self.sampler.collect() {
            self.detector.observe(reading.kind, reading.value);
        }
        self.log_current_values();

        if !warmed_up {
            debug!(cycle = self.cycle, "warming up, detection suppressed");
            return 0;
        }

        let sigma = self.detector.detect_sigma();
        let threshold = self.detector.detect_threshold();
        let emitted = sigma + threshold;

        if emitted > 0 {
            for anomaly in self.detector.anomalies() {
                warn!(
                    metric = %anomaly.kind,
                    value = anomaly.value,
                    bound = anomaly.bound,
                    severity = anomaly.severity,
                    "{}",
                    anomaly.message
                );
            }
            // Sink failures are transient: the records stay in the buffer
            // until the next cycle reset, and the loop keeps running.
            if let Err(e) = self.sink.append(self.detector.anomalies()) {
                warn!(error = %e, "failed to persist anomalies");
            }
        }

        debug!(
            cycle = self.cycle,
            sigma_anomalies = sigma,
            threshold_anomalies = threshold,
            "cycle complete"
        );
        emitted
    }

    fn log_current_values(&self) {
        for kind in MetricKind::ALL {
            let series = self.detector.series(kind);
            let Some(value) = series.current() else {
                continue;
            };
            let (mean, stddev, n) = series.statistics();
            if n >= 3 {
                debug!(metric = %kind, value, mean, stddev, "sampled");
            } else {
                debug!(metric = %kind, value, "sampled");
            }
        }
    }
}
