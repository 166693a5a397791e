//! Metric scrapers for the `/proc` pseudo-filesystem.
//!
//! All previous-snapshot state lives in the [`ProcSampler`] instance owned
//! by the driver; files are opened and closed within a single sampling
//! call. The `/proc` root is a plain path so tests can point the sampler
//! at a fixture tree.

pub mod cpu;
pub mod disk;
pub mod mem;
pub mod net;

use crate::metrics::MetricKind;
use crate::sampler::cpu::{CpuRatios, CpuTimes};
use crate::sampler::disk::DiskStats;
use crate::sampler::mem::MemInfo;
use crate::sampler::net::NetCounters;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed metrics file: {0}")]
    Malformed(&'static str),

    #[error("block device not present in /proc/diskstats: {0}")]
    DeviceNotFound(String),

    #[error("interface not present in /proc/net/dev: {0}")]
    InterfaceNotFound(String),
}

/// One successful sample for one metric.
#[derive(Debug, Clone, Copy)]
pub struct Reading {
    pub kind: MetricKind,
    pub value: f64,
}

/// Scrapes the nine OS metrics each cycle, holding the previous
/// `/proc/stat` and `/proc/net/dev` snapshots for delta computation.
#[derive(Debug)]
pub struct ProcSampler {
    proc_root: PathBuf,
    disk_device: String,
    net_interface: String,
    prev_cpu: CpuTimes,
    prev_net: NetCounters,
    prev_net_at: Instant,
}

impl ProcSampler {
    /// Create a sampler and take the initial counter snapshots.
    /// Failure here is an initialisation error: the daemon must not start.
    pub fn new(
        proc_root: impl Into<PathBuf>,
        disk_device: impl Into<String>,
        net_interface: impl Into<String>,
    ) -> Result<Self, SampleError> {
        let proc_root = proc_root.into();
        let disk_device = disk_device.into();
        let net_interface = net_interface.into();

        let prev_cpu = CpuTimes::parse(&read_proc_file(&proc_root, "stat")?)?;
        let prev_net =
            NetCounters::parse(&read_proc_file(&proc_root, "net/dev")?, &net_interface)?;

        Ok(Self {
            proc_root,
            disk_device,
            net_interface,
            prev_cpu,
            prev_net,
            prev_net_at: Instant::now(),
        })
    }

    /// Take one reading per metric, in enumeration order. A failed read is
    /// logged and absent from the result; its series stays unchanged this
    /// cycle. Metrics scraped from the same file share that file's fate.
    pub fn collect(&mut self) -> Vec<Reading> {
        let mut readings = Vec::with_capacity(MetricKind::ALL.len());

        match self.cpu_ratios() {
            Ok(r) => {
                readings.push(Reading {
                    kind: MetricKind::CpuUsage,
                    value: r.usage,
                });
                readings.push(Reading {
                    kind: MetricKind::CpuIowait,
                    value: r.iowait,
                });
                readings.push(Reading {
                    kind: MetricKind::CpuIrq,
                    value: r.irq,
                });
            }
            Err(e) => warn!(error = %e, "skipping cpu metrics this cycle"),
        }

        match self.mem_info() {
            Ok(info) => {
                readings.push(Reading {
                    kind: MetricKind::MemUsage,
                    value: info.usage_percent(),
                });
                readings.push(Reading {
                    kind: MetricKind::MemActive,
                    value: info.active_kb(),
                });
            }
            Err(e) => warn!(error = %e, "skipping memory metrics this cycle"),
        }

        match self.disk_stats() {
            Ok(stats) => {
                readings.push(Reading {
                    kind: MetricKind::DiskReadAwait,
                    value: stats.read_await_ms(),
                });
                readings.push(Reading {
                    kind: MetricKind::DiskWriteAwait,
                    value: stats.write_await_ms(),
                });
                readings.push(Reading {
                    kind: MetricKind::DiskUtil,
                    value: stats.util_percent(),
                });
            }
            Err(e) => warn!(device = %self.disk_device, error = %e, "skipping disk metrics this cycle"),
        }

        match self.net_dropped() {
            Ok(value) => readings.push(Reading {
                kind: MetricKind::NetDropped,
                value,
            }),
            Err(e) => warn!(interface = %self.net_interface, error = %e, "skipping network metrics this cycle"),
        }

        readings
    }

    /// One `/proc/stat` read serves all three CPU metrics: the percentages
    /// are shares of the same interval delta, and the snapshot becomes the
    /// baseline for the next cycle.
    fn cpu_ratios(&mut self) -> Result<CpuRatios, SampleError> {
        let now = CpuTimes::parse(&read_proc_file(&self.proc_root, "stat")?)?;
        let ratios = now.ratios_since(&self.prev_cpu);
        self.prev_cpu = now;
        Ok(ratios)
    }

    fn mem_info(&self) -> Result<MemInfo, SampleError> {
        MemInfo::parse(&read_proc_file(&self.proc_root, "meminfo")?)
    }

    fn disk_stats(&self) -> Result<DiskStats, SampleError> {
        DiskStats::parse(
            &read_proc_file(&self.proc_root, "diskstats")?,
            &self.disk_device,
        )
    }

    fn net_dropped(&mut self) -> Result<f64, SampleError> {
        let now = NetCounters::parse(
            &read_proc_file(&self.proc_root, "net/dev")?,
            &self.net_interface,
        )?;
        let elapsed = self.prev_net_at.elapsed().as_secs_f64();
        let rate = now.dropped_per_sec(&self.prev_net, elapsed);
        self.prev_net = now;
        self.prev_net_at = Instant::now();
        Ok(rate)
    }
}

fn read_proc_file(root: &Path, relative: &str) -> Result<String, SampleError> {
    let path = root.join(relative);
    std::fs::read_to_string(&path).map_err(|source| SampleError::Io { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const STAT: &str = "cpu  100 0 50 800 40 5 5 0 0 0\ncpu0 100 0 50 800 40 5 5 0 0 0\n";
    const MEMINFO: &str = "MemTotal: 16000000 kB\n\
                           MemFree: 4000000 kB\n\
                           Buffers: 1000000 kB\n\
                           Cached: 3000000 kB\n\
                           Active: 6500000 kB\n";
    const DISKSTATS: &str =
        "   8       0 sda 8000 1407 507920 64000 2000 1988 81336 30000 0 45000 94282 0 0 0 0\n";
    const NETDEV: &str = "Inter-|   Receive |  Transmit\n\
 face |bytes packets errs drop fifo frame compressed multicast|bytes packets errs drop fifo colls carrier compressed\n\
  eth0: 8000000 60000 2 40 0 0 0 0 2000000 30000 1 10 0 0 0 0\n";

    fn fixture_root() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("stat"), STAT).unwrap();
        fs::write(dir.path().join("meminfo"), MEMINFO).unwrap();
        fs::write(dir.path().join("diskstats"), DISKSTATS).unwrap();
        fs::create_dir(dir.path().join("net")).unwrap();
        fs::write(dir.path().join("net/dev"), NETDEV).unwrap();
        dir
    }

    #[test]
    fn init_fails_without_a_stat_file() {
        let dir = TempDir::new().unwrap();
        let err = ProcSampler::new(dir.path(), "sda", "eth0").unwrap_err();
        assert!(matches!(err, SampleError::Io { .. }));
    }

    #[test]
    fn init_fails_when_the_interface_is_missing() {
        let dir = fixture_root();
        let err = ProcSampler::new(dir.path(), "sda", "wlan0").unwrap_err();
        assert!(matches!(err, SampleError::InterfaceNotFound(_)));
    }

    #[test]
    fn collect_returns_all_metrics_in_enumeration_order() {
        let dir = fixture_root();
        let mut sampler = ProcSampler::new(dir.path(), "sda", "eth0").unwrap();
        let readings = sampler.collect();

        let kinds: Vec<MetricKind> = readings.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, MetricKind::ALL.to_vec());

        // Static fixture: zero CPU delta, so the ratios are all zero.
        assert_eq!(readings[MetricKind::CpuUsage.index()].value, 0.0);
        // 16M - 4M - 1M - 3M used out of 16M.
        assert!((readings[MetricKind::MemUsage.index()].value - 50.0).abs() < 1e-9);
        assert_eq!(readings[MetricKind::MemActive.index()].value, 6_500_000.0);
        assert!((readings[MetricKind::DiskReadAwait.index()].value - 8.0).abs() < 1e-9);
        assert!((readings[MetricKind::DiskWriteAwait.index()].value - 15.0).abs() < 1e-9);
        assert!((readings[MetricKind::DiskUtil.index()].value - 45.0).abs() < 1e-9);
        // Drop counters unchanged since init.
        assert_eq!(readings[MetricKind::NetDropped.index()].value, 0.0);
    }

    #[test]
    fn cpu_percentages_follow_counter_movement() {
        let dir = fixture_root();
        let mut sampler = ProcSampler::new(dir.path(), "sda", "eth0").unwrap();
        fs::write(
            dir.path().join("stat"),
            "cpu  160 0 70 900 50 10 10 0 0 0\n",
        )
        .unwrap();
        let readings = sampler.collect();
        assert!((readings[MetricKind::CpuUsage.index()].value - 45.0).abs() < 1e-9);
        assert!((readings[MetricKind::CpuIowait.index()].value - 5.0).abs() < 1e-9);
        assert!((readings[MetricKind::CpuIrq.index()].value - 5.0).abs() < 1e-9);
    }

    #[test]
    fn a_missing_device_row_skips_only_the_disk_metrics() {
        let dir = fixture_root();
        let mut sampler = ProcSampler::new(dir.path(), "nvme0n1", "eth0").unwrap();
        let readings = sampler.collect();
        let kinds: Vec<MetricKind> = readings.iter().map(|r| r.kind).collect();
        assert_eq!(readings.len(), 6);
        assert!(!kinds.contains(&MetricKind::DiskReadAwait));
        assert!(!kinds.contains(&MetricKind::DiskUtil));
        assert!(kinds.contains(&MetricKind::NetDropped));
    }
}
