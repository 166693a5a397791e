//! `/proc/diskstats` parsing and derived per-device metrics.

use crate::sampler::SampleError;

/// Counters for one block device row of `/proc/diskstats`.
/// All time counters are cumulative milliseconds since boot.
#[derive(Debug, Clone, Default)]
pub struct DiskStats {
    pub device: String,
    pub reads_completed: u64,
    pub reads_merged: u64,
    pub sectors_read: u64,
    pub read_time_ms: u64,
    pub writes_completed: u64,
    pub writes_merged: u64,
    pub sectors_written: u64,
    pub write_time_ms: u64,
    pub io_in_progress: u64,
    pub io_time_ms: u64,
    pub weighted_io_time_ms: u64,
}

impl DiskStats {
    /// Find the row for `device` in `/proc/diskstats` content.
    /// Row format: `   8       0 sda 8043 1407 507920 6282 ...` (14+ fields).
    pub fn parse(diskstats: &str, device: &str) -> Result<Self, SampleError> {
        for line in diskstats.lines() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 14 || fields[2] != device {
                continue;
            }
            let num = |i: usize| -> u64 { fields[i].parse().unwrap_or(0) };
            return Ok(DiskStats {
                device: device.to_string(),
                reads_completed: num(3),
                reads_merged: num(4),
                sectors_read: num(5),
                read_time_ms: num(6),
                writes_completed: num(7),
                writes_merged: num(8),
                sectors_written: num(9),
                write_time_ms: num(10),
                io_in_progress: num(11),
                io_time_ms: num(12),
                weighted_io_time_ms: num(13),
            });
        }
        Err(SampleError::DeviceNotFound(device.to_string()))
    }

    /// Mean milliseconds per completed read, cumulative since boot.
    /// Zero when no read has completed yet.
    pub fn read_await_ms(&self) -> f64 {
        if self.reads_completed == 0 {
            return 0.0;
        }
        self.read_time_ms as f64 / self.reads_completed as f64
    }

    /// Mean milliseconds per completed write, cumulative since boot.
    pub fn write_await_ms(&self) -> f64 {
        if self.writes_completed == 0 {
            return 0.0;
        }
        self.write_time_ms as f64 / self.writes_completed as f64
    }

    /// Device busy share, approximated as `io_time_ms / 1000` clamped to
    /// `[0, 100]`. The counter is cumulative, so the quotient only reads
    /// as a percentage at one-second sampling; kept as-is for parity with
    /// the historical behaviour of this metric.
    pub fn util_percent(&self) -> f64 {
        (self.io_time_ms as f64 / 1000.0).clamp(0.0, 100.0)
    }
}
