//! `/proc/stat` aggregate CPU counters and delta-based percentages.

use crate::sampler::SampleError;

/// Snapshot of the aggregate `cpu` line of `/proc/stat`, in jiffies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuTimes {
    /// Parse the first line of `/proc/stat`.
    /// Format: `cpu  74608 2520 24433 1117073 6176 4054 0 0 0 0`
    pub fn parse(stat: &str) -> Result<Self, SampleError> {
        let line = stat
            .lines()
            .find(|l| l.starts_with("cpu "))
            .ok_or_else(|| SampleError::Malformed("no aggregate cpu line in /proc/stat"))?;

        let mut fields = line.split_whitespace().skip(1);
        let mut next = || -> u64 {
            fields
                .next()
                .and_then(|f| f.parse().ok())
                .unwrap_or(0)
        };
        let times = CpuTimes {
            user: next(),
            nice: next(),
            system: next(),
            idle: next(),
            iowait: next(),
            irq: next(),
            softirq: next(),
            steal: next(),
        };
        Ok(times)
    }

    pub fn total(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
    }

    /// Percentage shares of the interval between `prev` and `self`.
    /// A zero (or wrapped) total delta yields all zeroes.
    pub fn ratios_since(&self, prev: &CpuTimes) -> CpuRatios {
        let total = self.total().saturating_sub(prev.total());
        if total == 0 {
            return CpuRatios::default();
        }
        let total = total as f64;
        let idle = self.idle.saturating_sub(prev.idle) as f64;
        let iowait = self.iowait.saturating_sub(prev.iowait) as f64;
        let irq = self.irq.saturating_sub(prev.irq) as f64
            + self.softirq.saturating_sub(prev.softirq) as f64;

        CpuRatios {
            usage: (total - idle - iowait) / total * 100.0,
            iowait: iowait / total * 100.0,
            irq: irq / total * 100.0,
        }
    }
}

/// CPU percentages for one sampling interval.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuRatios {
    /// Busy share: everything except idle and iowait.
    pub usage: f64,
    /// I/O wait share.
    pub iowait: f64,
    /// Hard plus soft interrupt share.
    pub irq: f64,
}
