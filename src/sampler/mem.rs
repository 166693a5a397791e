//! `/proc/meminfo` parsing.

use crate::sampler::SampleError;

/// The `/proc/meminfo` fields the daemon consumes, in kilobytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemInfo {
    pub total: u64,
    pub free: u64,
    pub buffers: u64,
    pub cached: u64,
    pub active: u64,
}

impl MemInfo {
    /// Parse `/proc/meminfo` content. Lines look like `MemTotal: 16300548 kB`.
    pub fn parse(meminfo: &str) -> Result<Self, SampleError> {
        let mut info = MemInfo::default();
        let mut seen_total = false;

        for line in meminfo.lines() {
            let Some((label, rest)) = line.split_once(':') else {
                continue;
            };
            let value = rest
                .split_whitespace()
                .next()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(0);
            match label {
                "MemTotal" => {
                    info.total = value;
                    seen_total = true;
                }
                "MemFree" => info.free = value,
                "Buffers" => info.buffers = value,
                "Cached" => info.cached = value,
                "Active" => info.active = value,
                _ => {}
            }
        }

        if !seen_total {
            return Err(SampleError::Malformed("no MemTotal line in /proc/meminfo"));
        }
        Ok(info)
    }

    /// Used-memory percentage, excluding buffers and page cache.
    pub fn usage_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let used = self
            .total
            .saturating_sub(self.free)
            .saturating_sub(self.buffers)
            .saturating_sub(self.cached);
        used as f64 / self.total as f64 * 100.0
    }

    /// `Active` in kilobytes.
    pub fn active_kb(&self) -> f64 {
        self.active as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEMINFO: &str = "MemTotal:       16000000 kB\n\
                           MemFree:         4000000 kB\n\
                           MemAvailable:    9000000 kB\n\
                           Buffers:         1000000 kB\n\
                           Cached:          3000000 kB\n\
                           SwapCached:            0 kB\n\
                           Active:          6500000 kB\n\
                           Inactive:        3200000 kB\n";

    #[test]
    fn parses_the_consumed_fields() {
        let info = MemInfo::parse(MEMINFO).unwrap();
        assert_eq!(info.total, 16_000_000);
        assert_eq!(info.free, 4_000_000);
        assert_eq!(info.buffers, 1_000_000);
        assert_eq!(info.cached, 3_000_000);
        assert_eq!(info.active, 6_500_000);
    }

    #[test]
    fn usage_excludes_buffers_and_cache() {
        let info = MemInfo::parse(MEMINFO).unwrap();
        // used = 16M - 4M - 1M - 3M = 8M -> 50%.
        assert!((info.usage_percent() - 50.0).abs() < 1e-9);
        assert_eq!(info.active_kb(), 6_500_000.0);
    }

    #[test]
    fn missing_total_is_an_error() {
        assert!(MemInfo::parse("MemFree: 100 kB\n").is_err());
    }

    #[test]
    fn zero_total_reports_zero_usage() {
        let info = MemInfo::parse("MemTotal: 0 kB\n").unwrap();
        assert_eq!(info.usage_percent(), 0.0);
    }
}
