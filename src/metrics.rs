//! The fixed catalogue of sampled OS metrics.

use serde::{Deserialize, Serialize};

/// One of the nine resource metrics tracked by the daemon.
///
/// The variant order is stable and is the order in which metrics are
/// sampled, observed, and scanned every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    CpuUsage,
    CpuIowait,
    CpuIrq,
    MemUsage,
    MemActive,
    DiskReadAwait,
    DiskWriteAwait,
    DiskUtil,
    NetDropped,
}

impl MetricKind {
    /// All metric kinds in enumeration order.
    pub const ALL: [MetricKind; 9] = [
        MetricKind::CpuUsage,
        MetricKind::CpuIowait,
        MetricKind::CpuIrq,
        MetricKind::MemUsage,
        MetricKind::MemActive,
        MetricKind::DiskReadAwait,
        MetricKind::DiskWriteAwait,
        MetricKind::DiskUtil,
        MetricKind::NetDropped,
    ];

    /// Short identifier used in log lines.
    pub fn name(self) -> &'static str {
        match self {
            MetricKind::CpuUsage => "cpu_usage",
            MetricKind::CpuIowait => "cpu_iowait",
            MetricKind::CpuIrq => "cpu_irq",
            MetricKind::MemUsage => "mem_usage",
            MetricKind::MemActive => "mem_active",
            MetricKind::DiskReadAwait => "disk_read_await",
            MetricKind::DiskWriteAwait => "disk_write_await",
            MetricKind::DiskUtil => "disk_util",
            MetricKind::NetDropped => "net_dropped",
        }
    }

    /// Human-readable description used in anomaly messages.
    pub fn description(self) -> &'static str {
        match self {
            MetricKind::CpuUsage => "CPU使用率(%)",
            MetricKind::CpuIowait => "CPU IO等待时间(%)",
            MetricKind::CpuIrq => "CPU中断时间(%)",
            MetricKind::MemUsage => "内存使用率(%)",
            MetricKind::MemActive => "活跃内存大小(KB)",
            MetricKind::DiskReadAwait => "磁盘读响应时间(ms)",
            MetricKind::DiskWriteAwait => "磁盘写响应时间(ms)",
            MetricKind::DiskUtil => "磁盘使用率(%)",
            MetricKind::NetDropped => "网络丢包数",
        }
    }

    /// Static alert threshold. Zero means no static threshold is
    /// configured for this kind; it is only flagged by the sigma rule.
    pub fn static_threshold(self) -> f64 {
        match self {
            MetricKind::CpuUsage => 90.0,
            MetricKind::CpuIowait => 20.0,
            MetricKind::CpuIrq => 10.0,
            MetricKind::MemUsage => 90.0,
            MetricKind::MemActive => 0.0,
            MetricKind::DiskReadAwait => 100.0,
            MetricKind::DiskWriteAwait => 100.0,
            MetricKind::DiskUtil => 90.0,
            MetricKind::NetDropped => 100.0,
        }
    }

    /// Position of this kind in [`MetricKind::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
