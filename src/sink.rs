//! Anomaly log sink -- append-mode text file, one record per line.

use crate::detect::Anomaly;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Writes anomaly batches to a log file. The file is opened in append
/// mode per batch and closed before the driver sleeps; no handle is held
/// across cycles.
#[derive(Debug, Clone)]
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Append one line per anomaly:
    /// `[YYYY-MM-DD HH:MM:SS] 严重程度=<sev>, 指标=<name>, 值=<v>, 阈值=<bound>, 消息=<message>`
    pub fn append(&self, anomalies: &[Anomaly]) -> Result<()> {
        if anomalies.is_empty() {
            return Ok(());
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open log file {}", self.path.display()))?;

        for anomaly in anomalies {
            writeln!(
                file,
                "[{}] 严重程度={}, 指标={}, 值={:.2}, 阈值={:.2}, 消息={}",
                anomaly.timestamp.format("%Y-%m-%d %H:%M:%S"),
                anomaly.severity,
                anomaly.kind,
                anomaly.value,
                anomaly.bound,
                anomaly.message,
            )
            .with_context(|| format!("failed to write log file {}", self.path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricKind;
    use chrono::Local;

    fn record() -> Anomaly {
        Anomaly {
            kind: MetricKind::MemUsage,
            value: 95.0,
            bound: 90.0,
            message: "内存使用率(%) 超过阈值: 95.00 > 90.00".to_string(),
            timestamp: Local::now(),
            severity: 1,
        }
    }

    #[test]
    fn writes_one_formatted_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let sink = LogSink::new(dir.path().join("anomalies.log"));
        sink.append(&[record(), record()]).unwrap();

        let contents = std::fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].contains("严重程度=1"));
        assert!(lines[0].contains("指标=mem_usage"));
        assert!(lines[0].contains("值=95.00"));
        assert!(lines[0].contains("阈值=90.00"));
        assert!(lines[0].contains("消息=内存使用率(%) 超过阈值: 95.00 > 90.00"));
    }

    #[test]
    fn appends_across_batches() {
        let dir = tempfile::tempdir().unwrap();
        let sink = LogSink::new(dir.path().join("anomalies.log"));
        sink.append(&[record()]).unwrap();
        sink.append(&[record()]).unwrap();
        let contents = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn empty_batch_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let sink = LogSink::new(dir.path().join("anomalies.log"));
        sink.append(&[]).unwrap();
        assert!(!sink.path().exists());
    }
}
