//! Anomaly detection -- rolling per-metric series, detection rules,
//! and the per-cycle anomaly buffer.

pub mod buffer;
pub mod engine;
pub mod series;

pub use buffer::AnomalyBuffer;
pub use engine::Detector;
pub use series::MetricSeries;

use crate::metrics::MetricKind;
use chrono::{DateTime, Local};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("window size must be at least 1, got {0}")]
    InvalidWindow(usize),

    #[error("sigma factor must be positive, got {0}")]
    InvalidSigmaFactor(f64),
}

/// A single detected anomaly: one sample that crossed a bound.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Anomaly {
    /// The offending metric.
    pub kind: MetricKind,
    /// The sample that triggered the detection.
    pub value: f64,
    /// The numeric limit it crossed (static threshold or sigma bound).
    pub bound: f64,
    /// Human-readable description of the violation.
    pub message: String,
    /// Wall-clock time at detection.
    pub timestamp: DateTime<Local>,
    /// Severity grade, 1 (mild) to 5 (extreme).
    pub severity: u8,
}
