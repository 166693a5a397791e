use crate::detect::{Anomaly, AnomalyBuffer, DetectError, MetricSeries};
use crate::metrics::MetricKind;
use chrono::Local;

/// Minimum history length before the sigma rule considers a series.
/// This floor is enforced here regardless of the driver's warm-up policy.
const SIGMA_MIN_SAMPLES: usize = 3;

/// The detection engine: one rolling series per metric kind plus the
/// anomaly buffer filled during each cycle.
///
/// Detection is a pure function of the current series state; the buffer
/// only ever contains records produced by the two `detect_*` scans since
/// the last [`Detector::reset_cycle`].
pub struct Detector {
    series: Vec<MetricSeries>,
    anomalies: AnomalyBuffer,
    window: usize,
    sigma_factor: f64,
}

impl Detector {
    /// Create a detector with empty series for every metric kind.
    pub fn new(window: usize, sigma_factor: f64) -> Result<Self, DetectError> {
        if window < 1 {
            return Err(DetectError::InvalidWindow(window));
        }
        if !(sigma_factor > 0.0) {
            return Err(DetectError::InvalidSigmaFactor(sigma_factor));
        }
        let series = MetricKind::ALL
            .iter()
            .map(|&kind| MetricSeries::new(kind, window))
            .collect();
        Ok(Self {
            series,
            anomalies: AnomalyBuffer::new(),
            window,
            sigma_factor,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn sigma_factor(&self) -> f64 {
        self.sigma_factor
    }

    /// Append a fresh sample to the named series.
    pub fn observe(&mut self, kind: MetricKind, value: f64) {
        self.series[kind.index()].append(value);
    }

    /// Clear the anomaly buffer at the start of a cycle.
    pub fn reset_cycle(&mut self) {
        self.anomalies.reset();
    }

    pub fn series(&self, kind: MetricKind) -> &MetricSeries {
        &self.series[kind.index()]
    }

    /// Anomalies recorded since the last cycle reset, in emission order.
    pub fn anomalies(&self) -> &[Anomaly] {
        self.anomalies.as_slice()
    }

    /// Scan every series against its N-sigma envelope. Returns the number
    /// of anomalies appended.
    ///
    /// A series participates once it holds at least three samples. The
    /// low-side check is suppressed when `mean - k*sigma` is not positive,
    /// which silences floor-hugging metrics whose envelope dips below zero.
    pub fn detect_sigma(&mut self) -> usize {
        let mut detected = 0;
        for kind in MetricKind::ALL {
            let series = &self.series[kind.index()];
            let (mean, stddev, n) = series.statistics();
            if n < SIGMA_MIN_SAMPLES {
                continue;
            }
            let Some(value) = series.current() else {
                continue;
            };
            let upper = mean + self.sigma_factor * stddev;
            let lower = mean - self.sigma_factor * stddev;

            if value > upper {
                let message = format!(
                    "{} 异常偏高: {:.2} > {:.2} (均值: {:.2}, 标准差: {:.2})",
                    kind.description(),
                    value,
                    upper,
                    mean,
                    stddev
                );
                let severity = score_severity(value - upper, upper);
                self.record(kind, value, upper, message, severity);
                detected += 1;
            } else if value < lower && lower > 0.0 {
                let message = format!(
                    "{} 异常偏低: {:.2} < {:.2} (均值: {:.2}, 标准差: {:.2})",
                    kind.description(),
                    value,
                    lower,
                    mean,
                    stddev
                );
                let severity = score_severity(lower - value, lower);
                self.record(kind, value, lower, message, severity);
                detected += 1;
            }
        }
        detected
    }

    /// Scan every series against its static threshold. Returns the number
    /// of anomalies appended. A zero threshold disables the rule for that
    /// kind.
    pub fn detect_threshold(&mut self) -> usize {
        let mut detected = 0;
        for kind in MetricKind::ALL {
            let series = &self.series[kind.index()];
            let threshold = series.threshold();
            if threshold <= 0.0 {
                continue;
            }
            let Some(value) = series.current() else {
                continue;
            };
            if value > threshold {
                let message = format!(
                    "{} 超过阈值: {:.2} > {:.2}",
                    kind.description(),
                    value,
                    threshold
                );
                let severity = score_severity(value - threshold, threshold);
                self.record(kind, value, threshold, message, severity);
                detected += 1;
            }
        }
        detected
    }

    fn record(&mut self, kind: MetricKind, value: f64, bound: f64, message: String, severity: u8) {
        self.anomalies.push(Anomaly {
            kind,
            value,
            bound,
            message,
            timestamp: Local::now(),
            severity,
        });
    }
}

/// Severity 1-5 proportional to the overshoot relative to the crossed
/// bound: `floor(overshoot / bound * 5) + 1`, capped at 5.
///
/// A non-positive bound (possible on the sigma high side when the whole
/// history is zero) makes the relative overshoot unbounded and scores 5.
fn score_severity(overshoot: f64, bound: f64) -> u8 {
    if bound <= 0.0 {
        return 5;
    }
    let scaled = (overshoot / bound * 5.0).floor().clamp(0.0, 4.0);
    scaled as u8 + 1
}
