use crate::metrics::MetricKind;
use std::collections::VecDeque;

/// Bounded rolling history of one scalar metric plus its running
/// population statistics.
///
/// The window holds at most `window` samples, oldest first. Appending to a
/// full window evicts the oldest sample. Mean and standard deviation are
/// recomputed over the retained contents on every append (population form,
/// divisor `n`).
#[derive(Debug)]
pub struct MetricSeries {
    kind: MetricKind,
    threshold: f64,
    history: VecDeque<f64>,
    window: usize,
    mean: f64,
    stddev: f64,
}

impl MetricSeries {
    pub fn new(kind: MetricKind, window: usize) -> Self {
        Self {
            kind,
            threshold: kind.static_threshold(),
            history: VecDeque::with_capacity(window),
            window,
            mean: 0.0,
            stddev: 0.0,
        }
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    /// Static threshold for this metric; zero disables the threshold rule.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Add one sample, evicting the oldest if the window is full.
    pub fn append(&mut self, value: f64) {
        if self.history.len() == self.window {
            self.history.pop_front();
        }
        self.history.push_back(value);
        self.recompute_stats();
    }

    /// `(mean, stddev, n)` over the current window contents.
    /// Undefined (zeroes) while `n == 0`.
    pub fn statistics(&self) -> (f64, f64, usize) {
        (self.mean, self.stddev, self.history.len())
    }

    /// The most recently appended sample, if any.
    pub fn current(&self) -> Option<f64> {
        self.history.back().copied()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn stddev(&self) -> f64 {
        self.stddev
    }

    /// Samples in logical order, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.history.iter().copied()
    }

    fn recompute_stats(&mut self) {
        let n = self.history.len();
        if n == 0 {
            self.mean = 0.0;
            self.stddev = 0.0;
            return;
        }
        let sum: f64 = self.history.iter().sum();
        let mean = sum / n as f64;
        let sq_sum: f64 = self.history.iter().map(|x| (x - mean) * (x - mean)).sum();
        self.mean = mean;
        // Population variance: divisor is n, not n - 1.
        self.stddev = (sq_sum / n as f64).sqrt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(window: usize) -> MetricSeries {
        MetricSeries::new(MetricKind::CpuUsage, window)
    }

    #[test]
    fn empty_series_reports_zero_samples() {
        let s = series(10);
        let (_, _, n) = s.statistics();
        assert_eq!(n, 0);
        assert!(s.current().is_none());
    }

    #[test]
    fn history_length_is_min_of_window_and_appends() {
        let mut s = series(5);
        for i in 0..12 {
            s.append(i as f64);
            assert_eq!(s.len(), (i + 1).min(5));
        }
    }

    #[test]
    fn eviction_drops_oldest_and_preserves_order() {
        let mut s = series(3);
        for v in [1.0, 2.0, 3.0, 4.0] {
            s.append(v);
        }
        let contents: Vec<f64> = s.samples().collect();
        assert_eq!(contents, vec![2.0, 3.0, 4.0]);
        assert_eq!(s.current(), Some(4.0));
        assert_eq!(s.mean(), 3.0);
        assert!((s.stddev() - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn statistics_are_population_form() {
        let mut s = series(10);
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            s.append(v);
        }
        let (mean, stddev, n) = s.statistics();
        assert_eq!(n, 5);
        assert!((mean - 3.0).abs() < 1e-12);
        // Population variance of 1..=5 is 2.0.
        assert!((stddev * stddev - 2.0).abs() < 1e-12);
    }

    #[test]
    fn stats_track_window_contents_after_saturation() {
        let mut s = series(4);
        for v in 1..=20 {
            s.append(v as f64);
        }
        // Window holds [17, 18, 19, 20].
        let (mean, stddev, n) = s.statistics();
        assert_eq!(n, 4);
        assert!((mean - 18.5).abs() < 1e-12);
        assert!((stddev * stddev - 1.25).abs() < 1e-12);
        assert_eq!(s.samples().next(), Some(17.0));
    }

    #[test]
    fn window_of_one_always_holds_the_last_sample() {
        let mut s = series(1);
        s.append(7.0);
        s.append(9.0);
        assert_eq!(s.len(), 1);
        assert_eq!(s.current(), Some(9.0));
        assert_eq!(s.mean(), 9.0);
        assert_eq!(s.stddev(), 0.0);
    }
}
