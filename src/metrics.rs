//! Timing samples and latency aggregates.

use std::time::Duration;

/// The three calls the harness makes against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// `POST /messages`
    PostMessage,
    /// `GET /messages?OFFSET=n`
    GetMessages,
    /// `GET /messages/count`
    GetCount,
}

impl OperationKind {
    /// Short kebab-case label used in logs and errors.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            OperationKind::PostMessage => "post-message",
            OperationKind::GetMessages => "get-messages",
            OperationKind::GetCount => "get-count",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One measured round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingSample {
    /// Which call was timed.
    pub kind: OperationKind,
    /// Wall-clock time from request start to full response body.
    pub elapsed: Duration,
}

impl TimingSample {
    /// Create a new sample.
    #[must_use]
    pub const fn new(kind: OperationKind, elapsed: Duration) -> Self {
        Self { kind, elapsed }
    }

    /// Elapsed time in fractional seconds.
    #[must_use]
    pub fn seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Arithmetic mean of a slice of seconds, `None` when empty.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// An ordered collection of timing samples.
#[derive(Debug, Clone, Default)]
pub struct Latencies {
    samples: Vec<TimingSample>,
}

impl Latencies {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one sample.
    pub fn record(&mut self, sample: TimingSample) {
        self.samples.push(sample);
    }

    /// Number of samples recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All samples in recording order.
    #[must_use]
    pub fn samples(&self) -> &[TimingSample] {
        &self.samples
    }

    /// Only the samples of one operation kind.
    #[must_use]
    pub fn of_kind(&self, kind: OperationKind) -> Latencies {
        self.samples.iter().filter(|s| s.kind == kind).copied().collect()
    }

    /// Mean elapsed time in seconds.
    #[must_use]
    pub fn mean_secs(&self) -> Option<f64> {
        let secs: Vec<f64> = self.samples.iter().map(TimingSample::seconds).collect();
        mean(&secs)
    }

    /// Fastest sample.
    #[must_use]
    pub fn min(&self) -> Option<Duration> {
        self.samples.iter().map(|s| s.elapsed).min()
    }

    /// Slowest sample.
    #[must_use]
    pub fn max(&self) -> Option<Duration> {
        self.samples.iter().map(|s| s.elapsed).max()
    }

    /// Nearest-rank percentile, `p` in `0.0..=1.0`.
    ///
    /// Returns the smallest sample such that at least `p` of all samples are
    /// less than or equal to it.
    #[must_use]
    pub fn percentile(&self, p: f64) -> Option<Duration> {
        if self.samples.is_empty() {
            return None;
        }
        let mut sorted: Vec<Duration> = self.samples.iter().map(|s| s.elapsed).collect();
        sorted.sort();
        let p = p.clamp(0.0, 1.0);
        let rank = (p * sorted.len() as f64).ceil() as usize;
        Some(sorted[rank.clamp(1, sorted.len()) - 1])
    }

    /// Median.
    #[must_use]
    pub fn p50(&self) -> Option<Duration> {
        self.percentile(0.50)
    }

    /// 95th percentile.
    #[must_use]
    pub fn p95(&self) -> Option<Duration> {
        self.percentile(0.95)
    }

    /// 99th percentile.
    #[must_use]
    pub fn p99(&self) -> Option<Duration> {
        self.percentile(0.99)
    }
}

impl FromIterator<TimingSample> for Latencies {
    fn from_iter<I: IntoIterator<Item = TimingSample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

impl Extend<TimingSample> for Latencies {
    fn extend<I: IntoIterator<Item = TimingSample>>(&mut self, iter: I) {
        self.samples.extend(iter);
    }
}
