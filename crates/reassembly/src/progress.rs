use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default throughput window.
const DEFAULT_WINDOW: Duration = Duration::from_secs(5);

/// Snapshot reported each time one slice retrieval completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchProgress {
    /// Retrievals finished so far (strictly increasing across reports).
    pub completed: usize,
    /// Retrievals in this operation.
    pub total: usize,
    /// Payload bytes received so far.
    pub bytes: u64,
}

impl FetchProgress {
    /// Completed fraction in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.completed as f64 / self.total as f64
    }

    pub fn is_done(&self) -> bool {
        self.completed == self.total
    }
}

/// Callback invoked with retrieval progress.
///
/// Calls are made one at a time from the task driving the reassembly, never
/// concurrently.
pub type ProgressCallback = Box<dyn Fn(FetchProgress) + Send + Sync>;

// ---------------------------------------------------------------------------
// ThroughputMeter
// ---------------------------------------------------------------------------

/// Download throughput over a sliding time window.
pub struct ThroughputMeter {
    window: Duration,
    samples: Mutex<VecDeque<(Instant, u64)>>,
}

impl ThroughputMeter {
    /// Creates a meter. If `window` is `None`, defaults to 5 s.
    pub fn new(window: Option<Duration>) -> Self {
        Self {
            window: window.unwrap_or(DEFAULT_WINDOW),
            samples: Mutex::new(VecDeque::new()),
        }
    }

    /// Records `bytes` received now.
    pub fn record(&self, bytes: u64) {
        self.record_at(Instant::now(), bytes);
    }

    fn record_at(&self, at: Instant, bytes: u64) {
        let mut samples = self.lock();
        samples.push_back((at, bytes));
        while let Some((oldest, _)) = samples.front() {
            if at.duration_since(*oldest) <= self.window {
                break;
            }
            samples.pop_front();
        }
    }

    /// Average bytes/second within the window; 0.0 with fewer than 2 samples.
    pub fn bytes_per_second(&self) -> f64 {
        let samples = self.lock();
        let (Some((first, _)), Some((last, _))) = (samples.front(), samples.back()) else {
            return 0.0;
        };
        let elapsed = last.duration_since(*first);
        if samples.len() < 2 || elapsed.is_zero() {
            return 0.0;
        }
        let bytes: u64 = samples.iter().map(|(_, b)| b).sum();
        bytes as f64 / elapsed.as_secs_f64()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<(Instant, u64)>> {
        self.samples.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ThroughputMeter {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_and_done() {
        let p = FetchProgress {
            completed: 1,
            total: 4,
            bytes: 10,
        };
        assert_eq!(p.fraction(), 0.25);
        assert!(!p.is_done());

        let p = FetchProgress {
            completed: 4,
            total: 4,
            bytes: 40,
        };
        assert!(p.is_done());
    }

    #[test]
    fn empty_operation_counts_as_done() {
        let p = FetchProgress {
            completed: 0,
            total: 0,
            bytes: 0,
        };
        assert_eq!(p.fraction(), 1.0);
        assert!(p.is_done());
    }

    #[test]
    fn meter_needs_two_samples() {
        let meter = ThroughputMeter::default();
        assert_eq!(meter.bytes_per_second(), 0.0);
        meter.record(100);
        assert_eq!(meter.bytes_per_second(), 0.0);
    }

    #[test]
    fn meter_average() {
        let meter = ThroughputMeter::new(Some(Duration::from_secs(10)));
        let t0 = Instant::now();
        meter.record_at(t0, 500);
        meter.record_at(t0 + Duration::from_secs(1), 500);
        assert_eq!(meter.bytes_per_second(), 1000.0);
    }

    #[test]
    fn meter_drops_samples_outside_window() {
        let meter = ThroughputMeter::new(Some(Duration::from_secs(2)));
        let t0 = Instant::now();
        meter.record_at(t0, 1_000_000);
        meter.record_at(t0 + Duration::from_secs(5), 100);
        meter.record_at(t0 + Duration::from_secs(6), 100);
        assert_eq!(meter.lock().len(), 2);
        assert_eq!(meter.bytes_per_second(), 200.0);
    }
}
