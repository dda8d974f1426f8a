//! Monotonic timing around a single operation.

use std::time::{Duration, Instant};

/// Wall-clock timer on the monotonic [`Instant`] clock.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Stopwatch {
            start: Instant::now(),
        }
    }

    /// Time since [`start`](Self::start). Never negative.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Runs `f` once and returns its output with the time it took.
///
/// ```
/// use cacheblock::harness::timed;
///
/// let (sum, elapsed) = timed(|| (1..=100u64).sum::<u64>());
/// assert_eq!(sum, 5050);
/// assert!(elapsed.as_secs() < 1);
/// ```
pub fn timed<R>(f: impl FnOnce() -> R) -> (R, Duration) {
    let sw = Stopwatch::start();
    let out = f();
    (out, sw.elapsed())
}

/// Milliseconds as `f64`, the unit every report prints.
pub fn as_millis_f64(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
