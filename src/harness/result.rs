//! Per-run benchmark records.

use std::fmt;
use std::time::Duration;

/// Derived rate for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Throughput {
    /// Bytes touched per second, in MiB/s.
    MebibytesPerSec(f64),
    /// Floating point operations per second, in billions.
    Gflops(f64),
}

impl Throughput {
    /// `bytes / elapsed` in MiB/s. `None` if no time was measured.
    pub fn bandwidth(bytes: usize, elapsed: Duration) -> Option<Self> {
        let secs = elapsed.as_secs_f64();
        if secs == 0.0 {
            return None;
        }
        Some(Throughput::MebibytesPerSec(
            bytes as f64 / (secs * 1024.0 * 1024.0),
        ))
    }

    /// `2·m·n·k / elapsed` in GFLOPS, one multiply and one add per term.
    pub fn gflops(m: usize, n: usize, k: usize, elapsed: Duration) -> Option<Self> {
        let secs = elapsed.as_secs_f64();
        if secs == 0.0 {
            return None;
        }
        Some(Throughput::Gflops(2.0 * (m * n * k) as f64 / secs / 1e9))
    }

    pub fn value(self) -> f64 {
        match self {
            Throughput::MebibytesPerSec(v) | Throughput::Gflops(v) => v,
        }
    }
}

impl fmt::Display for Throughput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Throughput::MebibytesPerSec(v) => write!(f, "{:.1} MiB/s", v),
            Throughput::Gflops(v) => write!(f, "{:.2} GFLOPS", v),
        }
    }
}

/// Outcome of checking one kernel's output against another's.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Match,
    /// Outputs disagree beyond the tolerance. `max_abs_diff` is filled in
    /// when the outputs are matrices.
    Diverged { max_abs_diff: Option<f32> },
}

impl Verdict {
    pub fn passed(self) -> bool {
        matches!(self, Verdict::Match)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Match => write!(f, "match"),
            Verdict::Diverged {
                max_abs_diff: Some(d),
            } => write!(f, "DIVERGED (max diff {:e})", d),
            Verdict::Diverged { max_abs_diff: None } => write!(f, "DIVERGED"),
        }
    }
}

/// Timing and derived figures for one named run.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkResult {
    pub name: String,
    pub elapsed: Duration,
    pub throughput: Option<Throughput>,
    pub verdict: Option<Verdict>,
    /// Value folded out of the run so it can't be optimized away.
    pub checksum: Option<f64>,
    /// Number of element accesses, for probes.
    pub accesses: Option<usize>,
}

impl BenchmarkResult {
    pub fn new(name: impl Into<String>, elapsed: Duration) -> Self {
        BenchmarkResult {
            name: name.into(),
            elapsed,
            throughput: None,
            verdict: None,
            checksum: None,
            accesses: None,
        }
    }

    pub fn millis(&self) -> f64 {
        super::timing::as_millis_f64(self.elapsed)
    }

    /// Average cost of one access. `None` unless the run counted accesses.
    pub fn nanos_per_access(&self) -> Option<f64> {
        match self.accesses {
            Some(n) if n > 0 => Some(self.elapsed.as_nanos() as f64 / n as f64),
            _ => None,
        }
    }
}
