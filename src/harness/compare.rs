//! Two-variant timed comparisons.

use std::time::Duration;

use super::result::{BenchmarkResult, Throughput, Verdict};
use super::timing::timed;
use crate::error::Result;
use crate::matrix::Matrix;

/// Both variants have run; their outputs are held until checked.
#[derive(Debug)]
pub struct Timed<Out> {
    pub baseline: BenchmarkResult,
    pub candidate: BenchmarkResult,
    outputs: (Out, Out),
}

/// The finished comparison of a baseline and a candidate run.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub baseline: BenchmarkResult,
    pub candidate: BenchmarkResult,
    pub verdict: Option<Verdict>,
}

/// Runs `baseline` then `candidate`, timing each.
///
/// Both closures should compute the same logical result; pair this with
/// [`Timed::verify`] to check that they do.
///
/// ```
/// use cacheblock::harness::compare;
///
/// let v: Vec<u64> = (0..10_000).collect();
/// let cmp = compare(
///     ("loop", || {
///         let mut s = 0u64;
///         for x in &v {
///             s += x;
///         }
///         s
///     }),
///     ("iter", || v.iter().sum::<u64>()),
/// )
/// .verify(|a, b| a == b);
/// assert_eq!(cmp.verified(), Some(true));
/// ```
pub fn compare<Out, A, B>(baseline: (&str, A), candidate: (&str, B)) -> Timed<Out>
where
    A: FnOnce() -> Out,
    B: FnOnce() -> Out,
{
    let (out_a, time_a) = timed(baseline.1);
    log::debug!("{}: {:?}", baseline.0, time_a);
    let (out_b, time_b) = timed(candidate.1);
    log::debug!("{}: {:?}", candidate.0, time_b);

    Timed {
        baseline: BenchmarkResult::new(baseline.0, time_a),
        candidate: BenchmarkResult::new(candidate.0, time_b),
        outputs: (out_a, out_b),
    }
}

/// [`compare`] for fallible variants. The first error aborts the
/// comparison; the candidate doesn't run if the baseline failed.
pub fn try_compare<Out, A, B>(baseline: (&str, A), candidate: (&str, B)) -> Result<Timed<Out>>
where
    A: FnOnce() -> Result<Out>,
    B: FnOnce() -> Result<Out>,
{
    let (out_a, time_a) = timed(baseline.1);
    let out_a = out_a?;
    log::debug!("{}: {:?}", baseline.0, time_a);
    let (out_b, time_b) = timed(candidate.1);
    let out_b = out_b?;
    log::debug!("{}: {:?}", candidate.0, time_b);

    Ok(Timed {
        baseline: BenchmarkResult::new(baseline.0, time_a),
        candidate: BenchmarkResult::new(candidate.0, time_b),
        outputs: (out_a, out_b),
    })
}

impl<Out> Timed<Out> {
    pub fn outputs(&self) -> (&Out, &Out) {
        (&self.outputs.0, &self.outputs.1)
    }

    /// Checks the two outputs with `check` and records the verdict.
    pub fn verify(self, check: impl FnOnce(&Out, &Out) -> bool) -> Comparison {
        let verdict = if check(&self.outputs.0, &self.outputs.1) {
            Verdict::Match
        } else {
            Verdict::Diverged { max_abs_diff: None }
        };
        self.finish(Some(verdict))
    }

    /// Drops the outputs without checking them.
    pub fn unverified(self) -> Comparison {
        self.finish(None)
    }

    fn finish(self, verdict: Option<Verdict>) -> Comparison {
        if let Some(v) = verdict.filter(|v| !v.passed()) {
            log::warn!(
                "{} and {} disagree: {}",
                self.baseline.name,
                self.candidate.name,
                v
            );
        }
        Comparison {
            baseline: self.baseline,
            candidate: self.candidate,
            verdict,
        }
    }
}

impl Timed<Matrix> {
    /// Tolerance check on matrix outputs, recording the largest difference
    /// when they diverge.
    pub fn verify_within(self, epsilon: f32) -> Comparison {
        let (x, y) = self.outputs();
        let verdict = if x.equals_within_tolerance(y, epsilon) {
            Verdict::Match
        } else {
            Verdict::Diverged {
                max_abs_diff: x.max_abs_diff(y),
            }
        };
        self.finish(Some(verdict))
    }
}

impl Comparison {
    /// `baseline time / candidate time`. Above 1 means the candidate won.
    /// `None` if the candidate took no measurable time.
    pub fn speedup(&self) -> Option<f64> {
        ratio(self.baseline.elapsed, self.candidate.elapsed)
    }

    pub fn verified(&self) -> Option<bool> {
        self.verdict.map(Verdict::passed)
    }

    /// Attaches GFLOPS figures for an `m × n × k` product to both runs.
    pub fn with_flops(mut self, m: usize, n: usize, k: usize) -> Self {
        self.baseline.throughput = Throughput::gflops(m, n, k, self.baseline.elapsed);
        self.candidate.throughput = Throughput::gflops(m, n, k, self.candidate.elapsed);
        self
    }

    /// Attaches bandwidth figures for `bytes` touched by each run.
    pub fn with_bytes(mut self, bytes: usize) -> Self {
        self.baseline.throughput = Throughput::bandwidth(bytes, self.baseline.elapsed);
        self.candidate.throughput = Throughput::bandwidth(bytes, self.candidate.elapsed);
        self
    }
}

fn ratio(a: Duration, b: Duration) -> Option<f64> {
    let b = b.as_secs_f64();
    if b == 0.0 {
        None
    } else {
        Some(a.as_secs_f64() / b)
    }
}
