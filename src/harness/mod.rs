//! Timing, comparison and reporting for kernel benchmarks.
//!
//! A benchmark is two zero-argument variants computing the same thing. The
//! harness runs them back to back on the monotonic clock, optionally checks
//! their outputs against each other, and hands the numbers to a
//! [`Reporter`]. A failed check is recorded as a [`Verdict`], never raised.

pub mod compare;
pub mod report;
pub mod result;
pub mod timing;

pub use compare::{Comparison, Timed, compare, try_compare};
pub use report::{ConsoleReporter, LogReporter, Reporter};
pub use result::{BenchmarkResult, Throughput, Verdict};
pub use timing::{Stopwatch, timed};
