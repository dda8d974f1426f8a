//! Memory access pattern probe.
//!
//! Walks a flat `f32` buffer in a chosen order, sums what it reads, and
//! reports the time taken and the effective bandwidth. The sum goes through
//! [`black_box`] and is kept on the result, so the loop can't be dropped by
//! the optimizer.

use std::hint::black_box;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{Result, invalid_parameter};
use crate::harness::{BenchmarkResult, Stopwatch, Throughput};

/// Strides swept by the demo runner, in elements.
pub const STANDARD_STRIDES: [usize; 7] = [1, 2, 4, 8, 16, 64, 1024];

/// Display name for a stride.
///
/// ```
/// use cacheblock::probe::stride_label;
///
/// assert_eq!(stride_label(1), "Sequential");
/// assert_eq!(stride_label(8), "Stride-8");
/// ```
pub fn stride_label(stride: usize) -> String {
    match stride {
        1 => "Sequential".to_string(),
        64 => "Stride-64 (cache line)".to_string(),
        s => format!("Stride-{}", s),
    }
}

fn check_stride(stride: usize) -> Result<()> {
    if stride == 0 {
        return Err(invalid_parameter("stride", stride, "must be at least 1"));
    }
    Ok(())
}

fn finish(name: &str, sw: Stopwatch, sum: f64, visited: usize) -> BenchmarkResult {
    let elapsed = sw.elapsed();
    let mut r = BenchmarkResult::new(name, elapsed);
    r.throughput = Throughput::bandwidth(visited * size_of::<f32>(), elapsed);
    r.checksum = Some(sum);
    r.accesses = Some(visited);
    log::debug!("{}: {} accesses in {:?}", name, visited, elapsed);
    r
}

/// Single pass reading `buffer[0]`, `buffer[stride]`, `buffer[2·stride]`, …
///
/// Larger strides touch fewer elements, so compare them by
/// [`nanos_per_access`](BenchmarkResult::nanos_per_access) or use
/// [`measure_covering`] for equal work.
///
/// # Errors
///
/// [`Error::InvalidParameter`](crate::Error::InvalidParameter) if `stride` is
/// zero.
pub fn measure(buffer: &[f32], stride: usize, name: &str) -> Result<BenchmarkResult> {
    check_stride(stride)?;
    let iterations = buffer.len().div_ceil(stride);

    let sw = Stopwatch::start();
    let mut sum = 0.0f64;
    for i in 0..iterations {
        sum += black_box(buffer[i * stride]) as f64;
    }
    let sum = black_box(sum);

    Ok(finish(name, sw, sum, iterations))
}

/// Reads every element exactly once, `stride` apart: offsets 0, stride,
/// 2·stride, … then 1, 1 + stride, … and so on.
///
/// Every stride does the same amount of work here, so elapsed times are
/// directly comparable.
pub fn measure_covering(buffer: &[f32], stride: usize, name: &str) -> Result<BenchmarkResult> {
    check_stride(stride)?;
    let start_offsets = stride.min(buffer.len());

    let sw = Stopwatch::start();
    let mut sum = 0.0f64;
    for offset in 0..start_offsets {
        for i in (offset..buffer.len()).step_by(stride) {
            sum += black_box(buffer[i]) as f64;
        }
    }
    let sum = black_box(sum);

    Ok(finish(name, sw, sum, buffer.len()))
}

/// Reads every element once in a random order.
///
/// The shuffled index table is built before the clock starts.
pub fn measure_shuffled<R: Rng + ?Sized>(
    buffer: &[f32],
    rng: &mut R,
    name: &str,
) -> BenchmarkResult {
    let mut indices: Vec<usize> = (0..buffer.len()).collect();
    indices.shuffle(rng);

    let sw = Stopwatch::start();
    let mut sum = 0.0f64;
    for &i in &indices {
        sum += black_box(buffer[i]) as f64;
    }
    let sum = black_box(sum);

    finish(name, sw, sum, buffer.len())
}
