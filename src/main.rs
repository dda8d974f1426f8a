//! Benchmark runner for the cache-aware kernels.
//!
//! Sizes come from `BenchConfig::from_env()`; set `CACHEBLOCK_*` variables
//! to shrink or grow them. Exits non-zero if any verified comparison
//! diverges.

use std::error::Error;
use std::process::ExitCode;

use cacheblock::blocked::{self, BlockSize};
use cacheblock::config::{BenchConfig, ReportFormat};
use cacheblock::harness::{
    Comparison, ConsoleReporter, LogReporter, Reporter, Throughput, compare, try_compare,
};
use cacheblock::layout::{self, LineAligned, Padded, Particles};
use cacheblock::matrix::{Matrix, naive_ijk, naive_ikj, transpose};
use cacheblock::{oblivious, probe};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = match BenchConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut reporter: Box<dyn Reporter> = match cfg.report {
        ReportFormat::Console => Box::new(ConsoleReporter::stdout()),
        ReportFormat::Log => Box::new(LogReporter),
    };

    match run(&cfg, reporter.as_mut()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            log::error!("at least one kernel disagreed with its baseline");
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Runs every section. `Ok(false)` means some verification failed.
fn run(cfg: &BenchConfig, reporter: &mut dyn Reporter) -> Result<bool, Box<dyn Error>> {
    log::info!("=== Cache Blocking and Memory Optimization ===");
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let block = BlockSize::new(cfg.block)?;
    let blocked_label = format!("Blocked ({})", block.get());
    let mut all_ok = true;

    // Naive vs blocked multiply
    let n = cfg.matmul_n;
    let a = Matrix::random(n, n, 0.0, 1.0, &mut rng)?;
    let b = Matrix::random(n, n, 0.0, 1.0, &mut rng)?;
    let cmp = try_compare(
        ("Naive (i-j-k)", || naive_ijk::multiply(&a, &b)),
        (blocked_label.as_str(), || blocked::gemm::multiply(&a, &b, block)),
    )?
    .verify_within(cfg.epsilon)
    .with_flops(n, n, n);
    report(reporter, &format!("Matrix Multiply {}x{}", n, n), cmp, &mut all_ok)?;

    // Loop interchange alone, no tiling
    let cmp = try_compare(
        ("Naive (i-j-k)", || naive_ijk::multiply(&a, &b)),
        ("Interchanged (i-k-j)", || naive_ikj::multiply(&a, &b)),
    )?
    .verify_within(cfg.epsilon)
    .with_flops(n, n, n);
    report(reporter, &format!("Loop Order {}x{}", n, n), cmp, &mut all_ok)?;
    drop((a, b));

    // Naive vs blocked transpose; a permutation, so outputs must be identical
    let n = cfg.transpose_n;
    let t = Matrix::random(n, n, 0.0, 1.0, &mut rng)?;
    let cmp = compare(
        ("Naive transpose", || transpose::transpose(&t)),
        ("Blocked transpose", || blocked::transpose::transpose(&t, block)),
    )
    .verify(|x, y| x == y)
    .with_bytes(2 * n * n * size_of::<f32>());
    report(reporter, &format!("Matrix Transpose {}x{}", n, n), cmp, &mut all_ok)?;
    drop(t);

    // Blocked vs cache-oblivious
    let n = cfg.oblivious_n;
    let a = Matrix::random(n, n, 0.0, 1.0, &mut rng)?;
    let b = Matrix::random(n, n, 0.0, 1.0, &mut rng)?;
    let cmp = try_compare(
        (blocked_label.as_str(), || blocked::gemm::multiply(&a, &b, block)),
        ("Cache-oblivious", || oblivious::multiply(&a, &b)),
    )?
    .verify_within(cfg.epsilon)
    .with_flops(n, n, n);
    report(reporter, &format!("Cache-Oblivious {}x{}", n, n), cmp, &mut all_ok)?;
    drop((a, b));

    // Access patterns over a flat buffer
    let mut data = Matrix::zeros(1, cfg.probe_len);
    data.fill_random_uniform(&mut rng, 0.0, 1.0)?;
    let data = data.into_vec();
    log::info!(
        "probe buffer: {} MiB",
        data.len() * size_of::<f32>() / (1024 * 1024)
    );

    for &stride in &cfg.strides {
        let r = probe::measure(&data, stride, &probe::stride_label(stride))?;
        reporter.run(&r)?;
    }

    let sequential = probe::measure_covering(&data, 1, "Sequential")?;
    let shuffled = probe::measure_shuffled(&data, &mut rng, "Random");
    let cmp = Comparison {
        baseline: shuffled,
        candidate: sequential,
        verdict: None,
    };
    report(reporter, "Random vs Sequential", cmp, &mut all_ok)?;
    drop(data);

    // Array of structures vs structure of arrays
    let mut aos = layout::random_particles(cfg.particles, &mut rng);
    let mut soa = Particles::from(aos.as_slice());
    let cmp = compare(
        ("AoS update", || layout::advance_aos(&mut aos, layout::DT)),
        ("SoA update", || soa.advance(layout::DT)),
    )
    .verify(|_, _| soa.same_positions(&aos))
    .with_bytes(cfg.particles * 6 * size_of::<f32>());
    report(reporter, &format!("SoA vs AoS ({} particles)", cfg.particles), cmp, &mut all_ok)?;
    drop((aos, soa));

    // Padded vs cache-line-aligned records
    log::info!(
        "record sizes: padded {} bytes, aligned {} bytes, cache line {} bytes",
        size_of::<Padded>(),
        size_of::<LineAligned>(),
        layout::CACHE_LINE_SIZE
    );
    let padded = layout::padded_records(cfg.records);
    let aligned = layout::aligned_records(cfg.records);
    let mut cmp = compare(
        ("Padded", || layout::sum_payloads(&padded)),
        ("Line-aligned", || layout::sum_payloads(&aligned)),
    )
    .verify(|x, y| x == y);
    cmp.baseline.throughput =
        Throughput::bandwidth(cfg.records * size_of::<Padded>(), cmp.baseline.elapsed);
    cmp.candidate.throughput =
        Throughput::bandwidth(cfg.records * size_of::<LineAligned>(), cmp.candidate.elapsed);
    report(reporter, &format!("Record Alignment ({} records)", cfg.records), cmp, &mut all_ok)?;

    reporter.finish()?;
    Ok(all_ok)
}

fn report(
    reporter: &mut dyn Reporter,
    title: &str,
    cmp: Comparison,
    all_ok: &mut bool,
) -> std::io::Result<()> {
    *all_ok &= cmp.verified().unwrap_or(true);
    reporter.comparison(title, &cmp)
}
