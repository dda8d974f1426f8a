use std::io;
use std::time::Duration;

use cacheblock::harness::{
    BenchmarkResult, Comparison, ConsoleReporter, LogReporter, Reporter, Throughput, Verdict,
    compare, timed, try_compare,
};
use cacheblock::matrix::Matrix;
use cacheblock::{BlockSize, Error, multiply_blocked, multiply_naive};

fn comparison(baseline_ms: u64, candidate_ms: u64, verdict: Option<Verdict>) -> Comparison {
    Comparison {
        baseline: BenchmarkResult::new("baseline", Duration::from_millis(baseline_ms)),
        candidate: BenchmarkResult::new("candidate", Duration::from_millis(candidate_ms)),
        verdict,
    }
}

#[test]
fn test_compare_keeps_names_and_outputs() {
    let cmp = compare(("first", || 0usize), ("second", || 7usize));
    assert_eq!(cmp.outputs(), (&0, &7));
    assert_eq!(cmp.baseline.name, "first");
    assert_eq!(cmp.candidate.name, "second");

    let cmp = cmp.verify(|a, b| a == b);
    assert_eq!(cmp.verified(), Some(false));
    assert_eq!(cmp.verdict, Some(Verdict::Diverged { max_abs_diff: None }));
}

#[test]
fn test_unverified_has_no_verdict() {
    let cmp = compare(("a", || 1), ("b", || 1)).unverified();
    assert_eq!(cmp.verdict, None);
    assert_eq!(cmp.verified(), None);
}

#[test]
fn test_matrix_verification() {
    let a = Matrix::from_fn(40, 40, |r, c| ((r + c) % 3) as f32 * 0.5);
    let b = Matrix::from_fn(40, 40, |r, c| ((r * c) % 5) as f32);

    let cmp = try_compare(
        ("naive", || multiply_naive(&a, &b)),
        ("blocked", || multiply_blocked(&a, &b, BlockSize::new(16)?)),
    )
    .unwrap()
    .verify_within(1e-5);
    assert_eq!(cmp.verdict, Some(Verdict::Match));

    let cmp = try_compare(
        ("naive", || multiply_naive(&a, &b)),
        ("perturbed", || {
            let mut c = multiply_naive(&a, &b)?;
            c[(3, 4)] += 0.25;
            Ok(c)
        }),
    )
    .unwrap()
    .verify_within(1e-5);
    assert_eq!(
        cmp.verdict,
        Some(Verdict::Diverged {
            max_abs_diff: Some(0.25)
        })
    );
    assert_eq!(cmp.verified(), Some(false));
}

#[test]
fn test_try_compare_propagates_errors() {
    let a = Matrix::zeros(2, 3);
    let mut candidate_ran = false;
    let err = try_compare(
        ("bad", || multiply_naive(&a, &a)),
        ("never", || {
            candidate_ran = true;
            Ok(Matrix::zeros(1, 1))
        }),
    )
    .unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));
    assert!(!candidate_ran);
}

#[test]
fn test_speedup_ratio() {
    assert_eq!(comparison(200, 50, None).speedup(), Some(4.0));
    assert_eq!(comparison(50, 200, None).speedup(), Some(0.25));
    assert_eq!(comparison(10, 0, None).speedup(), None);
}

#[test]
fn test_throughput_figures() {
    let cmp = comparison(1000, 500, None).with_flops(1000, 1000, 1000);
    assert_eq!(cmp.baseline.throughput, Some(Throughput::Gflops(2.0)));
    assert_eq!(cmp.candidate.throughput, Some(Throughput::Gflops(4.0)));

    let cmp = comparison(1000, 2000, None).with_bytes(8 * 1024 * 1024);
    assert_eq!(cmp.baseline.throughput, Some(Throughput::MebibytesPerSec(8.0)));
    assert_eq!(cmp.candidate.throughput, Some(Throughput::MebibytesPerSec(4.0)));

    assert_eq!(Throughput::bandwidth(1, Duration::ZERO), None);
    assert_eq!(Throughput::Gflops(1.5).to_string(), "1.50 GFLOPS");
    assert_eq!(Throughput::MebibytesPerSec(8.0).to_string(), "8.0 MiB/s");
}

#[test]
fn test_timed_returns_output() {
    let (v, elapsed) = timed(|| vec![0u8; 16]);
    assert_eq!(v.len(), 16);
    assert!(elapsed < Duration::from_secs(5));
}

#[test]
fn test_console_reporter_output() {
    let mut reporter = ConsoleReporter::new(Vec::new());
    reporter
        .comparison("Matrix Multiply 8x8", &comparison(30, 10, Some(Verdict::Match)))
        .unwrap();
    reporter
        .comparison(
            "Broken",
            &comparison(10, 10, Some(Verdict::Diverged { max_abs_diff: Some(0.5) })),
        )
        .unwrap();

    let mut run = BenchmarkResult::new("Sequential", Duration::from_millis(2));
    run.checksum = Some(12.0);
    reporter.run(&run).unwrap();
    reporter.finish().unwrap();

    let text = String::from_utf8(reporter.into_inner()).unwrap();
    assert!(text.contains("=== Matrix Multiply 8x8 ==="));
    assert!(text.contains("Speedup: 3.00×"));
    assert!(text.contains("✓ Results match!"));
    assert!(text.contains("✗ Results differ"));
    assert!(text.contains("(sum: 12.0)"));
    assert!(text.contains("SUMMARY"));
    assert!(text.contains("DIVERGED"));
}

#[test]
fn test_log_reporter_accepts_everything() {
    let mut reporter = LogReporter;
    reporter.run(&BenchmarkResult::new("x", Duration::ZERO)).unwrap();
    reporter
        .comparison("y", &comparison(1, 0, Some(Verdict::Match)))
        .unwrap();
    reporter.finish().unwrap();
}

#[derive(Default)]
struct Collect {
    titles: Vec<String>,
    runs: usize,
}

impl Reporter for Collect {
    fn run(&mut self, _: &BenchmarkResult) -> io::Result<()> {
        self.runs += 1;
        Ok(())
    }

    fn comparison(&mut self, title: &str, _: &Comparison) -> io::Result<()> {
        self.titles.push(title.to_string());
        Ok(())
    }
}

#[test]
fn test_custom_reporter() {
    let mut sink = Collect::default();
    let reporter: &mut dyn Reporter = &mut sink;
    reporter.comparison("one", &comparison(1, 1, None)).unwrap();
    reporter.run(&BenchmarkResult::new("r", Duration::ZERO)).unwrap();
    reporter.finish().unwrap();

    assert_eq!(sink.titles, ["one"]);
    assert_eq!(sink.runs, 1);
}
