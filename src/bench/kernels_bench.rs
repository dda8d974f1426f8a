//! Criterion benchmarks for the multiply and transpose kernels, the stride
//! sweep and the record layouts.
//!
//! ```bash
//! cargo bench --bench kernels_bench
//! cargo bench --bench kernels_bench -- multiply
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use cacheblock::blocked::{self, BlockSize};
use cacheblock::layout::{self, Particles};
use cacheblock::matrix::{Matrix, naive_ijk, naive_ikj, transpose};
use cacheblock::{oblivious, probe};

fn random_pair(n: usize, rng: &mut StdRng) -> (Matrix, Matrix) {
    let a = Matrix::random(n, n, 0.0, 1.0, rng).unwrap();
    let b = Matrix::random(n, n, 0.0, 1.0, rng).unwrap();
    (a, b)
}

fn bench_multiply(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiply");
    group.sample_size(10);

    for n in [128, 256, 512] {
        let mut rng = StdRng::seed_from_u64(42);
        let (a, b) = random_pair(n, &mut rng);
        group.throughput(Throughput::Elements((2 * n * n * n) as u64));

        group.bench_with_input(BenchmarkId::new("naive_ijk", n), &n, |bench, _| {
            bench.iter(|| naive_ijk::multiply(black_box(&a), black_box(&b)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("naive_ikj", n), &n, |bench, _| {
            bench.iter(|| naive_ikj::multiply(black_box(&a), black_box(&b)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("blocked_64", n), &n, |bench, _| {
            bench.iter(|| {
                blocked::gemm::multiply(black_box(&a), black_box(&b), BlockSize::DEFAULT).unwrap()
            })
        });
        group.bench_with_input(BenchmarkId::new("oblivious", n), &n, |bench, _| {
            bench.iter(|| oblivious::multiply(black_box(&a), black_box(&b)).unwrap())
        });
    }

    group.finish();
}

fn bench_block_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("block_size");
    group.sample_size(10);

    let n = 512;
    let mut rng = StdRng::seed_from_u64(7);
    let (a, b) = random_pair(n, &mut rng);

    for edge in [8, 16, 32, 64, 128, 256] {
        let block = BlockSize::new(edge).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(edge), &block, |bench, &block| {
            bench.iter(|| blocked::gemm::multiply(black_box(&a), black_box(&b), block).unwrap())
        });
    }

    group.finish();
}

fn bench_transpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpose");

    for n in [1024, 2048] {
        let mut rng = StdRng::seed_from_u64(42);
        let m = Matrix::random(n, n, 0.0, 1.0, &mut rng).unwrap();
        group.throughput(Throughput::Bytes((2 * n * n * size_of::<f32>()) as u64));

        group.bench_with_input(BenchmarkId::new("naive", n), &n, |bench, _| {
            bench.iter(|| transpose::transpose(black_box(&m)))
        });
        group.bench_with_input(BenchmarkId::new("blocked_64", n), &n, |bench, _| {
            bench.iter(|| blocked::transpose::transpose(black_box(&m), BlockSize::DEFAULT))
        });
    }

    group.finish();
}

fn bench_strides(c: &mut Criterion) {
    let mut group = c.benchmark_group("stride_covering");
    group.sample_size(10);

    let len = 16 * 1024 * 1024;
    let data = vec![1.0f32; len];
    group.throughput(Throughput::Bytes((len * size_of::<f32>()) as u64));

    for stride in probe::STANDARD_STRIDES {
        group.bench_with_input(BenchmarkId::from_parameter(stride), &stride, |bench, &s| {
            bench.iter(|| probe::measure_covering(black_box(&data), s, "bench").unwrap())
        });
    }

    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");

    let n = 1_000_000;
    let mut rng = StdRng::seed_from_u64(42);
    let mut aos = layout::random_particles(n, &mut rng);
    let mut soa = Particles::from(aos.as_slice());
    group.throughput(Throughput::Elements(n as u64));

    group.bench_function("aos_advance", |bench| {
        bench.iter(|| layout::advance_aos(black_box(&mut aos), layout::DT))
    });
    group.bench_function("soa_advance", |bench| {
        bench.iter(|| black_box(&mut soa).advance(layout::DT))
    });

    let padded = layout::padded_records(n);
    let aligned = layout::aligned_records(n);
    group.bench_function("padded_sum", |bench| {
        bench.iter(|| layout::sum_payloads(black_box(&padded)))
    });
    group.bench_function("aligned_sum", |bench| {
        bench.iter(|| layout::sum_payloads(black_box(&aligned)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_multiply,
    bench_block_sizes,
    bench_transpose,
    bench_strides,
    bench_layout
);
criterion_main!(benches);
