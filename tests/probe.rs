use cacheblock::Error;
use cacheblock::harness::Throughput;
use cacheblock::probe::{self, STANDARD_STRIDES};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn ramp(len: usize) -> Vec<f32> {
    (0..len).map(|i| i as f32).collect()
}

#[test]
fn test_zero_stride_rejected() {
    let data = ramp(16);
    assert!(matches!(
        probe::measure(&data, 0, "bad"),
        Err(Error::InvalidParameter { name: "stride", .. })
    ));
    assert!(probe::measure_covering(&data, 0, "bad").is_err());
}

#[test]
fn test_strided_pass_visits_expected_elements() {
    let data = ramp(10);

    // 0, 3, 6, 9
    let r = probe::measure(&data, 3, "Stride-3").unwrap();
    assert_eq!(r.name, "Stride-3");
    assert_eq!(r.accesses, Some(4));
    assert_eq!(r.checksum, Some(18.0));

    let r = probe::measure(&data, 1, "Sequential").unwrap();
    assert_eq!(r.accesses, Some(10));
    assert_eq!(r.checksum, Some(45.0));

    // Stride past the end still reads element 0.
    let r = probe::measure(&data, 1000, "huge").unwrap();
    assert_eq!(r.accesses, Some(1));
    assert_eq!(r.checksum, Some(0.0));
}

#[test]
fn test_covering_pass_reads_everything_once() {
    let data = ramp(100);
    for stride in [1, 7, 64, 1024] {
        let r = probe::measure_covering(&data, stride, "cover").unwrap();
        assert_eq!(r.accesses, Some(100), "stride {}", stride);
        assert_eq!(r.checksum, Some(4950.0), "stride {}", stride);
    }
}

#[test]
fn test_shuffled_pass_reads_everything_once() {
    let data = ramp(1000);
    let r = probe::measure_shuffled(&data, &mut StdRng::seed_from_u64(3), "Random");
    assert_eq!(r.accesses, Some(1000));
    assert_eq!(r.checksum, Some(499_500.0));
}

#[test]
fn test_empty_buffer() {
    let r = probe::measure(&[], 4, "empty").unwrap();
    assert_eq!(r.accesses, Some(0));
    assert_eq!(r.checksum, Some(0.0));
    assert_eq!(r.nanos_per_access(), None);
}

#[test]
fn test_bandwidth_reported_in_mib() {
    let data = vec![1.0f32; 1 << 20];
    let r = probe::measure(&data, 1, "Sequential").unwrap();
    match r.throughput {
        Some(Throughput::MebibytesPerSec(mbps)) => {
            let expected = 4.0 / r.elapsed.as_secs_f64();
            assert!((mbps - expected).abs() <= expected * 1e-9);
        }
        // A clock too coarse to see the pass leaves throughput unset.
        None => assert!(r.elapsed.is_zero()),
        other => panic!("unexpected throughput {:?}", other),
    }
}

#[test]
fn test_stride_labels() {
    let labels: Vec<String> = STANDARD_STRIDES.iter().map(|&s| probe::stride_label(s)).collect();
    assert_eq!(
        labels,
        [
            "Sequential",
            "Stride-2",
            "Stride-4",
            "Stride-8",
            "Stride-16",
            "Stride-64 (cache line)",
            "Stride-1024",
        ]
    );
}

// 64 MiB, larger than any last-level cache this is likely to run on.
const BIG: usize = 16 * 1024 * 1024;

#[test]
fn test_sequential_not_slower_than_large_stride() {
    let data = vec![1.0f32; BIG];
    let best = |stride: usize| {
        (0..3)
            .map(|_| probe::measure_covering(&data, stride, "cover").unwrap().elapsed)
            .min()
            .unwrap()
    };

    let sequential = best(1);
    let strided = best(1024);
    assert!(
        sequential <= strided,
        "sequential {:?} slower than stride-1024 {:?}",
        sequential,
        strided
    );
}

#[test]
fn test_sequential_cheaper_per_access() {
    let data = vec![1.0f32; BIG];
    let best = |stride: usize| {
        (0..3)
            .map(|_| {
                probe::measure(&data, stride, "pass")
                    .unwrap()
                    .nanos_per_access()
                    .unwrap()
            })
            .fold(f64::INFINITY, f64::min)
    };

    let sequential = best(1);
    let strided = best(1024);
    assert!(
        sequential <= strided,
        "sequential {:.2} ns/access vs stride-1024 {:.2} ns/access",
        sequential,
        strided
    );
}
