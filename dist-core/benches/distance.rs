//! Scalar vs. SIMD comparison across a few input shapes: one benchmark
//! group per shape, one named variant per code path, with a correctness
//! check before timing starts.

use criterion::{criterion_group, criterion_main, measurement::WallTime, BenchmarkGroup, Criterion};
use rand::{Rng, SeedableRng};

use dist_core::{distance, distance_scalar_only};

fn random_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen()).collect()
}

/// `edits` random single-byte substitutions scattered through a copy of `a`,
/// giving `b` a known rough edit distance without the two being identical or
/// fully random.
fn with_substitutions(a: &[u8], seed: u64, edits: usize) -> Vec<u8> {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
    let mut b = a.to_vec();
    for _ in 0..edits {
        if b.is_empty() {
            break;
        }
        let i = rng.gen_range(0..b.len());
        b[i] = b[i].wrapping_add(1);
    }
    b
}

fn bench_shape(c: &mut BenchmarkGroup<WallTime>, a: &[u8], b: &[u8]) {
    let d = distance(a, b);
    if d == 0 {
        return;
    }
    c.bench_function("simd", |bb| {
        bb.iter(|| {
            let got = distance(a, b);
            assert_eq!(got, d);
        })
    });
    c.bench_function("scalar", |bb| {
        bb.iter(|| {
            let got = distance_scalar_only(a, b);
            assert_eq!(got, d);
        })
    });
}

fn bench(c: &mut Criterion) {
    for len in [64usize, 256, 1024, 4096] {
        let mut group = c.benchmark_group(format!("len-{len}"));
        let a = random_bytes(1, len);
        let b = with_substitutions(&a, 2, len / 8);
        bench_shape(&mut group, &a, &b);
        group.finish();
    }

    // Nearly-identical inputs: heavy prefix/suffix trimming, tiny driver run.
    {
        let mut group = c.benchmark_group("near-identical-1024");
        let a = random_bytes(3, 1024);
        let b = with_substitutions(&a, 4, 2);
        bench_shape(&mut group, &a, &b);
        group.finish();
    }

    // Fully independent random sequences: no trimming, full-width driver run.
    {
        let mut group = c.benchmark_group("unrelated-1024");
        let a = random_bytes(5, 1024);
        let b = random_bytes(6, 1024);
        bench_shape(&mut group, &a, &b);
        group.finish();
    }
}

criterion_group!(benches, bench);
criterion_main!(benches);
