use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use semiring_kernels::kernels::SimdLevel;
use semiring_kernels::{AlignedBuffer, KernelConfig, SENTINEL, apsp_with, matmul_with};
use std::hint::black_box;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn random_operand(rng: &mut StdRng, len: usize) -> AlignedBuffer<i32> {
    let data: Vec<i32> = (0..len).map(|_| rng.gen_range(-100..100)).collect();
    AlignedBuffer::from_slice(&data).unwrap()
}

fn random_graph(rng: &mut StdRng, n: usize) -> AlignedBuffer<i32> {
    let mut d = AlignedBuffer::filled(n * n, SENTINEL).unwrap();
    for i in 0..n {
        d[i * n + i] = 0;
        for j in i + 1..n {
            let w = rng.gen_range(1..=100);
            d[i * n + j] = w;
            d[j * n + i] = w;
        }
    }
    d
}

fn levels() -> Vec<SimdLevel> {
    let mut levels = vec![SimdLevel::Scalar, SimdLevel::Lanes];
    if SimdLevel::detect() == SimdLevel::Avx2 {
        levels.push(SimdLevel::Avx2);
    }
    levels
}

// ---------------------------------------------------------------------------
// Matrix multiply
// ---------------------------------------------------------------------------

fn bench_matmul(c: &mut Criterion) {
    let mut group = c.benchmark_group("matmul");
    group.sample_size(10);
    let mut rng = StdRng::seed_from_u64(1);

    // 255 and 999 exercise the scalar tail.
    for size in [256, 255, 512, 999] {
        let a = random_operand(&mut rng, size * size);
        let b = random_operand(&mut rng, size * size);
        let mut res = AlignedBuffer::zeroed(size * size).unwrap();

        for level in levels() {
            let config = KernelConfig::default().with_simd(level);
            group.bench_with_input(
                BenchmarkId::new(level.to_string(), size),
                &size,
                |bench, &size| {
                    bench.iter(|| {
                        matmul_with(&a, &b, &mut res, size, size, size, &config).unwrap();
                        black_box(&res);
                    })
                },
            );
        }
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// All-pairs shortest paths
// ---------------------------------------------------------------------------

fn bench_apsp(c: &mut Criterion) {
    let mut group = c.benchmark_group("apsp");
    group.sample_size(10);
    let mut rng = StdRng::seed_from_u64(8);

    for n in [256, 257, 512] {
        let d = random_graph(&mut rng, n);
        let mut r = AlignedBuffer::zeroed(n * n).unwrap();

        for level in levels() {
            let config = KernelConfig::default().with_simd(level);
            group.bench_with_input(BenchmarkId::new(level.to_string(), n), &n, |bench, &n| {
                bench.iter(|| {
                    apsp_with(&mut r, &d, n, &config).unwrap();
                    black_box(&r);
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_matmul, bench_apsp);
criterion_main!(benches);
