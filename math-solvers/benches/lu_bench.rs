use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use math_numerics_solvers::{FactorizationCache, LuConfig, SystemMatrix, lu_factorize};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform random entries; pivoting is exercised on every step
fn random_matrix(n: usize, rng: &mut StdRng) -> Array2<f64> {
    Array2::from_shape_fn((n, n), |_| rng.random_range(-1.0..1.0))
}

fn bench_factorize(c: &mut Criterion) {
    let mut group = c.benchmark_group("lu_factorize");
    let mut rng = StdRng::seed_from_u64(1);
    let config = LuConfig::default();

    for n in [16, 64, 128] {
        let a = random_matrix(n, &mut rng);
        group.bench_with_input(BenchmarkId::from_parameter(n), &a, |b, a| {
            b.iter(|| black_box(lu_factorize(black_box(a), &config).unwrap()))
        });
    }
    group.finish();
}

fn bench_cached_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_solve");
    let mut rng = StdRng::seed_from_u64(2);

    for n in [16, 64, 128] {
        let a = SystemMatrix::new(random_matrix(n, &mut rng)).unwrap();
        let rhs = Array1::from_shape_fn(n, |_| rng.random_range(-1.0..1.0));
        let mut cache = FactorizationCache::new();
        let mut x = Array1::zeros(n);
        // warm the cache so the loop measures substitution only
        cache.solve(&a, &mut x, &rhs).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(n), &rhs, |b, rhs| {
            b.iter(|| {
                cache.solve(&a, &mut x, black_box(rhs)).unwrap();
                black_box(&x);
            })
        });
    }
    group.finish();
}

fn bench_refactor(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let a = SystemMatrix::new(random_matrix(64, &mut rng)).unwrap();
    let mut cache = FactorizationCache::new();
    cache.factor(&a).unwrap();

    c.bench_function("invalidate_and_refactor_64", |b| {
        b.iter(|| black_box(cache.invalidate_and_refactor(&a).unwrap()))
    });
}

criterion_group!(benches, bench_factorize, bench_cached_solve, bench_refactor);
criterion_main!(benches);
