// Throughput of the neighbor scan and the full recommend path
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use knnrec_core::{classify, find_k_neighbors, recommend, RatingMatrix, RatingVector};
use rand::prelude::*;

fn generate_ratings(rng: &mut impl Rng, items: usize, density: f64) -> Vec<f64> {
    (0..items)
        .map(|_| {
            if rng.random_bool(density) {
                rng.random_range(1..=5) as f64
            } else {
                0.0
            }
        })
        .collect()
}

fn generate_matrix(users: usize, items: usize) -> RatingMatrix {
    let mut rng = StdRng::seed_from_u64(42);
    let labels = (0..items).map(|i| format!("item_{}", i)).collect();
    let rows = (0..users)
        .map(|_| generate_ratings(&mut rng, items, 0.1))
        .collect();
    RatingMatrix::new(labels, rows).unwrap()
}

fn benchmark_neighbors(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_k_neighbors");

    for users in [1_000, 10_000].iter() {
        let matrix = generate_matrix(*users, 500);
        let mut rng = StdRng::seed_from_u64(7);
        let candidate = RatingVector::new(generate_ratings(&mut rng, 500, 0.05));

        group.bench_with_input(BenchmarkId::new("users", users), users, |b, _| {
            b.iter(|| find_k_neighbors(black_box(&candidate), &matrix, 10).unwrap());
        });
    }

    group.finish();
}

fn benchmark_recommend(c: &mut Criterion) {
    let matrix = generate_matrix(5_000, 500);
    let mut rng = StdRng::seed_from_u64(7);
    let candidate = RatingVector::new(generate_ratings(&mut rng, 500, 0.05));

    c.bench_function("classify_k10", |b| {
        b.iter(|| classify(black_box(&candidate), &matrix, 10).unwrap());
    });

    c.bench_function("recommend_k10_n10", |b| {
        b.iter(|| recommend(black_box(&candidate), &matrix, 10, 10).unwrap());
    });
}

criterion_group!(benches, benchmark_neighbors, benchmark_recommend);
criterion_main!(benches);
