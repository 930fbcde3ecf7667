//! Benchmarks for triangulation and clustering

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use delinea_algorithms::clustering::{GraphClusterer, ThresholdPolicy};
use delinea_algorithms::triangulation::triangulate;
use delinea_core::{GeometryContext, Point2D};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform random points in a 10 km square
fn create_points(count: usize) -> Vec<Point2D> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|_| Point2D::new(rng.random_range(0.0..10_000.0), rng.random_range(0.0..10_000.0)))
        .collect()
}

fn bench_triangulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("triangulation/bowyer_watson");
    let ctx = GeometryContext::default();
    for count in [100, 500, 1000, 2000] {
        let points = create_points(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| triangulate(black_box(&points), &ctx).unwrap())
        });
    }
    group.finish();
}

fn bench_cluster_fixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("clustering/fixed");
    let clusterer = GraphClusterer::new(ThresholdPolicy::fixed(250.0));
    for count in [100, 500, 1000, 2000] {
        let points = create_points(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| clusterer.cluster_points(black_box(&points)).unwrap())
        });
    }
    group.finish();
}

fn bench_cluster_stddev(c: &mut Criterion) {
    let mut group = c.benchmark_group("clustering/stddev");
    let clusterer = GraphClusterer::new(ThresholdPolicy::std_dev(1.0));
    for count in [100, 500, 1000, 2000] {
        let points = create_points(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| clusterer.cluster_points(black_box(&points)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_triangulate,
    bench_cluster_fixed,
    bench_cluster_stddev,
);
criterion_main!(benches);
