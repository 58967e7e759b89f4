//! Benchmarks for baking polygons into signed distance grids.
//!
//! Run with: `cargo bench --bench sdf_build`

use boidfield::{SdfGrid, Vec2};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::f32::consts::TAU;

fn ring(vertices: usize, radius: f32, center: Vec2) -> Vec<Vec2> {
    (0..vertices)
        .map(|i| {
            let a = i as f32 / vertices as f32 * TAU;
            center + radius * Vec2::new(a.cos(), a.sin())
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("sdf_build");

    for vertices in [4, 16, 64] {
        let polygon = ring(vertices, 100.0, Vec2::splat(128.0));
        group.bench_with_input(BenchmarkId::new("vertices", vertices), &polygon, |b, polygon| {
            b.iter(|| black_box(SdfGrid::build(polygon, 256, 256).unwrap()))
        });
    }

    group.finish();
}

fn bench_sample(c: &mut Criterion) {
    let sdf = SdfGrid::build(&ring(32, 100.0, Vec2::splat(128.0)), 256, 256).unwrap();
    let points: Vec<Vec2> = (0..1024)
        .map(|i| Vec2::new((i * 7 % 300) as f32 - 20.0, (i * 13 % 300) as f32 - 20.0))
        .collect();

    c.bench_function("sample_1024", |b| {
        b.iter(|| {
            for &p in &points {
                black_box(sdf.sample(p));
            }
        })
    });
}

criterion_group!(benches, bench_build, bench_sample);
criterion_main!(benches);
