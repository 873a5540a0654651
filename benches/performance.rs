// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Performance benchmarks

use backplate::geometry::{delaunay, Footprint, Primitive};
use backplate::modify::{
    add_annular_recess, apply_modifications, fill_planar_gap, Modifications, RingSpec,
};
use backplate::repair::{repair, repair_with_normals};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::Point2;

fn bench_triangulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("delaunay");

    for side in [10usize, 20, 40] {
        let points: Vec<Point2<f64>> = (0..side)
            .flat_map(|j| (0..side).map(move |i| Point2::new(i as f64 * 2.0, j as f64 * 2.0)))
            .collect();
        group.bench_with_input(BenchmarkId::new("grid", side * side), &points, |b, points| {
            b.iter(|| delaunay::triangulate(black_box(points)).unwrap());
        });
    }

    group.finish();
}

fn bench_gap_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("gap_fill");

    let window = Footprint::new(20.0, 60.0, 20.0, 60.0);
    let case = Primitive::slab_with_window(80.0, 80.0, 6.0, 2.0, window).to_mesh();
    group.bench_function("window_80mm", |b| {
        b.iter(|| fill_planar_gap(black_box(case.clone()), Some(window)).unwrap());
    });

    group.finish();
}

fn bench_recess(c: &mut Criterion) {
    let mut group = c.benchmark_group("recess");

    let ring = RingSpec::default();
    for spacing in [4.0, 2.0] {
        let plate = Primitive::slab(100.0, 100.0, 5.0, spacing).to_mesh();
        group.bench_with_input(
            BenchmarkId::new("slab_100mm", spacing),
            &plate,
            |b, plate| {
                b.iter(|| add_annular_recess(black_box(plate.clone()), &ring).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_repair(c: &mut Criterion) {
    let mut group = c.benchmark_group("repair");

    let slab = Primitive::slab(100.0, 100.0, 5.0, 2.0).to_mesh();
    let mut doubled = slab.clone();
    doubled.merge(&slab);

    group.bench_function("standard", |b| {
        b.iter(|| repair(black_box(doubled.clone())).unwrap());
    });
    group.bench_function("with_normals", |b| {
        b.iter(|| repair_with_normals(black_box(doubled.clone())).unwrap());
    });

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(20);

    let window = Footprint::new(30.0, 70.0, 40.0, 80.0);
    let case = Primitive::slab_with_window(100.0, 120.0, 8.0, 2.0, window).to_mesh();
    let ring = RingSpec::default();
    group.bench_function("all_modifications", |b| {
        b.iter(|| {
            apply_modifications(black_box(case.clone()), Modifications::all(), Some(&ring))
                .unwrap()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_triangulate,
    bench_gap_fill,
    bench_recess,
    bench_repair,
    bench_pipeline
);
criterion_main!(benches);
