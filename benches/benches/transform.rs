// Copyright 2026 the Meridian Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size};
use meridian_geom::{Coords, Extent, Precision, Transform, transform_2d};
use meridian_view::ViewBuilder;

fn polyline(len: usize) -> Coords {
    Coords::Path(
        (0..len)
            .map(|i| {
                let t = i as f64;
                Point::new(t, (t * 0.1).sin() * 100.0)
            })
            .collect(),
    )
}

fn bench_transform_2d(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform_2d");
    let placement = Transform::compose(10.0, 20.0, 2.0, 2.0, 30.0, -5.0, 5.0);
    let view = ViewBuilder::new()
        .extent(Extent::new(0.0, -100.0, 10_000.0, 100.0))
        .canvas_size(Size::new(1920.0, 1080.0))
        .build()
        .unwrap();
    let ratio = view.ratio();

    for len in [64_usize, 1_024, 16_384] {
        let coords = polyline(len);
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("affine", len), &coords, |b, coords| {
            b.iter(|| black_box(transform_2d(&placement, coords, Precision::Exact)));
        });

        group.bench_with_input(BenchmarkId::new("affine_rounded", len), &coords, |b, coords| {
            b.iter(|| black_box(transform_2d(&placement, coords, Precision::High)));
        });

        group.bench_with_input(BenchmarkId::new("to_pix", len), &coords, |b, coords| {
            b.iter(|| black_box(ratio.to_pix(coords)));
        });
    }
    group.finish();
}

fn bench_compose(c: &mut Criterion) {
    c.bench_function("transform/compose_vs_chain/compose", |b| {
        b.iter(|| {
            black_box(Transform::compose(
                black_box(10.0),
                20.0,
                2.0,
                3.0,
                black_box(45.0),
                -1.0,
                1.0,
            ))
        });
    });
    c.bench_function("transform/compose_vs_chain/chain", |b| {
        b.iter(|| {
            black_box(
                Transform::IDENTITY
                    .translate(black_box(10.0), 20.0)
                    .scale(2.0, 3.0)
                    .rotate(black_box(45.0))
                    .translate(-1.0, 1.0),
            )
        });
    });
}

criterion_group!(benches, bench_transform_2d, bench_compose);
criterion_main!(benches);
