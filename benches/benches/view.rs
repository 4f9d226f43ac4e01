// Copyright 2026 the Meridian Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size};
use meridian_geom::Extent;
use meridian_view::{TileGrid, ViewBuilder, linear_find_nearest};

fn bench_zoom(c: &mut Criterion) {
    let mut group = c.benchmark_group("view/zoom");

    for levels in [8_u32, 20, 28] {
        let ladder: Vec<f64> = (0..=levels).map(|z| 1.0 / f64::from(1_u32 << z)).collect();
        let mut view = ViewBuilder::new()
            .resolutions(ladder.clone())
            .viewport_size(Size::new(1024.0, 768.0))
            .build()
            .unwrap();

        group.bench_with_input(BenchmarkId::new("set_zoom+zoom", levels), &levels, |b, &levels| {
            let mut z = 0;
            b.iter(|| {
                view.set_zoom(f64::from(z));
                z = (z + 1) % levels;
                black_box(view.zoom())
            });
        });

        group.bench_with_input(BenchmarkId::new("linear_find_nearest", levels), &ladder, |b, ladder| {
            b.iter(|| black_box(linear_find_nearest(ladder, black_box(0.0003), 0)));
        });
    }
    group.finish();
}

fn bench_interaction(c: &mut Criterion) {
    let mut view = ViewBuilder::new()
        .extent(Extent::new(0.0, 0.0, 100_000.0, 50_000.0))
        .canvas_size(Size::new(1920.0, 1080.0))
        .build()
        .unwrap();
    let anchor = Point::new(31_000.0, 12_500.0);

    c.bench_function("view/zoom_by_anchor", |b| {
        let mut factor = 0.5;
        b.iter(|| {
            view.zoom_by(factor, Some(anchor));
            factor = 1.0 / factor;
            black_box(view.state())
        });
    });
}

fn bench_tile_range(c: &mut Criterion) {
    let world = Extent::new(0.0, 0.0, 100_000.0, 50_000.0);
    let grid = TileGrid::for_extent(&world, 18, Size::new(256.0, 256.0)).unwrap();
    let view = ViewBuilder::new()
        .extent(world)
        .canvas_size(Size::new(1920.0, 1080.0))
        .zoom(6.0)
        .build()
        .unwrap();

    c.bench_function("tile_grid/visible_tiles", |b| {
        b.iter(|| {
            let range =
                grid.tile_range_for_extent_and_resolution(&view.extent(), view.resolution());
            let z = grid.z_for_resolution(view.resolution(), 0);
            black_box(range.iter(z).count())
        });
    });
}

criterion_group!(benches, bench_zoom, bench_interaction, bench_tile_range);
criterion_main!(benches);
