// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use overstory_coord::Coord;
use overstory_forest::{Forest, Traversal};

use rstar::RTree;
use rstar::primitives::Rectangle;

fn build_refined_forest(n: i64) -> Forest<2, f64> {
    let mut forest: Forest<2, f64> = Forest::new();
    forest
        .initialise(Coord::<2>::new(n, n), 3, 0.0)
        .expect("well-formed coarse lattice");
    // Refine the diagonal tiles to the finest level so lookups cross a mix
    // of depths.
    for i in 0..n {
        forest.refine_to_lowest_level_at_coord(Coord::<2>::new(i * 4, i * 4), |f, id| {
            let _ = f.refine_node(id);
        });
    }
    forest.balance();
    forest
}

fn leaf_rectangles(forest: &Forest<2, f64>) -> Vec<Rectangle<[f64; 2]>> {
    forest
        .leaves(Traversal::Morton)
        .expect("balanced")
        .map(|id| {
            let bbox = forest.node(id).expect("fresh handle").bbox();
            Rectangle::from_corners(
                [bbox.low.x() as f64, bbox.low.y() as f64],
                [bbox.high.x() as f64 + 1.0, bbox.high.y() as f64 + 1.0],
            )
        })
        .collect()
}

fn probe_coords(n: i64) -> Vec<Coord<2>> {
    let extent = n * 4;
    let mut out = Vec::new();
    for y in (0..extent).step_by(3) {
        for x in (0..extent).step_by(3) {
            out.push(Coord::<2>::new(x, y));
        }
    }
    out
}

fn bench_point_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("point_lookup_compare_rstar");
    for &n in &[8_i64, 16] {
        let forest = build_refined_forest(n);
        let probes = probe_coords(n);
        group.throughput(Throughput::Elements(probes.len() as u64));

        group.bench_function(format!("forest_descent_n{}", n), |b| {
            b.iter(|| {
                let mut hits = 0_usize;
                for &coord in &probes {
                    hits += usize::from(forest.node_at_coord(coord).is_some());
                }
                black_box(hits);
            })
        });

        group.bench_function(format!("rstar_build_query_n{}", n), |b| {
            b.iter_batched(
                || leaf_rectangles(&forest),
                |rectangles| {
                    let tree = RTree::bulk_load(rectangles);
                    let mut hits = 0_usize;
                    for &coord in &probes {
                        let point = [coord.x() as f64 + 0.5, coord.y() as f64 + 0.5];
                        hits += tree.locate_all_at_point(&point).count();
                    }
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_query_only_n{}", n), |b| {
            let tree = RTree::bulk_load(leaf_rectangles(&forest));
            b.iter(|| {
                let mut hits = 0_usize;
                for &coord in &probes {
                    let point = [coord.x() as f64 + 0.5, coord.y() as f64 + 0.5];
                    hits += tree.locate_all_at_point(&point).count();
                }
                black_box(hits);
            })
        });

        // Sanity: both structures agree that every probe hits exactly once.
        let tree = RTree::bulk_load(leaf_rectangles(&forest));
        for &coord in &probes {
            let point = [coord.x() as f64 + 0.5, coord.y() as f64 + 0.5];
            assert_eq!(tree.locate_all_at_point(&point).count(), 1);
            assert!(forest.node_at_coord(coord).is_some());
        }
    }
    group.finish();
}

criterion_group!(benches, bench_point_lookup);
criterion_main!(benches);
