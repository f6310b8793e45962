// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use overstory_coord::Coord;
use overstory_forest::{Forest, Traversal};

fn build_forest(n: i64, levels: u32) -> Forest<2, f64> {
    let mut forest = Forest::new();
    forest
        .initialise(Coord::<2>::new(n, n), levels, 0.0)
        .expect("well-formed coarse lattice");
    forest
}

fn refine_all(forest: &mut Forest<2, f64>) {
    forest
        .refine(|f, id| {
            let _ = f.refine_node(id);
        })
        .expect("balanced between passes");
}

fn bench_refine_and_balance(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_refine_balance");
    for &n in &[8_i64, 16] {
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("refine_one_level_n{}", n), |b| {
            b.iter_batched(
                || build_forest(n, 3),
                |mut forest| {
                    refine_all(&mut forest);
                    black_box(forest.number_of_leaves());
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("refine_to_finest_n{}", n), |b| {
            b.iter_batched(
                || build_forest(n, 3),
                |mut forest| {
                    refine_all(&mut forest);
                    refine_all(&mut forest);
                    black_box(forest.number_of_leaves());
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("coarsen_from_finest_n{}", n), |b| {
            b.iter_batched(
                || {
                    let mut forest = build_forest(n, 3);
                    refine_all(&mut forest);
                    refine_all(&mut forest);
                    forest
                },
                |mut forest| {
                    forest.coarsen().expect("balanced");
                    forest.coarsen().expect("balanced");
                    black_box(forest.number_of_leaves());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_visitation(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_visitation");
    for &n in &[8_i64, 16] {
        let mut forest = build_forest(n, 3);
        refine_all(&mut forest);
        refine_all(&mut forest);
        let leaves = forest.number_of_leaves();
        group.throughput(Throughput::Elements(leaves as u64));

        group.bench_function(format!("bottom_up_n{}", n), |b| {
            b.iter(|| {
                let visited = forest
                    .leaves(Traversal::BottomUp)
                    .expect("balanced")
                    .count();
                black_box(visited);
            })
        });

        group.bench_function(format!("morton_n{}", n), |b| {
            b.iter(|| {
                let visited = forest.leaves(Traversal::Morton).expect("balanced").count();
                black_box(visited);
            })
        });

        group.bench_function(format!("balance_n{}", n), |b| {
            b.iter(|| {
                forest.balance();
                black_box(forest.number_of_leaves());
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_refine_and_balance, bench_visitation);
criterion_main!(benches);
