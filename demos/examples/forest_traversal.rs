// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linearised traversal orders.
//!
//! Refine a corner of a quadtree forest and print the leaves in level
//! order and in Z-order to show how the two linearisations differ.
//!
//! Run:
//! - `cargo run -p overstory_examples --example forest_traversal`

use overstory_coord::Coord;
use overstory_forest::{Forest, Traversal};

fn main() {
    let mut forest: Forest<2, f64> = Forest::new();
    forest
        .initialise(Coord::<2>::new(2, 2), 3, 0.0)
        .expect("well-formed coarse lattice");

    // Refine the south-west tile all the way down at the origin.
    forest.refine_to_lowest_level_at_coord(Coord::<2>::new(0, 0), |f, id| {
        let _ = f.refine_node(id);
    });
    forest.balance();

    println!("bottom-up (finest level first):");
    for id in forest.leaves(Traversal::BottomUp).expect("just balanced") {
        let node = forest.node(id).expect("fresh handle");
        println!("  level {} at {}", node.level(), node.coord());
    }

    println!("morton (Z-order, level-agnostic):");
    let mut previous_key = None;
    for id in forest.leaves(Traversal::Morton).expect("just balanced") {
        let node = forest.node(id).expect("fresh handle");
        let key = node.coord().morton_key();
        println!("  {:>3} -> level {} at {}", key & 0xff, node.level(), node.coord());
        assert!(previous_key <= Some(key), "Z-order keys are non-decreasing");
        previous_key = Some(key);
    }
}
