// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forest basics.
//!
//! Build a small quadtree forest, drill down to the finest cell at a
//! coordinate, and coarsen back to the coarse lattice.
//!
//! Run:
//! - `cargo run -p overstory_examples --example forest_basics`

use overstory_coord::Coord;
use overstory_forest::{Forest, Traversal};

fn main() {
    // A 2x2 lattice of quadtree tiles, three levels deep.
    let mut forest: Forest<2, f64> = Forest::new();
    forest
        .initialise(Coord::<2>::new(2, 2), 3, 0.0)
        .expect("well-formed coarse lattice");
    println!("coarse lattice: {} leaves", forest.number_of_leaves());

    // Where does a lattice point land?
    let probe = Coord::<2>::new(5, 6);
    let hit = forest.node_at_coord(probe).expect("probe is inside the domain");
    let node = forest.node(hit).expect("fresh handle");
    println!("{probe} lands in tile {} at level {}", node.coord(), node.level());

    // Refine down to the finest level at the probe, then relinearise.
    forest.refine_to_lowest_level_at_coord(probe, |f, id| {
        let _ = f.refine_node(id);
    });
    forest.balance();
    println!("after refinement: {} leaves", forest.number_of_leaves());

    let hit = forest.node_at_coord(probe).expect("probe is inside the domain");
    let node = forest.node(hit).expect("fresh handle");
    assert_eq!(node.level(), 0, "the probe cell is now at the finest level");
    assert_eq!(node.coord(), probe);

    // Leaf payloads are averaged back together on coarsening.
    let leaves: Vec<_> = forest
        .leaves(Traversal::BottomUp)
        .expect("just balanced")
        .collect();
    for id in leaves {
        *forest.value_mut(id).expect("leaves carry values") = 2.0;
    }
    loop {
        let before = forest.number_of_leaves();
        forest.coarsen().expect("balanced between passes");
        if forest.number_of_leaves() == before {
            break;
        }
    }
    println!("after coarsening: {} leaves", forest.number_of_leaves());

    assert_eq!(forest.number_of_leaves(), 4);
    let root = forest.node_at_coord(probe).expect("probe is inside the domain");
    assert_eq!(*forest.value(root).expect("coarse tiles are leaves"), 2.0);
}
