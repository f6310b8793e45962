// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=overstory_forest --heading-base-level=0

//! Overstory Forest: an adaptive hierarchical grid over the integer lattice.
//!
//! Overstory Forest is a reusable building block for adaptive-mesh
//! applications: cell-centred simulation state, level-of-detail sampling,
//! spatial indexing.
//!
//! - A [`Forest`] owns a coarse lattice of root tiles, each a complete
//!   `2^D`-ary tree; leaves carry payload values of a caller-supplied type.
//! - Leaves [`refine`](Forest::refine_node) into `2^D` children and
//!   parents-of-leaves [`coarsen`](Forest::coarsen_node) back into a single
//!   leaf carrying the average child value.
//! - Visitation is linearised: [`balance`](Forest::balance) rebuilds
//!   per-level and Z-order leaf indices so bulk passes iterate flat lists
//!   instead of chasing the tree.
//! - [`Forest::node_at_coord`] descends to the deepest node containing a
//!   lattice point.
//!
//! Dimension `D ∈ {1, 2, 3}` and the payload type are compile-time
//! parameters. The payload only needs the small arithmetic surface of
//! [`CellValue`] (zero, accumulate, fractional scale), which coarsening
//! uses to average children.
//!
//! The forest is single-threaded and synchronous: every operation
//! completes before returning, and all mutation goes through `&mut self`.
//! Traversal order is deterministic — the same mutations in the same order
//! produce identical traversals.
//!
//! # Example
//!
//! ```rust
//! use overstory_coord::Coord;
//! use overstory_forest::{Forest, Traversal};
//!
//! // A 2x2 lattice of quadtree tiles, three levels deep.
//! let mut forest: Forest<2, f64> = Forest::new();
//! forest.initialise(Coord::<2>::new(2, 2), 3, 0.0)?;
//! assert_eq!(forest.number_of_leaves(), 4);
//!
//! // Drill down to the finest cell at the origin, then relinearise.
//! forest.refine_to_lowest_level_at_coord(Coord::<2>::new(0, 0), |f, id| {
//!     let _ = f.refine_node(id);
//! });
//! forest.balance();
//!
//! let finest = forest.node_at_coord(Coord::<2>::new(0, 0)).unwrap();
//! assert_eq!(forest.node(finest).unwrap().level(), 0);
//!
//! // Visit leaves along the Z-order curve.
//! for id in forest.leaves(Traversal::Morton)? {
//!     let _ = forest.node(id).unwrap().bbox();
//! }
//! # Ok::<(), overstory_forest::ForestError>(())
//! ```
//!
//! Logging goes through the [`log`] facade; install whatever sink your
//! application uses to see `info!`/`debug!` summaries of initialisation
//! and linearisation.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod forest;
pub mod node;
pub mod types;

pub use forest::Forest;
pub use node::NodeRef;
pub use types::{CellValue, ForestError, NodeId, Traversal};
