// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=overstory_coord --heading-base-level=0

//! Overstory Coord: integer lattice primitives for adaptive grids.
//!
//! Overstory Coord is the leaf crate of the Overstory workspace. It defines
//! the coordinate types the forest is addressed with and nothing else.
//!
//! - [`Coord`]: a point on the signed integer lattice in `D` dimensions,
//!   with bounds-checked component access and lexicographic ordering.
//! - [`CoordBox`]: an inclusive axis-aligned box over [`Coord`], with
//!   componentwise containment.
//! - [`morton`]: Z-order (Morton) keys for locality-preserving linear
//!   traversal of coords.
//! - [`WorldPoint`]: the floating-point twin of [`Coord`] for mapping cells
//!   into world space.
//!
//! Dimension is a compile-time parameter, `D ∈ {1, 2, 3}`. Component
//! accessors (`x()`, `y()`, `z()`) exist only on the dimensions that have
//! them; indexed access is fallible and returns [`DimensionError`] out of
//! range.
//!
//! # Example
//!
//! ```rust
//! use overstory_coord::{Coord, CoordBox};
//!
//! let low = Coord::<2>::new(0, 0);
//! let high = Coord::<2>::new(3, 3);
//! let cell = CoordBox::new(low, high);
//!
//! assert!(cell.contains(Coord::<2>::new(2, 1)));
//! assert!(!cell.contains(Coord::<2>::new(2, 4)));
//!
//! // Containment is componentwise, not lexicographic: (2, 4) sorts below
//! // (3, 3) but lies outside the box.
//! assert!(Coord::<2>::new(2, 4) < high);
//! ```
//!
//! This crate is `no_std` and does not allocate.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod bbox;
pub mod coord;
pub mod morton;
pub mod world;

pub use bbox::CoordBox;
pub use coord::{Coord, DimensionError};
pub use world::WorldPoint;
