// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lattice coordinates: construction, component access, offsets, ordering.

use core::fmt;

use thiserror::Error;

/// Error returned by bounds-checked component access on a coord.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
#[error("component index {index} is out of range for dimension {dim}")]
pub struct DimensionError {
    /// The requested component index.
    pub index: usize,
    /// The dimension of the coord that rejected it.
    pub dim: usize,
}

/// A point on the signed integer lattice in `D` dimensions.
///
/// Ordering is conventional lexicographic: the first differing component
/// decides, starting from component 0. This is a total order on coords of
/// the same dimension and is what keeps root-map iteration deterministic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord<const D: usize>([i64; D]);

impl<const D: usize> Default for Coord<D> {
    fn default() -> Self {
        Self([0; D])
    }
}

impl<const D: usize> Coord<D> {
    /// The compile-time dimension.
    pub const DIM: usize = D;

    /// A coord with every component set to `value`.
    pub const fn splat(value: i64) -> Self {
        Self([value; D])
    }

    /// Bounds-checked component read.
    pub fn get(&self, index: usize) -> Result<i64, DimensionError> {
        self.0
            .get(index)
            .copied()
            .ok_or(DimensionError { index, dim: D })
    }

    /// Bounds-checked component write.
    pub fn set(&mut self, index: usize, value: i64) -> Result<(), DimensionError> {
        match self.0.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(DimensionError { index, dim: D }),
        }
    }

    /// A new coord with `offset` added to every component.
    pub fn offset_by(&self, offset: i64) -> Self {
        let mut out = *self;
        for component in &mut out.0 {
            *component += offset;
        }
        out
    }

    /// A new coord with a per-axis offset added.
    pub fn offset_by_axes(&self, offsets: [i64; D]) -> Self {
        let mut out = *self;
        for (component, offset) in out.0.iter_mut().zip(offsets) {
            *component += offset;
        }
        out
    }

    /// The backing component array.
    pub const fn as_array(&self) -> &[i64; D] {
        &self.0
    }
}

impl<const D: usize> From<[i64; D]> for Coord<D> {
    fn from(components: [i64; D]) -> Self {
        Self(components)
    }
}

impl Coord<1> {
    /// A 1D coord.
    pub const fn new(x: i64) -> Self {
        Self([x])
    }

    /// The x component.
    pub const fn x(&self) -> i64 {
        self.0[0]
    }
}

impl Coord<2> {
    /// A 2D coord.
    pub const fn new(x: i64, y: i64) -> Self {
        Self([x, y])
    }

    /// The x component.
    pub const fn x(&self) -> i64 {
        self.0[0]
    }

    /// The y component.
    pub const fn y(&self) -> i64 {
        self.0[1]
    }
}

impl Coord<3> {
    /// A 3D coord.
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self([x, y, z])
    }

    /// The x component.
    pub const fn x(&self) -> i64 {
        self.0[0]
    }

    /// The y component.
    pub const fn y(&self) -> i64 {
        self.0[1]
    }

    /// The z component.
    pub const fn z(&self) -> i64 {
        self.0[2]
    }
}

impl<const D: usize> fmt::Display for Coord<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, component) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{component}")?;
        }
        write!(f, ")")
    }
}
