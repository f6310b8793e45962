// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inclusive axis-aligned boxes over lattice coords.

use crate::coord::Coord;

/// An axis-aligned box on the integer lattice, inclusive at both corners.
///
/// Containment is componentwise (`low[i] <= p[i] <= high[i]` for every
/// axis). Lexicographic coord ordering is deliberately not involved: a
/// point can sort between `low` and `high` while lying outside the box.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CoordBox<const D: usize> {
    /// Low corner (componentwise minimum), inclusive.
    pub low: Coord<D>,
    /// High corner (componentwise maximum), inclusive.
    pub high: Coord<D>,
}

impl<const D: usize> CoordBox<D> {
    /// Create a box from its inclusive corners.
    pub const fn new(low: Coord<D>, high: Coord<D>) -> Self {
        Self { low, high }
    }

    /// Whether the box contains the point, componentwise.
    pub fn contains(&self, p: Coord<D>) -> bool {
        self.low
            .as_array()
            .iter()
            .zip(self.high.as_array())
            .zip(p.as_array())
            .all(|((lo, hi), c)| lo <= c && c <= hi)
    }

    /// Whether the two boxes share at least one lattice point.
    pub fn intersects(&self, other: &Self) -> bool {
        self.low
            .as_array()
            .iter()
            .zip(self.high.as_array())
            .zip(other.low.as_array().iter().zip(other.high.as_array()))
            .all(|((a_lo, a_hi), (b_lo, b_hi))| a_lo <= b_hi && b_lo <= a_hi)
    }

    /// The smallest box containing both.
    pub fn union(&self, other: &Self) -> Self {
        let mut low_components = *self.low.as_array();
        let mut high_components = *self.high.as_array();
        for (i, (lo, hi)) in low_components
            .iter_mut()
            .zip(high_components.iter_mut())
            .enumerate()
        {
            *lo = (*lo).min(other.low.as_array()[i]);
            *hi = (*hi).max(other.high.as_array()[i]);
        }
        Self::new(Coord::from(low_components), Coord::from(high_components))
    }

    /// True if the box is inverted on any axis (contains no lattice point).
    pub fn is_empty(&self) -> bool {
        self.low
            .as_array()
            .iter()
            .zip(self.high.as_array())
            .any(|(lo, hi)| hi < lo)
    }

    /// Number of lattice points covered, widened so products cannot
    /// overflow for any representable box.
    pub fn volume(&self) -> i128 {
        if self.is_empty() {
            return 0;
        }
        self.low
            .as_array()
            .iter()
            .zip(self.high.as_array())
            .map(|(lo, hi)| i128::from(hi - lo) + 1)
            .product()
    }
}
