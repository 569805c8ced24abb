//! Device grid coordinates and the distance metrics used to judge how direct
//! a placed path is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A tile position on the device grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct GridCoord {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl GridCoord {
    /// Creates a coordinate.
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Returns the per-axis absolute differences `(dx, dy)`.
    pub fn delta(self, other: GridCoord) -> (u32, u32) {
        (self.x.abs_diff(other.x), self.y.abs_diff(other.y))
    }

    /// Returns the Manhattan (L1) distance to `other`.
    pub fn manhattan(self, other: GridCoord) -> u32 {
        let (dx, dy) = self.delta(other);
        dx + dy
    }

    /// Returns the Euclidean (L2) distance to `other`.
    pub fn euclidean(self, other: GridCoord) -> f64 {
        let (dx, dy) = self.delta(other);
        f64::from(dx).hypot(f64::from(dy))
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:2},{:2})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_is_symmetric() {
        let a = GridCoord::new(1, 7);
        let b = GridCoord::new(4, 3);
        assert_eq!(a.manhattan(b), 7);
        assert_eq!(b.manhattan(a), 7);
    }

    #[test]
    fn euclidean_345() {
        let a = GridCoord::new(0, 0);
        let b = GridCoord::new(3, 4);
        assert!((a.euclidean(b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn same_point_is_zero() {
        let a = GridCoord::new(5, 5);
        assert_eq!(a.manhattan(a), 0);
        assert_eq!(a.euclidean(a), 0.0);
    }

    #[test]
    fn display_pads_like_report_tables() {
        assert_eq!(GridCoord::new(4, 12).to_string(), "( 4,12)");
    }
}
