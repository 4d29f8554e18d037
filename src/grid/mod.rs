//! # Grid Module
//!
//! Integer cell coordinates and route finding over a bounded 2D grid.
//!
//! The grid is 8-connected and obstacle free. Its bounds are inclusive on both
//! ends, so a grid constructed with width `w` accepts x coordinates `0..=w`.

pub mod finder;

pub use finder::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell location on the search grid.
///
/// # Examples
///
/// ```
/// use tilewalk::GridCoordinate;
///
/// let cell = GridCoordinate::new(10, 5);
/// assert_eq!(cell.x, 10);
/// assert_eq!(cell.y, 5);
///
/// let neighbors = cell.adjacent_coordinates();
/// assert_eq!(neighbors.len(), 8); // All 8 surrounding cells
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoordinate {
    pub x: i32,
    pub y: i32,
}

impl GridCoordinate {
    /// Creates a new coordinate.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the origin cell (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Calculates the straight-line distance to another cell.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilewalk::GridCoordinate;
    ///
    /// let a = GridCoordinate::new(0, 0);
    /// let b = GridCoordinate::new(3, 4);
    /// assert_eq!(a.euclidean_distance(b), 5.0);
    /// ```
    pub fn euclidean_distance(self, other: GridCoordinate) -> f64 {
        let (dx, dy) = self.delta(other);
        let (dx, dy) = (dx as f64, dy as f64);
        (dx * dx + dy * dy).sqrt()
    }

    /// Chebyshev distance, the number of 8-connected steps between two cells.
    pub fn chebyshev_distance(self, other: GridCoordinate) -> u32 {
        let (dx, dy) = self.delta(other);
        let steps = dx.unsigned_abs().max(dy.unsigned_abs());
        u32::try_from(steps).unwrap_or(u32::MAX)
    }

    /// Whether `other` is one of the 8 cells surrounding this one.
    pub fn is_adjacent(self, other: GridCoordinate) -> bool {
        self != other && self.chebyshev_distance(other) == 1
    }

    /// Returns the adjacent cells (including diagonals).
    ///
    /// Interior cells have 8 neighbors; cells on the edge of the `i32` range
    /// have fewer.
    pub fn adjacent_coordinates(self) -> Vec<GridCoordinate> {
        const OFFSETS: [(i32, i32); 8] = [
            (-1, -1), // NW
            (0, -1),  // N
            (1, -1),  // NE
            (-1, 0),  // W
            (1, 0),   // E
            (-1, 1),  // SW
            (0, 1),   // S
            (1, 1),   // SE
        ];

        OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| {
                Some(GridCoordinate::new(
                    self.x.checked_add(dx)?,
                    self.y.checked_add(dy)?,
                ))
            })
            .collect()
    }

    /// Component-wise difference, widened so it cannot overflow.
    fn delta(self, other: GridCoordinate) -> (i64, i64) {
        (
            i64::from(self.x) - i64::from(other.x),
            i64::from(self.y) - i64::from(other.y),
        )
    }
}

impl From<(i32, i32)> for GridCoordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

impl std::ops::Add for GridCoordinate {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for GridCoordinate {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}
