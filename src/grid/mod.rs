//! Rectangular spatial grid
//!
//! A grid is a non-overlapping tiling of axis-aligned rectangles. Cells are
//! named by position: a bijective base-26 row label (north to south) followed
//! by a 1-based column number (west to east), e.g. `A1`, `B3`, `AA2`.

pub mod builder;
pub mod index;

pub use builder::{simplify, GridBuilder, GridDefinition};
pub use index::GridIndex;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A location in planar coordinates (longitude/latitude treated as plain reals)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned rectangle with `x1 <= x2` and `y1 <= y2`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
}

impl BoundingBox {
    /// Primary membership test: `x1 < x <= x2` and `y1 <= y < y2`
    pub fn contains(&self, p: Point) -> bool {
        self.x1 < p.x && p.x <= self.x2 && self.y1 <= p.y && p.y < self.y2
    }

    /// Membership with the lower x bound closed, used for the grid's west edge
    pub fn contains_on_west_edge(&self, p: Point) -> bool {
        self.x1 <= p.x && p.x <= self.x2 && self.y1 <= p.y && p.y < self.y2
    }
}

/// One named rectangle of the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub id: String,
    pub bounds: BoundingBox,
}

/// Bijective base-26 row label: 1 -> "A", 26 -> "Z", 27 -> "AA", 52 -> "AZ"
///
/// There is no zero digit, so `index` must be at least 1; zero yields an
/// empty label.
pub fn row_label(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Cell name for a 1-based row and column
pub fn cell_name(row: usize, column: usize) -> String {
    format!("{}{}", row_label(row), column)
}
