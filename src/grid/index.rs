//! Point classification against a built grid

use super::{BoundingBox, Cell, Point};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Immutable, insertion-ordered mapping from cell id to bounding box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridIndex {
    cells: Vec<Cell>,
    /// Smallest `x1` over all cells: the grid's west edge
    min_x1: f64,
}

impl GridIndex {
    pub(crate) fn new(cells: Vec<Cell>) -> Self {
        let min_x1 = cells
            .iter()
            .map(|c| c.bounds.x1)
            .fold(f64::INFINITY, f64::min);
        Self { cells, min_x1 }
    }

    /// Resolve the cell owning `point`
    ///
    /// Cells are tested in stored order with `x1 < x <= x2` and
    /// `y1 <= y < y2`; the first match wins. A point lying exactly on the
    /// west edge of the grid is otherwise unreachable, so when nothing
    /// matched and `x` equals the smallest `x1`, cells are re-scanned with the
    /// lower x bound closed.
    pub fn locate(&self, point: Point) -> Option<&str> {
        if let Some(cell) = self.cells.iter().find(|c| c.bounds.contains(point)) {
            return Some(&cell.id);
        }

        if point.x == self.min_x1 {
            trace!("Point {} on west edge, re-scanning", point);
            return self
                .cells
                .iter()
                .find(|c| c.bounds.contains_on_west_edge(point))
                .map(|c| c.id.as_str());
        }

        None
    }

    pub fn get(&self, id: &str) -> Option<&BoundingBox> {
        self.cells.iter().find(|c| c.id == id).map(|c| &c.bounds)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell_ids(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|c| c.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
