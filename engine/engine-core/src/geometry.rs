//! Static board geometry.
//!
//! A [`BoardGeometry`] precomputes the von Neumann neighborhood of every cell
//! of an R x C grid. It is built once per board shape and shared read-only
//! (usually behind an `Arc`) by the propagation engines and the search agents.
//!
//! # Layout
//!
//! Cells are stored in row-major order, row 0 at the top:
//! ```text
//! Row 0: [ 0][ 1][ 2]
//! Row 1: [ 3][ 4][ 5]
//! Row 2: [ 6][ 7][ 8]
//! ```
//! The capacity of a cell is the number of its neighbors: 2 in the corners,
//! 3 along the edges and 4 in the interior.

use thiserror::Error;

/// Errors raised while building a geometry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("Board must have at least 2 rows and 2 columns, got {rows}x{cols}")]
    TooSmall { rows: usize, cols: usize },

    #[error("Board of {rows}x{cols} cells exceeds the supported size")]
    TooLarge { rows: usize, cols: usize },
}

/// Largest number of cells a board may have. Cell indices are stored as `u16`
/// in the search trees.
pub const MAX_CELLS: usize = u16::MAX as usize;

/// Neighbor table for a fixed board shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardGeometry {
    rows: usize,
    cols: usize,
    /// Neighbor indices per cell, ordered up, down, left, right
    neighbors: Vec<Box<[usize]>>,
}

impl BoardGeometry {
    /// Build the neighbor table for a `rows` x `cols` board.
    pub fn new(rows: usize, cols: usize) -> Result<Self, GeometryError> {
        if rows < 2 || cols < 2 {
            return Err(GeometryError::TooSmall { rows, cols });
        }
        if rows.saturating_mul(cols) > MAX_CELLS {
            return Err(GeometryError::TooLarge { rows, cols });
        }

        let neighbors = (0..rows * cols)
            .map(|idx| {
                let (row, col) = (idx / cols, idx % cols);
                let mut adjacent = Vec::with_capacity(4);
                if row > 0 {
                    adjacent.push(idx - cols);
                }
                if row + 1 < rows {
                    adjacent.push(idx + cols);
                }
                if col > 0 {
                    adjacent.push(idx - 1);
                }
                if col + 1 < cols {
                    adjacent.push(idx + 1);
                }
                adjacent.into_boxed_slice()
            })
            .collect();

        Ok(Self {
            rows,
            cols,
            neighbors,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)` of the board.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of cells on the board.
    #[inline]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Always false: a geometry has at least 4 cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Neighbors of `idx`.
    ///
    /// # Panics
    /// Panics if `idx` is outside the board.
    #[inline]
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        &self.neighbors[idx]
    }

    /// Number of orbs that makes `idx` explode.
    #[inline]
    pub fn capacity(&self, idx: usize) -> usize {
        self.neighbors[idx].len()
    }

    /// Convert a row/column pair to a cell index.
    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    /// Convert a cell index back to its row/column pair.
    #[inline]
    pub fn coords(&self, idx: usize) -> (usize, usize) {
        (idx / self.cols, idx % self.cols)
    }

    /// Whether `idx` addresses a cell of this board.
    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        idx < self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_degenerate_shapes() {
        assert_eq!(
            BoardGeometry::new(1, 5),
            Err(GeometryError::TooSmall { rows: 1, cols: 5 })
        );
        assert!(BoardGeometry::new(4, 0).is_err());
        assert!(BoardGeometry::new(2, 2).is_ok());
    }

    #[test]
    fn test_capacity_matches_neighbor_count() {
        for (rows, cols) in [(2, 2), (3, 5), (9, 6), (4, 4), (7, 2)] {
            let geometry = BoardGeometry::new(rows, cols).unwrap();
            for idx in 0..geometry.len() {
                let (row, col) = geometry.coords(idx);
                let on_row_edge = row == 0 || row == rows - 1;
                let on_col_edge = col == 0 || col == cols - 1;
                let expected = match (on_row_edge, on_col_edge) {
                    (true, true) => 2,
                    (true, false) | (false, true) => 3,
                    (false, false) => 4,
                };
                assert_eq!(geometry.capacity(idx), expected, "{}x{} cell {}", rows, cols, idx);
                assert_eq!(geometry.capacity(idx), geometry.neighbors(idx).len());
            }
        }
    }

    #[test]
    fn test_neighbor_order_and_symmetry() {
        let geometry = BoardGeometry::new(3, 3).unwrap();
        // Center: up, down, left, right
        assert_eq!(geometry.neighbors(4), &[1, 7, 3, 5]);
        // Top-left corner
        assert_eq!(geometry.neighbors(0), &[3, 1]);

        for idx in 0..geometry.len() {
            for &n in geometry.neighbors(idx) {
                assert!(geometry.neighbors(n).contains(&idx));
            }
        }
    }

    #[test]
    fn test_index_coords_roundtrip() {
        let geometry = BoardGeometry::new(9, 6).unwrap();
        assert_eq!(geometry.index(0, 0), Some(0));
        assert_eq!(geometry.index(8, 5), Some(53));
        assert_eq!(geometry.index(9, 0), None);
        assert_eq!(geometry.index(0, 6), None);
        assert_eq!(geometry.coords(13), (2, 1));
    }
}
