use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::Position;

/// Represents errors that can occur within the grid operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Position ({row}, {col}) is out of bounds for grid size ({rows}, {cols})")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

/// A generic 2D grid structure.
///
/// Stores elements of type `T` in a flat vector using row-major order.
/// Dimensions are fixed at construction; individual cells mutate in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Creates a new grid with the specified dimensions, filled with default values.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows `usize`.
    pub fn new(rows: usize, cols: usize) -> Self
    where
        T: Default + Clone,
    {
        let size = rows.checked_mul(cols).expect("Grid size overflow");
        Grid {
            rows,
            cols,
            cells: vec![T::default(); size],
        }
    }

    /// Returns the number of rows in the grid.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns in the grid.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Checks if the given position is within the grid boundaries.
    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Converts a position to a flat vector index.
    ///
    /// Returns `None` if the position is out of bounds.
    #[inline]
    fn pos_to_index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.row * self.cols + pos.col)
        } else {
            None
        }
    }

    /// Gets a reference to the cell at the given position.
    ///
    /// Fails with `GridError::OutOfBounds` if the position is invalid.
    pub fn get(&self, pos: Position) -> Result<&T, GridError> {
        let index = self.pos_to_index(pos).ok_or(GridError::OutOfBounds {
            row: pos.row,
            col: pos.col,
            rows: self.rows,
            cols: self.cols,
        })?;
        Ok(&self.cells[index])
    }

    /// Gets a mutable reference to the cell at the given position.
    ///
    /// Fails with `GridError::OutOfBounds` if the position is invalid.
    pub fn get_mut(&mut self, pos: Position) -> Result<&mut T, GridError> {
        let index = self.pos_to_index(pos).ok_or(GridError::OutOfBounds {
            row: pos.row,
            col: pos.col,
            rows: self.rows,
            cols: self.cols,
        })?;
        Ok(&mut self.cells[index])
    }

    /// Sets the value of the cell at the given position.
    ///
    /// Returns `Ok(())` on success, or `Err(GridError::OutOfBounds)` if the
    /// position is invalid.
    pub fn set(&mut self, pos: Position, value: T) -> Result<(), GridError> {
        *self.get_mut(pos)? = value;
        Ok(())
    }

    /// Returns an iterator that yields `(Position, &T)` for each cell in
    /// row-major order (row ascending, then column ascending).
    pub fn enumerate(&self) -> impl Iterator<Item = (Position, &T)> {
        let cols = self.cols;
        self.cells.iter().enumerate().map(move |(index, cell)| {
            (
                Position {
                    row: index / cols,
                    col: index % cols,
                },
                cell,
            )
        })
    }

    /// Returns every position whose cell equals `value`, in row-major scan
    /// order. An empty result means no cell matches; it is not an error.
    pub fn find_all(&self, value: &T) -> Vec<Position>
    where
        T: PartialEq,
    {
        self.enumerate()
            .filter_map(|(pos, cell)| (cell == value).then_some(pos))
            .collect()
    }
}

/// Allows indexing the grid by `Position` for immutable access.
impl<T> Index<Position> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, pos: Position) -> &Self::Output {
        match self.pos_to_index(pos) {
            Some(idx) => &self.cells[idx],
            None => panic!(
                "Grid position ({}, {}) out of bounds for grid size ({}, {})",
                pos.row, pos.col, self.rows, self.cols
            ),
        }
    }
}

/// Allows indexing the grid by `Position` for mutable access.
impl<T> IndexMut<Position> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, pos: Position) -> &mut Self::Output {
        let rows = self.rows;
        let cols = self.cols;
        match self.pos_to_index(pos) {
            Some(idx) => &mut self.cells[idx],
            None => panic!(
                "Grid position ({}, {}) out of bounds for grid size ({}, {})",
                pos.row, pos.col, rows, cols
            ),
        }
    }
}
