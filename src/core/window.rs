//! Window bounds, cursor position and movement directions

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Direction of a one-step shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards higher row/column indices
    Forward,
    /// Towards lower row/column indices
    Backward,
}

/// Cursor movement requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
}

/// The rectangle of source rows and columns currently materialized.
///
/// Stored as origin plus extent; `last_row`/`last_col` are inclusive and only
/// meaningful when the matching extent is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Window {
    pub first_row: usize,
    pub nrows: usize,
    pub first_col: usize,
    pub ncols: usize,
}

impl Window {
    pub fn last_row(&self) -> usize {
        (self.first_row + self.nrows).saturating_sub(1)
    }

    pub fn last_col(&self) -> usize {
        (self.first_col + self.ncols).saturating_sub(1)
    }

    pub fn rows(&self) -> Range<usize> {
        self.first_row..self.first_row + self.nrows
    }

    pub fn cols(&self) -> Range<usize> {
        self.first_col..self.first_col + self.ncols
    }

    /// Index of the row that a shift in `direction` would bring in
    pub(crate) fn incoming_row(&self, direction: Direction) -> Option<usize> {
        match direction {
            Direction::Forward => Some(self.first_row + self.nrows),
            Direction::Backward => self.first_row.checked_sub(1),
        }
    }

    /// Index of the column that a shift in `direction` would bring in
    pub(crate) fn incoming_col(&self, direction: Direction) -> Option<usize> {
        match direction {
            Direction::Forward => Some(self.first_col + self.ncols),
            Direction::Backward => self.first_col.checked_sub(1),
        }
    }
}

/// Cursor position within the visible rectangle (not source coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}
