//! Row-offset cache
//!
//! Maps data row index to the byte offset where that row starts. Entry 0 is
//! the start of the first data row (after the header, if any). Entry `i + 1`
//! is appended only once row `i` has been scanned to completion, so the cache
//! only ever grows and never needs invalidating: the source is read-only.

use super::error::{DataError, DataResult};

#[derive(Debug, Clone)]
pub struct RowOffsets {
    /// `offsets[i]` is the start of row `i`
    offsets: Vec<usize>,
    /// Length of the underlying buffer; an offset equal to it marks end of data
    total_len: usize,
    /// Maximum number of rows that may be recorded
    capacity: usize,
}

impl RowOffsets {
    /// Create a cache whose first data row starts at `first_row`
    pub fn new(first_row: usize, total_len: usize, capacity: usize) -> Self {
        Self {
            offsets: vec![first_row],
            total_len,
            capacity,
        }
    }

    /// Record that row `row` has been fully scanned and the next row starts at
    /// `next_start`. Recording an already known row is a no-op.
    pub fn record(&mut self, row: usize, next_start: usize) -> DataResult<()> {
        if row >= self.capacity {
            return Err(DataError::OutOfCapacity {
                row,
                capacity: self.capacity,
            });
        }

        let known = self.offsets.len();
        if row + 1 < known {
            debug_assert_eq!(self.offsets[row + 1], next_start);
            return Ok(());
        }
        if row + 1 > known {
            // The start of `row` itself is not known yet
            return Err(DataError::RowOutOfBounds { row: row as isize });
        }

        debug_assert!(next_start >= self.offsets[row]);
        debug_assert!(next_start <= self.total_len);
        self.offsets.push(next_start);
        tracing::trace!(row, next_start, "recorded row end");
        Ok(())
    }

    /// Cached start offset of `row`, without scanning
    pub fn lookup(&self, row: usize) -> Option<usize> {
        self.offsets.get(row).copied()
    }

    /// Byte range of `row`, terminator included, if the row has been scanned
    pub fn span(&self, row: usize) -> Option<std::ops::Range<usize>> {
        Some(self.lookup(row)?..self.lookup(row + 1)?)
    }

    /// Whether `row` has been scanned to completion
    pub fn is_scanned(&self, row: usize) -> bool {
        row + 1 < self.offsets.len()
    }

    /// True iff the start of `row` is the end of the buffer
    pub fn is_eof(&self, row: usize) -> bool {
        self.lookup(row) == Some(self.total_len)
    }

    /// Number of fully scanned rows
    pub fn scanned_rows(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn total_len(&self) -> usize {
        self.total_len
    }
}
