//! Frame: the windowed viewport over a data source
//!
//! A frame holds a bounded rectangle of cells, one double-ended buffer per
//! loaded column, plus the header names when the source has a header row.
//! Scrolling never re-reads the window: a row shift fetches one row and
//! rotates every column buffer by one element, a column shift fetches one
//! column and replaces a single buffer.
//!
//! Every operation either succeeds completely or leaves the frame untouched.

use std::borrow::Cow;
use std::collections::VecDeque;

use crate::data::{DataError, DataSource};

use super::snapshot::FrameSnapshot;
use super::window::{Cursor, Direction, Movement, Window};

/// Error type for frame operations
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error(
        "Frame dimensions must be nonzero (col_width={col_width}, max_cols={max_cols}, max_rows={max_rows})"
    )]
    InvalidDimensions {
        col_width: usize,
        max_cols: usize,
        max_rows: usize,
    },

    #[error("Frame has not been loaded")]
    NotLoaded,

    #[error(transparent)]
    Data(#[from] DataError),
}

impl FrameError {
    /// Whether the session can continue after this error
    pub fn is_recoverable(&self) -> bool {
        match self {
            FrameError::Data(e) => e.is_recoverable(),
            FrameError::InvalidDimensions { .. } | FrameError::NotLoaded => false,
        }
    }

    /// Whether the error only means the window is already at an edge
    pub fn is_boundary(&self) -> bool {
        matches!(
            self,
            FrameError::Data(
                DataError::EndOfData
                    | DataError::RowOutOfBounds { .. }
                    | DataError::ColumnOutOfBounds { .. }
            )
        )
    }
}

/// Result type for frame operations
pub type FrameResult<T> = Result<T, FrameError>;

type Column = VecDeque<String>;

#[derive(Debug, Clone)]
pub struct Frame {
    col_width: usize,
    max_cols: usize,
    max_rows: usize,
    window: Window,
    /// One buffer per loaded column, in column order
    columns: VecDeque<Column>,
    /// Column names, present iff the source has a header row
    headers: Option<Column>,
    cursor: Cursor,
    loaded: bool,
}

impl Frame {
    /// Create an empty frame. All dimensions must be nonzero.
    pub fn new(col_width: usize, max_cols: usize, max_rows: usize) -> FrameResult<Self> {
        if col_width == 0 || max_cols == 0 || max_rows == 0 {
            return Err(FrameError::InvalidDimensions {
                col_width,
                max_cols,
                max_rows,
            });
        }

        Ok(Self {
            col_width,
            max_cols,
            max_rows,
            window: Window::default(),
            columns: VecDeque::new(),
            headers: None,
            cursor: Cursor::default(),
            loaded: false,
        })
    }

    /// Materialize the initial window from the top-left of `source`.
    ///
    /// Loads up to `max_rows` rows and `min(ncols, max_cols)` columns,
    /// stopping early at the end of the data. A malformed row also ends the
    /// window early; its parse error is returned so the caller can report it.
    pub fn load(&mut self, source: &mut dyn DataSource) -> FrameResult<Option<DataError>> {
        let ncols = source.ncols()?.min(self.max_cols);

        let headers = if source.has_headers() {
            Some(source.header(0..ncols)?.into_iter().map(Cow::into_owned).collect::<Column>())
        } else {
            None
        };

        let mut columns: VecDeque<Column> =
            (0..ncols).map(|_| Column::with_capacity(self.max_rows)).collect();
        let mut nrows = 0;
        let mut stopped_by = None;
        for row in 0..self.max_rows {
            let fields = match source.get_row(row, 0..ncols) {
                Ok(fields) => fields,
                Err(DataError::EndOfData) => break,
                Err(e @ DataError::Parse { .. }) => {
                    tracing::warn!("initial window stops before row {}: {}", row, e);
                    stopped_by = Some(e);
                    break;
                },
                Err(e) => return Err(e.into()),
            };
            for (column, field) in columns.iter_mut().zip(fields) {
                column.push_back(field.into_owned());
            }
            nrows += 1;
        }

        self.columns = columns;
        self.headers = headers;
        self.window = Window {
            first_row: 0,
            nrows,
            first_col: 0,
            ncols,
        };
        self.cursor = Cursor::default();
        self.loaded = true;

        tracing::info!(nrows, ncols, "frame loaded");
        Ok(stopped_by)
    }

    /// Move the window one row in `direction`, fetching exactly one row.
    pub fn shift_row(&mut self, direction: Direction, source: &mut dyn DataSource) -> FrameResult<()> {
        self.ensure_loaded()?;
        if self.window.nrows == 0 {
            return Err(DataError::EndOfData.into());
        }

        let row = self
            .window
            .incoming_row(direction)
            .ok_or(DataError::RowOutOfBounds { row: -1 })?;
        let capacity = source.row_capacity();
        if row >= capacity {
            return Err(DataError::OutOfCapacity { row, capacity }.into());
        }

        let fields = source.get_row(row, self.window.cols())?;
        debug_assert_eq!(fields.len(), self.columns.len());

        for (column, field) in self.columns.iter_mut().zip(fields) {
            let field = field.into_owned();
            match direction {
                Direction::Forward => {
                    column.pop_front();
                    column.push_back(field);
                },
                Direction::Backward => {
                    column.pop_back();
                    column.push_front(field);
                },
            }
        }

        self.window.first_row = match direction {
            Direction::Forward => self.window.first_row + 1,
            Direction::Backward => row,
        };
        tracing::debug!(first_row = self.window.first_row, "shifted rows");
        Ok(())
    }

    /// Move the window one column in `direction`, fetching exactly one column.
    pub fn shift_col(&mut self, direction: Direction, source: &mut dyn DataSource) -> FrameResult<()> {
        self.ensure_loaded()?;
        let total = source.ncols()?;

        let requested = self.window.first_col as isize
            + match direction {
                Direction::Forward => self.window.ncols as isize,
                Direction::Backward => -1,
            };
        let col = self
            .window
            .incoming_col(direction)
            .filter(|&col| col < total)
            .ok_or(DataError::ColumnOutOfBounds {
                col: requested,
                ncols: total,
            })?;

        let header = match self.headers {
            Some(_) => Some(
                source
                    .header(col..col + 1)?
                    .into_iter()
                    .next()
                    .map(Cow::into_owned)
                    .ok_or(DataError::ColumnOutOfBounds {
                        col: requested,
                        ncols: total,
                    })?,
            ),
            None => None,
        };

        let values: Column = source
            .get_col(col, self.window.rows())?
            .into_iter()
            .map(Cow::into_owned)
            .collect();
        debug_assert_eq!(values.len(), self.window.nrows);

        match direction {
            Direction::Forward => {
                self.columns.pop_front();
                self.columns.push_back(values);
                if let (Some(headers), Some(header)) = (self.headers.as_mut(), header) {
                    headers.pop_front();
                    headers.push_back(header);
                }
                self.window.first_col += 1;
            },
            Direction::Backward => {
                self.columns.pop_back();
                self.columns.push_front(values);
                if let (Some(headers), Some(header)) = (self.headers.as_mut(), header) {
                    headers.pop_back();
                    headers.push_front(header);
                }
                self.window.first_col = col;
            },
        }

        tracing::debug!(first_col = self.window.first_col, "shifted columns");
        Ok(())
    }

    /// Move the cursor, shifting the window when the cursor is at its edge.
    pub fn move_cursor(&mut self, movement: Movement, source: &mut dyn DataSource) -> FrameResult<()> {
        self.ensure_loaded()?;

        match movement {
            Movement::Down if self.cursor.row + 1 < self.window.nrows => self.cursor.row += 1,
            Movement::Down => self.shift_row(Direction::Forward, source)?,
            Movement::Up if self.cursor.row > 0 => self.cursor.row -= 1,
            Movement::Up => self.shift_row(Direction::Backward, source)?,
            Movement::Right if self.cursor.col + 1 < self.window.ncols => self.cursor.col += 1,
            Movement::Right => self.shift_col(Direction::Forward, source)?,
            Movement::Left if self.cursor.col > 0 => self.cursor.col -= 1,
            Movement::Left => self.shift_col(Direction::Backward, source)?,
            Movement::PageDown => self.page(Movement::Down, source)?,
            Movement::PageUp => self.page(Movement::Up, source)?,
        }
        Ok(())
    }

    /// Repeat a row movement for one window height, stopping at an edge
    fn page(&mut self, step: Movement, source: &mut dyn DataSource) -> FrameResult<()> {
        for moved in 0..self.window.nrows.max(1) {
            match self.move_cursor(step, source) {
                Ok(()) => {},
                Err(e) if moved > 0 && e.is_boundary() => break,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn ensure_loaded(&self) -> FrameResult<()> {
        if self.loaded {
            Ok(())
        } else {
            Err(FrameError::NotLoaded)
        }
    }

    /// Whether buffer sizes agree with the window bounds
    pub fn is_consistent(&self) -> bool {
        self.columns.len() == self.window.ncols
            && self.columns.iter().all(|c| c.len() == self.window.nrows)
            && self.headers.as_ref().map_or(true, |h| h.len() == self.window.ncols)
            && (self.window.nrows == 0 || self.cursor.row < self.window.nrows)
            && (self.window.ncols == 0 || self.cursor.col < self.window.ncols)
    }

    pub fn col_width(&self) -> usize {
        self.col_width
    }

    pub fn max_cols(&self) -> usize {
        self.max_cols
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Source coordinates (data row, column) under the cursor
    pub fn cursor_position(&self) -> (usize, usize) {
        (
            self.window.first_row + self.cursor.row,
            self.window.first_col + self.cursor.col,
        )
    }

    pub fn headers(&self) -> Option<&VecDeque<String>> {
        self.headers.as_ref()
    }

    /// Column buffers in display order
    pub fn columns(&self) -> &VecDeque<VecDeque<String>> {
        &self.columns
    }

    /// Cell text at a position within the window
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.columns.get(col)?.get(row).map(String::as_str)
    }

    /// Capture the frame's contents
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::from_frame(self)
    }
}
