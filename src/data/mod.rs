//! Lazy data access
//!
//! This module contains everything that touches the input file:
//! - Quote-aware tokenizer over raw bytes
//! - Row-offset cache (row index to byte offset)
//! - The [`DataSource`] trait and its two implementations: a memory-mapped
//!   random-access source and a sequential line-buffered fallback
//!
//! Sources hand out rows and columns on demand; nothing is read ahead.

mod error;
mod mmap;
mod offsets;
mod stream;
pub mod tokenizer;

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;
use std::path::Path;

pub use error::{DataError, DataResult, ParseErrorKind, RowLabel};
pub use mmap::MmapSource;
pub use offsets::RowOffsets;
pub use stream::LineSource;

/// Default field separator
pub const DEFAULT_DELIMITER: u8 = b'|';

/// Default maximum number of rows the offset cache may index
pub const DEFAULT_ROW_CAPACITY: usize = 1 << 24;

/// Default line buffer size for the sequential source
pub const DEFAULT_LINE_LEN: usize = 8192;

/// Settings shared by all data sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceOptions {
    /// Field separator byte
    pub delimiter: u8,
    /// Whether the first line holds column names
    pub headers: bool,
    /// Maximum number of data rows that can be addressed
    pub row_capacity: usize,
    /// Longest line the sequential source will buffer
    pub max_line_len: usize,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            headers: true,
            row_capacity: DEFAULT_ROW_CAPACITY,
            max_line_len: DEFAULT_LINE_LEN,
        }
    }
}

/// How far into the file a row is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Top,
    Bottom,
    Percent(u8),
    Unknown,
}

impl Progress {
    /// Compute progress from a row's start offset
    pub fn from_offset(offset: usize, total_len: usize) -> Self {
        if offset == 0 || total_len == 0 {
            return Progress::Top;
        }
        let percent = (offset as u128 * 100 / total_len as u128).min(100);
        Progress::Percent(percent as u8)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::Top => write!(f, "Top"),
            Progress::Bottom => write!(f, "Bottom"),
            Progress::Percent(p) => write!(f, "{:2}%", p),
            Progress::Unknown => write!(f, "--"),
        }
    }
}

/// A source of delimited rows.
///
/// Row indices count data rows only; the header row, when present, is read
/// once on open and served through [`DataSource::header`]. Column and row
/// ranges are half-open. Fields are rendered text; implementations borrow from
/// their buffers where they can.
pub trait DataSource {
    /// Acquire the underlying file. Scans the header row if configured.
    fn open(&mut self) -> DataResult<()>;

    /// Release the underlying file. Fails with `NotOpen` if already closed.
    fn close(&mut self) -> DataResult<()>;

    /// Whether the first line was consumed as column names
    fn has_headers(&self) -> bool;

    /// Column names for `cols`. Empty if the source has no header row.
    fn header(&self, cols: Range<usize>) -> DataResult<Vec<Cow<'_, str>>>;

    /// Number of columns, scanning the first data row if it is not known yet
    fn ncols(&mut self) -> DataResult<usize>;

    /// Fields `cols` of data row `row`.
    ///
    /// Fails with `EndOfData` if the file has no such row.
    fn get_row(&mut self, row: usize, cols: Range<usize>) -> DataResult<Vec<Cow<'_, str>>>;

    /// Field `col` of every data row in `rows`
    fn get_col(&mut self, col: usize, rows: Range<usize>) -> DataResult<Vec<Cow<'_, str>>>;

    /// Turn a raw field into display text
    fn render_token<'a>(&self, raw: &'a [u8]) -> Cow<'a, str> {
        tokenizer::render_token(raw)
    }

    /// Highest addressable row count
    fn row_capacity(&self) -> usize;

    /// Size of the input in bytes (0 when unknown)
    fn total_len(&self) -> usize;

    /// Start offset of `row`, if known without scanning
    fn row_offset(&self, row: usize) -> Option<usize>;

    /// Whether `row` is known to be the last data row
    fn is_last_row(&self, row: usize) -> bool;

    /// Position indicator for `row`
    fn progress(&self, row: usize) -> Progress {
        if row == 0 {
            return Progress::Top;
        }
        if self.is_last_row(row) {
            return Progress::Bottom;
        }
        match self.row_offset(row) {
            Some(offset) => Progress::from_offset(offset, self.total_len()),
            None => Progress::Unknown,
        }
    }
}

/// Open `path` with the source suited to it.
///
/// Regular files are memory-mapped; pipes and devices are read line by line.
pub fn open_source(
    path: impl AsRef<Path>,
    options: SourceOptions,
) -> DataResult<Box<dyn DataSource>> {
    let path = path.as_ref();
    let metadata = std::fs::metadata(path).map_err(|e| DataError::file(path, e))?;

    let mut source: Box<dyn DataSource> = if metadata.is_file() {
        Box::new(MmapSource::new(path, options))
    } else {
        tracing::info!("{} is not a regular file, reading sequentially", path.display());
        Box::new(LineSource::new(path, options))
    };

    source.open()?;
    Ok(source)
}

pub(crate) fn check_cols(cols: &Range<usize>, ncols: usize) -> DataResult<()> {
    if cols.end > ncols {
        return Err(DataError::ColumnOutOfBounds {
            col: cols.end as isize - 1,
            ncols,
        });
    }
    Ok(())
}
