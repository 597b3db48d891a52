//! Memory-mapped random-access source
//!
//! The whole file is mapped read-only. Rows are tokenized the first time they
//! are visited and their end offsets recorded, so revisiting a row (or pulling
//! a column out of already visited rows) starts scanning at a known offset.
//!
//! A blank line directly before the end of the file is not a row.

use std::borrow::Cow;
use std::fs::File;
use std::ops::Range;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use super::error::{DataError, DataResult, ParseErrorKind};
use super::offsets::RowOffsets;
use super::tokenizer::{split_record, TokenCursor};
use super::{check_cols, DataSource, SourceOptions};

#[derive(Debug)]
pub struct MmapSource {
    path: PathBuf,
    options: SourceOptions,
    mmap: Option<Mmap>,
    offsets: RowOffsets,
    header: Option<Vec<String>>,
    ncols: Option<usize>,
}

impl MmapSource {
    pub fn new(path: impl Into<PathBuf>, options: SourceOptions) -> Self {
        Self {
            path: path.into(),
            options,
            mmap: None,
            offsets: RowOffsets::new(0, 0, options.row_capacity),
            header: None,
            ncols: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The row-offset cache built so far
    pub fn offsets(&self) -> &RowOffsets {
        &self.offsets
    }

    /// Column count, if it has been established
    pub fn known_ncols(&self) -> Option<usize> {
        self.ncols
    }

    pub fn is_open(&self) -> bool {
        self.mmap.is_some()
    }

    /// The mapped bytes up to the end of the data
    fn data(&self) -> DataResult<&[u8]> {
        let mmap = self.mmap.as_deref().ok_or(DataError::NotOpen)?;
        Ok(&mmap[..self.offsets.total_len()])
    }
}

/// Length of `buf` without a blank last line
fn content_len(buf: &[u8]) -> usize {
    let Some(rest) = buf.strip_suffix(b"\n") else {
        return buf.len();
    };
    let rest = rest.strip_suffix(b"\r").unwrap_or(rest);
    if rest.is_empty() || rest.ends_with(b"\n") {
        rest.len()
    } else {
        buf.len()
    }
}

/// Tokenize data row `row`, returning the fields in `wanted`.
///
/// Rows before `row` that have not been visited yet are scanned first. A row
/// seen for the first time establishes or is checked against the column count,
/// and only a valid row gets its end offset recorded.
fn scan_row<'a>(
    buf: &'a [u8],
    delimiter: u8,
    offsets: &mut RowOffsets,
    ncols: &mut Option<usize>,
    row: usize,
    wanted: Range<usize>,
) -> DataResult<Vec<&'a [u8]>> {
    if row >= offsets.capacity() {
        return Err(DataError::OutOfCapacity {
            row,
            capacity: offsets.capacity(),
        });
    }

    for earlier in offsets.scanned_rows()..row {
        scan_row(buf, delimiter, offsets, ncols, earlier, 0..0)?;
    }

    let start = offsets
        .lookup(row)
        .ok_or(DataError::RowOutOfBounds { row: row as isize })?;
    if offsets.is_eof(row) {
        return Err(DataError::EndOfData);
    }

    if let Some(span) = offsets.span(row) {
        let mut cursor = TokenCursor::at(span.start);
        let (fields, _) = split_record(&buf[..span.end], delimiter, &mut cursor, wanted)
            .map_err(|kind| DataError::parse(Some(row), kind))?;
        return Ok(fields);
    }

    let mut cursor = TokenCursor::at(start);
    let (fields, count) = split_record(buf, delimiter, &mut cursor, wanted)
        .map_err(|kind| DataError::parse(Some(row), kind))?;

    match *ncols {
        Some(expected) if expected != count => {
            return Err(DataError::parse(
                Some(row),
                ParseErrorKind::RaggedRow {
                    expected,
                    found: count,
                },
            ));
        },
        Some(_) => {},
        None => {
            tracing::debug!(ncols = count, "column count established from row {}", row);
            *ncols = Some(count);
        },
    }

    offsets.record(row, cursor.position())?;
    tracing::debug!(row, start, end = cursor.position(), "scanned row");
    Ok(fields)
}

impl DataSource for MmapSource {
    fn open(&mut self) -> DataResult<()> {
        if self.mmap.is_some() {
            return Ok(());
        }

        let file = File::open(&self.path).map_err(|e| DataError::file(&self.path, e))?;
        let len = file
            .metadata()
            .map_err(|e| DataError::file(&self.path, e))?
            .len();
        if len == 0 {
            return Err(DataError::EmptyFile(self.path.clone()));
        }

        // SAFETY: the map is read-only and lives no longer than this source.
        // Truncating the file underneath a running viewer is not supported.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|source| DataError::Resource {
            path: self.path.clone(),
            source,
        })?;
        let data_len = content_len(&mmap);
        if data_len == 0 {
            return Err(DataError::EmptyFile(self.path.clone()));
        }

        let mut first_row = 0;
        if self.options.headers {
            let mut cursor = TokenCursor::new();
            let (fields, count) =
                split_record(&mmap[..data_len], self.options.delimiter, &mut cursor, 0..usize::MAX)
                    .map_err(|kind| DataError::parse(None, kind))?;
            let header = fields.iter().map(|f| self.render_token(f).into_owned()).collect();
            self.header = Some(header);
            self.ncols = Some(count);
            first_row = cursor.position();
        }

        self.offsets = RowOffsets::new(first_row, data_len, self.options.row_capacity);
        tracing::info!(
            bytes = mmap.len(),
            ncols = ?self.ncols,
            "mapped {}",
            self.path.display()
        );
        self.mmap = Some(mmap);
        Ok(())
    }

    fn close(&mut self) -> DataResult<()> {
        match self.mmap.take() {
            Some(mmap) => {
                drop(mmap);
                tracing::info!(
                    rows_scanned = self.offsets.scanned_rows(),
                    "unmapped {}",
                    self.path.display()
                );
                Ok(())
            },
            None => Err(DataError::NotOpen),
        }
    }

    fn has_headers(&self) -> bool {
        self.options.headers
    }

    fn header(&self, cols: Range<usize>) -> DataResult<Vec<Cow<'_, str>>> {
        let Some(header) = &self.header else {
            return Ok(Vec::new());
        };
        check_cols(&cols, header.len())?;
        Ok(header[cols].iter().map(|h| Cow::Borrowed(h.as_str())).collect())
    }

    fn ncols(&mut self) -> DataResult<usize> {
        if let Some(n) = self.ncols {
            return Ok(n);
        }
        let mmap = self.mmap.as_deref().ok_or(DataError::NotOpen)?;
        let buf = &mmap[..self.offsets.total_len()];
        scan_row(buf, self.options.delimiter, &mut self.offsets, &mut self.ncols, 0, 0..0)?;
        self.ncols.ok_or(DataError::EndOfData)
    }

    fn get_row(&mut self, row: usize, cols: Range<usize>) -> DataResult<Vec<Cow<'_, str>>> {
        let mmap = self.mmap.as_deref().ok_or(DataError::NotOpen)?;
        let buf = &mmap[..self.offsets.total_len()];
        if let Some(n) = self.ncols {
            check_cols(&cols, n)?;
        }

        let fields = scan_row(
            buf,
            self.options.delimiter,
            &mut self.offsets,
            &mut self.ncols,
            row,
            cols.clone(),
        )?;

        if let Some(n) = self.ncols {
            check_cols(&cols, n)?;
        }
        Ok(fields.into_iter().map(|f| self.render_token(f)).collect())
    }

    fn get_col(&mut self, col: usize, rows: Range<usize>) -> DataResult<Vec<Cow<'_, str>>> {
        let buf = self.data()?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ncols = self.ncols.ok_or(DataError::RowOutOfBounds {
            row: rows.start as isize,
        })?;
        check_cols(&(col..col + 1), ncols)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            // Only rows already visited through get_row can be read by column
            let span = self
                .offsets
                .span(row)
                .ok_or(DataError::RowOutOfBounds { row: row as isize })?;
            let mut cursor = TokenCursor::at(span.start);
            let (fields, _) =
                split_record(&buf[..span.end], self.options.delimiter, &mut cursor, col..col + 1)
                    .map_err(|kind| DataError::parse(Some(row), kind))?;
            let field = fields.into_iter().next().ok_or(DataError::ColumnOutOfBounds {
                col: col as isize,
                ncols,
            })?;
            out.push(self.render_token(field));
        }
        Ok(out)
    }

    fn row_capacity(&self) -> usize {
        self.offsets.capacity()
    }

    fn total_len(&self) -> usize {
        self.offsets.total_len()
    }

    fn row_offset(&self, row: usize) -> Option<usize> {
        self.offsets.lookup(row)
    }

    fn is_last_row(&self, row: usize) -> bool {
        self.offsets.is_eof(row + 1)
    }
}
