//! Sequential line-buffered source
//!
//! Keeps no offset cache. Reads continue forward from the current line; going
//! back rewinds to the start of the file and reads forward again, so random
//! access is linear in the row index. Pipes cannot be rewound: on a pipe any
//! request behind the reader fails with [`DataError::NotSeekable`].
//!
//! A blank line directly before the end of the input is not a row.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::ops::Range;
use std::path::{Path, PathBuf};

use super::error::{DataError, DataResult, ParseErrorKind};
use super::tokenizer::{split_record, TokenCursor};
use super::{check_cols, DataSource, SourceOptions};

#[derive(Debug)]
pub struct LineSource {
    path: PathBuf,
    options: SourceOptions,
    reader: Option<BufReader<File>>,
    header: Option<Vec<String>>,
    ncols: Option<usize>,
    total_len: usize,
    /// Number of data rows, once a read has reached the end of the file
    row_count: Option<usize>,
    /// Data row the reader is positioned at, if it is at a line start
    next_row: Option<usize>,
    /// Whether the input can be rewound (regular files only)
    seekable: bool,
}

impl LineSource {
    pub fn new(path: impl Into<PathBuf>, options: SourceOptions) -> Self {
        Self {
            path: path.into(),
            options,
            reader: None,
            header: None,
            ncols: None,
            total_len: 0,
            row_count: None,
            next_row: None,
            seekable: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Column count, if it has been established
    pub fn known_ncols(&self) -> Option<usize> {
        self.ncols
    }

    fn reader(&mut self) -> DataResult<&mut BufReader<File>> {
        self.reader.as_mut().ok_or(DataError::NotOpen)
    }

    /// Read one line, terminator included. `None` at end of file.
    fn read_line(&mut self, row: Option<usize>) -> DataResult<Option<Vec<u8>>> {
        let limit = self.options.max_line_len;
        let path = self.path.clone();
        let reader = self.reader()?;

        let mut line = Vec::new();
        let read = Read::take(&mut *reader, limit as u64 + 1)
            .read_until(b'\n', &mut line)
            .map_err(|e| DataError::file(&path, e))?;
        if read == 0 {
            return Ok(None);
        }

        let content = line.strip_suffix(b"\n").map_or(line.len(), <[u8]>::len);
        if content > limit {
            return Err(DataError::parse(row, ParseErrorKind::LineTooLong { limit }));
        }
        Ok(Some(line))
    }

    /// Seek back to the first data row
    fn rewind(&mut self) -> DataResult<()> {
        if !self.seekable {
            return Err(DataError::NotSeekable(self.path.clone()));
        }
        let path = self.path.clone();
        self.reader()?
            .seek(SeekFrom::Start(0))
            .map_err(|e| DataError::file(&path, e))?;
        self.next_row = None;
        if self.options.headers {
            self.read_line(None)?;
        }
        self.next_row = Some(0);
        Ok(())
    }

    /// Position the reader at the start of data row `row`
    fn seek_row(&mut self, row: usize) -> DataResult<()> {
        let from = match self.next_row {
            Some(next) if next <= row => next,
            _ => {
                self.rewind()?;
                0
            },
        };
        for skipped in from..row {
            self.next_data_line(skipped)?.ok_or(DataError::EndOfData)?;
        }
        Ok(())
    }

    /// Read data row `row`, which must be the next line of the reader
    fn next_data_line(&mut self, row: usize) -> DataResult<Option<Vec<u8>>> {
        debug_assert_eq!(self.next_row, Some(row));
        // A failed read may stop mid-line
        self.next_row = None;
        let mut line = self.read_line(Some(row))?;
        if line.as_deref().is_some_and(is_blank) && self.at_eof()? {
            line = None;
        }
        match line {
            Some(_) => self.next_row = Some(row + 1),
            None => {
                self.row_count = Some(row);
                self.next_row = Some(row);
            },
        }
        Ok(line)
    }

    fn at_eof(&mut self) -> DataResult<bool> {
        let path = self.path.clone();
        let buf = self.reader()?.fill_buf().map_err(|e| DataError::file(&path, e))?;
        Ok(buf.is_empty())
    }

    /// Split a line and check its field count against the column count
    fn split_line(&mut self, line: &[u8], row: usize, wanted: Range<usize>) -> DataResult<Vec<String>> {
        let mut cursor = TokenCursor::new();
        let (fields, count) = split_record(line, self.options.delimiter, &mut cursor, wanted)
            .map_err(|kind| DataError::parse(Some(row), kind))?;
        match self.ncols {
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
            None => self.ncols = Some(count),
        }

        Ok(fields.iter().map(|f| self.render_token(f).into_owned()).collect())
    }
}

fn is_blank(line: &[u8]) -> bool {
    matches!(line, b"\n" | b"\r\n")
}

impl DataSource for LineSource {
    fn open(&mut self) -> DataResult<()> {
        if self.reader.is_some() {
            return Ok(());
        }

        let file = File::open(&self.path).map_err(|e| DataError::file(&self.path, e))?;
        let metadata = file.metadata().map_err(|e| DataError::file(&self.path, e))?;
        self.total_len = metadata.len() as usize;
        self.seekable = metadata.is_file();
        self.reader = Some(BufReader::new(file));

        if self.options.headers {
            let Some(line) = self.read_line(None)? else {
                self.reader = None;
                return Err(DataError::EmptyFile(self.path.clone()));
            };
            let mut cursor = TokenCursor::new();
            let (fields, count) =
                split_record(&line, self.options.delimiter, &mut cursor, 0..usize::MAX)
                    .map_err(|kind| DataError::parse(None, kind))?;
            let header = fields.iter().map(|f| self.render_token(f).into_owned()).collect();
            self.header = Some(header);
            self.ncols = Some(count);
        }
        self.next_row = Some(0);

        tracing::info!(ncols = ?self.ncols, "opened {} for sequential reading", self.path.display());
        Ok(())
    }

    fn close(&mut self) -> DataResult<()> {
        self.next_row = None;
        match self.reader.take() {
            Some(_) => {
                tracing::info!("closed {}", self.path.display());
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
        self.get_row(0, 0..0)?;
        self.ncols.ok_or(DataError::EndOfData)
    }

    fn get_row(&mut self, row: usize, cols: Range<usize>) -> DataResult<Vec<Cow<'_, str>>> {
        if row >= self.options.row_capacity {
            return Err(DataError::OutOfCapacity {
                row,
                capacity: self.options.row_capacity,
            });
        }
        if self.row_count.is_some_and(|count| row >= count) {
            return Err(DataError::EndOfData);
        }
        if let Some(n) = self.ncols {
            check_cols(&cols, n)?;
        }

        self.seek_row(row)?;
        let Some(line) = self.next_data_line(row)? else {
            return Err(DataError::EndOfData);
        };

        let fields = self.split_line(&line, row, cols.clone())?;
        if let Some(n) = self.ncols {
            check_cols(&cols, n)?;
        }
        if self.at_eof()? {
            self.row_count = Some(row + 1);
        }

        tracing::trace!(row, "read row sequentially");
        Ok(fields.into_iter().map(Cow::Owned).collect())
    }

    fn get_col(&mut self, col: usize, rows: Range<usize>) -> DataResult<Vec<Cow<'_, str>>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ncols = self.ncols()?;
        check_cols(&(col..col + 1), ncols)?;

        self.seek_row(rows.start)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(line) = self.next_data_line(row)? else {
                return Err(DataError::EndOfData);
            };
            let field = self
                .split_line(&line, row, col..col + 1)?
                .into_iter()
                .next()
                .ok_or(DataError::ColumnOutOfBounds {
                    col: col as isize,
                    ncols,
                })?;
            out.push(Cow::Owned(field));
        }
        Ok(out)
    }

    fn row_capacity(&self) -> usize {
        self.options.row_capacity
    }

    fn total_len(&self) -> usize {
        self.total_len
    }

    fn row_offset(&self, row: usize) -> Option<usize> {
        (row == 0).then_some(0)
    }

    fn is_last_row(&self, row: usize) -> bool {
        self.row_count == Some(row + 1)
    }
}
