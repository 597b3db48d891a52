//! Error types for data sources

use std::fmt;
use std::path::PathBuf;

/// Why a row could not be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The row has a different number of fields than the established column count
    RaggedRow { expected: usize, found: usize },
    /// Input ended while a quoted field was still open
    UnterminatedQuote,
    /// A line exceeded the sequential reader's buffer limit
    LineTooLong { limit: usize },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::RaggedRow { expected, found } => {
                write!(f, "expected {} fields, found {}", expected, found)
            },
            ParseErrorKind::UnterminatedQuote => write!(f, "unterminated quote"),
            ParseErrorKind::LineTooLong { limit } => {
                write!(f, "line longer than {} bytes", limit)
            },
        }
    }
}

/// Where a parse error happened: a data row, or the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLabel(pub Option<usize>);

impl fmt::Display for RowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(row) => write!(f, "row {}", row + 1),
            None => write!(f, "header row"),
        }
    }
}

/// Error type for data source operations
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to access {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File is empty: {}", .0.display())]
    EmptyFile(PathBuf),

    #[error("Failed to map {}: {source}", .path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error on {row}: {kind}")]
    Parse { row: RowLabel, kind: ParseErrorKind },

    #[error("Row {row} is out of bounds")]
    RowOutOfBounds { row: isize },

    #[error("Column {col} is out of bounds ({ncols} columns)")]
    ColumnOutOfBounds { col: isize, ncols: usize },

    #[error("End of data")]
    EndOfData,

    #[error("Row {row} exceeds the row capacity of {capacity}")]
    OutOfCapacity { row: usize, capacity: usize },

    #[error("Data source is not open")]
    NotOpen,

    #[error("Cannot go back in {}: input is not seekable", .0.display())]
    NotSeekable(PathBuf),
}

impl DataError {
    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::File {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(row: Option<usize>, kind: ParseErrorKind) -> Self {
        DataError::Parse {
            row: RowLabel(row),
            kind,
        }
    }

    /// Whether the session can continue after this error.
    ///
    /// I/O and mapping failures are fatal; everything else only refuses the
    /// requested movement.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            DataError::File { .. }
                | DataError::EmptyFile(_)
                | DataError::Resource { .. }
                | DataError::NotOpen
        )
    }
}

/// Result type for data source operations
pub type DataResult<T> = Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err = DataError::parse(Some(4), ParseErrorKind::RaggedRow { expected: 3, found: 2 });
        assert_eq!(err.to_string(), "Parse error on row 5: expected 3 fields, found 2");

        let err = DataError::parse(None, ParseErrorKind::UnterminatedQuote);
        assert_eq!(err.to_string(), "Parse error on header row: unterminated quote");
    }

    #[test]
    fn test_recoverable() {
        assert!(DataError::EndOfData.is_recoverable());
        assert!(DataError::OutOfCapacity { row: 10, capacity: 10 }.is_recoverable());
        assert!(DataError::ColumnOutOfBounds { col: -1, ncols: 3 }.is_recoverable());

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(!DataError::file("/nope.csv", io).is_recoverable());
        assert!(!DataError::NotOpen.is_recoverable());
        assert!(DataError::NotSeekable("/dev/stdin".into()).is_recoverable());
    }
}
