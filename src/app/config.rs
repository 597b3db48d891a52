//! Command-line configuration for the viewer

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::data::{SourceOptions, DEFAULT_DELIMITER, DEFAULT_LINE_LEN, DEFAULT_ROW_CAPACITY};

/// Default width of one displayed column, separator included
pub const DEFAULT_COL_WIDTH: usize = 20;

/// Command-line arguments of the interactive viewer
#[derive(Debug, Clone, Parser)]
#[command(
    name = "preview",
    version,
    about = "View large delimited text files without loading them",
    disable_help_flag = true
)]
pub struct CliArgs {
    /// File to view
    pub path: PathBuf,

    /// Field separator (a single byte)
    #[arg(short, long, default_value = "|", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Treat the first line as data rather than column names
    #[arg(short = 'h', long)]
    pub no_header: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

/// Parse a delimiter argument into a single byte.
///
/// Quotes and line terminators are refused since the tokenizer gives them
/// their own meaning.
pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    let byte = match value {
        "\\t" => b'\t',
        _ => match value.as_bytes() {
            [byte] => *byte,
            _ => return Err(format!("delimiter must be a single byte, got {:?}", value)),
        },
    };
    match byte {
        b'"' | b'\r' | b'\n' => Err(format!("{:?} cannot be used as a delimiter", byte as char)),
        _ => Ok(byte),
    }
}

/// Resolved viewer settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    pub path: PathBuf,
    pub delimiter: u8,
    pub headers: bool,
    /// Screen columns given to each data column
    pub col_width: usize,
    /// Rows the offset cache may index
    pub row_capacity: usize,
    /// Longest line accepted from a pipe
    pub max_line_len: usize,
}

impl ViewerConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: DEFAULT_DELIMITER,
            headers: true,
            col_width: DEFAULT_COL_WIDTH,
            row_capacity: DEFAULT_ROW_CAPACITY,
            max_line_len: DEFAULT_LINE_LEN,
        }
    }

    /// The settings handed to data sources
    pub fn source_options(&self) -> SourceOptions {
        SourceOptions {
            delimiter: self.delimiter,
            headers: self.headers,
            row_capacity: self.row_capacity,
            max_line_len: self.max_line_len,
        }
    }
}

impl From<CliArgs> for ViewerConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            delimiter: args.delimiter,
            headers: !args.no_header,
            ..Self::new(args.path)
        }
    }
}

/// Frame capacity `(max_rows, max_cols)` for a screen of `rows` x `cols`.
///
/// One line goes to the status bar and one to the header row when present.
pub fn frame_dimensions(rows: u16, cols: u16, col_width: usize, headers: bool) -> (usize, usize) {
    let reserved = 1 + usize::from(headers);
    let max_rows = (rows as usize).saturating_sub(reserved).max(1);
    let max_cols = (cols as usize / col_width.max(1)).max(1);
    (max_rows, max_cols)
}
