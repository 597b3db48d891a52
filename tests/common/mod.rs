//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::io::Write;

use preview::data::{MmapSource, SourceOptions};
use tempfile::NamedTempFile;

/// Write `content` to a fresh temporary file
pub fn write_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// A `rows` x `cols` grid with a `c{col}` header and `r{row}c{col}` cells
pub fn grid(rows: usize, cols: usize, delimiter: char) -> String {
    let sep = delimiter.to_string();
    let mut out = String::new();
    let header: Vec<String> = (0..cols).map(|c| format!("c{}", c)).collect();
    out.push_str(&header.join(&sep));
    out.push('\n');
    for r in 0..rows {
        let line: Vec<String> = (0..cols).map(|c| format!("r{}c{}", r, c)).collect();
        out.push_str(&line.join(&sep));
        out.push('\n');
    }
    out
}

pub fn comma_options(headers: bool) -> SourceOptions {
    SourceOptions {
        delimiter: b',',
        headers,
        ..SourceOptions::default()
    }
}

/// Open an mmap source over a comma-separated file
pub fn mmap_source(content: &str, headers: bool) -> (NamedTempFile, MmapSource) {
    use preview::data::DataSource;

    let file = write_file(content);
    let mut source = MmapSource::new(file.path(), comma_options(headers));
    source.open().unwrap();
    (file, source)
}
