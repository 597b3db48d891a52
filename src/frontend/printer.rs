//! Draws a frame onto a surface
//!
//! Layout, for a column width `w`:
//! - column `i` text starts at `i * w + 1` and is cut to `w - 3` columns
//! - a `|` separator sits at `(i + 1) * w - 1` for every column but the last
//! - the header row, when present, occupies the first line
//! - the last line holds the status message, the `row,col` position and the
//!   progress indicator
//!
//! The cursor cell is redrawn in reverse video across `w - 1` columns.

use std::io;

use unicode_width::UnicodeWidthChar;

use crate::core::Frame;
use crate::data::DataSource;

use super::surface::{Attr, Surface};

/// Columns of each cell not used for text
pub const MARGIN: usize = 3;

const SEPARATOR: &str = "|";
const POSITION_WIDTH: usize = 18;
const PROGRESS_WIDTH: usize = 7;

/// Cut `text` to at most `width` display columns, blanking control characters
pub fn truncate(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch = if ch.is_control() { ' ' } else { ch };
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

fn pad(text: &str, width: usize) -> String {
    let mut out = truncate(text, width);
    let used: usize = out.chars().map(|c| c.width().unwrap_or(0)).sum();
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    out
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Draw `frame` on `surface` and refresh it. `status` is shown bottom-left.
pub fn print_frame<S: Surface + ?Sized>(
    frame: &Frame,
    source: &dyn DataSource,
    surface: &mut S,
    status: Option<&str>,
) -> io::Result<()> {
    let col_width = frame.col_width();
    let text_width = col_width.saturating_sub(MARGIN);
    let header_rows = usize::from(frame.headers().is_some());
    let ncols = frame.columns().len();

    surface.clear()?;

    for (icol, column) in frame.columns().iter().enumerate() {
        let x = to_u16(icol * col_width + 1);
        let separator_x = to_u16((icol + 1) * col_width).saturating_sub(1);
        let last = icol + 1 == ncols;

        if let Some(name) = frame.headers().and_then(|h| h.get(icol)) {
            surface.write_at(0, x, &truncate(name, text_width), Attr::Normal)?;
            if !last {
                surface.write_at(0, separator_x, SEPARATOR, Attr::Normal)?;
            }
        }

        for (irow, cell) in column.iter().enumerate() {
            let y = to_u16(irow + header_rows);
            surface.write_at(y, x, &truncate(cell, text_width), Attr::Normal)?;
            if !last {
                surface.write_at(y, separator_x, SEPARATOR, Attr::Normal)?;
            }
        }
    }

    print_status(frame, source, surface, status)?;

    let cursor = frame.cursor();
    if let Some(cell) = frame.cell(cursor.row, cursor.col) {
        let y = to_u16(cursor.row + header_rows);
        let x = to_u16(cursor.col * col_width);
        let highlighted = format!(" {}", truncate(cell, text_width));
        surface.write_at(y, x, &pad(&highlighted, col_width.saturating_sub(1)), Attr::Reverse)?;
    }

    surface.refresh()
}

fn print_status<S: Surface + ?Sized>(
    frame: &Frame,
    source: &dyn DataSource,
    surface: &mut S,
    status: Option<&str>,
) -> io::Result<()> {
    let (rows, cols) = surface.size();
    let Some(y) = rows.checked_sub(1) else {
        return Ok(());
    };
    let cols = cols as usize;

    if let Some(message) = status {
        let room = cols.saturating_sub(POSITION_WIDTH + 1);
        surface.write_at(y, 0, &truncate(message, room), Attr::Normal)?;
    }

    if frame.window().nrows == 0 {
        return Ok(());
    }

    let (row, col) = frame.cursor_position();
    let position = format!("{},{}", row + 1, col + 1);
    surface.write_at(
        y,
        to_u16(cols.saturating_sub(POSITION_WIDTH)),
        &truncate(&position, POSITION_WIDTH - PROGRESS_WIDTH - 1),
        Attr::Normal,
    )?;

    let progress = source.progress(row).to_string();
    surface.write_at(
        y,
        to_u16(cols.saturating_sub(PROGRESS_WIDTH)),
        &progress,
        Attr::Normal,
    )
}
