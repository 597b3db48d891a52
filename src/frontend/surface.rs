//! Rendering surface abstraction
//!
//! The printer draws through this trait only, so the frame and data layers
//! never depend on a terminal library. [`OffscreenSurface`] keeps the drawn
//! text in memory for tests and the headless tool.

use std::io;

use serde::{Deserialize, Serialize};

/// Text attribute for a write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Attr {
    #[default]
    Normal,
    Reverse,
}

/// A character grid addressable by (row, col)
pub trait Surface {
    /// Size as (rows, cols)
    fn size(&self) -> (u16, u16);

    /// Blank the whole surface
    fn clear(&mut self) -> io::Result<()>;

    /// Write `text` starting at (`row`, `col`). Text past the right edge is dropped.
    fn write_at(&mut self, row: u16, col: u16, text: &str, attr: Attr) -> io::Result<()>;

    /// Make everything written so far visible
    fn refresh(&mut self) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    attr: Attr,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            attr: Attr::Normal,
        }
    }
}

/// In-memory surface
#[derive(Debug, Clone)]
pub struct OffscreenSurface {
    rows: u16,
    cols: u16,
    cells: Vec<Cell>,
    refreshes: usize,
}

impl OffscreenSurface {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::default(); rows as usize * cols as usize],
            refreshes: 0,
        }
    }

    fn index(&self, row: u16, col: u16) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row as usize * self.cols as usize + col as usize)
    }

    /// Text of one row with trailing blanks removed
    pub fn line(&self, row: u16) -> String {
        let Some(start) = self.index(row, 0) else {
            return String::new();
        };
        let line: String = self.cells[start..start + self.cols as usize]
            .iter()
            .map(|c| c.ch)
            .collect();
        line.trim_end().to_string()
    }

    /// All rows as text
    pub fn lines(&self) -> Vec<String> {
        (0..self.rows).map(|row| self.line(row)).collect()
    }

    /// Attribute of a single cell
    pub fn attr_at(&self, row: u16, col: u16) -> Option<Attr> {
        self.index(row, col).map(|i| self.cells[i].attr)
    }

    /// Number of times `refresh` has been called
    pub fn refreshes(&self) -> usize {
        self.refreshes
    }
}

impl Surface for OffscreenSurface {
    fn size(&self) -> (u16, u16) {
        (self.rows, self.cols)
    }

    fn clear(&mut self) -> io::Result<()> {
        self.cells.fill(Cell::default());
        Ok(())
    }

    fn write_at(&mut self, row: u16, col: u16, text: &str, attr: Attr) -> io::Result<()> {
        for (offset, ch) in text.chars().enumerate() {
            let Some(col) = u16::try_from(offset).ok().and_then(|o| col.checked_add(o)) else {
                break;
            };
            match self.index(row, col) {
                Some(i) => self.cells[i] = Cell { ch, attr },
                None => break,
            }
        }
        Ok(())
    }

    fn refresh(&mut self) -> io::Result<()> {
        self.refreshes += 1;
        Ok(())
    }
}
