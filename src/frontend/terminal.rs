//! Crossterm-backed surface
//!
//! Draw commands are queued and only sent to the terminal on `refresh`.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};

use super::surface::{Attr, Surface};

/// Surface writing to a real terminal
#[derive(Debug)]
pub struct TerminalSurface<W: Write> {
    out: W,
    rows: u16,
    cols: u16,
}

impl<W: Write> TerminalSurface<W> {
    /// Create a surface sized to the current terminal
    pub fn new(out: W) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self::with_size(out, rows, cols))
    }

    pub fn with_size(out: W, rows: u16, cols: u16) -> Self {
        Self { out, rows, cols }
    }

    /// Record a new terminal size (from a resize event)
    pub fn resize(&mut self, rows: u16, cols: u16) {
        self.rows = rows;
        self.cols = cols;
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn size(&self) -> (u16, u16) {
        (self.rows, self.cols)
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All))
    }

    fn write_at(&mut self, row: u16, col: u16, text: &str, attr: Attr) -> io::Result<()> {
        if row >= self.rows || col >= self.cols {
            return Ok(());
        }
        let room = (self.cols - col) as usize;
        let text: String = text.chars().take(room).collect();

        match attr {
            Attr::Normal => queue!(self.out, MoveTo(col, row), Print(text)),
            Attr::Reverse => queue!(
                self.out,
                MoveTo(col, row),
                SetAttribute(Attribute::Reverse),
                Print(text),
                SetAttribute(Attribute::Reset)
            ),
        }
    }

    fn refresh(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Raw mode and alternate screen for the lifetime of the guard
#[derive(Debug)]
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        if let Err(e) = disable_raw_mode() {
            tracing::error!("Failed to restore terminal: {}", e);
        }
    }
}
