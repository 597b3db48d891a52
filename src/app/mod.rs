//! Application glue module
//!
//! Configuration parsing, the viewer session and the interactive event loop.

mod config;

use std::io;

use crossterm::event::{self, Event};

use crate::core::{Direction, Frame, FrameError, FrameResult, Movement};
use crate::data::{open_source, DataError, DataSource};
use crate::frontend::{command_for, print_frame, Command, Surface, TerminalGuard, TerminalSurface};

pub use config::{frame_dimensions, parse_delimiter, CliArgs, ViewerConfig, DEFAULT_COL_WIDTH};

/// Application-level error
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("Terminal error: {0}")]
    Io(#[from] io::Error),
}

/// An open file together with the frame showing it
pub struct Viewer {
    config: ViewerConfig,
    source: Box<dyn DataSource>,
    frame: Frame,
    status: Option<String>,
}

impl Viewer {
    /// Open the configured file and load a frame sized for `rows` x `cols`
    pub fn open(config: ViewerConfig, rows: u16, cols: u16) -> Result<Self, AppError> {
        let mut source = open_source(&config.path, config.source_options())?;
        let (max_rows, max_cols) =
            frame_dimensions(rows, cols, config.col_width, source.has_headers());
        let mut frame = Frame::new(config.col_width, max_cols, max_rows)?;
        let stopped_by = frame.load(source.as_mut())?;

        tracing::info!("opened {}", config.path.display());
        Ok(Self {
            config,
            source,
            frame,
            status: stopped_by.map(|e| e.to_string()),
        })
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn source(&self) -> &dyn DataSource {
        self.source.as_ref()
    }

    /// The message on the status line, if any
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Apply a movement. Recoverable failures become the status message.
    pub fn apply(&mut self, movement: Movement) -> Result<(), AppError> {
        match self.frame.move_cursor(movement, self.source.as_mut()) {
            Ok(()) => {
                self.status = None;
                Ok(())
            },
            Err(e) if e.is_boundary() => Ok(()),
            Err(e) if e.is_recoverable() => {
                tracing::warn!("{:?} failed: {}", movement, e);
                self.status = Some(e.to_string());
                Ok(())
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Rebuild the frame for a new screen size, keeping the top-left cell.
    ///
    /// When the rebuild fails recoverably (a pipe cannot be re-read from the
    /// top) the current frame stays and the failure becomes the status message.
    pub fn resize(&mut self, rows: u16, cols: u16) -> Result<(), AppError> {
        match self.rebuild(rows, cols) {
            Ok((frame, stopped_by)) => {
                self.frame = frame;
                self.status = stopped_by.map(|e| e.to_string());
                Ok(())
            },
            Err(e) if e.is_recoverable() => {
                tracing::warn!("resize to {}x{} failed: {}", rows, cols, e);
                self.status = Some(e.to_string());
                Ok(())
            },
            Err(e) => Err(e.into()),
        }
    }

    fn rebuild(&mut self, rows: u16, cols: u16) -> FrameResult<(Frame, Option<DataError>)> {
        let window = self.frame.window();
        let (max_rows, max_cols) =
            frame_dimensions(rows, cols, self.config.col_width, self.source.has_headers());
        let mut frame = Frame::new(self.config.col_width, max_cols, max_rows)?;
        let stopped_by = frame.load(self.source.as_mut())?;

        shift_until_edge(&mut frame, self.source.as_mut(), window.first_row, |frame, source| {
            frame.shift_row(Direction::Forward, source)
        })?;
        shift_until_edge(&mut frame, self.source.as_mut(), window.first_col, |frame, source| {
            frame.shift_col(Direction::Forward, source)
        })?;

        tracing::debug!(max_rows, max_cols, "frame resized");
        Ok((frame, stopped_by))
    }

    /// Draw the current frame and status line
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> io::Result<()> {
        print_frame(&self.frame, self.source.as_ref(), surface, self.status())
    }

    /// Release the data source
    pub fn close(mut self) -> Result<(), AppError> {
        self.source.close()?;
        tracing::info!("closed {}", self.config.path.display());
        Ok(())
    }
}

/// Apply `shift` up to `count` times, stopping quietly at the edge of the data
fn shift_until_edge<F>(
    frame: &mut Frame,
    source: &mut dyn DataSource,
    count: usize,
    mut shift: F,
) -> FrameResult<()>
where
    F: FnMut(&mut Frame, &mut dyn DataSource) -> Result<(), FrameError>,
{
    for _ in 0..count {
        match shift(frame, source) {
            Ok(()) => {},
            Err(e) if e.is_boundary() => break,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Run the interactive viewer until the user quits
pub fn run(config: ViewerConfig) -> Result<(), AppError> {
    // Opening happens before the screen switch so errors print normally
    let mut surface = TerminalSurface::new(io::stdout())?;
    let (rows, cols) = surface.size();
    let mut viewer = Viewer::open(config, rows, cols)?;

    let result = {
        let _guard = TerminalGuard::enter()?;
        event_loop(&mut viewer, &mut surface)
    };

    viewer.close()?;
    result
}

fn event_loop<W: io::Write>(
    viewer: &mut Viewer,
    surface: &mut TerminalSurface<W>,
) -> Result<(), AppError> {
    viewer.draw(surface)?;
    loop {
        match event::read()? {
            Event::Key(key) => match command_for(&key) {
                Some(Command::Quit) => return Ok(()),
                Some(Command::Move(movement)) => viewer.apply(movement)?,
                Some(Command::Redraw) => {},
                None => continue,
            },
            Event::Resize(cols, rows) => {
                surface.resize(rows, cols);
                viewer.resize(rows, cols)?;
            },
            _ => continue,
        }
        viewer.draw(surface)?;
    }
}
