//! Frontend module
//!
//! Draws frames on a character surface and maps key presses to commands.
//! The crossterm surface is used interactively; the offscreen surface backs
//! tests and the headless tool.

pub mod input;
pub mod printer;
pub mod surface;
pub mod terminal;

pub use input::{command_for, parse_moves, Command};
pub use printer::{print_frame, truncate};
pub use surface::{Attr, OffscreenSurface, Surface};
pub use terminal::{TerminalGuard, TerminalSurface};
