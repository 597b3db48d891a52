//! Input handling for the viewer
//!
//! Converts keyboard events to viewer commands.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::Movement;

/// What a key press asks the viewer to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Movement),
    /// Redraw the whole screen
    Redraw,
    Quit,
}

/// Map a key event to a command. Releases and unbound keys map to `None`.
pub fn command_for(key: &KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            KeyCode::Char('f') => Some(Command::Move(Movement::PageDown)),
            KeyCode::Char('b') => Some(Command::Move(Movement::PageUp)),
            KeyCode::Char('l') => Some(Command::Redraw),
            _ => None,
        };
    }

    let movement = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Movement::Up,
        KeyCode::Down | KeyCode::Char('j') => Movement::Down,
        KeyCode::Left | KeyCode::Char('h') => Movement::Left,
        KeyCode::Right | KeyCode::Char('l') => Movement::Right,
        KeyCode::PageUp => Movement::PageUp,
        KeyCode::PageDown | KeyCode::Char(' ') => Movement::PageDown,
        KeyCode::Char('q') | KeyCode::Esc => return Some(Command::Quit),
        _ => return None,
    };
    Some(Command::Move(movement))
}

/// Parse a compact movement script such as `jjjl` (used by the headless tool).
///
/// Letters follow the interactive bindings; `f` and `b` page down and up.
pub fn parse_moves(script: &str) -> Result<Vec<Movement>, char> {
    script
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            'k' => Ok(Movement::Up),
            'j' => Ok(Movement::Down),
            'h' => Ok(Movement::Left),
            'l' => Ok(Movement::Right),
            'b' => Ok(Movement::PageUp),
            'f' => Ok(Movement::PageDown),
            other => Err(other),
        })
        .collect()
}
