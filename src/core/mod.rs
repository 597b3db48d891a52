//! Viewport Core Module
//!
//! The frame holds the bounded rectangle of cells on screen and moves it over
//! a data source one row or column at a time. This module contains:
//! - Frame with load and shift operations
//! - Window bounds, cursor and movement types
//! - Deterministic snapshot generation
//!
//! The core never draws anything; see `frontend` for that.

mod frame;
mod snapshot;
mod window;

pub use frame::{Frame, FrameError, FrameResult};
pub use snapshot::FrameSnapshot;
pub use window::{Cursor, Direction, Movement, Window};
