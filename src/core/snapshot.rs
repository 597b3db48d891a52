//! Frame snapshots
//!
//! A snapshot captures the materialized window in a serializable, row-major
//! form. Two frames showing the same cells produce equal snapshots no matter
//! how their buffers were filled.

use serde::{Deserialize, Serialize};

use super::frame::Frame;
use super::window::{Cursor, Window};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub window: Window,
    pub cursor: Cursor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<String>>,
    /// Cell text, one inner vector per row
    pub rows: Vec<Vec<String>>,
}

impl FrameSnapshot {
    pub fn from_frame(frame: &Frame) -> Self {
        let window = frame.window();
        let rows = (0..window.nrows)
            .map(|row| {
                frame
                    .columns()
                    .iter()
                    .map(|column| column.get(row).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Self {
            window,
            cursor: frame.cursor(),
            headers: frame.headers().map(|h| h.iter().cloned().collect()),
            rows,
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
