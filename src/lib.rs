//! Preview: a terminal viewer for large delimited text files
//!
//! Files are memory-mapped and tokenized lazily; only the cells on screen are
//! ever materialized. This crate provides:
//!
//! - `data`: tokenizer, row-offset cache and the data sources
//! - `core`: the frame (viewport) and its movement operations
//! - `frontend`: drawing surfaces, the print bridge and key mapping
//! - `app`: command-line configuration and the interactive event loop

pub mod app;
pub mod core;
pub mod data;
pub mod frontend;
