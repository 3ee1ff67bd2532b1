//! Umi terminal
//!
//! The integration crate: feeds raw bytes through the parser and applies
//! the resulting actions to the grid, cursor, and scrollback. Hosts hand
//! PTY output to [`Terminal::feed`], resize on layout changes, and render
//! from [`Terminal::snapshot`].
//!
//! The terminal is synchronous and single-threaded. One instance per
//! terminal pane; an instance shared across threads must be behind a
//! single exclusive lock, or owned by one thread that publishes snapshots.

mod apply;
mod terminal;

pub use terminal::{Event, TermError, Terminal};
