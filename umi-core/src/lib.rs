//! Umi terminal core
//!
//! This crate provides the platform-independent screen model of the
//! embedded terminal:
//! - Cell representation with character, colors, and attribute flags
//! - Grid with cursor, scroll region, and erase/insert/delete operations
//! - Scrollback buffer for rows scrolled off the top
//! - Read-only snapshots for renderers
//!
//! It has NO parser or I/O dependencies and can be driven headlessly for
//! testing.

pub mod cell;
pub mod color;
pub mod cursor;
pub mod grid;
pub mod modes;
pub mod scrollback;
pub mod snapshot;

pub use cell::{Attrs, Cell, Style};
pub use color::{Color, NamedColor, Rgb};
pub use cursor::{Cursor, CursorShape};
pub use grid::{Grid, LineErase, ScreenErase};
pub use modes::{Mode, Modes};
pub use scrollback::Scrollback;
pub use snapshot::Snapshot;

/// Default terminal width
pub const DEFAULT_COLS: usize = 80;
/// Default terminal height
pub const DEFAULT_ROWS: usize = 24;
