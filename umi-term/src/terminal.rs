//! Terminal facade
//!
//! Owns one parser + grid + scrollback and the brush state between them.

use thiserror::Error;

use umi_core::{
    scrollback::DEFAULT_SCROLLBACK_ROWS, Cell, Cursor, Grid, Modes, Scrollback, Snapshot, Style,
};
use umi_parser::Parser;

/// Errors surfaced to the host. Everything else recovers internally.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TermError {
    /// Resize with a zero dimension; prior state is retained
    #[error("terminal size must be at least 1x1, got {cols}x{rows}")]
    InvalidSize { cols: usize, rows: usize },
}

/// An out-of-band event for the host UI. The terminal itself stores no
/// title or hyperlink state; it only forwards them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Window title changed (OSC 0/1/2)
    Title(String),
    /// Hyperlink span opened or closed (OSC 8); `url: None` closes
    Hyperlink {
        url: Option<String>,
        id: Option<String>,
    },
    /// BEL received
    Bell,
}

/// A complete terminal instance
#[derive(Debug)]
pub struct Terminal {
    pub(crate) parser: Parser,
    pub(crate) grid: Grid,
    pub(crate) scrollback: Scrollback,
    /// Brush applied to newly printed cells
    pub(crate) style: Style,
    pub(crate) modes: Modes,
    /// Rows scrolled up into history by the viewer (0 = live bottom)
    scroll_offset: usize,
}

impl Terminal {
    /// Create a terminal with the default scrollback capacity. Dimensions
    /// are clamped to at least 1x1.
    pub fn new(cols: usize, rows: usize) -> Self {
        Self::with_scrollback(cols, rows, DEFAULT_SCROLLBACK_ROWS)
    }

    /// Create a terminal with an explicit scrollback capacity (0 disables
    /// history)
    pub fn with_scrollback(cols: usize, rows: usize, max_rows: usize) -> Self {
        let grid = Grid::new(cols, rows);
        let scrollback = Scrollback::new(max_rows, grid.cols());
        Terminal {
            parser: Parser::new(),
            grid,
            scrollback,
            style: Style::default(),
            modes: Modes::default(),
            scroll_offset: 0,
        }
    }

    /// Feed output bytes from the process. Bytes may arrive in arbitrary
    /// chunks, one byte at a time included. Returns host-visible events in
    /// the order they occurred.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Event> {
        let actions = self.parser.parse(bytes);
        let mut events = Vec::new();
        if !actions.is_empty() {
            // new output snaps the view back to the live screen
            self.scroll_offset = 0;
        }
        for action in actions {
            self.apply(action, &mut events);
        }
        events
    }

    /// Feed a single byte
    pub fn feed_byte(&mut self, byte: u8) -> Vec<Event> {
        let mut events = Vec::new();
        for action in self.parser.parse_byte(byte) {
            self.scroll_offset = 0;
            self.apply(action, &mut events);
        }
        events
    }

    /// Resize the visible grid. Content in the overlapping top-left
    /// rectangle is preserved; the cursor clamps into the new bounds.
    pub fn resize(&mut self, cols: usize, rows: usize) -> Result<(), TermError> {
        if cols == 0 || rows == 0 {
            return Err(TermError::InvalidSize { cols, rows });
        }
        self.grid.resize(cols, rows);
        self.scrollback = self.scrollback.resized(self.scrollback.max_rows(), cols);
        self.scroll_offset = self.scroll_offset.min(self.scrollback.len());
        Ok(())
    }

    /// Clear parser state, grid content, modes, and brush; home the
    /// cursor. Scrollback is left untouched.
    pub fn reset(&mut self) {
        self.soft_reset();
    }

    pub(crate) fn soft_reset(&mut self) {
        self.parser.reset();
        self.grid.reset();
        self.style = Style::default();
        self.modes = Modes::default();
        self.scroll_offset = 0;
    }

    // --- read-only API ---------------------------------------------------

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cursor(&self) -> &Cursor {
        self.grid.cursor()
    }

    pub fn scrollback(&self) -> &Scrollback {
        &self.scrollback
    }

    pub fn modes(&self) -> &Modes {
        &self.modes
    }

    /// Owned copy of the visible screen for a renderer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.grid)
    }

    /// A window of history rows ending `offset` rows above the newest
    pub fn scrollback_view(&self, offset: usize, count: usize) -> Vec<&[Cell]> {
        self.scrollback.view(offset, count)
    }

    // --- viewer scroll offset -------------------------------------------

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn set_scroll_offset(&mut self, offset: usize) {
        self.scroll_offset = offset.min(self.scrollback.len());
    }

    /// Scroll the view up (further into history) by n rows
    pub fn scroll_view_up(&mut self, n: usize) {
        self.scroll_offset = (self.scroll_offset + n).min(self.scrollback.len());
    }

    /// Scroll the view down (towards the live screen) by n rows
    pub fn scroll_view_down(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
    }
}
