//! Terminal modes
//!
//! Named modes settable through `CSI h` / `CSI l` (and their DEC-private
//! forms). Unknown mode numbers never reach this type; the parser discards
//! them.

use serde::{Deserialize, Serialize};

/// A named terminal mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Cursor visibility (DECTCEM, ?25)
    ShowCursor,
    /// Auto-wrap at the last column (DECAWM, ?7)
    AutoWrap,
    /// Insert mode (IRM, 4)
    Insert,
    /// Bracketed paste (?2004)
    BracketedPaste,
    /// Application cursor keys (DECCKM, ?1)
    AppCursor,
    /// Application keypad (?66)
    AppKeypad,
}

/// Current mode flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modes {
    pub show_cursor: bool,
    pub auto_wrap: bool,
    pub insert: bool,
    pub bracketed_paste: bool,
    pub app_cursor: bool,
    pub app_keypad: bool,
}

impl Default for Modes {
    fn default() -> Self {
        Modes {
            show_cursor: true,
            auto_wrap: true,
            insert: false,
            bracketed_paste: false,
            app_cursor: false,
            app_keypad: false,
        }
    }
}

impl Modes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, mode: Mode, enabled: bool) {
        match mode {
            Mode::ShowCursor => self.show_cursor = enabled,
            Mode::AutoWrap => self.auto_wrap = enabled,
            Mode::Insert => self.insert = enabled,
            Mode::BracketedPaste => self.bracketed_paste = enabled,
            Mode::AppCursor => self.app_cursor = enabled,
            Mode::AppKeypad => self.app_keypad = enabled,
        }
    }

    pub fn get(&self, mode: Mode) -> bool {
        match mode {
            Mode::ShowCursor => self.show_cursor,
            Mode::AutoWrap => self.auto_wrap,
            Mode::Insert => self.insert,
            Mode::BracketedPaste => self.bracketed_paste,
            Mode::AppCursor => self.app_cursor,
            Mode::AppKeypad => self.app_keypad,
        }
    }
}
