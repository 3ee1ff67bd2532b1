//! Terminal actions produced by the parser
//!
//! Actions are the semantic operations the screen model performs. Each is
//! produced once by the parser and consumed once by the applier. Absolute
//! positions are already converted from the 1-indexed wire form to
//! 0-indexed.

use serde::{Deserialize, Serialize};

use umi_core::{Attrs, Color, CursorShape, LineErase, Mode, ScreenErase};

/// A semantic terminal operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Print a character at the cursor
    Print(char),
    /// A C0 control byte with no dedicated action
    Execute(u8),

    /// Ring the bell
    Bell,
    /// Move the cursor left one column
    Backspace,
    /// Advance to the next tab stop
    Tab,
    /// Move down one row, scrolling at the region bottom
    LineFeed,
    /// Move to column 0
    CarriageReturn,
    /// Move up one row, scrolling at the region top
    ReverseIndex,

    /// Move up n rows
    CursorUp(usize),
    /// Move down n rows
    CursorDown(usize),
    /// Move right n columns
    CursorForward(usize),
    /// Move left n columns
    CursorBack(usize),
    /// Move to a row, keeping the column (0-indexed)
    CursorToRow(usize),
    /// Move to a column, keeping the row (0-indexed)
    CursorToColumn(usize),
    /// Move to an absolute position (0-indexed)
    CursorTo { row: usize, col: usize },
    /// Save the cursor position (single slot, latest wins)
    CursorSave,
    /// Restore the saved cursor position
    CursorRestore,
    /// Set the cursor shape
    SetCursorShape(CursorShape),

    /// Erase part or all of the screen
    EraseScreen(ScreenErase),
    /// Erase part or all of the cursor row
    EraseLine(LineErase),

    /// Set the foreground for subsequent prints
    SetForeground(Color),
    /// Set the background for subsequent prints
    SetBackground(Color),
    /// Restore the default foreground
    ResetForeground,
    /// Restore the default background
    ResetBackground,
    /// Turn on the given attribute flags
    SetAttribute(Attrs),
    /// Turn off the given attribute flags
    ResetAttribute(Attrs),
    /// Clear all attributes and both colors (SGR 0)
    ResetAttributes,

    /// Scroll the region up n rows
    ScrollUp(usize),
    /// Scroll the region down n rows
    ScrollDown(usize),
    /// Set the scroll region (0-indexed, inclusive). A `bottom` of
    /// `usize::MAX` extends to the last row.
    SetScrollRegion { top: usize, bottom: usize },
    /// Restore full-grid scrolling
    ResetScrollRegion,

    /// Insert n blank lines at the cursor row
    InsertLines(usize),
    /// Delete n lines at the cursor row
    DeleteLines(usize),
    /// Insert n blank cells at the cursor
    InsertChars(usize),
    /// Delete n cells at the cursor
    DeleteChars(usize),
    /// Blank n cells at the cursor without shifting
    EraseChars(usize),

    /// Set the window title (forwarded to the host)
    SetTitle(String),
    /// Open or close a hyperlink span; `url: None` closes it
    SetHyperlink {
        url: Option<String>,
        id: Option<String>,
    },

    /// Enable a named mode
    SetMode(Mode),
    /// Disable a named mode
    UnsetMode(Mode),

    /// Full reset (RIS): parser state, grid content, modes, cursor.
    /// Scrollback survives.
    Reset,
}

/// C0 control bytes the parser cares about
pub mod c0 {
    pub const BEL: u8 = 0x07;
    pub const BS: u8 = 0x08;
    pub const HT: u8 = 0x09;
    pub const LF: u8 = 0x0A;
    pub const VT: u8 = 0x0B;
    pub const FF: u8 = 0x0C;
    pub const CR: u8 = 0x0D;
    pub const CAN: u8 = 0x18;
    pub const SUB: u8 = 0x1A;
    pub const ESC: u8 = 0x1B;
    pub const DEL: u8 = 0x7F;
}
