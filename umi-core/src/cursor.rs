//! Cursor state
//!
//! The cursor tracks position, visibility, shape, and one saved-position
//! slot. It never clamps itself; the grid clamps on every movement it
//! applies.

use serde::{Deserialize, Serialize};

/// Cursor shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorShape {
    /// Block cursor (default)
    Block,
    /// Underline cursor
    Underline,
    /// Vertical bar cursor
    Bar,
}

impl Default for CursorShape {
    fn default() -> Self {
        CursorShape::Block
    }
}

/// Cursor state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Row position (0-indexed from the top of the grid)
    pub row: usize,
    /// Column position (0-indexed)
    pub col: usize,
    /// Whether the cursor is visible
    pub visible: bool,
    /// Cursor shape
    pub shape: CursorShape,
    /// Saved position slot (latest save wins)
    pub saved: Option<(usize, usize)>,
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor {
            row: 0,
            col: 0,
            visible: true,
            shape: CursorShape::Block,
            saved: None,
        }
    }
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save the current position into the single slot
    pub fn save(&mut self) {
        self.saved = Some((self.row, self.col));
    }

    /// Restore the saved position. Without a prior save this is a no-op.
    /// The slot survives the restore, so repeated restores return to the
    /// same spot.
    pub fn restore(&mut self) {
        if let Some((row, col)) = self.saved {
            self.row = row;
            self.col = col;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_default() {
        let cursor = Cursor::default();
        assert_eq!(cursor.row, 0);
        assert_eq!(cursor.col, 0);
        assert!(cursor.visible);
        assert_eq!(cursor.shape, CursorShape::Block);
        assert!(cursor.saved.is_none());
    }

    #[test]
    fn test_save_restore() {
        let mut cursor = Cursor::new();
        cursor.row = 5;
        cursor.col = 10;
        cursor.save();

        cursor.row = 0;
        cursor.col = 0;
        cursor.restore();
        assert_eq!((cursor.row, cursor.col), (5, 10));
    }

    #[test]
    fn test_restore_without_save_is_noop() {
        let mut cursor = Cursor::new();
        cursor.row = 3;
        cursor.restore();
        assert_eq!(cursor.row, 3);
    }

    #[test]
    fn test_latest_save_wins() {
        let mut cursor = Cursor::new();
        cursor.row = 1;
        cursor.save();
        cursor.row = 2;
        cursor.save();

        cursor.row = 9;
        cursor.restore();
        assert_eq!(cursor.row, 2);
    }
}
