//! Terminal cell representation
//!
//! A cell is a single character position in the grid: one Unicode scalar
//! plus the colors and attribute flags it was printed with. Cells are plain
//! `Copy` values; the grid owns them exclusively and never shares them.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::color::Color;

bitflags! {
    /// Text attribute flags
    ///
    /// `WIDE` and `WIDE_SPACER` are cell-layout flags: a wide character
    /// occupies its own cell plus a spacer cell to its right.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct Attrs: u16 {
        const BOLD             = 1 << 0;
        const DIM              = 1 << 1;
        const ITALIC           = 1 << 2;
        const UNDERLINE        = 1 << 3;
        const DOUBLE_UNDERLINE = 1 << 4;
        const SLOW_BLINK       = 1 << 5;
        const RAPID_BLINK      = 1 << 6;
        const REVERSE          = 1 << 7;
        const HIDDEN           = 1 << 8;
        const STRIKETHROUGH    = 1 << 9;
        const WIDE             = 1 << 10;
        const WIDE_SPACER      = 1 << 11;
    }
}

/// A single cell in the terminal grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// The character stored in this cell
    pub c: char,
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Text attributes
    pub attrs: Attrs,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            c: ' ',
            fg: Color::Default,
            bg: Color::Default,
            attrs: Attrs::empty(),
        }
    }
}

impl Cell {
    /// Create a cell with the given character and default style
    pub fn new(c: char) -> Self {
        Cell {
            c,
            ..Default::default()
        }
    }

    /// Create a cell with the given character and style
    pub fn styled(c: char, style: Style) -> Self {
        Cell {
            c,
            fg: style.fg,
            bg: style.bg,
            attrs: style.attrs,
        }
    }

    /// Whether this cell holds a space with default colors and no attributes
    pub fn is_blank(&self) -> bool {
        self.c == ' '
            && self.fg == Color::Default
            && self.bg == Color::Default
            && self.attrs.is_empty()
    }

    /// Reset the cell to the default state
    pub fn reset(&mut self) {
        *self = Cell::default();
    }

    /// Display width of this cell's character
    pub fn width(&self) -> usize {
        if self.attrs.contains(Attrs::WIDE_SPACER) {
            0
        } else if self.attrs.contains(Attrs::WIDE) {
            2
        } else {
            use unicode_width::UnicodeWidthChar;
            self.c.width().unwrap_or(1).max(1)
        }
    }

    /// Whether this cell is the lead cell of a wide character
    pub fn is_wide(&self) -> bool {
        self.attrs.contains(Attrs::WIDE)
    }

    /// Whether this cell is the spacer of a wide character
    pub fn is_wide_spacer(&self) -> bool {
        self.attrs.contains(Attrs::WIDE_SPACER)
    }
}

/// The brush applied to newly printed cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attrs,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all fields to defaults
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_default() {
        let cell = Cell::default();
        assert_eq!(cell.c, ' ');
        assert_eq!(cell.fg, Color::Default);
        assert_eq!(cell.bg, Color::Default);
        assert!(cell.attrs.is_empty());
        assert!(cell.is_blank());
    }

    #[test]
    fn test_cell_new() {
        let cell = Cell::new('A');
        assert_eq!(cell.c, 'A');
        assert!(!cell.is_blank());
    }

    #[test]
    fn test_cell_styled() {
        let style = Style {
            fg: Color::Indexed(1),
            bg: Color::Default,
            attrs: Attrs::BOLD | Attrs::UNDERLINE,
        };
        let cell = Cell::styled('x', style);
        assert_eq!(cell.fg, Color::Indexed(1));
        assert!(cell.attrs.contains(Attrs::BOLD));
        assert!(cell.attrs.contains(Attrs::UNDERLINE));
    }

    #[test]
    fn test_attrs_set_remove() {
        let mut attrs = Attrs::empty();
        attrs.insert(Attrs::BOLD);
        attrs.insert(Attrs::ITALIC);
        assert!(attrs.contains(Attrs::BOLD));

        attrs.remove(Attrs::BOLD);
        assert!(!attrs.contains(Attrs::BOLD));
        assert!(attrs.contains(Attrs::ITALIC));
    }

    #[test]
    fn test_cell_width() {
        assert_eq!(Cell::new('a').width(), 1);

        let mut wide = Cell::new('世');
        wide.attrs.insert(Attrs::WIDE);
        assert_eq!(wide.width(), 2);

        let mut spacer = Cell::default();
        spacer.attrs.insert(Attrs::WIDE_SPACER);
        assert_eq!(spacer.width(), 0);
    }

    #[test]
    fn test_cell_reset() {
        let mut cell = Cell::new('X');
        cell.fg = Color::Indexed(3);
        cell.attrs.insert(Attrs::BOLD);

        cell.reset();
        assert!(cell.is_blank());
    }
}
