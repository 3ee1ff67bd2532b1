//! Read-only snapshot of the screen
//!
//! A snapshot is an owned copy of the grid cells and cursor, decoupled
//! from the live terminal so a renderer (or a golden test) can inspect it
//! without holding the terminal lock.

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::cursor::Cursor;
use crate::grid::Grid;

/// An owned copy of the visible screen state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub cols: usize,
    pub rows: usize,
    /// Row-major cells
    pub cells: Vec<Cell>,
    pub cursor: Cursor,
}

impl Snapshot {
    /// Capture the grid's current state
    pub fn capture(grid: &Grid) -> Self {
        Snapshot {
            cols: grid.cols(),
            rows: grid.rows(),
            cells: grid.cells().to_vec(),
            cursor: *grid.cursor(),
        }
    }

    /// Cell at (row, col), or `None` out of range
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.rows && col < self.cols {
            Some(&self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Text of one row, trailing blanks trimmed
    pub fn row_text(&self, row: usize) -> String {
        if row >= self.rows {
            return String::new();
        }
        self.cells[row * self.cols..(row + 1) * self.cols]
            .iter()
            .filter(|cell| !cell.is_wide_spacer())
            .map(|cell| cell.c)
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    /// Full screen text, one line per row
    pub fn text(&self) -> String {
        (0..self.rows)
            .map(|row| self.row_text(row))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Style;

    #[test]
    fn test_capture_text() {
        let mut grid = Grid::new(10, 3);
        for c in "Hello".chars() {
            grid.put_char(c, Style::default(), true, false);
        }

        let snapshot = Snapshot::capture(&grid);
        assert_eq!(snapshot.row_text(0), "Hello");
        assert_eq!(snapshot.row_text(1), "");
        assert_eq!(snapshot.text(), "Hello\n\n");
        assert_eq!(snapshot.cursor.col, 5);
    }

    #[test]
    fn test_cell_bounds() {
        let grid = Grid::new(4, 2);
        let snapshot = Snapshot::capture(&grid);
        assert!(snapshot.cell(0, 0).is_some());
        assert!(snapshot.cell(2, 0).is_none());
        assert!(snapshot.cell(0, 4).is_none());
    }

    #[test]
    fn test_wide_spacer_skipped_in_text() {
        let mut grid = Grid::new(10, 1);
        grid.put_char('世', Style::default(), true, false);
        grid.put_char('x', Style::default(), true, false);

        let snapshot = Snapshot::capture(&grid);
        assert_eq!(snapshot.row_text(0), "世x");
    }

    #[test]
    fn test_json_roundtrip() {
        let mut grid = Grid::new(4, 2);
        grid.put_char('A', Style::default(), true, false);

        let snapshot = Snapshot::capture(&grid);
        let json = snapshot.to_json();
        let restored = Snapshot::from_json(&json).unwrap();
        assert_eq!(restored, snapshot);
    }
}
