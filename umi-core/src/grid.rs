//! Terminal grid
//!
//! The grid is the visible cell matrix plus the live cursor. Cells are
//! stored in one flat row-major allocation (`row * cols + col`); scrolling
//! and resizing move cells with `copy_within`/`copy_from_slice` instead of
//! shuffling per-row allocations.
//!
//! All mutation is bounded: out-of-range addressing is a no-op, counts of
//! zero do nothing, and oversized counts clamp to what is available.

use serde::{Deserialize, Serialize};

use crate::cell::{Attrs, Cell, Style};
use crate::cursor::Cursor;

/// Line erase variants (`CSI K`), relative to the cursor cell, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineErase {
    /// Cursor to end of line
    ToEnd,
    /// Start of line to cursor
    ToStart,
    /// Whole line
    All,
}

/// Screen erase variants (`CSI J`), relative to the cursor cell, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenErase {
    /// Cursor to end of screen
    ToEnd,
    /// Start of screen to cursor
    ToStart,
    /// Whole screen
    All,
    /// Whole screen plus scrollback history
    AllAndScrollback,
}

/// The visible cell matrix and its cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cols: usize,
    rows: usize,
    /// Row-major cells; `cells.len() == cols * rows` always
    cells: Vec<Cell>,
    cursor: Cursor,
    /// Explicit scroll region (top, bottom), both inclusive; `None` means
    /// the full grid
    scroll_region: Option<(usize, usize)>,
    /// Deferred autowrap: set after printing in the last column, consumed
    /// by the next print
    pending_wrap: bool,
}

impl Grid {
    /// Create a grid. Dimensions are clamped to at least 1x1.
    pub fn new(cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Grid {
            cols,
            rows,
            cells: vec![Cell::default(); cols * rows],
            cursor: Cursor::new(),
            scroll_region: None,
            pending_wrap: false,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    /// The explicit scroll region, if one is set
    pub fn scroll_region(&self) -> Option<(usize, usize)> {
        self.scroll_region
    }

    /// All cells, row-major
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(row * self.cols + col)
        } else {
            None
        }
    }

    /// Cell at (row, col), or `None` out of range
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.index(row, col).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.index(row, col).map(move |i| &mut self.cells[i])
    }

    /// Set the cell at (row, col). Out of range is a no-op; returns whether
    /// the cell was written.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Cells of one row, or `None` out of range
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        if row < self.rows {
            Some(&self.cells[row * self.cols..(row + 1) * self.cols])
        } else {
            None
        }
    }

    fn row_mut(&mut self, row: usize) -> &mut [Cell] {
        let cols = self.cols;
        &mut self.cells[row * cols..(row + 1) * cols]
    }

    /// The active scroll bounds: the explicit region, or the full grid
    fn region(&self) -> (usize, usize) {
        self.scroll_region.unwrap_or((0, self.rows - 1))
    }

    // --- resizing -----------------------------------------------------

    /// Resize, preserving the overlapping top-left rectangle. New cells are
    /// default; the cursor clamps into the new bounds; any scroll region is
    /// dropped. Zero dimensions are ignored.
    pub fn resize(&mut self, cols: usize, rows: usize) {
        if cols == 0 || rows == 0 {
            log::trace!("ignoring resize to {cols}x{rows}");
            return;
        }
        if cols == self.cols && rows == self.rows {
            return;
        }

        let mut cells = vec![Cell::default(); cols * rows];
        let copy_rows = self.rows.min(rows);
        let copy_cols = self.cols.min(cols);
        for row in 0..copy_rows {
            let old = row * self.cols;
            let new = row * cols;
            cells[new..new + copy_cols].copy_from_slice(&self.cells[old..old + copy_cols]);
        }

        self.cols = cols;
        self.rows = rows;
        self.cells = cells;
        self.scroll_region = None;
        self.pending_wrap = false;
        self.cursor.row = self.cursor.row.min(rows - 1);
        self.cursor.col = self.cursor.col.min(cols - 1);
    }

    /// Restore every cell, the cursor, and the scroll region to the initial
    /// state. Dimensions are kept.
    pub fn reset(&mut self) {
        self.cells.fill(Cell::default());
        self.cursor = Cursor::new();
        self.scroll_region = None;
        self.pending_wrap = false;
    }

    // --- cursor movement (grid clamps, cursor never does) -------------

    /// Absolute move, clamped into bounds
    pub fn goto(&mut self, row: usize, col: usize) {
        self.cursor.row = row.min(self.rows - 1);
        self.cursor.col = col.min(self.cols - 1);
        self.pending_wrap = false;
    }

    pub fn goto_row(&mut self, row: usize) {
        self.cursor.row = row.min(self.rows - 1);
        self.pending_wrap = false;
    }

    pub fn goto_col(&mut self, col: usize) {
        self.cursor.col = col.min(self.cols - 1);
        self.pending_wrap = false;
    }

    pub fn move_up(&mut self, n: usize) {
        self.cursor.row = self.cursor.row.saturating_sub(n);
        self.pending_wrap = false;
    }

    pub fn move_down(&mut self, n: usize) {
        self.cursor.row = (self.cursor.row + n).min(self.rows - 1);
        self.pending_wrap = false;
    }

    pub fn move_forward(&mut self, n: usize) {
        self.cursor.col = (self.cursor.col + n).min(self.cols - 1);
        self.pending_wrap = false;
    }

    pub fn move_back(&mut self, n: usize) {
        self.cursor.col = self.cursor.col.saturating_sub(n);
        self.pending_wrap = false;
    }

    pub fn carriage_return(&mut self) {
        self.cursor.col = 0;
        self.pending_wrap = false;
    }

    pub fn backspace(&mut self) {
        self.cursor.col = self.cursor.col.saturating_sub(1);
        self.pending_wrap = false;
    }

    /// Advance to the next tab stop (every 8 columns)
    pub fn tab(&mut self) {
        self.cursor.col = ((self.cursor.col / 8 + 1) * 8).min(self.cols - 1);
        self.pending_wrap = false;
    }

    pub fn save_cursor(&mut self) {
        self.cursor.save();
    }

    /// Restore the saved cursor position, re-clamped into current bounds
    pub fn restore_cursor(&mut self) {
        self.cursor.restore();
        let (row, col) = (self.cursor.row, self.cursor.col);
        self.goto(row, col);
    }

    // --- printing ------------------------------------------------------

    /// Write one character at the cursor with the given style, advancing
    /// the cursor. With autowrap on, a print past the last column first
    /// moves to column 0 of the next row, scrolling if needed; rows evicted
    /// by that scroll are returned. Wide characters occupy a lead cell plus
    /// a spacer; zero-width characters are dropped.
    pub fn put_char(
        &mut self,
        c: char,
        style: Style,
        autowrap: bool,
        insert: bool,
    ) -> Vec<Vec<Cell>> {
        use unicode_width::UnicodeWidthChar;

        let width = match c.width() {
            Some(w) if w > 0 => w,
            _ => return Vec::new(),
        };

        let mut evicted = Vec::new();
        if self.pending_wrap && autowrap {
            self.cursor.col = 0;
            evicted = self.linefeed();
        }
        self.pending_wrap = false;

        let (row, col) = (self.cursor.row, self.cursor.col);
        if insert {
            self.insert_cells(row, col, width);
        }

        let mut cell = Cell::styled(c, style);
        if width == 2 {
            cell.attrs.insert(Attrs::WIDE);
        }
        self.set(row, col, cell);
        if width == 2 && col + 1 < self.cols {
            let mut spacer = Cell::styled(' ', style);
            spacer.attrs.insert(Attrs::WIDE_SPACER);
            self.set(row, col + 1, spacer);
        }

        let new_col = col + width;
        if new_col >= self.cols {
            self.cursor.col = self.cols - 1;
            self.pending_wrap = true;
        } else {
            self.cursor.col = new_col;
        }
        evicted
    }

    /// Move down one row, scrolling the region up when the cursor sits on
    /// its bottom row. Returns rows evicted into history, if any.
    pub fn linefeed(&mut self) -> Vec<Vec<Cell>> {
        self.pending_wrap = false;
        let (_, bottom) = self.region();
        if self.cursor.row == bottom {
            self.scroll_up(1)
        } else {
            if self.cursor.row < self.rows - 1 {
                self.cursor.row += 1;
            }
            Vec::new()
        }
    }

    /// Move up one row, scrolling the region down when the cursor sits on
    /// its top row
    pub fn reverse_index(&mut self) {
        self.pending_wrap = false;
        let (top, _) = self.region();
        if self.cursor.row == top {
            self.scroll_down(1);
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
        }
    }

    // --- scrolling ------------------------------------------------------

    /// Scroll the active region up by n rows. Rows leaving the top are
    /// returned for scrollback only when no explicit region is set; region
    /// scrolling discards them.
    pub fn scroll_up(&mut self, n: usize) -> Vec<Vec<Cell>> {
        let (top, bottom) = self.region();
        let collect = self.scroll_region.is_none();
        self.scroll_rows_up(top, bottom, n, collect)
    }

    /// Scroll the active region down by n rows; rows leaving the bottom are
    /// lost
    pub fn scroll_down(&mut self, n: usize) {
        let (top, bottom) = self.region();
        self.scroll_rows_down(top, bottom, n);
    }

    fn scroll_rows_up(
        &mut self,
        top: usize,
        bottom: usize,
        n: usize,
        collect: bool,
    ) -> Vec<Vec<Cell>> {
        if n == 0 || top > bottom || bottom >= self.rows {
            return Vec::new();
        }
        let n = n.min(bottom - top + 1);
        let cols = self.cols;

        let mut evicted = Vec::new();
        if collect {
            for row in top..top + n {
                evicted.push(self.cells[row * cols..(row + 1) * cols].to_vec());
            }
        }

        self.cells
            .copy_within((top + n) * cols..(bottom + 1) * cols, top * cols);
        self.cells[(bottom + 1 - n) * cols..(bottom + 1) * cols].fill(Cell::default());
        evicted
    }

    fn scroll_rows_down(&mut self, top: usize, bottom: usize, n: usize) {
        if n == 0 || top > bottom || bottom >= self.rows {
            return;
        }
        let n = n.min(bottom - top + 1);
        let cols = self.cols;

        self.cells
            .copy_within(top * cols..(bottom + 1 - n) * cols, (top + n) * cols);
        self.cells[top * cols..(top + n) * cols].fill(Cell::default());
    }

    /// Set the scroll region (inclusive, 0-indexed). `bottom` clamps to the
    /// last row; a full-grid range is the same as no region. Degenerate
    /// ranges are ignored. Sets the cursor home, as DECSTBM does.
    pub fn set_scroll_region(&mut self, top: usize, bottom: usize) {
        let bottom = bottom.min(self.rows - 1);
        if top >= bottom {
            log::trace!("ignoring degenerate scroll region {top}..{bottom}");
            return;
        }
        self.scroll_region = if top == 0 && bottom == self.rows - 1 {
            None
        } else {
            Some((top, bottom))
        };
        self.goto(0, 0);
    }

    pub fn reset_scroll_region(&mut self) {
        self.scroll_region = None;
    }

    // --- line insert/delete ---------------------------------------------

    /// Insert n blank lines at the cursor row, shifting lines down within
    /// the scroll region. No-op when the cursor is outside the region.
    pub fn insert_lines(&mut self, n: usize) {
        self.pending_wrap = false;
        let (top, bottom) = self.region();
        let row = self.cursor.row;
        if row < top || row > bottom {
            return;
        }
        self.scroll_rows_down(row, bottom, n);
    }

    /// Delete n lines at the cursor row, shifting lines up within the
    /// scroll region; blanks appear at the region bottom
    pub fn delete_lines(&mut self, n: usize) {
        self.pending_wrap = false;
        let (top, bottom) = self.region();
        let row = self.cursor.row;
        if row < top || row > bottom {
            return;
        }
        self.scroll_rows_up(row, bottom, n, false);
    }

    // --- character insert/delete/erase ----------------------------------

    /// Insert n blank cells at the cursor, shifting the rest of the row
    /// right; cells pushed past the last column are lost
    pub fn insert_chars(&mut self, n: usize) {
        self.pending_wrap = false;
        let (row, col) = (self.cursor.row, self.cursor.col);
        self.insert_cells(row, col, n);
    }

    fn insert_cells(&mut self, row: usize, col: usize, n: usize) {
        if n == 0 || row >= self.rows || col >= self.cols {
            return;
        }
        let cols = self.cols;
        let n = n.min(cols - col);
        let line = self.row_mut(row);
        line[col..].rotate_right(n);
        line[col..col + n].fill(Cell::default());
    }

    /// Delete n cells at the cursor, shifting the rest of the row left;
    /// blanks appear at the end of the row
    pub fn delete_chars(&mut self, n: usize) {
        self.pending_wrap = false;
        let (row, col) = (self.cursor.row, self.cursor.col);
        if n == 0 || row >= self.rows || col >= self.cols {
            return;
        }
        let cols = self.cols;
        let n = n.min(cols - col);
        let line = self.row_mut(row);
        line[col..].rotate_left(n);
        line[cols - n..].fill(Cell::default());
    }

    /// Blank n cells starting at the cursor, without shifting
    pub fn erase_chars(&mut self, n: usize) {
        let (row, col) = (self.cursor.row, self.cursor.col);
        if n == 0 || row >= self.rows || col >= self.cols {
            return;
        }
        let end = (col + n).min(self.cols);
        let line = self.row_mut(row);
        line[col..end].fill(Cell::default());
    }

    // --- erasing --------------------------------------------------------

    /// Erase within the cursor row
    pub fn erase_line(&mut self, mode: LineErase) {
        let (row, col) = (self.cursor.row, self.cursor.col);
        let cols = self.cols;
        let line = self.row_mut(row);
        match mode {
            LineErase::ToEnd => line[col..].fill(Cell::default()),
            LineErase::ToStart => line[..(col + 1).min(cols)].fill(Cell::default()),
            LineErase::All => line.fill(Cell::default()),
        }
    }

    /// Erase within the screen. `AllAndScrollback` clears the grid; the
    /// owner is responsible for clearing history alongside it.
    pub fn erase_screen(&mut self, mode: ScreenErase) {
        let (row, col) = (self.cursor.row, self.cursor.col);
        let cols = self.cols;
        match mode {
            ScreenErase::ToEnd => {
                self.cells[row * cols + col..].fill(Cell::default());
            }
            ScreenErase::ToStart => {
                self.cells[..row * cols + col + 1].fill(Cell::default());
            }
            ScreenErase::All | ScreenErase::AllAndScrollback => {
                self.cells.fill(Cell::default());
            }
        }
    }
}
