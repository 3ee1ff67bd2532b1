//! Scrollback buffer
//!
//! Rows evicted from the top of the grid land here. The buffer is a
//! fixed-capacity FIFO: once `max_rows` is reached, pushing evicts the
//! oldest row. Historical rows are never mutated after the push.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::cell::Cell;

/// Default maximum scrollback rows
pub const DEFAULT_SCROLLBACK_ROWS: usize = 10_000;

/// Bounded history of rows scrolled off the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scrollback {
    rows: VecDeque<Vec<Cell>>,
    max_rows: usize,
    cols: usize,
}

impl Scrollback {
    /// Create an empty scrollback holding at most `max_rows` rows of
    /// `cols` cells each. `max_rows` of 0 disables history.
    pub fn new(max_rows: usize, cols: usize) -> Self {
        Scrollback {
            rows: VecDeque::new(),
            max_rows,
            cols,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Push a row, padding or truncating it to the column count, evicting
    /// the oldest row once at capacity
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        if self.max_rows == 0 {
            return;
        }
        row.resize(self.cols, Cell::default());
        if self.rows.len() >= self.max_rows {
            self.rows.pop_front();
        }
        self.rows.push_back(row);
    }

    /// Row by index; 0 is the oldest retained row
    pub fn get(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Row by index counted from the newest; 0 is the most recent row
    pub fn from_newest(&self, index: usize) -> Option<&[Cell]> {
        if index < self.rows.len() {
            self.get(self.rows.len() - 1 - index)
        } else {
            None
        }
    }

    /// A rendering window: up to `count` rows ending `offset` rows above
    /// the newest. `view(0, n)` returns the newest n rows, oldest first.
    pub fn view(&self, offset: usize, count: usize) -> Vec<&[Cell]> {
        let len = self.rows.len();
        let end = len.saturating_sub(offset);
        let start = end.saturating_sub(count);
        (start..end).filter_map(|i| self.get(i)).collect()
    }

    /// Drop all history
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Build a new scrollback with a different capacity and/or width,
    /// retaining the newest rows that fit. Capacity is otherwise fixed at
    /// construction.
    pub fn resized(&self, max_rows: usize, cols: usize) -> Self {
        let keep = self.rows.len().min(max_rows);
        if keep < self.rows.len() {
            log::debug!(
                "scrollback shrink drops {} oldest rows",
                self.rows.len() - keep
            );
        }
        let mut rows = VecDeque::with_capacity(keep);
        for row in self.rows.iter().skip(self.rows.len() - keep) {
            let mut row = row.clone();
            row.resize(cols, Cell::default());
            rows.push_back(row);
        }
        Scrollback {
            rows,
            max_rows,
            cols,
        }
    }

    /// Iterate rows oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

impl Default for Scrollback {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLLBACK_ROWS, crate::DEFAULT_COLS)
    }
}
