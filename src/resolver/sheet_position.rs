use std::fmt;

use serde::{Deserialize, Serialize};

/// Address of one cell: zero-based sheet index, one-based row and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SheetPosition {
    pub sheet: usize,
    pub row: u32,
    pub col: u32,
}

/// A cell a formula parameter points at.
pub type CellRef = SheetPosition;

impl SheetPosition {
    pub fn new(sheet: usize, row: u32, col: u32) -> Self {
        Self { sheet, row, col }
    }
}

impl fmt::Display for SheetPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!R{}C{}", self.sheet, self.row, self.col)
    }
}

/// Used area of one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SheetBounds {
    pub rows: u32,
    pub cols: u32,
}

impl SheetBounds {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    pub fn contains(&self, position: &SheetPosition) -> bool {
        (1..=self.rows).contains(&position.row) && (1..=self.cols).contains(&position.col)
    }
}
