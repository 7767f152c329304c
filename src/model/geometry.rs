// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

/// A cell coordinate. `col` grows rightwards, `row` grows downwards.
///
/// Also used for offsets *inside* a shape's bounding box, where `(0, 0)` is
/// the box's top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    pub col: usize,
    pub row: usize,
}

impl GridPos {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    /// Translate by a signed delta, or `None` if the result would leave the
    /// non-negative coordinate space.
    pub fn offset(self, d_col: isize, d_row: isize) -> Option<Self> {
        let col = self.col.checked_add_signed(d_col)?;
        let row = self.row.checked_add_signed(d_row)?;
        Some(Self { col, row })
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridSizeError {
    ZeroDimension,
}

impl fmt::Display for GridSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimension => f.write_str("grid dimensions must be non-zero"),
        }
    }
}

impl std::error::Error for GridSizeError {}

/// The fixed dimensions of a grid, with row-major index conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSize {
    cols: usize,
    rows: usize,
}

impl GridSize {
    pub fn new(cols: usize, rows: usize) -> Result<Self, GridSizeError> {
        if cols == 0 || rows == 0 {
            return Err(GridSizeError::ZeroDimension);
        }
        Ok(Self { cols, rows })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn count(&self) -> usize {
        self.cols * self.rows
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.col < self.cols && pos.row < self.rows
    }

    pub fn index_of(&self, pos: GridPos) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        Some(pos.row * self.cols + pos.col)
    }

    pub fn pos_at(&self, index: usize) -> Option<GridPos> {
        if index >= self.count() {
            return None;
        }
        Some(GridPos::new(index % self.cols, index / self.cols))
    }

    /// All positions in row-major order: lowest row first, then lowest
    /// column. This ordering is observable (it is the search tie-break).
    pub fn positions(&self) -> impl Iterator<Item = GridPos> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| GridPos::new(col, row)))
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}
