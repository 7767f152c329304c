// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use smallvec::SmallVec;

use super::geometry::GridPos;

/// An immutable occupancy mask over a rectangular bounding box, plus the
/// designated anchor cell.
///
/// The anchor is the canonical position reference for the shape: placing a
/// shape "at" a grid position means the anchor cell lands on that position
/// and the rest of the box is translated around it. Shapes are built once
/// and shared read-only across every stack of the same item definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemShape {
    cols: usize,
    rows: usize,
    mask: SmallVec<[bool; 16]>,
    anchor: GridPos,
    cell_count: usize,
}

impl ItemShape {
    pub fn new(cols: usize, rows: usize, mask: &[bool], anchor: GridPos) -> Result<Self, ShapeError> {
        if cols == 0 || rows == 0 {
            return Err(ShapeError::ZeroDimension);
        }
        if mask.len() != cols * rows {
            return Err(ShapeError::MaskLengthMismatch {
                expected: cols * rows,
                found: mask.len(),
            });
        }
        let cell_count = mask.iter().filter(|occupied| **occupied).count();
        if cell_count == 0 {
            return Err(ShapeError::EmptyMask);
        }
        if anchor.col >= cols || anchor.row >= rows {
            return Err(ShapeError::AnchorOutOfBounds { anchor });
        }
        if !mask[anchor.row * cols + anchor.col] {
            return Err(ShapeError::AnchorNotOccupied { anchor });
        }

        Ok(Self {
            cols,
            rows,
            mask: SmallVec::from_slice(mask),
            anchor,
            cell_count,
        })
    }

    /// Build a shape from string rows, `'#'` marking occupied cells.
    ///
    /// ```
    /// use proteus::model::{GridPos, ItemShape};
    ///
    /// let l_shape = ItemShape::from_rows(&["#.", "##"], GridPos::new(0, 0)).expect("shape");
    /// assert_eq!(l_shape.cell_count(), 3);
    /// ```
    pub fn from_rows(rows: &[&str], anchor: GridPos) -> Result<Self, ShapeError> {
        let row_count = rows.len();
        let cols = rows.first().map_or(0, |row| row.chars().count());
        let mut mask = Vec::with_capacity(cols * row_count);
        for row in rows {
            if row.chars().count() != cols {
                return Err(ShapeError::RaggedRows);
            }
            mask.extend(row.chars().map(|glyph| glyph == '#'));
        }
        Self::new(cols, row_count, &mask, anchor)
    }

    /// The implicit shape of items that carry no shape attribute.
    pub fn unit() -> Self {
        Self {
            cols: 1,
            rows: 1,
            mask: SmallVec::from_slice(&[true]),
            anchor: GridPos::new(0, 0),
            cell_count: 1,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of occupied mask cells.
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Shapes with a single occupied cell take the 1x1 fast path everywhere.
    pub fn is_single(&self) -> bool {
        self.cell_count <= 1
    }

    /// The anchor cell, as an offset within the bounding box.
    pub fn anchor(&self) -> GridPos {
        self.anchor
    }

    pub fn is_occupied(&self, col: usize, row: usize) -> bool {
        col < self.cols && row < self.rows && self.mask[row * self.cols + col]
    }

    pub fn is_anchor_cell(&self, col: usize, row: usize) -> bool {
        self.anchor.col == col && self.anchor.row == row
    }

    /// Occupied mask cells as box-local offsets, row-major.
    pub fn occupied_offsets(&self) -> impl Iterator<Item = GridPos> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.cols)
                .filter(move |&col| self.mask[row * self.cols + col])
                .map(move |col| GridPos::new(col, row))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    ZeroDimension,
    MaskLengthMismatch { expected: usize, found: usize },
    EmptyMask,
    AnchorOutOfBounds { anchor: GridPos },
    AnchorNotOccupied { anchor: GridPos },
    RaggedRows,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimension => f.write_str("shape bounding box must be non-zero"),
            Self::MaskLengthMismatch { expected, found } => {
                write!(f, "mask length mismatch (expected {expected}, found {found})")
            }
            Self::EmptyMask => f.write_str("shape must occupy at least one cell"),
            Self::AnchorOutOfBounds { anchor } => {
                write!(f, "anchor {anchor} lies outside the bounding box")
            }
            Self::AnchorNotOccupied { anchor } => {
                write!(f, "anchor {anchor} is not an occupied mask cell")
            }
            Self::RaggedRows => f.write_str("shape rows must all have the same width"),
        }
    }
}

impl std::error::Error for ShapeError {}

#[cfg(test)]
mod tests {
    use super::{GridPos, ItemShape, ShapeError};

    #[test]
    fn unit_shape_is_single() {
        let unit = ItemShape::unit();
        assert!(unit.is_single());
        assert!(unit.is_occupied(0, 0));
        assert_eq!(unit.anchor(), GridPos::new(0, 0));
    }

    #[test]
    fn from_rows_builds_l_tromino() {
        let shape = ItemShape::from_rows(&["#.", "##"], GridPos::new(0, 0)).expect("shape");
        assert_eq!(shape.cols(), 2);
        assert_eq!(shape.rows(), 2);
        assert_eq!(shape.cell_count(), 3);
        assert!(shape.is_occupied(0, 0));
        assert!(!shape.is_occupied(1, 0));
        assert!(shape.is_occupied(0, 1));
        assert!(shape.is_occupied(1, 1));

        let offsets: Vec<GridPos> = shape.occupied_offsets().collect();
        assert_eq!(
            offsets,
            vec![GridPos::new(0, 0), GridPos::new(0, 1), GridPos::new(1, 1)]
        );
    }

    #[test]
    fn shape_rejects_empty_mask() {
        assert_eq!(
            ItemShape::new(2, 1, &[false, false], GridPos::new(0, 0)),
            Err(ShapeError::EmptyMask)
        );
    }

    #[test]
    fn shape_rejects_anchor_on_hole() {
        assert_eq!(
            ItemShape::from_rows(&["#.", "##"], GridPos::new(1, 0)),
            Err(ShapeError::AnchorNotOccupied {
                anchor: GridPos::new(1, 0)
            })
        );
    }

    #[test]
    fn shape_rejects_anchor_outside_box() {
        assert_eq!(
            ItemShape::from_rows(&["##"], GridPos::new(2, 0)),
            Err(ShapeError::AnchorOutOfBounds {
                anchor: GridPos::new(2, 0)
            })
        );
    }

    #[test]
    fn shape_rejects_mask_length_mismatch() {
        assert_eq!(
            ItemShape::new(2, 2, &[true, true], GridPos::new(0, 0)),
            Err(ShapeError::MaskLengthMismatch {
                expected: 4,
                found: 2
            })
        );
    }

    #[test]
    fn from_rows_rejects_ragged_rows() {
        assert_eq!(
            ItemShape::from_rows(&["##", "#"], GridPos::new(0, 0)),
            Err(ShapeError::RaggedRows)
        );
    }
}
