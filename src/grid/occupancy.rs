// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The occupancy array and its geometry: shape-fit testing, placement,
//! removal, and the move/swap algorithm with snapshot rollback.

use std::collections::BTreeMap;

use log::error;

use crate::model::{CollectionHost, GridPos, GridSize, ItemId, ItemInfo, ItemShape};

/// One grid coordinate: empty, or a claim by an occupying stack.
///
/// The grid never owns item lifetime; a cell only records which identity
/// claims it and whether this cell is the occupant's canonical anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridCell {
    occupant: Option<ItemId>,
    anchor: bool,
}

impl GridCell {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn occupied(occupant: ItemId, anchor: bool) -> Self {
        Self {
            occupant: Some(occupant),
            anchor,
        }
    }

    pub fn occupant(&self) -> Option<&ItemId> {
        self.occupant.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Empty cells report `true` by convention, so "can a shape-fit scan
    /// start here" never needs to special-case emptiness.
    pub fn is_anchor(&self) -> bool {
        self.anchor || self.occupant.is_none()
    }

    /// The raw flag, `false` for empty cells. This is what persists.
    pub(crate) fn anchor_flag(&self) -> bool {
        self.anchor && self.occupant.is_some()
    }
}

/// Whether `info` may share a cell with the resident stack `into`.
///
/// Same identity always passes. Two distinct stacks that already live in
/// the same collection never merge (the collection would have merged them
/// already if it could). Otherwise the item definitions must be non-unique
/// and stackable-equivalent, `info` must not be headed for a different
/// collection than the resident's, and the receiving collection must have
/// room for the combined amount — all delegated to the host.
pub(crate) fn can_stack(host: &dyn CollectionHost, info: &ItemInfo, into: &ItemId) -> bool {
    if info.item == *into {
        return true;
    }
    let Some(kind) = host.kind_of(&info.item) else {
        return false;
    };
    let Some(receiving) = host.collection_of(into) else {
        return false;
    };
    if host.collection_of(&info.item).as_ref() == Some(&receiving) {
        return false;
    }
    if let Some(target) = info.collection.as_ref() {
        if *target != receiving {
            return false;
        }
    }
    !host.is_unique(&kind)
        && host.stackable_equivalent(&info.item, into)
        && host.can_merge(&info.item, into)
}

pub(crate) fn shape_or_unit(host: &dyn CollectionHost, item: &ItemId) -> ItemShape {
    host.shape_of(item).unwrap_or_else(ItemShape::unit)
}

/// The occupancy state of one grid: a flat row-major cell array plus an
/// explicit anchor index.
///
/// `Occupancy` is a plain value: cloning it is the snapshot operation, and
/// assigning a clone back is the rollback. Equality is cell-for-cell, which
/// is what the move-atomicity guarantee is stated in terms of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    size: GridSize,
    cells: Vec<GridCell>,
    anchors: BTreeMap<ItemId, GridPos>,
}

impl Occupancy {
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![GridCell::empty(); size.count()],
            anchors: BTreeMap::new(),
        }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    /// The raw cell array, row-major.
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn get(&self, pos: GridPos) -> Option<&GridCell> {
        self.size.index_of(pos).map(|index| &self.cells[index])
    }

    pub fn occupant_at(&self, pos: GridPos) -> Option<ItemId> {
        self.get(pos).and_then(|cell| cell.occupant().cloned())
    }

    /// The recorded anchor position of a placed item.
    pub fn anchor_of(&self, item: &ItemId) -> Option<GridPos> {
        self.anchors.get(item).copied()
    }

    pub fn anchors(&self) -> &BTreeMap<ItemId, GridPos> {
        &self.anchors
    }

    /// Scan-based anchor lookup, kept as the consistency-check path next to
    /// the maintained index. Row-major, first anchor cell wins.
    pub fn scan_anchor_of(&self, item: &ItemId) -> Option<GridPos> {
        self.size.positions().find(|pos| {
            let cell = &self.cells[self.size.index_of(*pos).expect("position in bounds")];
            cell.anchor_flag() && cell.occupant() == Some(item)
        })
    }

    /// Back-trace any claimed cell to its occupant's anchor position.
    pub fn resolve_anchor(&self, pos: GridPos) -> Option<GridPos> {
        let cell = self.get(pos)?;
        if cell.anchor_flag() {
            return Some(pos);
        }
        let occupant = cell.occupant()?;
        self.anchor_of(occupant).or_else(|| self.scan_anchor_of(occupant))
    }

    /// The shape-fit test: does `info`'s shape, anchored at `anchor_pos`,
    /// land entirely on in-bounds cells that are empty, claimed by the same
    /// identity, or (for single-cell shapes only) stack-compatible?
    ///
    /// `ignore` exempts cells from the test; the mover uses it so an item
    /// can be probed against positions overlapping its own footprint.
    pub fn fits<F>(
        &self,
        host: &dyn CollectionHost,
        info: &ItemInfo,
        anchor_pos: GridPos,
        ignore: F,
    ) -> bool
    where
        F: Fn(GridPos) -> bool,
    {
        let shape = shape_or_unit(host, &info.item);

        if shape.is_single() {
            // The common case: no bounding-box math, test the target cell.
            return self.size.contains(anchor_pos)
                && self.cell_open(host, info, anchor_pos, true, &ignore);
        }

        let Some(origin) = box_origin(anchor_pos, &shape) else {
            return false;
        };
        if origin.col + shape.cols() > self.size.cols() || origin.row + shape.rows() > self.size.rows()
        {
            return false;
        }

        // Multi-cell shapes never merge onto a different stack; partial
        // stacking is geometrically ambiguous.
        let open = shape.occupied_offsets().all(|offset| {
            let pos = GridPos::new(origin.col + offset.col, origin.row + offset.row);
            self.cell_open(host, info, pos, false, &ignore)
        });
        open
    }

    fn cell_open<F>(
        &self,
        host: &dyn CollectionHost,
        info: &ItemInfo,
        pos: GridPos,
        allow_merge: bool,
        ignore: &F,
    ) -> bool
    where
        F: Fn(GridPos) -> bool,
    {
        if ignore(pos) {
            return true;
        }
        let Some(cell) = self.get(pos) else {
            return false;
        };
        match cell.occupant() {
            None => true,
            Some(resident) if *resident == info.item => true,
            Some(resident) => allow_merge && can_stack(host, info, resident),
        }
    }

    /// Validate-then-commit placement. Returns `false` with no mutation on
    /// any failure; on success every occupied mask cell is claimed and
    /// exactly the shape's anchor cell carries the anchor flag.
    ///
    /// A 1x1 drop onto a stack-compatible resident reports success without
    /// touching the cell: the merge itself belongs to the collection layer,
    /// and the resident keeps the claim.
    ///
    /// Callers relocating an already-placed item must clear its footprint
    /// first (see [`Occupancy::remove_item`]); `try_place` does not move.
    pub fn try_place(&mut self, host: &dyn CollectionHost, info: &ItemInfo, anchor_pos: GridPos) -> bool {
        if !self.fits(host, info, anchor_pos, |_| false) {
            return false;
        }
        let shape = shape_or_unit(host, &info.item);

        if shape.is_single() {
            let index = self.size.index_of(anchor_pos).expect("fit implies in bounds");
            if let Some(resident) = self.cells[index].occupant() {
                if *resident != info.item {
                    return true;
                }
            }
            self.cells[index] = GridCell::occupied(info.item.clone(), true);
            self.anchors.insert(info.item.clone(), anchor_pos);
            return true;
        }

        let origin = box_origin(anchor_pos, &shape).expect("fit implies in bounds");
        for offset in shape.occupied_offsets() {
            let pos = GridPos::new(origin.col + offset.col, origin.row + offset.row);
            let index = self.size.index_of(pos).expect("fit implies in bounds");
            let is_anchor = shape.is_anchor_cell(offset.col, offset.row);
            self.cells[index] = GridCell::occupied(info.item.clone(), is_anchor);
        }
        self.anchors.insert(info.item.clone(), anchor_pos);
        true
    }

    /// Clear every cell claimed by `item`. Returns whether anything was
    /// cleared.
    pub fn remove_item(&mut self, item: &ItemId) -> bool {
        let mut cleared = false;
        for cell in &mut self.cells {
            if cell.occupant() == Some(item) {
                *cell = GridCell::empty();
                cleared = true;
            }
        }
        self.anchors.remove(item);
        cleared
    }

    /// Clear the footprint of whatever item claims `pos`.
    pub fn remove_at(&mut self, pos: GridPos) -> bool {
        let Some(occupant) = self.occupant_at(pos) else {
            return false;
        };
        self.remove_item(&occupant)
    }

    /// Move the item under `src` so that its grab point lands on `dst`,
    /// swapping with the destination item when `smart_two_way` is enabled.
    ///
    /// Implemented as remove/place steps over a snapshot: if any step
    /// fails, the snapshot is restored and the grid is bit-for-bit what it
    /// was before the call.
    pub fn try_move(
        &mut self,
        host: &dyn CollectionHost,
        src: GridPos,
        dst: GridPos,
        smart_two_way: bool,
    ) -> bool {
        let Some(src_item) = self.occupant_at(src) else {
            return false;
        };
        let dst_item = self.occupant_at(dst);

        let Some(src_anchor) = self.resolve_anchor(src) else {
            error!("cell {src} is claimed by '{src_item}' but no anchor was found for it");
            return false;
        };

        // Dropping "near" a cell keeps the grab point: the destination
        // anchor is offset by the same anchor-to-cursor delta the item was
        // grabbed with.
        let Some(dst_target) = dst.offset(
            src_anchor.col as isize - src.col as isize,
            src_anchor.row as isize - src.row as isize,
        ) else {
            return false;
        };

        let before = self.clone();
        self.remove_item(&src_item);
        let src_info = ItemInfo::new(src_item.clone(), host.collection_of(&src_item));

        let one_way = match dst_item.as_ref() {
            None => true,
            Some(resident) if *resident == src_item => true,
            Some(_) => !smart_two_way,
        };

        if one_way {
            if self.try_place(host, &src_info, dst_target) {
                return true;
            }
            *self = before;
            return false;
        }

        let dst_item = dst_item.expect("two-way move implies an occupied destination");
        let Some(dst_anchor) = before.resolve_anchor(dst) else {
            error!("cell {dst} is claimed by '{dst_item}' but no anchor was found for it");
            *self = before;
            return false;
        };
        let Some(src_target) = src.offset(
            dst_anchor.col as isize - dst.col as isize,
            dst_anchor.row as isize - dst.row as isize,
        ) else {
            *self = before;
            return false;
        };

        self.remove_item(&dst_item);
        let dst_info = ItemInfo::new(dst_item.clone(), host.collection_of(&dst_item));

        if self.try_place(host, &src_info, dst_target) && self.try_place(host, &dst_info, src_target)
        {
            return true;
        }
        *self = before;
        false
    }

    /// Replace the whole cell array (persistence replay). The anchor index
    /// is rebuilt from the anchor flags; the caller has already validated
    /// the length.
    pub(crate) fn replace_cells(&mut self, cells: Vec<GridCell>) {
        debug_assert_eq!(cells.len(), self.size.count());
        self.cells = cells;
        self.anchors.clear();
        for pos in self.size.positions() {
            let cell = &self.cells[self.size.index_of(pos).expect("position in bounds")];
            if cell.anchor_flag() {
                if let Some(occupant) = cell.occupant() {
                    self.anchors.insert(occupant.clone(), pos);
                }
            }
        }
    }
}

/// The bounding-box origin for a shape anchored at `anchor_pos`, or `None`
/// if the box would start above or left of the grid.
fn box_origin(anchor_pos: GridPos, shape: &ItemShape) -> Option<GridPos> {
    anchor_pos.offset(
        -(shape.anchor().col as isize),
        -(shape.anchor().row as isize),
    )
}
