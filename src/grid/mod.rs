// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! One shaped-item grid: occupancy plus admission policy, the relocation
//! cache, and the store-level reaction to collection events.

pub mod occupancy;

use std::collections::BTreeMap;

use log::{error, warn};
use smallvec::SmallVec;

use crate::filter::FilterSorter;
use crate::model::{
    CollectionHost, CollectionId, GridId, GridPos, GridSize, ItemId, ItemInfo, ItemSnapshot,
};
use crate::router::PlacementError;

pub use occupancy::{GridCell, Occupancy};

/// A grid occupancy store bound to one item collection group.
///
/// The store decides *where* admitted items sit; whether an item may exist
/// in the owning collection at all is delegated outwards and never
/// re-checked here.
#[derive(Debug)]
pub struct GridStore {
    grid_id: GridId,
    occupancy: Occupancy,
    filter: Option<FilterSorter>,
    linked_collections: SmallVec<[CollectionId; 2]>,
    smart_two_way_move: bool,
    /// Value snapshots captured at placement, keyed by the placed identity.
    /// Consulted when the identity has already died (relocation cache,
    /// serialization).
    snapshots: BTreeMap<ItemId, ItemSnapshot>,
    /// Where recently-removed items sat, kept until the next tick so a
    /// remove-then-add pair spanning two operations still springs back.
    relocation_cache: BTreeMap<ItemId, (GridPos, ItemSnapshot)>,
}

impl GridStore {
    pub fn new(grid_id: GridId, size: GridSize) -> Self {
        Self {
            grid_id,
            occupancy: Occupancy::new(size),
            filter: None,
            linked_collections: SmallVec::new(),
            smart_two_way_move: false,
            snapshots: BTreeMap::new(),
            relocation_cache: BTreeMap::new(),
        }
    }

    pub fn grid_id(&self) -> &GridId {
        &self.grid_id
    }

    pub fn size(&self) -> GridSize {
        self.occupancy.size()
    }

    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    pub fn filter(&self) -> Option<&FilterSorter> {
        self.filter.as_ref()
    }

    pub fn set_filter(&mut self, filter: Option<FilterSorter>) {
        self.filter = filter;
    }

    /// The ordered collections this store draws items from. Empty means
    /// every collection of the owning inventory is linked.
    pub fn linked_collections(&self) -> &[CollectionId] {
        &self.linked_collections
    }

    pub fn set_linked_collections(&mut self, collections: impl IntoIterator<Item = CollectionId>) {
        self.linked_collections = collections.into_iter().collect();
    }

    pub fn smart_two_way_move(&self) -> bool {
        self.smart_two_way_move
    }

    /// Allow items to exchange places when possible, instead of moving into
    /// empty space only.
    pub fn set_smart_two_way_move(&mut self, enabled: bool) {
        self.smart_two_way_move = enabled;
    }

    /// Read-only cell lookup for derived views (rendering, navigation).
    pub fn element_at(&self, pos: GridPos) -> Option<&GridCell> {
        self.occupancy.get(pos)
    }

    /// The snapshot recorded for a currently-placed identity.
    pub fn snapshot_of(&self, item: &ItemId) -> Option<&ItemSnapshot> {
        self.snapshots.get(item)
    }

    pub fn holds(&self, item: &ItemId) -> bool {
        self.occupancy.anchor_of(item).is_some()
    }

    /// Read-only form of the placement check.
    pub fn is_available(&self, host: &dyn CollectionHost, info: &ItemInfo, pos: GridPos) -> bool {
        self.occupancy.fits(host, info, pos, |_| false)
    }

    /// [`GridStore::is_available`] with a per-cell exemption, so an item
    /// can be probed against positions overlapping its current footprint.
    pub fn is_available_with<F>(
        &self,
        host: &dyn CollectionHost,
        info: &ItemInfo,
        pos: GridPos,
        ignore: F,
    ) -> bool
    where
        F: Fn(GridPos) -> bool,
    {
        self.occupancy.fits(host, info, pos, ignore)
    }

    /// Place `info` with its anchor on `pos`, relocating it if it is
    /// already somewhere on this grid. Safe to probe: failure mutates
    /// nothing.
    pub fn try_place(&mut self, host: &dyn CollectionHost, info: &ItemInfo, pos: GridPos) -> bool {
        let had_anchor = self.occupancy.anchor_of(&info.item);
        if had_anchor.is_some() {
            let before = self.occupancy.clone();
            self.occupancy.remove_item(&info.item);
            if !self.occupancy.try_place(host, info, pos) {
                self.occupancy = before;
                return false;
            }
        } else if !self.occupancy.try_place(host, info, pos) {
            return false;
        }

        if self.occupancy.anchor_of(&info.item).is_some() {
            if let Some(snapshot) = host.snapshot_of(&info.item) {
                self.snapshots.insert(info.item.clone(), snapshot);
            }
        } else {
            // Merged onto a resident stack: the item holds no cells here.
            self.snapshots.remove(&info.item);
        }
        true
    }

    /// Best available anchor position for `info`.
    ///
    /// Recently-removed items of the same definition spring back to their
    /// old spot when it still fits; otherwise the scan is row-major and the
    /// first valid anchor wins. `None` is the legitimate "grid full"
    /// outcome, not an error.
    pub fn find_available_position(
        &self,
        host: &dyn CollectionHost,
        info: &ItemInfo,
    ) -> Option<GridPos> {
        let kind = host.kind_of(&info.item)?;

        for (pos, snapshot) in self.relocation_cache.values() {
            if snapshot.kind != kind {
                continue;
            }
            if self.occupancy.fits(host, info, *pos, |_| false) {
                return Some(*pos);
            }
        }

        self.size()
            .positions()
            .find(|pos| self.occupancy.fits(host, info, *pos, |_| false))
    }

    /// Move whatever claims `src` so its grab point lands on `dst`. If the
    /// move cannot complete, the grid is untouched.
    pub fn try_move(&mut self, host: &dyn CollectionHost, src: GridPos, dst: GridPos) -> bool {
        self.occupancy.try_move(host, src, dst, self.smart_two_way_move)
    }

    /// Dry-run of [`GridStore::try_move`] against a snapshot copy.
    pub fn can_move(&self, host: &dyn CollectionHost, src: GridPos, dst: GridPos) -> bool {
        let mut probe = self.occupancy.clone();
        probe.try_move(host, src, dst, self.smart_two_way_move)
    }

    /// Clear the footprint of whatever item claims `pos`.
    pub fn remove_at(&mut self, pos: GridPos) -> bool {
        let Some(occupant) = self.occupancy.occupant_at(pos) else {
            return false;
        };
        self.occupancy.remove_item(&occupant);
        self.snapshots.remove(&occupant);
        true
    }

    /// Whether this store would admit `info` into `receiving`.
    ///
    /// Builds the preview [`ItemInfo`] (the item as if it already lived in
    /// the receiving collection) before consulting the filter, so filters
    /// judge the post-add state.
    pub fn can_add_item(
        &self,
        host: &dyn CollectionHost,
        info: &ItemInfo,
        receiving: Option<&CollectionId>,
    ) -> bool {
        if let Some(collection) = receiving {
            if host.is_collection_ignored(collection) {
                return true;
            }
            if !self.accepts_collection(collection) {
                return false;
            }
        }
        let Some(filter) = self.filter.as_ref() else {
            return true;
        };
        let preview = info.previewed_in(receiving.cloned());
        filter.can_contain(host, &preview)
    }

    /// Whether an item already residing in its collection belongs to this
    /// store.
    pub fn is_item_valid(&self, host: &dyn CollectionHost, info: &ItemInfo) -> bool {
        self.can_add_item(host, info, info.collection.as_ref())
    }

    pub fn accepts_collection(&self, collection: &CollectionId) -> bool {
        self.linked_collections.is_empty() || self.linked_collections.contains(collection)
    }

    /// React to the owning collection accepting `stack`: find it a spot and
    /// claim the cells. A full grid is a warning, not a failure — the
    /// collection's admission decision already happened and cannot be
    /// undone here.
    pub(crate) fn on_item_added(
        &mut self,
        host: &dyn CollectionHost,
        stack: &ItemId,
    ) -> Result<(), PlacementError> {
        if self.holds(stack) {
            return Ok(());
        }
        let info = ItemInfo::new(stack.clone(), host.collection_of(stack));

        let Some(pos) = self.find_available_position(host, &info) else {
            warn!(
                "item '{stack}' was added to the collection but grid '{}' has no room for it",
                self.grid_id
            );
            return Ok(());
        };

        if !self.try_place(host, &info, pos) {
            error!(
                "grid '{}' found position {pos} for item '{stack}' but placing it failed",
                self.grid_id
            );
            return Err(PlacementError::PlacementFailed {
                grid: self.grid_id.clone(),
                item: stack.clone(),
            });
        }
        Ok(())
    }

    /// React to a removal notification: sweep every cell whose backing
    /// identity has died, recording anchor positions into the relocation
    /// cache first. Items that merely moved keep their cells.
    pub(crate) fn on_item_removed(&mut self, host: &dyn CollectionHost) {
        let dead: Vec<ItemId> = self
            .occupancy
            .anchors()
            .keys()
            .filter(|item| host.kind_of(item).is_none())
            .cloned()
            .collect();

        for item in dead {
            if let Some(anchor) = self.occupancy.anchor_of(&item) {
                if let Some(snapshot) = self.snapshots.remove(&item) {
                    self.relocation_cache.insert(item.clone(), (anchor, snapshot));
                }
            }
            self.occupancy.remove_item(&item);
        }
    }

    /// Forget relocation hints. Called once per synchronization tick, not
    /// per operation, so a remove-then-add pair within one tick still finds
    /// its old spot.
    pub fn end_tick(&mut self) {
        self.relocation_cache.clear();
    }

    /// Persistence replay: swap in a deserialized cell array and its
    /// snapshot table. Anchor index is rebuilt from the cells.
    pub(crate) fn replace_contents(
        &mut self,
        cells: Vec<GridCell>,
        snapshots: BTreeMap<ItemId, ItemSnapshot>,
    ) {
        self.occupancy.replace_cells(cells);
        self.snapshots = snapshots;
        self.relocation_cache.clear();
    }
}
