// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Routing of collection events to grid stores.
//!
//! One router serves one item collection. Events arrive strictly in the
//! order the collection raises them and are applied synchronously; the
//! router only decides *which* store reacts.

use std::fmt;

use log::warn;

use crate::grid::GridStore;
use crate::model::{CollectionHost, CollectionId, GridId, ItemId, ItemInfo};

/// The two notification entry points into the engine, as explicit commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionEvent {
    /// The collection accepted an item; `stack` is the resulting stack
    /// identity (which may differ from the origin when amounts merged).
    ItemAdded { origin: ItemInfo, stack: ItemId },
    /// A stack left the collection. Whether it died or merely relocated is
    /// resolved against the host.
    ItemRemoved { item: ItemId },
}

/// A logic-bug-class failure. Expected negative outcomes (full grid, filter
/// rejection, impossible move) are ordinary `bool`/`Option` returns and
/// never surface here; an error aborts the single operation that raised it,
/// after rollback, and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// A store found an available position but the commit still failed.
    PlacementFailed { grid: GridId, item: ItemId },
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlacementFailed { grid, item } => {
                write!(f, "grid '{grid}' failed to place item '{item}' after finding room")
            }
        }
    }
}

impl std::error::Error for PlacementError {}

/// Owns the grid stores attached to one collection and routes add/remove
/// notifications to the first store whose filter admits the item.
#[derive(Debug)]
pub struct GridRouter {
    stores: Vec<GridStore>,
    allow_matchless: bool,
}

impl GridRouter {
    /// `allow_matchless` accepts items that no store admits without placing
    /// them anywhere; with it disabled such items are a configuration
    /// warning.
    pub fn new(stores: Vec<GridStore>, allow_matchless: bool) -> Self {
        Self {
            stores,
            allow_matchless,
        }
    }

    pub fn stores(&self) -> &[GridStore] {
        &self.stores
    }

    pub fn stores_mut(&mut self) -> &mut [GridStore] {
        &mut self.stores
    }

    pub fn store_with_id(&self, grid_id: &GridId) -> Option<&GridStore> {
        self.stores.iter().find(|store| store.grid_id() == grid_id)
    }

    pub fn store_with_id_mut(&mut self, grid_id: &GridId) -> Option<&mut GridStore> {
        self.stores.iter_mut().find(|store| store.grid_id() == grid_id)
    }

    /// Apply one collection event. Synchronous; returns once the matched
    /// store has fully reacted or the event was deliberately dropped.
    pub fn apply(
        &mut self,
        host: &dyn CollectionHost,
        event: CollectionEvent,
    ) -> Result<(), PlacementError> {
        match event {
            CollectionEvent::ItemAdded { stack, .. } => {
                let info = ItemInfo::new(stack.clone(), host.collection_of(&stack));
                if let Some(collection) = info.collection.as_ref() {
                    if host.is_collection_ignored(collection) {
                        return Ok(());
                    }
                }
                match self.match_store(host, &info, info.collection.as_ref()) {
                    Some(index) => self.stores[index].on_item_added(host, &stack),
                    None => {
                        if !self.allow_matchless {
                            warn!("no grid admits item '{}'; it remains unplaced", info.item);
                        }
                        Ok(())
                    }
                }
            }
            CollectionEvent::ItemRemoved { item } => {
                if let Some(store) = self.stores.iter_mut().find(|store| store.holds(&item)) {
                    store.on_item_removed(host);
                }
                Ok(())
            }
        }
    }

    /// First store (in registration order) admitting `info` into
    /// `receiving`. More than one match is a configuration smell: warn and
    /// keep the first.
    fn match_store(
        &self,
        host: &dyn CollectionHost,
        info: &ItemInfo,
        receiving: Option<&CollectionId>,
    ) -> Option<usize> {
        let mut matched: Option<usize> = None;
        for (index, store) in self.stores.iter().enumerate() {
            if !store.can_add_item(host, info, receiving) {
                continue;
            }
            match matched {
                None => matched = Some(index),
                Some(first) => warn!(
                    "item '{}' matches both grid '{}' and grid '{}'; first registration wins",
                    info.item,
                    self.stores[first].grid_id(),
                    store.grid_id()
                ),
            }
        }
        matched
    }

    /// Predict which store `info` would land in if the collection accepted
    /// it into `receiving`. Pure; mutates nothing.
    pub fn predict_store(
        &self,
        host: &dyn CollectionHost,
        info: &ItemInfo,
        receiving: Option<&CollectionId>,
    ) -> Option<&GridStore> {
        let preview = info.previewed_in(receiving.cloned());
        self.match_store(host, &preview, receiving)
            .map(|index| &self.stores[index])
    }

    /// The pre-admission check the owning collection runs before accepting:
    /// "if I took this, would the grid have room?"
    pub fn can_add(
        &self,
        host: &dyn CollectionHost,
        info: &ItemInfo,
        receiving: Option<&CollectionId>,
    ) -> bool {
        let preview = info.previewed_in(receiving.cloned());
        match self.predict_store(host, info, receiving) {
            Some(store) => store.find_available_position(host, &preview).is_some(),
            None => self.allow_matchless,
        }
    }

    /// Per-tick maintenance: forget relocation hints in every store. The
    /// host calls this once per synchronization cycle.
    pub fn end_tick(&mut self) {
        for store in &mut self.stores {
            store.end_tick();
        }
    }
}
