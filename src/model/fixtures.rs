// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};

use smol_str::SmolStr;

use super::host::CollectionHost;
use super::ids::{CollectionId, ItemId, ItemKindId};
use super::item::ItemSnapshot;
use super::shape::ItemShape;
use super::GridPos;

pub(crate) fn item(value: &str) -> ItemId {
    ItemId::new(value).expect("item id")
}

pub(crate) fn kind(value: &str) -> ItemKindId {
    ItemKindId::new(value).expect("kind id")
}

pub(crate) fn coll(value: &str) -> CollectionId {
    CollectionId::new(value).expect("collection id")
}

/// An L-tromino with the anchor on its corner cell.
pub(crate) fn l_tromino() -> ItemShape {
    ItemShape::from_rows(&["#.", "##"], GridPos::new(0, 0)).expect("l-tromino")
}

/// A horizontal 2x1 domino anchored on its left cell.
pub(crate) fn domino() -> ItemShape {
    ItemShape::from_rows(&["##"], GridPos::new(0, 0)).expect("domino")
}

#[derive(Debug, Clone)]
struct TestItem {
    kind: ItemKindId,
    name: SmolStr,
    amount: u32,
    collection: Option<CollectionId>,
    shape: Option<ItemShape>,
    alive: bool,
}

/// In-memory [`CollectionHost`] used by unit tests.
#[derive(Debug, Clone, Default)]
pub(crate) struct TestInventory {
    items: BTreeMap<ItemId, TestItem>,
    unique_kinds: BTreeSet<ItemKindId>,
    ignored: BTreeSet<CollectionId>,
    merge_blocked: BTreeSet<ItemId>,
}

impl TestInventory {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(
        &mut self,
        id: &str,
        item_kind: &str,
        amount: u32,
        collection: Option<&str>,
    ) -> ItemId {
        let item_id = item(id);
        self.items.insert(
            item_id.clone(),
            TestItem {
                kind: kind(item_kind),
                name: SmolStr::new(item_kind),
                amount,
                collection: collection.map(coll),
                shape: None,
                alive: true,
            },
        );
        item_id
    }

    pub(crate) fn add_shaped(
        &mut self,
        id: &str,
        item_kind: &str,
        amount: u32,
        collection: Option<&str>,
        shape: ItemShape,
    ) -> ItemId {
        let item_id = self.add(id, item_kind, amount, collection);
        self.set_shape(&item_id, shape);
        item_id
    }

    pub(crate) fn set_shape(&mut self, item: &ItemId, shape: ItemShape) {
        if let Some(entry) = self.items.get_mut(item) {
            entry.shape = Some(shape);
        }
    }

    pub(crate) fn set_unique(&mut self, item_kind: &str) {
        self.unique_kinds.insert(kind(item_kind));
    }

    /// Simulate the stack being consumed or deleted by the collection.
    pub(crate) fn kill(&mut self, item: &ItemId) {
        if let Some(entry) = self.items.get_mut(item) {
            entry.alive = false;
        }
    }

    pub(crate) fn move_to(&mut self, item: &ItemId, collection: Option<&str>) {
        if let Some(entry) = self.items.get_mut(item) {
            entry.collection = collection.map(coll);
        }
    }

    /// Mark a merge target as having no room for additional amount.
    pub(crate) fn block_merge(&mut self, into: &ItemId) {
        self.merge_blocked.insert(into.clone());
    }

    pub(crate) fn ignore_collection(&mut self, collection: &str) {
        self.ignored.insert(coll(collection));
    }

    fn live(&self, item: &ItemId) -> Option<&TestItem> {
        self.items.get(item).filter(|entry| entry.alive)
    }
}

impl CollectionHost for TestInventory {
    fn shape_of(&self, item: &ItemId) -> Option<ItemShape> {
        self.items.get(item).and_then(|entry| entry.shape.clone())
    }

    fn kind_of(&self, item: &ItemId) -> Option<ItemKindId> {
        self.live(item).map(|entry| entry.kind.clone())
    }

    fn collection_of(&self, item: &ItemId) -> Option<CollectionId> {
        self.live(item).and_then(|entry| entry.collection.clone())
    }

    fn is_unique(&self, kind: &ItemKindId) -> bool {
        self.unique_kinds.contains(kind)
    }

    fn stackable_equivalent(&self, a: &ItemId, b: &ItemId) -> bool {
        match (self.live(a), self.live(b)) {
            (Some(left), Some(right)) => left.kind == right.kind,
            _ => false,
        }
    }

    fn can_merge(&self, incoming: &ItemId, into: &ItemId) -> bool {
        self.live(incoming).is_some() && self.live(into).is_some() && !self.merge_blocked.contains(into)
    }

    fn snapshot_of(&self, item: &ItemId) -> Option<ItemSnapshot> {
        self.live(item).map(|entry| {
            ItemSnapshot::new(item.clone(), entry.kind.clone(), entry.name.clone(), entry.amount)
        })
    }

    fn is_collection_ignored(&self, collection: &CollectionId) -> bool {
        self.ignored.contains(collection)
    }
}
