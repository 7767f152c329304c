// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use smol_str::SmolStr;

use super::ids::{CollectionId, ItemId, ItemKindId};

/// An item stack viewed as residing in (or destined for) a collection.
///
/// Admission checks build an `ItemInfo` with the *hypothetical* receiving
/// collection to ask "would this grid take the item if the collection
/// accepted it" without mutating anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemInfo {
    pub item: ItemId,
    pub collection: Option<CollectionId>,
}

impl ItemInfo {
    pub fn new(item: ItemId, collection: Option<CollectionId>) -> Self {
        Self { item, collection }
    }

    /// An item with no owning collection (e.g. mid-drag or not yet admitted).
    pub fn loose(item: ItemId) -> Self {
        Self {
            item,
            collection: None,
        }
    }

    /// The same item previewed as if it lived in `collection`.
    pub fn previewed_in(&self, collection: Option<CollectionId>) -> Self {
        Self {
            item: self.item.clone(),
            collection,
        }
    }
}

impl fmt::Display for ItemInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.collection {
            Some(collection) => write!(f, "{}@{}", self.item, collection),
            None => write!(f, "{}@-", self.item),
        }
    }
}

/// Value captured from the host at placement time.
///
/// Snapshots outlive the identity they were taken from: they power the
/// relocation cache (the identity is dead by the time the cache is
/// consulted) and the persistence boundary (re-linking is the caller's
/// job, keyed off the saved identity).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSnapshot {
    pub item: ItemId,
    pub kind: ItemKindId,
    pub name: SmolStr,
    pub amount: u32,
}

impl ItemSnapshot {
    pub fn new(item: ItemId, kind: ItemKindId, name: impl Into<SmolStr>, amount: u32) -> Self {
        Self {
            item,
            kind,
            name: name.into(),
            amount,
        }
    }
}

impl fmt::Display for ItemSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{} ({})", self.name, self.amount, self.kind)
    }
}
