// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::{CollectionId, ItemId, ItemKindId};
use super::item::ItemSnapshot;
use super::shape::ItemShape;

/// The owning-collection boundary.
///
/// The engine records *where* stacks sit on a grid; the collection layer
/// owns the stacks themselves (quantities, merging, lifetime). Everything
/// the engine needs to know about an [`ItemId`] goes through this trait,
/// and the engine never duplicates stacking or quantity logic internally.
///
/// All queries are synchronous and side-effect free from the engine's point
/// of view.
pub trait CollectionHost {
    /// The shape attribute of the item's definition. `None` means the item
    /// has no shape attribute and is treated as an implicit 1x1.
    fn shape_of(&self, item: &ItemId) -> Option<ItemShape>;

    /// The item's definition. `None` means the identity is no longer backed
    /// by a live stack (consumed or deleted), which is how the engine tells
    /// "really gone" apart from "relocated".
    fn kind_of(&self, item: &ItemId) -> Option<ItemKindId>;

    /// The collection the stack currently lives in, if any.
    fn collection_of(&self, item: &ItemId) -> Option<CollectionId>;

    /// Unique items never merge, regardless of definition equality.
    fn is_unique(&self, kind: &ItemKindId) -> bool;

    /// Whether two live stacks hold interchangeable item definitions.
    fn stackable_equivalent(&self, a: &ItemId, b: &ItemId) -> bool;

    /// Whether `into`'s collection has room for the *entire* amount of
    /// `incoming` on top of `into`. This is the delegated admission/quantity
    /// check; the engine only ever consumes the yes/no answer.
    fn can_merge(&self, incoming: &ItemId, into: &ItemId) -> bool;

    /// A value snapshot of the stack, captured at placement time.
    fn snapshot_of(&self, item: &ItemId) -> Option<ItemSnapshot>;

    /// Collections whose contents never appear on any grid (e.g. hidden or
    /// loadout collections in the host game).
    fn is_collection_ignored(&self, _collection: &CollectionId) -> bool {
        false
    }
}
