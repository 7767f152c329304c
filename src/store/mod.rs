// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The persistence boundary: grid contents as plain serde values.
//!
//! Item identities do not survive a save/load cycle, so cells serialize to
//! the snapshot captured at placement time and deserialization re-links
//! each saved snapshot to a live identity through a caller-supplied
//! resolver.

use std::collections::BTreeMap;
use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::grid::{GridCell, GridStore};
use crate::model::{IdError, ItemId, ItemKindId, ItemSnapshot};

/// The saved form of one occupying stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedItem {
    pub item: String,
    pub kind: String,
    pub name: String,
    pub amount: u32,
}

impl SavedItem {
    fn from_snapshot(snapshot: &ItemSnapshot) -> Self {
        Self {
            item: snapshot.item.as_str().to_owned(),
            kind: snapshot.kind.as_str().to_owned(),
            name: snapshot.name.to_string(),
            amount: snapshot.amount,
        }
    }

    fn to_snapshot(&self) -> Result<ItemSnapshot, IdError> {
        Ok(ItemSnapshot::new(
            ItemId::new(&self.item)?,
            ItemKindId::new(&self.kind)?,
            SmolStr::new(&self.name),
            self.amount,
        ))
    }
}

/// The saved form of one cell, row-major position implied by array index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<SavedItem>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub anchor: bool,
}

impl SavedCell {
    fn empty() -> Self {
        Self {
            item: None,
            anchor: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreError {
    /// The saved cell array does not match the grid's dimensions.
    SizeMismatch { expected: usize, found: usize },
    /// A saved cell carries an identity string that is not a valid id.
    InvalidId { cell: usize, source: IdError },
}

impl fmt::Display for RestoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, found } => {
                write!(f, "saved grid has {found} cells but the grid expects {expected}")
            }
            Self::InvalidId { cell, source } => {
                write!(f, "saved cell {cell} carries an invalid id: {source}")
            }
        }
    }
}

impl std::error::Error for RestoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidId { source, .. } => Some(source),
            Self::SizeMismatch { .. } => None,
        }
    }
}

/// Serialize a store's contents as a row-major cell array.
///
/// Cells whose occupant has no recorded snapshot (which indicates a bug in
/// the placement path) are saved as empty rather than aborting the save.
pub fn serialize_cells(store: &GridStore) -> Vec<SavedCell> {
    store
        .occupancy()
        .cells()
        .iter()
        .map(|cell| {
            let Some(occupant) = cell.occupant() else {
                return SavedCell::empty();
            };
            let Some(snapshot) = store.snapshot_of(occupant) else {
                warn!("item '{occupant}' occupies grid '{}' without a snapshot; saving the cell as empty",
                    store.grid_id());
                return SavedCell::empty();
            };
            SavedCell {
                item: Some(SavedItem::from_snapshot(snapshot)),
                anchor: cell.anchor_flag(),
            }
        })
        .collect()
}

/// Restore a store's contents from a saved cell array.
///
/// `resolve` maps each saved snapshot back to a live identity (typically by
/// matching against the items the collection just re-created on load). A
/// snapshot the resolver cannot place becomes an empty cell with a warning;
/// a size mismatch or malformed id aborts the restore with the store
/// untouched.
pub fn deserialize_cells<R>(
    store: &mut GridStore,
    saved: &[SavedCell],
    mut resolve: R,
) -> Result<(), RestoreError>
where
    R: FnMut(&ItemSnapshot) -> Option<ItemId>,
{
    let expected = store.size().count();
    if saved.len() != expected {
        return Err(RestoreError::SizeMismatch {
            expected,
            found: saved.len(),
        });
    }

    let mut cells = Vec::with_capacity(expected);
    let mut snapshots: BTreeMap<ItemId, ItemSnapshot> = BTreeMap::new();
    let mut resolved: BTreeMap<String, Option<ItemId>> = BTreeMap::new();

    for (index, cell) in saved.iter().enumerate() {
        let Some(saved_item) = cell.item.as_ref() else {
            cells.push(GridCell::empty());
            continue;
        };
        let snapshot = saved_item
            .to_snapshot()
            .map_err(|source| RestoreError::InvalidId { cell: index, source })?;

        // Resolve each saved identity once so a multi-cell footprint maps
        // to one live item.
        let live = resolved
            .entry(saved_item.item.clone())
            .or_insert_with(|| {
                let live = resolve(&snapshot);
                if live.is_none() {
                    warn!(
                        "saved item '{snapshot}' could not be matched to a live item; its cells are restored as empty"
                    );
                }
                live
            })
            .clone();

        match live {
            Some(item) => {
                snapshots.insert(item.clone(), relabeled(&snapshot, &item));
                cells.push(GridCell::occupied(item, cell.anchor));
            }
            None => cells.push(GridCell::empty()),
        }
    }

    store.replace_contents(cells, snapshots);
    Ok(())
}

fn relabeled(snapshot: &ItemSnapshot, item: &ItemId) -> ItemSnapshot {
    ItemSnapshot::new(
        item.clone(),
        snapshot.kind.clone(),
        snapshot.name.clone(),
        snapshot.amount,
    )
}
