// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model: ids, grid geometry, shapes, and the collection boundary.
//!
//! Everything here is a plain value type; the mutable occupancy state lives
//! in [`crate::grid`].

#[cfg(test)]
pub(crate) mod fixtures;
pub mod geometry;
pub mod host;
pub mod ids;
pub mod item;
pub mod shape;

pub use geometry::{GridPos, GridSize, GridSizeError};
pub use host::CollectionHost;
pub use ids::{CollectionId, GridId, Id, IdError, ItemId, ItemKindId};
pub use item::{ItemInfo, ItemSnapshot};
pub use shape::{ItemShape, ShapeError};
