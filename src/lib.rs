// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Proteus — a shaped-grid item placement engine.
//!
//! Items with multi-cell "Tetris" footprints are placed onto fixed-size
//! grids with no overlap; the engine owns positions and footprints while
//! the hosting collection (behind [`model::CollectionHost`]) owns item
//! lifetime, amounts, and merging.

pub mod filter;
pub mod grid;
pub mod model;
pub mod router;
pub mod store;
