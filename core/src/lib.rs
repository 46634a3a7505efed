#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Seamgrid spatial-query workspace.
//!
//! This crate defines the value types that connect the authoritative tile
//! world, the pure query systems, and adapters. Adapters submit [`Command`]
//! values describing tile grid mutations, the world executes those commands via
//! its `apply` entry point and broadcasts [`Event`] values describing the
//! outcome. Query systems never mutate; they read the grid through immutable
//! views and answer with plain values.
//!
//! The [`grid`] module maps between continuous world space and integer tile
//! coordinates on levels that may wrap horizontally, and the [`geometry`]
//! module hosts the segment and polygon predicates used for sub-tile collision
//! shapes.

pub mod diff;
pub mod geometry;
pub mod grid;
pub mod tiles;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use diff::{DiffError, TileDiff, CLEARED_PATH};
pub use grid::{ConfigError, WorldConfig};
pub use tiles::{ColliderShape, Polygon, TileDefinition, TileKind, TilePlacement};

/// Commands that express all permissible tile grid mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Places the named tile into a single grid cell.
    PlaceTile {
        /// Cell receiving the tile. Wrapped before storage on looping levels.
        coord: TileCoord,
        /// Name or asset path of the tile to place.
        tile: String,
        /// Transform applied to the tile's collision shapes at this cell.
        placement: TilePlacement,
    },
    /// Removes whatever tile occupies the provided cell.
    ClearTile {
        /// Cell to clear. Wrapped before lookup on looping levels.
        coord: TileCoord,
    },
    /// Records the current contents of a block as the baseline for tile diffs.
    CaptureBaseline {
        /// Block of cells to capture.
        bounds: TileBounds,
    },
    /// Rebuilds the baseline block with the provided diff applied on top.
    ApplyTileDiff {
        /// Changes relative to the captured baseline.
        diff: TileDiff,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a tile now occupies a cell.
    TilePlaced {
        /// Cell that received the tile, after wrapping.
        coord: TileCoord,
        /// Normalised asset path of the placed tile.
        tile: String,
    },
    /// Confirms that a cell was emptied.
    TileCleared {
        /// Cell that was cleared, after wrapping.
        coord: TileCoord,
    },
    /// Reports that a tile placement request was rejected.
    TilePlacementRejected {
        /// Cell provided in the placement request.
        coord: TileCoord,
        /// Tile name provided in the placement request.
        tile: String,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a baseline block was captured.
    BaselineCaptured {
        /// Block that now serves as the diff baseline.
        bounds: TileBounds,
    },
    /// Confirms that a tile diff was applied on top of the baseline.
    TileDiffApplied {
        /// Block that was rewritten.
        bounds: TileBounds,
        /// Number of cells the diff overwrote.
        changed: u32,
    },
    /// Reports that a tile diff could not be applied.
    TileDiffRejected {
        /// Specific reason the diff was refused.
        reason: DiffError,
    },
}

/// Reasons a tile placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The tile name did not resolve to a known tile definition.
    #[error("tile name does not resolve to a known tile")]
    UnknownTile,
}

/// Location of a single tile grid cell.
///
/// Coordinates are signed because looping levels routinely probe cells on
/// either side of the seam before wrapping them back into range.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TileCoord {
    x: i32,
    y: i32,
    layer: i32,
}

impl TileCoord {
    /// Creates a coordinate on the base layer.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y, layer: 0 }
    }

    /// Creates a coordinate on an explicit layer.
    #[must_use]
    pub const fn with_layer(x: i32, y: i32, layer: i32) -> Self {
        Self { x, y, layer }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Layer index of the cell.
    #[must_use]
    pub const fn layer(&self) -> i32 {
        self.layer
    }

    /// Returns the coordinate shifted by the provided column and row deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            layer: self.layer,
        }
    }
}

/// Rectangular block of cells used for bulk grid reads and writes.
///
/// Cells inside the block are addressed by a linear index that advances along
/// the row first: `index = dx + dy * width`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileBounds {
    origin: TileCoord,
    width: u32,
    height: u32,
}

impl TileBounds {
    /// Creates a block anchored at `origin` spanning `width` by `height` cells.
    #[must_use]
    pub const fn new(origin: TileCoord, width: u32, height: u32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Lowest-index cell of the block.
    #[must_use]
    pub const fn origin(&self) -> TileCoord {
        self.origin
    }

    /// Number of columns covered by the block.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows covered by the block.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells contained in the block.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.width) * u64::from(self.height);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Maps a linear block index to the cell it addresses.
    #[must_use]
    pub fn coord_at(&self, index: usize) -> Option<TileCoord> {
        if self.width == 0 || index >= self.cell_count() {
            return None;
        }

        let width = usize::try_from(self.width).ok()?;
        let dx = i32::try_from(index % width).ok()?;
        let dy = i32::try_from(index / width).ok()?;
        Some(self.origin.offset(dx, dy))
    }

    /// Iterates every cell of the block in linear index order.
    pub fn cells(self) -> impl Iterator<Item = TileCoord> {
        (0..self.cell_count()).filter_map(move |index| self.coord_at(index))
    }
}

#[cfg(test)]
mod tests {
    use super::{PlacementError, TileBounds, TileCoord};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tile_bounds_round_trip_through_bincode() {
        let bounds = TileBounds::new(TileCoord::with_layer(-4, 2, 1), 8, 3);
        assert_round_trip(&bounds);
        assert_round_trip(&PlacementError::UnknownTile);
    }

    #[test]
    fn bounds_index_advances_along_rows_first() {
        let bounds = TileBounds::new(TileCoord::new(-2, 5), 3, 2);

        assert_eq!(bounds.coord_at(0), Some(TileCoord::new(-2, 5)));
        assert_eq!(bounds.coord_at(2), Some(TileCoord::new(0, 5)));
        assert_eq!(bounds.coord_at(3), Some(TileCoord::new(-2, 6)));
        assert_eq!(bounds.coord_at(6), None);
    }

    #[test]
    fn bounds_cells_follow_linear_index_order() {
        let bounds = TileBounds::new(TileCoord::new(0, 0), 4, 3);
        let cells: Vec<TileCoord> = bounds.cells().collect();

        assert_eq!(cells.len(), 12);
        assert_eq!(cells[0], TileCoord::new(0, 0));
        assert_eq!(cells[5], TileCoord::new(1, 1));
        assert_eq!(cells[11], TileCoord::new(3, 2));
    }

    #[test]
    fn empty_bounds_have_no_cells() {
        let bounds = TileBounds::new(TileCoord::new(0, 0), 0, 5);
        assert_eq!(bounds.cell_count(), 0);
        assert!(bounds.cells().next().is_none());
    }
}
