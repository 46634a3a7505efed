//! Live tile grid storage.

use std::{collections::BTreeMap, sync::Arc};

use seamgrid_core::{TileBounds, TileCoord, TileDefinition, TilePlacement, WorldConfig};

/// Tile occupying a grid cell together with its per-cell placement.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedTile {
    tile: Arc<TileDefinition>,
    placement: TilePlacement,
}

impl PlacedTile {
    /// Pairs a shared tile definition with the placement used at one cell.
    #[must_use]
    pub fn new(tile: Arc<TileDefinition>, placement: TilePlacement) -> Self {
        Self { tile, placement }
    }

    /// Definition of the placed tile.
    #[must_use]
    pub fn tile(&self) -> &TileDefinition {
        &self.tile
    }

    /// Transform applied to the tile's physics outlines at this cell.
    #[must_use]
    pub const fn placement(&self) -> &TilePlacement {
        &self.placement
    }
}

/// Sparse map of occupied cells keyed by coordinate.
///
/// Coordinates are stored exactly as given. The world wraps every coordinate
/// through its [`WorldConfig`] before storing, so on looping levels only
/// columns inside the canonical strip are ever occupied.
#[derive(Clone, Debug, Default)]
pub struct TileGrid {
    cells: BTreeMap<TileCoord, PlacedTile>,
}

impl TileGrid {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Tile stored at `coord`, if any.
    #[must_use]
    pub fn get(&self, coord: TileCoord) -> Option<&PlacedTile> {
        self.cells.get(&coord)
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Copies the contents of `bounds` in linear block order.
    ///
    /// Each cell is wrapped through `config` first, so blocks may straddle the
    /// seam of a looping level.
    #[must_use]
    pub fn block(&self, bounds: TileBounds, config: &WorldConfig) -> Vec<Option<PlacedTile>> {
        bounds
            .cells()
            .map(|coord| self.get(config.wrapped_tile(coord)).cloned())
            .collect()
    }

    pub(crate) fn set(&mut self, coord: TileCoord, tile: PlacedTile) -> Option<PlacedTile> {
        self.cells.insert(coord, tile)
    }

    pub(crate) fn clear(&mut self, coord: TileCoord) -> Option<PlacedTile> {
        self.cells.remove(&coord)
    }

    /// Overwrites `bounds` with `tiles`, given in linear block order.
    ///
    /// Cells are wrapped like [`TileGrid::block`]; cells beyond the end of
    /// `tiles` are cleared.
    pub(crate) fn set_block(
        &mut self,
        bounds: TileBounds,
        config: &WorldConfig,
        tiles: &[Option<PlacedTile>],
    ) {
        for (index, coord) in bounds.cells().enumerate() {
            let coord = config.wrapped_tile(coord);
            match tiles.get(index).cloned().flatten() {
                Some(tile) => {
                    let _ = self.cells.insert(coord, tile);
                }
                None => {
                    let _ = self.cells.remove(&coord);
                }
            }
        }
    }
}
