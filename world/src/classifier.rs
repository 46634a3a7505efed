//! Collider classification of grid cells.

use seamgrid_core::{ColliderShape, TileCoord, WorldConfig};

use crate::grid::TileGrid;

/// Classifies the cell at `coord`, wrapping it across the seam first.
///
/// Empty cells and relocator tiles report [`ColliderShape::None`].
#[must_use]
pub fn classify(grid: &TileGrid, config: &WorldConfig, coord: TileCoord) -> ColliderShape {
    grid.get(config.wrapped_tile(coord))
        .map_or(ColliderShape::None, |placed| placed.tile().collider())
}
