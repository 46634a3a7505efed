#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative tile world state for Seamgrid.
//!
//! The world owns the live tile grid, the tile library cache and the baseline
//! block used for diff exchange. Mutations arrive as [`Command`] values through
//! [`apply`]; reads go through [`query`].

pub mod active;
mod classifier;
mod grid;
mod library;

pub use classifier::classify;
pub use grid::{PlacedTile, TileGrid};
pub use library::{normalize_path, TileLibrary, TileSource, TILE_PATH_PREFIX};

use seamgrid_core::{
    Command, ConfigError, DiffError, Event, PlacementError, TileBounds, TileDiff, TilePlacement,
    WorldConfig,
};
use tracing::{debug, warn};

/// Tile block captured as the shared starting point for diff exchange.
#[derive(Clone, Debug)]
struct Baseline {
    bounds: TileBounds,
    tiles: Vec<Option<PlacedTile>>,
}

/// Represents the authoritative Seamgrid world state.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    grid: TileGrid,
    library: TileLibrary,
    baseline: Option<Baseline>,
}

impl World {
    /// Creates an empty world over `config`, resolving tiles through `source`.
    pub fn new(config: WorldConfig, source: impl TileSource + 'static) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            grid: TileGrid::new(),
            library: TileLibrary::new(source),
            baseline: None,
        })
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceTile {
            coord,
            tile,
            placement,
        } => {
            let coord = world.config.wrapped_tile(coord);
            match world.library.resolve(&tile) {
                Some(definition) => {
                    let path = normalize_path(definition.name()).unwrap_or_default();
                    let _ = world
                        .grid
                        .set(coord, PlacedTile::new(definition, placement));
                    out_events.push(Event::TilePlaced { coord, tile: path });
                }
                None => out_events.push(Event::TilePlacementRejected {
                    coord,
                    tile,
                    reason: PlacementError::UnknownTile,
                }),
            }
        }
        Command::ClearTile { coord } => {
            let coord = world.config.wrapped_tile(coord);
            if world.grid.clear(coord).is_some() {
                out_events.push(Event::TileCleared { coord });
            }
        }
        Command::CaptureBaseline { bounds } => {
            let tiles = world.grid.block(bounds, &world.config);
            world.baseline = Some(Baseline { bounds, tiles });
            out_events.push(Event::BaselineCaptured { bounds });
        }
        Command::ApplyTileDiff { diff } => match apply_diff(world, &diff) {
            Ok((bounds, changed)) => {
                debug!(changed, "applied tile diff");
                out_events.push(Event::TileDiffApplied { bounds, changed });
            }
            Err(reason) => {
                warn!(%reason, "rejected tile diff");
                out_events.push(Event::TileDiffRejected { reason });
            }
        },
    }
}

fn apply_diff(world: &mut World, diff: &TileDiff) -> Result<(TileBounds, u32), DiffError> {
    let baseline = world.baseline.as_ref().ok_or(DiffError::MissingBaseline)?;
    diff.validate(baseline.tiles.len())?;

    let bounds = baseline.bounds;
    let mut block = baseline.tiles.clone();
    let mut changed = 0_u32;
    for (index, path) in diff.iter() {
        let tile = world
            .library
            .resolve(path)
            .map(|definition| PlacedTile::new(definition, TilePlacement::IDENTITY));
        let slot = usize::try_from(index)
            .ok()
            .and_then(|position| block.get_mut(position));
        if let Some(slot) = slot {
            *slot = tile;
            changed = changed.saturating_add(1);
        }
    }

    world.grid.set_block(bounds, &world.config, &block);
    Ok((bounds, changed))
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use seamgrid_core::{
        ColliderShape, DiffError, TileBounds, TileCoord, TileDiff, WorldConfig, CLEARED_PATH,
    };

    use super::{classifier, normalize_path, PlacedTile, TileGrid, TileLibrary, World};

    /// Grid mapping the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }

    /// Provides read-only access to the live tile grid.
    #[must_use]
    pub fn tile_grid(world: &World) -> &TileGrid {
        &world.grid
    }

    /// Provides read-only access to the tile library cache.
    #[must_use]
    pub fn tile_library(world: &World) -> &TileLibrary {
        &world.library
    }

    /// Bounds of the captured baseline block, if any.
    #[must_use]
    pub fn baseline_bounds(world: &World) -> Option<TileBounds> {
        world.baseline.as_ref().map(|baseline| baseline.bounds)
    }

    /// Captures a read-only view used by the solidity queries.
    #[must_use]
    pub fn tile_view(world: &World) -> TileView<'_> {
        TileView {
            config: &world.config,
            grid: &world.grid,
        }
    }

    /// Computes the changes between the baseline block and the live grid.
    ///
    /// Cells are compared by tile name; placement differences alone are not
    /// reported.
    pub fn tile_diff(world: &World) -> Result<TileDiff, DiffError> {
        let baseline = world
            .baseline
            .as_ref()
            .ok_or(DiffError::MissingBaseline)?;
        let current = world.grid.block(baseline.bounds, &world.config);

        let mut diff = TileDiff::new();
        for (index, (before, after)) in baseline.tiles.iter().zip(&current).enumerate() {
            let before_name = before.as_ref().map(|placed| placed.tile().name());
            let after_name = after.as_ref().map(|placed| placed.tile().name());
            if before_name == after_name {
                continue;
            }

            let path = after_name
                .and_then(normalize_path)
                .unwrap_or_else(|| CLEARED_PATH.to_owned());
            diff.record(u32::try_from(index).unwrap_or(u32::MAX), &path);
        }
        Ok(diff)
    }

    /// Read-only view over the grid mapping and live tiles.
    #[derive(Clone, Copy, Debug)]
    pub struct TileView<'a> {
        config: &'a WorldConfig,
        grid: &'a TileGrid,
    }

    impl<'a> TileView<'a> {
        /// Grid mapping backing the view.
        #[must_use]
        pub const fn config(&self) -> &'a WorldConfig {
            self.config
        }

        /// Tile stored at `coord` after seam wrapping.
        #[must_use]
        pub fn tile_at(&self, coord: TileCoord) -> Option<&'a PlacedTile> {
            self.grid.get(self.config.wrapped_tile(coord))
        }

        /// Tile covering the world position after seam wrapping.
        #[must_use]
        pub fn tile_at_position(&self, position: Vec2) -> Option<&'a PlacedTile> {
            self.tile_at(self.config.world_to_tile(position, true))
        }

        /// Collider classification of the cell at `coord`.
        #[must_use]
        pub fn classify(&self, coord: TileCoord) -> ColliderShape {
            classifier::classify(self.grid, self.config, coord)
        }
    }
}
