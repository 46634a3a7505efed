//! World configuration and the mapping between world space and tile cells.
//!
//! Levels may loop horizontally: the column range
//! `level_min_tile_x..level_min_tile_x + level_width_tile` is the canonical
//! strip, and cells outside it are aliases of cells inside it. Every mapping
//! here corrects by at most one level width, since callers never probe further
//! than one width past either edge.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::TileCoord;

/// Immutable per-session description of the level layout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Leftmost tile column of the canonical level strip.
    pub level_min_tile_x: i32,
    /// Number of tile columns in the canonical level strip.
    pub level_width_tile: u32,
    /// Whether the level wraps horizontally.
    #[serde(default)]
    pub looping: bool,
    /// Edge length of one square tile in world units.
    pub tile_size: f32,
    /// World-space position of the lower-left corner of cell `(0, 0)`.
    #[serde(default)]
    pub origin: Vec2,
}

/// Errors raised when a world configuration is missing or unusable.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The tile size was zero, negative, or not finite.
    #[error("tile size must be a positive finite number, got {0}")]
    InvalidTileSize(f32),
    /// A looping level must span at least one column to wrap into.
    #[error("a looping level must span at least one tile column")]
    EmptyLoopingLevel,
    /// A query relied on the active configuration before one was installed.
    #[error("no active world configuration has been installed")]
    NoActiveWorld,
}

impl WorldConfig {
    /// Creates a non-looping configuration anchored at the world origin.
    #[must_use]
    pub const fn new(level_min_tile_x: i32, level_width_tile: u32, tile_size: f32) -> Self {
        Self {
            level_min_tile_x,
            level_width_tile,
            looping: false,
            tile_size,
            origin: Vec2::ZERO,
        }
    }

    /// Returns the configuration with horizontal looping toggled.
    #[must_use]
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Returns the configuration with the grid anchored at `origin`.
    #[must_use]
    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    /// Checks that the configuration can answer queries.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            return Err(ConfigError::InvalidTileSize(self.tile_size));
        }
        if self.looping && self.level_width_tile == 0 {
            return Err(ConfigError::EmptyLoopingLevel);
        }
        Ok(())
    }

    /// Left edge of the canonical strip in world units.
    #[must_use]
    pub fn level_min_x(&self) -> f32 {
        self.origin.x + self.level_min_tile_x as f32 * self.tile_size
    }

    /// Right edge (exclusive) of the canonical strip in world units.
    #[must_use]
    pub fn level_max_x(&self) -> f32 {
        self.level_min_x() + self.level_width_world()
    }

    /// Width of the canonical strip in world units.
    #[must_use]
    pub fn level_width_world(&self) -> f32 {
        self.level_width_tile as f32 * self.tile_size
    }

    /// Maps a world position to the cell containing it.
    ///
    /// With `wrap` set on a looping level the column is folded back into the
    /// canonical strip. Box scans pass `wrap = false` so that the corners of a
    /// box straddling the seam still yield an ascending column range.
    #[must_use]
    pub fn world_to_tile(&self, position: Vec2, wrap: bool) -> TileCoord {
        let local = (position - self.origin) / self.tile_size;
        let mut coord = TileCoord::new(floor_to_i32(local.x), floor_to_i32(local.y));
        if wrap {
            self.wrap_tile(&mut coord);
        }
        coord
    }

    /// Maps a cell to the world position of its lower-left corner.
    #[must_use]
    pub fn tile_to_world(&self, coord: TileCoord) -> Vec2 {
        self.origin + Vec2::new(coord.x() as f32, coord.y() as f32) * self.tile_size
    }

    /// Folds the column of `coord` into the canonical strip in place.
    ///
    /// Non-looping levels leave the coordinate untouched.
    pub fn wrap_tile(&self, coord: &mut TileCoord) {
        if !self.looping {
            return;
        }

        let width = i32::try_from(self.level_width_tile).unwrap_or(i32::MAX);
        let min = self.level_min_tile_x;
        if coord.x < min {
            coord.x = coord.x.saturating_add(width);
        }
        if coord.x >= min.saturating_add(width) {
            coord.x = coord.x.saturating_sub(width);
        }
    }

    /// By-value variant of [`WorldConfig::wrap_tile`].
    #[must_use]
    pub fn wrapped_tile(&self, mut coord: TileCoord) -> TileCoord {
        self.wrap_tile(&mut coord);
        coord
    }

    /// Folds a continuous position back into the canonical strip.
    ///
    /// Returns the adjusted position and whether it crossed the seam, so that
    /// moving entities can relocate anything attached to them as well.
    #[must_use]
    pub fn wrap_world_position(&self, position: Vec2) -> (Vec2, bool) {
        if !self.looping {
            return (position, false);
        }

        let width = self.level_width_world();
        if position.x < self.level_min_x() {
            (Vec2::new(position.x + width, position.y), true)
        } else if position.x >= self.level_max_x() {
            (Vec2::new(position.x - width, position.y), true)
        } else {
            (position, false)
        }
    }

    /// Distance between two positions, measured across the seam when shorter.
    #[must_use]
    pub fn wrapped_distance(&self, a: Vec2, b: Vec2) -> f32 {
        let mut a = a;
        let width = self.level_width_world();
        let dx = a.x - b.x;
        if self.looping && dx.abs() > width / 2.0 {
            a.x -= width * dx.signum();
        }
        a.distance(b)
    }
}

fn floor_to_i32(value: f32) -> i32 {
    // `as` saturates out-of-range floats and maps NaN to zero.
    value.floor() as i32
}
