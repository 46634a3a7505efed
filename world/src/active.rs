//! Process-wide active world configuration.
//!
//! Collaborators that cannot thread a [`WorldConfig`] through their call
//! chain read the installed one here. Every accessor fails with
//! [`ConfigError::NoActiveWorld`] until [`install`] has been called.

use std::sync::{PoisonError, RwLock};

use glam::Vec2;
use seamgrid_core::{ConfigError, TileCoord, WorldConfig};
use tracing::info;

static ACTIVE: RwLock<Option<WorldConfig>> = RwLock::new(None);

/// Installs `config` as the active world, returning the one it replaced.
pub fn install(config: WorldConfig) -> Result<Option<WorldConfig>, ConfigError> {
    config.validate()?;
    info!(
        min_tile_x = config.level_min_tile_x,
        width = config.level_width_tile,
        looping = config.looping,
        "installed active world"
    );
    let mut active = ACTIVE.write().unwrap_or_else(PoisonError::into_inner);
    Ok(active.replace(config))
}

/// Removes the active world, returning it if one was installed.
pub fn clear() -> Option<WorldConfig> {
    ACTIVE
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
}

/// Copy of the active world configuration.
pub fn current() -> Result<WorldConfig, ConfigError> {
    let active = *ACTIVE.read().unwrap_or_else(PoisonError::into_inner);
    active.ok_or(ConfigError::NoActiveWorld)
}

/// [`WorldConfig::world_to_tile`] against the active world.
pub fn world_to_tile(position: Vec2, wrap: bool) -> Result<TileCoord, ConfigError> {
    Ok(current()?.world_to_tile(position, wrap))
}

/// [`WorldConfig::tile_to_world`] against the active world.
pub fn tile_to_world(coord: TileCoord) -> Result<Vec2, ConfigError> {
    Ok(current()?.tile_to_world(coord))
}

/// [`WorldConfig::wrapped_tile`] against the active world.
pub fn wrap_tile(coord: TileCoord) -> Result<TileCoord, ConfigError> {
    Ok(current()?.wrapped_tile(coord))
}

/// [`WorldConfig::wrap_world_position`] against the active world.
pub fn wrap_world_position(position: Vec2) -> Result<(Vec2, bool), ConfigError> {
    Ok(current()?.wrap_world_position(position))
}

/// [`WorldConfig::wrapped_distance`] against the active world.
pub fn wrapped_distance(a: Vec2, b: Vec2) -> Result<f32, ConfigError> {
    Ok(current()?.wrapped_distance(a, b))
}
