//! Name-keyed tile definition cache.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use seamgrid_core::TileDefinition;
use tracing::debug;

/// Prefix every tile asset path carries.
pub const TILE_PATH_PREFIX: &str = "tiles/";

/// Provider that loads tile definitions by normalised asset path.
pub trait TileSource: Send + Sync {
    /// Loads the definition stored at `path`, or `None` when no such asset exists.
    fn load(&self, path: &str) -> Option<TileDefinition>;
}

impl TileSource for HashMap<String, TileDefinition> {
    fn load(&self, path: &str) -> Option<TileDefinition> {
        let name = path.strip_prefix(TILE_PATH_PREFIX).unwrap_or(path);
        self.get(path).or_else(|| self.get(name)).cloned()
    }
}

/// Normalises a tile name into its asset path.
///
/// The empty name denotes "no tile" and yields `None`.
#[must_use]
pub fn normalize_path(name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    if name.starts_with(TILE_PATH_PREFIX) {
        Some(name.to_owned())
    } else {
        Some(format!("{TILE_PATH_PREFIX}{name}"))
    }
}

/// Lazily populated cache in front of a [`TileSource`].
///
/// Misses are cached too, so an unknown name hits the source once.
pub struct TileLibrary {
    source: Box<dyn TileSource>,
    cache: RwLock<HashMap<String, Option<Arc<TileDefinition>>>>,
}

impl TileLibrary {
    /// Creates an empty cache in front of `source`.
    pub fn new(source: impl TileSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolves a tile name or asset path to its shared definition.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<Arc<TileDefinition>> {
        let path = normalize_path(name)?;
        if let Some(cached) = self.read_cache().get(&path) {
            return cached.clone();
        }

        let loaded = self.source.load(&path).map(Arc::new);
        if loaded.is_none() {
            debug!(path = %path, "tile asset did not resolve");
        }

        self.write_cache().entry(path).or_insert(loaded).clone()
    }

    /// Number of cached lookups, hits and misses alike.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.read_cache().len()
    }

    /// Drops every cached lookup so the next resolution reloads from the source.
    pub fn reset(&self) {
        self.write_cache().clear();
    }

    fn read_cache(&self) -> RwLockReadGuard<'_, HashMap<String, Option<Arc<TileDefinition>>>> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, HashMap<String, Option<Arc<TileDefinition>>>> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for TileLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileLibrary")
            .field("cached", &self.cached_len())
            .finish_non_exhaustive()
    }
}
