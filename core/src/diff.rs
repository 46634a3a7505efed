//! Tile diff exchanged between peers that share a baseline tile block.
//!
//! A diff lists each distinct tile asset path once and maps linear cell
//! indices inside the baseline block to positions in that list. Cells absent
//! from the mapping are unchanged. The empty path stands for a cleared cell.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Asset path recorded for cells that were emptied.
pub const CLEARED_PATH: &str = "";

/// Changes to a tile block relative to a shared baseline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDiff {
    tiles: Vec<String>,
    changes: BTreeMap<u32, u32>,
}

/// Reasons a tile diff cannot be captured or applied.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DiffError {
    /// No baseline block has been captured yet.
    #[error("no baseline tile block has been captured")]
    MissingBaseline,
    /// A change addressed a cell outside the baseline block.
    #[error("cell index {index} lies outside a block of {cell_count} cells")]
    IndexOutOfBounds {
        /// Offending linear cell index.
        index: u32,
        /// Number of cells in the baseline block.
        cell_count: usize,
    },
    /// A change referenced a path slot the diff does not contain.
    #[error("cell index {index} references missing path slot {path_index}")]
    UnknownPath {
        /// Linear cell index of the change.
        index: u32,
        /// Path slot the change referenced.
        path_index: u32,
    },
}

impl TileDiff {
    /// Creates an empty diff.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a diff from its raw parts, as received from a peer.
    #[must_use]
    pub fn from_parts(tiles: Vec<String>, changes: BTreeMap<u32, u32>) -> Self {
        Self { tiles, changes }
    }

    /// Distinct asset paths referenced by the diff.
    #[must_use]
    pub fn tiles(&self) -> &[String] {
        &self.tiles
    }

    /// Mapping from linear cell index to path slot.
    #[must_use]
    pub fn changes(&self) -> &BTreeMap<u32, u32> {
        &self.changes
    }

    /// Number of changed cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Whether the diff changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Records that the cell at `index` now holds the tile at `path`.
    ///
    /// Paths are interned in first-seen order.
    pub fn record(&mut self, index: u32, path: &str) {
        let slot = match self.tiles.iter().position(|known| known == path) {
            Some(slot) => slot,
            None => {
                self.tiles.push(path.to_owned());
                self.tiles.len() - 1
            }
        };
        let slot = u32::try_from(slot).unwrap_or(u32::MAX);
        let _ = self.changes.insert(index, slot);
    }

    /// Checks every change against a block of `cell_count` cells.
    pub fn validate(&self, cell_count: usize) -> Result<(), DiffError> {
        for (&index, &path_index) in &self.changes {
            let in_bounds = usize::try_from(index).map_or(false, |value| value < cell_count);
            if !in_bounds {
                return Err(DiffError::IndexOutOfBounds { index, cell_count });
            }
            let known = usize::try_from(path_index).map_or(false, |slot| slot < self.tiles.len());
            if !known {
                return Err(DiffError::UnknownPath { index, path_index });
            }
        }
        Ok(())
    }

    /// Iterates changes as `(cell index, path)` pairs in ascending index order.
    ///
    /// Changes referencing unknown path slots are skipped; call
    /// [`TileDiff::validate`] first to reject them instead.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.changes.iter().filter_map(|(&index, &path_index)| {
            let slot = usize::try_from(path_index).ok()?;
            self.tiles.get(slot).map(|path| (index, path.as_str()))
        })
    }
}
