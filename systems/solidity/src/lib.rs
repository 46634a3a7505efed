#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system answering solidity queries against a frozen tile grid.
//!
//! Cell checks classify a single wrapped cell. Point checks consult the broad
//! phase first, follow relocator tiles, and test sprite outlines at sub-cell
//! precision. Box scans iterate the unwrapped cell range and wrap each cell
//! on the way in, so a box straddling the seam still yields an ascending range.

mod broad_phase;

pub use broad_phase::{
    BroadPhase, ColliderHit, NoBroadPhase, StaticCollider, StaticColliders, PLAYER_TAG,
};

use glam::Vec2;
use seamgrid_core::{ColliderShape, TileCoord};
use seamgrid_world::query::TileView;
use thiserror::Error;
use tracing::warn;

/// Maximum relocator hops a single probe may take.
pub const DEFAULT_RELOCATOR_LIMIT: u32 = 64;

/// Logic errors surfaced by solidity queries.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum SolidityError {
    /// Relocator tiles kept redirecting the probe, most likely through a cycle.
    #[error("relocator chain starting at {start} exceeded {hops} hops")]
    RelocatorChainExceeded {
        /// Position the probe started from.
        start: Vec2,
        /// Hops taken before giving up.
        hops: u32,
    },
}

/// Solidity query system.
#[derive(Clone, Debug)]
pub struct Solidity<B = NoBroadPhase> {
    broad_phase: B,
    relocator_limit: u32,
}

impl Solidity {
    /// Creates a solidity system without a broad phase.
    #[must_use]
    pub fn new() -> Self {
        Self::with_broad_phase(NoBroadPhase)
    }
}

impl Default for Solidity {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: BroadPhase> Solidity<B> {
    /// Creates a solidity system that consults `broad_phase` for point probes.
    #[must_use]
    pub fn with_broad_phase(broad_phase: B) -> Self {
        Self {
            broad_phase,
            relocator_limit: DEFAULT_RELOCATOR_LIMIT,
        }
    }

    /// Overrides the relocator hop limit.
    #[must_use]
    pub fn with_relocator_limit(mut self, relocator_limit: u32) -> Self {
        self.relocator_limit = relocator_limit;
        self
    }

    /// Broad phase consulted by point probes.
    #[must_use]
    pub fn broad_phase(&self) -> &B {
        &self.broad_phase
    }

    /// Whether the cell at `coord` is solid as a whole.
    ///
    /// Sprite-shaped tiles are not solid at cell granularity.
    #[must_use]
    pub fn is_tile_solid(&self, view: &TileView<'_>, coord: TileCoord) -> bool {
        view.classify(coord) == ColliderShape::FullCell
    }

    /// Cell-granularity check of the cell containing `position`.
    #[must_use]
    pub fn is_solid_at_position(&self, view: &TileView<'_>, position: Vec2) -> bool {
        self.is_tile_solid(view, view.config().world_to_tile(position, true))
    }

    /// Whether the world position is solid, at sub-cell precision for sprite outlines.
    pub fn is_point_solid(&self, view: &TileView<'_>, position: Vec2) -> Result<bool, SolidityError> {
        if self
            .broad_phase
            .any_overlap(position, &|hit: &ColliderHit<'_>| hit.blocks_probe())
        {
            return Ok(true);
        }

        let probe = self.chase_relocators(view, position)?;
        let config = view.config();
        match view.classify(config.world_to_tile(probe, true)) {
            ColliderShape::FullCell => Ok(true),
            ColliderShape::None => Ok(false),
            ColliderShape::SpriteShape => {
                let Some(placed) = view.tile_at_position(probe) else {
                    return Ok(false);
                };
                let anchor = config.tile_to_world(config.world_to_tile(probe, false));
                let local = position - anchor;
                let transform = placed.placement().transform();
                Ok(placed
                    .tile()
                    .physics_shapes()
                    .iter()
                    .any(|shape| shape.transformed(transform).contains(local)))
            }
        }
    }

    /// Whether any cell overlapped by the box is solid as a whole.
    #[must_use]
    pub fn is_any_solid_in_box(&self, view: &TileView<'_>, center: Vec2, size: Vec2) -> bool {
        let config = view.config();
        let half = size * 0.5;
        let min = config.world_to_tile(center - half, false);
        let max = config.world_to_tile(center + half, false);

        (min.y()..=max.y()).any(|y| {
            (min.x()..=max.x())
                .any(|x| self.is_tile_solid(view, TileCoord::with_layer(x, y, min.layer())))
        })
    }

    fn chase_relocators(&self, view: &TileView<'_>, start: Vec2) -> Result<Vec2, SolidityError> {
        let mut probe = start;
        let mut hops = 0_u32;
        while let Some(offset) = view
            .tile_at_position(probe)
            .and_then(|placed| placed.tile().relocation())
        {
            if hops >= self.relocator_limit {
                warn!(%start, hops, "relocator chain did not terminate");
                return Err(SolidityError::RelocatorChainExceeded { start, hops });
            }
            probe += offset * 0.5;
            hops += 1;
        }
        Ok(probe)
    }
}
