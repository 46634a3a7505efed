//! Point-overlap queries against colliders that do not belong to the tile grid.

use glam::Vec2;

/// Tag carried by player colliders, which never count as solid terrain.
pub const PLAYER_TAG: &str = "player";

/// Collider reported by a broad-phase overlap query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColliderHit<'a> {
    /// Whether the collider only reports overlaps without blocking.
    pub is_trigger: bool,
    /// Optional tag identifying what owns the collider.
    pub tag: Option<&'a str>,
}

impl ColliderHit<'_> {
    /// Whether the hit should make a solidity probe report solid.
    #[must_use]
    pub fn blocks_probe(&self) -> bool {
        !self.is_trigger && self.tag != Some(PLAYER_TAG)
    }
}

/// Provider of non-tile colliders.
pub trait BroadPhase {
    /// Reports whether any collider overlapping `point` satisfies `accept`.
    fn any_overlap(&self, point: Vec2, accept: &dyn Fn(&ColliderHit<'_>) -> bool) -> bool;
}

/// Broad phase without any colliders.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoBroadPhase;

impl BroadPhase for NoBroadPhase {
    fn any_overlap(&self, _point: Vec2, _accept: &dyn Fn(&ColliderHit<'_>) -> bool) -> bool {
        false
    }
}

/// Axis-aligned box collider.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticCollider {
    min: Vec2,
    max: Vec2,
    is_trigger: bool,
    tag: Option<String>,
}

impl StaticCollider {
    /// Creates a blocking, untagged box from its center and full size.
    #[must_use]
    pub fn new(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
            is_trigger: false,
            tag: None,
        }
    }

    /// Marks the collider as a trigger.
    #[must_use]
    pub fn with_trigger(mut self, is_trigger: bool) -> Self {
        self.is_trigger = is_trigger;
        self
    }

    /// Attaches an owner tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Whether `point` lies inside or on the box.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Hit description for overlap filtering.
    #[must_use]
    pub fn hit(&self) -> ColliderHit<'_> {
        ColliderHit {
            is_trigger: self.is_trigger,
            tag: self.tag.as_deref(),
        }
    }
}

/// Fixed list of box colliders, scanned linearly.
#[derive(Clone, Debug, Default)]
pub struct StaticColliders {
    colliders: Vec<StaticCollider>,
}

impl StaticColliders {
    /// Creates the broad phase from its colliders.
    #[must_use]
    pub fn new(colliders: Vec<StaticCollider>) -> Self {
        Self { colliders }
    }

    /// Number of colliders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Whether the broad phase holds no colliders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

impl BroadPhase for StaticColliders {
    fn any_overlap(&self, point: Vec2, accept: &dyn Fn(&ColliderHit<'_>) -> bool) -> bool {
        self.colliders
            .iter()
            .filter(|collider| collider.contains(point))
            .any(|collider| accept(&collider.hit()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triggers_and_players_do_not_block() {
        let colliders = StaticColliders::new(vec![
            StaticCollider::new(Vec2::new(0.0, 0.0), Vec2::splat(2.0)).with_trigger(true),
            StaticCollider::new(Vec2::new(5.0, 0.0), Vec2::splat(2.0)).with_tag(PLAYER_TAG),
            StaticCollider::new(Vec2::new(10.0, 0.0), Vec2::splat(2.0)).with_tag("crate"),
        ]);
        let blocks = |hit: &ColliderHit<'_>| hit.blocks_probe();

        assert!(!colliders.any_overlap(Vec2::new(0.5, 0.5), &blocks));
        assert!(!colliders.any_overlap(Vec2::new(5.0, 1.0), &blocks));
        assert!(colliders.any_overlap(Vec2::new(11.0, -1.0), &blocks));
        assert!(!colliders.any_overlap(Vec2::new(11.5, 0.0), &blocks));
    }

    #[test]
    fn negative_sizes_are_normalised() {
        let collider = StaticCollider::new(Vec2::ZERO, Vec2::new(-2.0, 2.0));
        assert!(collider.contains(Vec2::new(-1.0, 1.0)));
        assert!(!collider.contains(Vec2::new(-1.5, 0.0)));
    }
}
