//! Tile definitions and their collision classification.

use glam::{Affine2, Vec2};
use serde::{Deserialize, Serialize};

use crate::geometry;

/// Solidity classification of a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColliderShape {
    /// The tile never blocks.
    #[default]
    None,
    /// The whole grid cell blocks.
    FullCell,
    /// The tile blocks inside the outlines of its sprite's physics shapes.
    SpriteShape,
}

/// Closed set of tile kinds, resolved once when a definition is loaded.
#[derive(Clone, Debug, PartialEq)]
pub enum TileKind {
    /// Static tile with a fixed collider.
    Plain {
        /// Collider the tile always reports.
        collider: ColliderShape,
    },
    /// Animated tile; the collider is configured independently of its frames.
    Animated {
        /// Collider configured for the animation.
        collider: ColliderShape,
    },
    /// Rule tile whose neighbours pick the sprite; only the default collider matters here.
    Rule {
        /// Collider used for every sprite the rule selects.
        default_collider: ColliderShape,
    },
    /// Non-solid tile that redirects solidity probes toward a neighbouring position.
    Relocator {
        /// Displacement, in world units, of which each probe hop travels half.
        offset: Vec2,
    },
}

impl TileKind {
    /// Collider reported for this kind. Relocators never block on their own.
    #[must_use]
    pub const fn collider(&self) -> ColliderShape {
        match self {
            Self::Plain { collider } | Self::Animated { collider } => *collider,
            Self::Rule { default_collider } => *default_collider,
            Self::Relocator { .. } => ColliderShape::None,
        }
    }
}

/// Closed polygon outline expressed in cell-local world units.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    points: Vec<Vec2>,
}

impl Polygon {
    /// Creates a polygon from its ordered vertices.
    #[must_use]
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    /// Ordered vertices of the outline.
    #[must_use]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Returns a copy with every vertex mapped through `transform`.
    #[must_use]
    pub fn transformed(&self, transform: &Affine2) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|point| transform.transform_point2(*point))
                .collect(),
        }
    }

    /// Reports whether `point` lies inside or on the outline.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        geometry::point_in_polygon(&self.points, point)
    }
}

/// Named tile asset with its kind and optional physics outlines.
#[derive(Clone, Debug, PartialEq)]
pub struct TileDefinition {
    name: String,
    kind: TileKind,
    physics_shapes: Vec<Polygon>,
}

impl TileDefinition {
    /// Creates a definition without physics outlines.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TileKind) -> Self {
        Self {
            name: name.into(),
            kind,
            physics_shapes: Vec::new(),
        }
    }

    /// Attaches the sprite physics outlines used by [`ColliderShape::SpriteShape`].
    #[must_use]
    pub fn with_physics_shapes(mut self, physics_shapes: Vec<Polygon>) -> Self {
        self.physics_shapes = physics_shapes;
        self
    }

    /// Name the tile was registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind resolved at load time.
    #[must_use]
    pub const fn kind(&self) -> &TileKind {
        &self.kind
    }

    /// Collider reported by the tile's kind.
    #[must_use]
    pub const fn collider(&self) -> ColliderShape {
        self.kind.collider()
    }

    /// Probe displacement when the tile is a relocator.
    #[must_use]
    pub fn relocation(&self) -> Option<Vec2> {
        match self.kind {
            TileKind::Relocator { offset } => Some(offset),
            _ => None,
        }
    }

    /// Sprite physics outlines in cell-local world units.
    #[must_use]
    pub fn physics_shapes(&self) -> &[Polygon] {
        &self.physics_shapes
    }
}

/// Per-cell transform applied to a tile's physics outlines.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TilePlacement {
    transform: Affine2,
}

impl TilePlacement {
    /// Placement that leaves outlines untouched.
    pub const IDENTITY: Self = Self {
        transform: Affine2::IDENTITY,
    };

    /// Wraps an explicit affine transform.
    #[must_use]
    pub const fn from_transform(transform: Affine2) -> Self {
        Self { transform }
    }

    /// Builds a placement from scale, rotation (radians), and translation.
    #[must_use]
    pub fn from_scale_angle_translation(scale: Vec2, angle: f32, translation: Vec2) -> Self {
        Self {
            transform: Affine2::from_scale_angle_translation(scale, angle, translation),
        }
    }

    /// Underlying affine transform.
    #[must_use]
    pub const fn transform(&self) -> &Affine2 {
        &self.transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_resolve_their_collider() {
        assert_eq!(
            TileKind::Plain {
                collider: ColliderShape::FullCell
            }
            .collider(),
            ColliderShape::FullCell
        );
        assert_eq!(
            TileKind::Animated {
                collider: ColliderShape::SpriteShape
            }
            .collider(),
            ColliderShape::SpriteShape
        );
        assert_eq!(
            TileKind::Rule {
                default_collider: ColliderShape::FullCell
            }
            .collider(),
            ColliderShape::FullCell
        );
        assert_eq!(
            TileKind::Relocator {
                offset: Vec2::new(1.0, 0.0)
            }
            .collider(),
            ColliderShape::None
        );
    }

    #[test]
    fn relocation_only_reported_for_relocators() {
        let relocator = TileDefinition::new(
            "pipe",
            TileKind::Relocator {
                offset: Vec2::new(0.0, -1.0),
            },
        );
        let ground = TileDefinition::new(
            "ground",
            TileKind::Plain {
                collider: ColliderShape::FullCell,
            },
        );

        assert_eq!(relocator.relocation(), Some(Vec2::new(0.0, -1.0)));
        assert_eq!(ground.relocation(), None);
    }

    #[test]
    fn transformed_polygon_follows_placement() {
        let triangle = Polygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
        ]);
        let mirrored = TilePlacement::from_scale_angle_translation(
            Vec2::new(-1.0, 1.0),
            0.0,
            Vec2::new(1.0, 0.0),
        );

        assert!(triangle.contains(Vec2::new(0.2, 0.2)));
        assert!(!triangle.contains(Vec2::new(0.8, 0.8)));

        let flipped = triangle.transformed(mirrored.transform());
        assert_eq!(
            flipped.points(),
            &[Vec2::new(1.0, 0.0), Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)]
        );
        assert!(flipped.contains(Vec2::new(0.8, 0.2)));
        assert!(!flipped.contains(Vec2::new(0.2, 0.8)));
    }
}
