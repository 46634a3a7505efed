use std::{collections::HashMap, fs, path::Path};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use seamgrid_core::{
    ColliderShape, Command, Event, Polygon, TileBounds, TileCoord, TileDefinition, TileKind,
    TilePlacement, WorldConfig,
};
use seamgrid_system_rewards::{Candidate, Capabilities, DEFAULT_EXCLUSIVE_CANDIDATE};
use seamgrid_system_solidity::{StaticCollider, StaticColliders};
use seamgrid_world::{apply, TileSource, World, TILE_PATH_PREFIX};
use serde::Deserialize;
use tracing::debug;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Level assembled from a TOML manifest.
#[derive(Debug)]
pub(crate) struct Level {
    pub(crate) config: WorldConfig,
    pub(crate) tiles: ManifestTiles,
    pub(crate) placements: Vec<Command>,
    pub(crate) colliders: StaticColliders,
    pub(crate) baseline: Option<TileBounds>,
    pub(crate) rewards: RewardSettings,
    pub(crate) candidates: Vec<Candidate>,
}

impl Level {
    /// Loads and validates the manifest stored at `path`.
    pub(crate) fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read level manifest at {}", path.display()))?;
        Self::from_manifest_str(&contents)
            .with_context(|| format!("invalid level manifest at {}", path.display()))
    }

    /// Parses and validates manifest contents.
    pub(crate) fn from_manifest_str(contents: &str) -> Result<Self> {
        let manifest: Manifest =
            toml::from_str(contents).context("failed to parse level manifest toml contents")?;
        if manifest.version != SUPPORTED_MANIFEST_VERSION {
            bail!(
                "unsupported level manifest version {}; expected {}",
                manifest.version,
                SUPPORTED_MANIFEST_VERSION
            );
        }
        manifest
            .world
            .validate()
            .context("level manifest has an unusable [world] table")?;

        let mut tiles = HashMap::with_capacity(manifest.tiles.len());
        for entry in manifest.tiles {
            let name = entry.name.clone();
            let definition = entry
                .into_definition()
                .with_context(|| format!("invalid tile `{name}`"))?;
            if tiles.insert(name.clone(), definition).is_some() {
                bail!("level manifest defines tile `{name}` more than once");
            }
        }

        let mut placements = Vec::new();
        for entry in &manifest.placements {
            if !tiles.contains_key(&entry.tile) {
                bail!(
                    "placement at ({}, {}) references unknown tile `{}`",
                    entry.x,
                    entry.y,
                    entry.tile
                );
            }
            placements.extend(entry.commands());
        }

        let colliders = StaticColliders::new(
            manifest
                .colliders
                .into_iter()
                .map(ColliderEntry::into_collider)
                .collect(),
        );

        Ok(Self {
            config: manifest.world,
            tiles: ManifestTiles { tiles },
            placements,
            colliders,
            baseline: manifest.baseline.map(BaselineEntry::bounds),
            rewards: manifest.rewards,
            candidates: manifest.candidates,
        })
    }

    /// Builds a world with every manifest placement applied.
    pub(crate) fn build_world(&self) -> Result<World> {
        let mut world = World::new(self.config, self.tiles.clone())
            .context("level manifest has an unusable [world] table")?;
        let mut events = Vec::new();
        for command in &self.placements {
            apply(&mut world, command.clone(), &mut events);
        }
        if let Some(Event::TilePlacementRejected { coord, tile, reason }) = events
            .iter()
            .find(|event| matches!(event, Event::TilePlacementRejected { .. }))
        {
            bail!("placing `{tile}` at {coord:?} failed: {reason}");
        }
        debug!(placed = events.len(), "built level world");
        Ok(world)
    }

    /// Baseline block used for tile diff exchange.
    pub(crate) fn baseline(&self) -> Result<TileBounds> {
        self.baseline
            .context("level manifest has no [baseline] table")
    }
}

/// Tile definitions declared by the manifest.
#[derive(Clone, Debug, Default)]
pub(crate) struct ManifestTiles {
    tiles: HashMap<String, TileDefinition>,
}

impl TileSource for ManifestTiles {
    fn load(&self, path: &str) -> Option<TileDefinition> {
        let name = path.strip_prefix(TILE_PATH_PREFIX)?;
        self.tiles.get(name).cloned()
    }
}

/// Reward draw settings declared by the manifest.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub(crate) struct RewardSettings {
    pub(crate) seed: u64,
    pub(crate) enabled: Capabilities,
    pub(crate) exclusive: String,
}

impl Default for RewardSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            enabled: Capabilities::NONE,
            exclusive: DEFAULT_EXCLUSIVE_CANDIDATE.to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    version: u32,
    world: WorldConfig,
    #[serde(default)]
    baseline: Option<BaselineEntry>,
    #[serde(default)]
    tiles: Vec<TileEntry>,
    #[serde(default)]
    placements: Vec<PlacementEntry>,
    #[serde(default)]
    colliders: Vec<ColliderEntry>,
    #[serde(default)]
    rewards: RewardSettings,
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum KindName {
    Plain,
    Animated,
    Rule,
    Relocator,
}

#[derive(Debug, Deserialize)]
struct TileEntry {
    name: String,
    kind: KindName,
    #[serde(default)]
    collider: ColliderShape,
    #[serde(default)]
    offset: Option<Vec2>,
    #[serde(default)]
    shapes: Vec<Polygon>,
}

impl TileEntry {
    fn into_definition(self) -> Result<TileDefinition> {
        let kind = match self.kind {
            KindName::Plain => TileKind::Plain {
                collider: self.collider,
            },
            KindName::Animated => TileKind::Animated {
                collider: self.collider,
            },
            KindName::Rule => TileKind::Rule {
                default_collider: self.collider,
            },
            KindName::Relocator => {
                let Some(offset) = self.offset else {
                    bail!("relocator tiles need an offset");
                };
                TileKind::Relocator { offset }
            }
        };
        if self.collider == ColliderShape::SpriteShape && self.shapes.is_empty() {
            bail!("sprite_shape tiles need at least one physics shape");
        }
        Ok(TileDefinition::new(self.name, kind).with_physics_shapes(self.shapes))
    }
}

fn one() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct PlacementEntry {
    x: i32,
    y: i32,
    tile: String,
    #[serde(default = "one")]
    width: u32,
    #[serde(default = "one")]
    height: u32,
    #[serde(default)]
    scale: Option<Vec2>,
    #[serde(default)]
    rotation_degrees: f32,
    #[serde(default)]
    translation: Option<Vec2>,
}

impl PlacementEntry {
    fn commands(&self) -> impl Iterator<Item = Command> + '_ {
        let placement = TilePlacement::from_scale_angle_translation(
            self.scale.unwrap_or(Vec2::ONE),
            self.rotation_degrees.to_radians(),
            self.translation.unwrap_or(Vec2::ZERO),
        );
        TileBounds::new(TileCoord::new(self.x, self.y), self.width, self.height)
            .cells()
            .map(move |coord| Command::PlaceTile {
                coord,
                tile: self.tile.clone(),
                placement,
            })
    }
}

#[derive(Debug, Deserialize)]
struct ColliderEntry {
    center: Vec2,
    size: Vec2,
    #[serde(default)]
    trigger: bool,
    #[serde(default)]
    tag: Option<String>,
}

impl ColliderEntry {
    fn into_collider(self) -> StaticCollider {
        let collider = StaticCollider::new(self.center, self.size).with_trigger(self.trigger);
        match self.tag {
            Some(tag) => collider.with_tag(tag),
            None => collider,
        }
    }
}

#[derive(Debug, Deserialize)]
struct BaselineEntry {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

impl BaselineEntry {
    fn bounds(self) -> TileBounds {
        TileBounds::new(TileCoord::new(self.x, self.y), self.width, self.height)
    }
}
