#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that loads a level manifest and answers spatial queries.

mod manifest;
mod tile_transfer;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use glam::Vec2;
use seamgrid_core::{ColliderShape, Command, Event, TileBounds, TileCoord, TilePlacement};
use seamgrid_system_rewards::{Rewards, Standing};
use seamgrid_system_solidity::Solidity;
use seamgrid_world::{active, apply, query, World};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::{manifest::Level, tile_transfer::TileTransfer};

#[derive(Parser)]
#[command(name = "seamgrid")]
#[command(about = "Spatial queries over wraparound tile levels")]
struct Cli {
    /// Level manifest to load
    #[arg(long, short)]
    level: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether a world position is solid
    #[command(allow_negative_numbers = true)]
    Point { x: f32, y: f32 },
    /// Report whether any cell overlapped by a box is solid
    #[command(name = "box", allow_negative_numbers = true)]
    Area {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// Describe the cell containing a world position
    #[command(allow_negative_numbers = true)]
    Cell { x: f32, y: f32 },
    /// Report the distance between two positions, across the seam when shorter
    #[command(allow_negative_numbers = true)]
    Distance { ax: f32, ay: f32, bx: f32, by: f32 },
    /// Draw rewards for a participant
    Draw {
        /// Participant score
        #[arg(long, allow_negative_numbers = true)]
        score: f32,
        /// Leading score among all participants
        #[arg(long, allow_negative_numbers = true)]
        leader: f32,
        /// Number of draws
        #[arg(long, default_value_t = 1)]
        count: u32,
        /// Seed overriding the manifest seed
        #[arg(long)]
        seed: Option<u64>,
        /// Whether the exclusive reward mode is running
        #[arg(long)]
        exclusive: bool,
    },
    /// Edit tiles against the baseline block and print the transfer string
    Diff {
        /// Tile to place, as X,Y,TILE
        #[arg(long = "set", value_name = "X,Y,TILE", value_parser = parse_set)]
        set: Vec<(TileCoord, String)>,
        /// Cell to clear, as X,Y
        #[arg(long = "clear", value_name = "X,Y", value_parser = parse_clear)]
        clear: Vec<TileCoord>,
    },
    /// Apply a transfer string to the baseline block and print the result
    ApplyDiff { payload: String },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let level = Level::from_manifest_path(&cli.level)?;
    let _ = active::install(level.config).context("failed to activate level")?;

    match cli.command {
        Commands::Point { x, y } => point(&level, Vec2::new(x, y)),
        Commands::Area {
            x,
            y,
            width,
            height,
        } => solid_box(&level, Vec2::new(x, y), Vec2::new(width, height)),
        Commands::Cell { x, y } => cell(&level, Vec2::new(x, y)),
        Commands::Distance { ax, ay, bx, by } => {
            let distance = active::wrapped_distance(Vec2::new(ax, ay), Vec2::new(bx, by))?;
            println!("{distance:.3}");
            Ok(())
        }
        Commands::Draw {
            score,
            leader,
            count,
            seed,
            exclusive,
        } => draw(&level, Standing::new(score, leader), count, seed, exclusive),
        Commands::Diff { set, clear } => diff(&level, set, clear),
        Commands::ApplyDiff { payload } => apply_diff(&level, &payload),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn point(level: &Level, position: Vec2) -> Result<()> {
    let world = level.build_world()?;
    let view = query::tile_view(&world);
    let solidity = Solidity::with_broad_phase(level.colliders.clone());
    let solid = match solidity.is_point_solid(&view, position) {
        Ok(solid) => solid,
        Err(error) => {
            warn!(%error, "treating position as open");
            false
        }
    };
    println!("{}", if solid { "solid" } else { "clear" });
    Ok(())
}

fn solid_box(level: &Level, center: Vec2, size: Vec2) -> Result<()> {
    let world = level.build_world()?;
    let view = query::tile_view(&world);
    let solid = Solidity::new().is_any_solid_in_box(&view, center, size);
    println!("{}", if solid { "solid" } else { "clear" });
    Ok(())
}

fn cell(level: &Level, position: Vec2) -> Result<()> {
    let world = level.build_world()?;
    let view = query::tile_view(&world);
    let coord = active::world_to_tile(position, true)?;
    let anchor = active::tile_to_world(coord)?;
    let (wrapped, crossed) = active::wrap_world_position(position)?;

    let tile = view
        .tile_at(coord)
        .map_or("-", |placed| placed.tile().name());
    println!("cell {} {} layer {}", coord.x(), coord.y(), coord.layer());
    println!("anchor {} {}", anchor.x, anchor.y);
    println!("tile {tile}");
    println!("collider {}", collider_name(view.classify(coord)));
    if crossed {
        println!("wraps to {} {}", wrapped.x, wrapped.y);
    }
    Ok(())
}

fn draw(
    level: &Level,
    standing: Standing,
    count: u32,
    seed: Option<u64>,
    exclusive: bool,
) -> Result<()> {
    let mut rewards = Rewards::new(
        level.candidates.clone(),
        seed.unwrap_or(level.rewards.seed),
    )
    .with_exclusive(level.rewards.exclusive.clone());
    for _ in 0..count {
        let candidate = rewards.pick(standing, &level.rewards.enabled, exclusive)?;
        println!("{}", candidate.name());
    }
    Ok(())
}

fn diff(level: &Level, set: Vec<(TileCoord, String)>, clear: Vec<TileCoord>) -> Result<()> {
    let bounds = level.baseline()?;
    let mut world = baseline_world(level, bounds)?;

    let mut commands: Vec<Command> = clear
        .into_iter()
        .map(|coord| Command::ClearTile { coord })
        .collect();
    commands.extend(set.into_iter().map(|(coord, tile)| Command::PlaceTile {
        coord,
        tile,
        placement: TilePlacement::IDENTITY,
    }));

    let mut events = Vec::new();
    for command in commands {
        apply(&mut world, command, &mut events);
    }
    for event in &events {
        if let Event::TilePlacementRejected { coord, tile, reason } = event {
            bail!("placing `{tile}` at {coord:?} failed: {reason}");
        }
    }

    let transfer = TileTransfer {
        width: bounds.width(),
        height: bounds.height(),
        diff: query::tile_diff(&world)?,
    };
    println!("{}", transfer.encode()?);
    Ok(())
}

fn apply_diff(level: &Level, payload: &str) -> Result<()> {
    let bounds = level.baseline()?;
    let transfer = TileTransfer::decode(payload)?;
    if (transfer.width, transfer.height) != (bounds.width(), bounds.height()) {
        bail!(
            "transfer covers a {}x{} block but the baseline is {}x{}",
            transfer.width,
            transfer.height,
            bounds.width(),
            bounds.height()
        );
    }

    let mut world = baseline_world(level, bounds)?;
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::ApplyTileDiff {
            diff: transfer.diff,
        },
        &mut events,
    );
    match events.as_slice() {
        [Event::TileDiffApplied { changed, .. }] => println!("applied {changed} cells"),
        [Event::TileDiffRejected { reason }] => bail!("tile diff rejected: {reason}"),
        other => bail!("unexpected world response {other:?}"),
    }

    for row in render_block(&world, bounds) {
        println!("{row}");
    }
    Ok(())
}

fn baseline_world(level: &Level, bounds: TileBounds) -> Result<World> {
    let mut world = level.build_world()?;
    let mut events = Vec::new();
    apply(&mut world, Command::CaptureBaseline { bounds }, &mut events);
    Ok(world)
}

/// Renders the block top row first, one character per cell.
fn render_block(world: &World, bounds: TileBounds) -> Vec<String> {
    let view = query::tile_view(world);
    let origin = bounds.origin();
    let mut rows = Vec::new();
    for dy in (0..bounds.height()).rev() {
        let row: String = (0..bounds.width())
            .map(|dx| {
                let coord = origin.offset(
                    i32::try_from(dx).unwrap_or(i32::MAX),
                    i32::try_from(dy).unwrap_or(i32::MAX),
                );
                match (view.tile_at(coord), view.classify(coord)) {
                    (None, _) => '.',
                    (Some(_), ColliderShape::FullCell) => '#',
                    (Some(_), ColliderShape::SpriteShape) => '/',
                    (Some(_), ColliderShape::None) => 'o',
                }
            })
            .collect();
        rows.push(row);
    }
    rows
}

fn collider_name(shape: ColliderShape) -> &'static str {
    match shape {
        ColliderShape::None => "none",
        ColliderShape::FullCell => "full_cell",
        ColliderShape::SpriteShape => "sprite_shape",
    }
}

fn parse_coord(x: &str, y: &str) -> Result<TileCoord, String> {
    let x = x
        .trim()
        .parse::<i32>()
        .map_err(|error| format!("invalid column '{x}': {error}"))?;
    let y = y
        .trim()
        .parse::<i32>()
        .map_err(|error| format!("invalid row '{y}': {error}"))?;
    Ok(TileCoord::new(x, y))
}

fn parse_set(value: &str) -> Result<(TileCoord, String), String> {
    let mut parts = value.splitn(3, ',');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(x), Some(y), Some(tile)) if !tile.trim().is_empty() => {
            Ok((parse_coord(x, y)?, tile.trim().to_owned()))
        }
        _ => Err(format!("expected X,Y,TILE but got '{value}'")),
    }
}

fn parse_clear(value: &str) -> Result<TileCoord, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{value}'"))?;
    parse_coord(x, y)
}
