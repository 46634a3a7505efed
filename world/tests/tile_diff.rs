use std::collections::HashMap;

use seamgrid_core::{
    ColliderShape, Command, DiffError, Event, TileBounds, TileCoord, TileDefinition, TileDiff,
    TileKind, TilePlacement, WorldConfig, CLEARED_PATH,
};
use seamgrid_world::{apply, query, World};

fn tiles() -> HashMap<String, TileDefinition> {
    let mut tiles = HashMap::new();
    for (name, collider) in [
        ("brick", ColliderShape::FullCell),
        ("coin", ColliderShape::None),
    ] {
        let _ = tiles.insert(
            name.to_owned(),
            TileDefinition::new(name, TileKind::Plain { collider }),
        );
    }
    tiles
}

fn bounds() -> TileBounds {
    TileBounds::new(TileCoord::new(0, 0), 4, 3)
}

fn place(world: &mut World, x: i32, y: i32, tile: &str, events: &mut Vec<Event>) {
    apply(
        world,
        Command::PlaceTile {
            coord: TileCoord::new(x, y),
            tile: tile.to_owned(),
            placement: TilePlacement::IDENTITY,
        },
        events,
    );
}

fn seeded_world() -> World {
    let mut world = World::new(WorldConfig::new(0, 16, 1.0), tiles()).expect("valid config");
    let mut events = Vec::new();
    place(&mut world, 1, 1, "brick", &mut events);
    place(&mut world, 2, 1, "brick", &mut events);
    apply(
        &mut world,
        Command::CaptureBaseline { bounds: bounds() },
        &mut events,
    );
    assert_eq!(events.last(), Some(&Event::BaselineCaptured { bounds: bounds() }));
    world
}

#[test]
fn peer_reproduces_host_edits_from_diff() {
    let mut host = seeded_world();
    let mut events = Vec::new();
    apply(
        &mut host,
        Command::ClearTile {
            coord: TileCoord::new(1, 1),
        },
        &mut events,
    );
    place(&mut host, 3, 2, "coin", &mut events);
    place(&mut host, 2, 1, "brick", &mut events);

    let diff = query::tile_diff(&host).expect("baseline captured");
    assert_eq!(diff.tiles(), &[String::new(), "tiles/coin".to_owned()]);
    let changes: Vec<(u32, &str)> = diff.iter().collect();
    assert_eq!(changes, vec![(5, ""), (11, "tiles/coin")]);

    let mut peer = seeded_world();
    events.clear();
    apply(
        &mut peer,
        Command::ApplyTileDiff { diff: diff.clone() },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::TileDiffApplied {
            bounds: bounds(),
            changed: 2,
        }]
    );
    let grid = query::tile_grid(&peer);
    assert!(grid.get(TileCoord::new(1, 1)).is_none());
    assert_eq!(
        grid.get(TileCoord::new(3, 2)).map(|placed| placed.tile().name()),
        Some("coin")
    );
    assert_eq!(
        grid.get(TileCoord::new(2, 1)).map(|placed| placed.tile().name()),
        Some("brick")
    );
    assert_eq!(query::tile_diff(&peer), Ok(diff));
}

#[test]
fn unresolvable_paths_leave_cells_empty() {
    let mut world = seeded_world();
    let mut diff = TileDiff::new();
    diff.record(6, "tiles/ghost");
    let mut events = Vec::new();

    apply(&mut world, Command::ApplyTileDiff { diff }, &mut events);

    assert_eq!(
        events,
        vec![Event::TileDiffApplied {
            bounds: bounds(),
            changed: 1,
        }]
    );
    assert!(query::tile_grid(&world).get(TileCoord::new(2, 1)).is_none());
}

#[test]
fn out_of_range_changes_are_rejected_without_side_effects() {
    let mut world = seeded_world();
    let mut diff = TileDiff::new();
    diff.record(5, "");
    diff.record(12, "tiles/brick");
    let mut events = Vec::new();

    apply(&mut world, Command::ApplyTileDiff { diff }, &mut events);

    assert_eq!(
        events,
        vec![Event::TileDiffRejected {
            reason: DiffError::IndexOutOfBounds {
                index: 12,
                cell_count: 12,
            },
        }]
    );
    assert!(query::tile_grid(&world).get(TileCoord::new(1, 1)).is_some());
}

#[test]
fn unchanged_grid_yields_empty_diff() {
    let world = seeded_world();
    let diff = query::tile_diff(&world).expect("baseline captured");
    assert!(diff.is_empty());
    assert_eq!(query::baseline_bounds(&world), Some(bounds()));
}

#[test]
fn baseline_straddling_the_seam_tracks_wrapped_cells() {
    let config = WorldConfig::new(0, 8, 1.0).with_looping(true);
    let seam = TileBounds::new(TileCoord::new(6, 0), 4, 1);
    let seeded = || {
        let mut world = World::new(config, tiles()).expect("valid config");
        let mut events = Vec::new();
        place(&mut world, 0, 0, "brick", &mut events);
        apply(
            &mut world,
            Command::CaptureBaseline { bounds: seam },
            &mut events,
        );
        world
    };

    let mut host = seeded();
    let mut events = Vec::new();
    apply(
        &mut host,
        Command::ClearTile {
            coord: TileCoord::new(8, 0),
        },
        &mut events,
    );
    place(&mut host, 9, 0, "coin", &mut events);
    assert_eq!(
        events.first(),
        Some(&Event::TileCleared {
            coord: TileCoord::new(0, 0)
        })
    );

    let diff = query::tile_diff(&host).expect("baseline captured");
    let changes: Vec<(u32, &str)> = diff.iter().collect();
    assert_eq!(changes, vec![(2, CLEARED_PATH), (3, "tiles/coin")]);

    let mut peer = seeded();
    events.clear();
    apply(&mut peer, Command::ApplyTileDiff { diff }, &mut events);

    assert_eq!(
        events,
        vec![Event::TileDiffApplied {
            bounds: seam,
            changed: 2,
        }]
    );
    let view = query::tile_view(&peer);
    assert!(view.tile_at(TileCoord::new(0, 0)).is_none());
    assert_eq!(
        view.tile_at(TileCoord::new(9, 0))
            .map(|placed| placed.tile().name()),
        Some("coin")
    );
    assert_eq!(query::tile_grid(&peer).len(), 1);
}
