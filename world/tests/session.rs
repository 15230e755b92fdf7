//! Session-level behaviour exercised through the command surface.

use lane_defence_core::{
    Command, Event, GridCoord, PlacementRejection, TowerKind, UnitKind, STARTING_MONEY,
};
use lane_defence_world::{apply, query, GridMap, MapError, Session};

fn map_from_cells(paths: &[(i32, i32)], bases: &[(i32, i32)]) -> GridMap {
    let mut records = Vec::new();
    for (x, y) in paths {
        records.push(format!("[{}, {}, \"grey\"]", x * 20, y * 20));
    }
    for (x, y) in bases {
        records.push(format!("[{}, {}, \"green\"]", x * 20, y * 20));
    }
    let text = format!("[{}]", records.join(", "));
    GridMap::from_json(&text).expect("valid asset")
}

/// One winding corridor feeding the base from the west.
fn corridor_map() -> GridMap {
    map_from_cells(
        &[
            (4, 4),
            (4, 5),
            (5, 5),
            (5, 6),
            (5, 7),
            (6, 6),
            (6, 5),
            (7, 5),
            (8, 5),
            (9, 5),
            (10, 5),
            (11, 5),
            (12, 5),
            (13, 5),
            (14, 5),
        ],
        &[(15, 5)],
    )
}

/// Three corridors converging on the base, one per lane.
fn three_lane_map() -> GridMap {
    map_from_cells(
        &[
            (1, 5),
            (2, 5),
            (3, 5),
            (4, 5),
            (5, 5),
            (6, 5),
            (7, 5),
            (8, 5),
            (9, 1),
            (9, 2),
            (9, 3),
            (9, 4),
            (9, 9),
            (9, 8),
            (9, 7),
            (9, 6),
        ],
        &[(9, 5)],
    )
}

fn tick(session: &mut Session, events: &mut Vec<Event>) {
    apply(session, Command::Tick, events);
}

#[test]
fn construction_requires_a_base() {
    let map = map_from_cells(&[(0, 0), (1, 0)], &[]);
    assert!(matches!(Session::from_map(&map), Err(MapError::MissingBase)));
}

#[test]
fn construction_garrisons_every_populated_lane() {
    let session = Session::from_map(&three_lane_map()).expect("session");
    assert_eq!(query::money(&session), STARTING_MONEY);
    assert_eq!(query::score(&session), 0);
    assert_eq!(query::central_health(&session), 1_000);
    assert_eq!(query::central_origin(&session), GridCoord::new(9, 5));

    let units = query::unit_view(&session);
    let kinds: Vec<UnitKind> = units.iter().map(|unit| unit.kind).collect();
    assert_eq!(kinds, vec![UnitKind::Basic, UnitKind::Ranged, UnitKind::Basic]);
    let lanes: Vec<usize> = units.iter().map(|unit| unit.lane).collect();
    assert_eq!(lanes, vec![0, 1, 2]);
}

#[test]
fn garrison_skips_empty_lanes() {
    let session = Session::from_map(&corridor_map()).expect("session");
    // Only lane 0 holds a path, so only its garrison unit exists.
    assert_eq!(query::unit_count(&session), 1);
}

#[test]
fn lane_extraction_is_identical_across_sessions() {
    let map = three_lane_map();
    let first = Session::from_map(&map).expect("session");
    let second = Session::from_map(&map).expect("session");
    assert_eq!(query::lane_view(&first), query::lane_view(&second));
}

#[test]
fn placement_deducts_cost_and_reports_the_tower() {
    let mut session = Session::from_map(&three_lane_map()).expect("session");
    let mut events = Vec::new();
    apply(
        &mut session,
        Command::PlaceTower {
            kind: TowerKind::Basic,
            cell: GridCoord::new(3, 3),
        },
        &mut events,
    );

    assert_eq!(query::money(&session), STARTING_MONEY - 50);
    assert_eq!(query::tower_count(&session), 1);
    assert!(matches!(
        events.as_slice(),
        [Event::TowerPlaced {
            kind: TowerKind::Basic,
            ..
        }]
    ));
}

#[test]
fn placement_rejections_are_silent_no_ops() {
    let mut session = Session::from_map(&three_lane_map()).expect("session");
    let mut events = Vec::new();

    // A lane cell is not buildable.
    apply(
        &mut session,
        Command::PlaceTower {
            kind: TowerKind::Basic,
            cell: GridCoord::new(2, 5),
        },
        &mut events,
    );
    assert!(matches!(
        events.pop(),
        Some(Event::TowerPlacementRejected {
            reason: PlacementRejection::Blocked,
            ..
        })
    ));

    // Neither is the base itself.
    apply(
        &mut session,
        Command::PlaceTower {
            kind: TowerKind::Basic,
            cell: GridCoord::new(9, 5),
        },
        &mut events,
    );
    assert!(matches!(
        events.pop(),
        Some(Event::TowerPlacementRejected {
            reason: PlacementRejection::Blocked,
            ..
        })
    ));

    // A cell under the central structure's footprint is occupied.
    apply(
        &mut session,
        Command::PlaceTower {
            kind: TowerKind::Basic,
            cell: GridCoord::new(10, 6),
        },
        &mut events,
    );
    assert!(matches!(
        events.pop(),
        Some(Event::TowerPlacementRejected {
            reason: PlacementRejection::Occupied,
            ..
        })
    ));

    // A cell hosting a tower is occupied.
    apply(
        &mut session,
        Command::PlaceTower {
            kind: TowerKind::Basic,
            cell: GridCoord::new(3, 3),
        },
        &mut events,
    );
    apply(
        &mut session,
        Command::PlaceTower {
            kind: TowerKind::Rapid,
            cell: GridCoord::new(3, 3),
        },
        &mut events,
    );
    assert!(matches!(
        events.pop(),
        Some(Event::TowerPlacementRejected {
            reason: PlacementRejection::Occupied,
            ..
        })
    ));

    // Splash costs 120; 50 remain after the basic tower above.
    apply(
        &mut session,
        Command::PlaceTower {
            kind: TowerKind::Splash,
            cell: GridCoord::new(4, 3),
        },
        &mut events,
    );
    assert!(matches!(
        events.pop(),
        Some(Event::TowerPlacementRejected {
            reason: PlacementRejection::InsufficientFunds,
            ..
        })
    ));

    assert_eq!(query::money(&session), STARTING_MONEY - 50);
    assert_eq!(query::tower_count(&session), 1);
}

#[test]
fn survival_score_accrues_every_five_seconds() {
    let mut session = Session::from_map(&corridor_map()).expect("session");
    let mut events = Vec::new();
    for _ in 0..300 {
        tick(&mut session, &mut events);
    }

    assert_eq!(query::score(&session), 2);
    assert_eq!(query::survival_ticks(&session), 300);
    let awards: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            Event::ScoreAwarded { total } => Some(*total),
            _ => None,
        })
        .collect();
    assert_eq!(awards, vec![2]);
}

#[test]
fn spawn_triggers_fire_in_priority_order() {
    let mut session = Session::from_map(&three_lane_map()).expect("session");
    let mut events = Vec::new();
    for _ in 0..600 {
        tick(&mut session, &mut events);
    }

    let spawned: Vec<UnitKind> = events
        .iter()
        .filter_map(|event| match event {
            Event::UnitSpawned { kind, .. } => Some(*kind),
            _ => None,
        })
        .collect();
    // Basic fires at 150, 300 and 450; at 600 the ranged trigger wins.
    assert_eq!(
        spawned,
        vec![
            UnitKind::Basic,
            UnitKind::Basic,
            UnitKind::Basic,
            UnitKind::Ranged,
        ]
    );
}

#[test]
fn manual_spawns_round_robin_across_lanes() {
    let mut session = Session::from_map(&three_lane_map()).expect("session");
    let mut events = Vec::new();
    // The three garrison units already occupy the round-robin counter.
    apply(
        &mut session,
        Command::SpawnUnit {
            kind: UnitKind::Heavy,
        },
        &mut events,
    );
    assert!(matches!(
        events.as_slice(),
        [Event::UnitSpawned {
            kind: UnitKind::Heavy,
            cell,
            ..
        }] if *cell == GridCoord::new(1, 5)
    ));
    assert_eq!(query::unit_count(&session), 4);
}

#[test]
fn reset_reinitialises_from_the_retained_lanes() {
    let mut session = Session::from_map(&three_lane_map()).expect("session");
    let mut events = Vec::new();
    apply(
        &mut session,
        Command::PlaceTower {
            kind: TowerKind::Basic,
            cell: GridCoord::new(3, 3),
        },
        &mut events,
    );
    for _ in 0..200 {
        tick(&mut session, &mut events);
    }

    apply(&mut session, Command::Reset, &mut events);
    assert_eq!(query::money(&session), STARTING_MONEY);
    assert_eq!(query::score(&session), 0);
    assert_eq!(query::survival_ticks(&session), 0);
    assert_eq!(query::unit_count(&session), 3);
    assert_eq!(query::tower_count(&session), 0);
    assert_eq!(query::central_health(&session), 1_000);
    assert!(!query::game_over(&session));
    assert_eq!(
        query::lane_view(&session),
        query::lane_view(&Session::from_map(&three_lane_map()).expect("session"))
    );
}
