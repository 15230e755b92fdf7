#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Defence engine.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative session, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the session executes those commands
//! via its `apply` entry point, and then broadcasts [`Event`] values that
//! observers consume deterministically. All per-kind numeric profiles live
//! here so that shared combat and movement logic can stay free of subtype
//! special cases.

use serde::{Deserialize, Serialize};

/// Side length of a single grid cell expressed in world units.
///
/// Map records arrive at world-unit (pixel) granularity and are
/// integer-divided by this length to locate their containing cell.
pub const CELL_LENGTH: f32 = 20.0;

/// World-unit granularity used when decoding map records.
pub const CELL_LENGTH_UNITS: i32 = 20;

/// Number of fixed simulation ticks per simulated second.
pub const TICKS_PER_SECOND: u64 = 60;

/// Number of round-robin spawn lanes the path extractor partitions into.
pub const LANE_COUNT: usize = 3;

/// Maximum number of mobile units that may be active simultaneously.
pub const UNIT_CAP: usize = 100;

/// Money balance granted when a session is constructed or reset.
pub const STARTING_MONEY: u32 = 100;

/// Ticks between survival score awards (five simulated seconds).
pub const SCORE_INTERVAL_TICKS: u64 = 5 * TICKS_PER_SECOND;

/// Score increment granted for every survival interval.
pub const SURVIVAL_SCORE_AWARD: u32 = 2;

/// Health pool of the central structure.
pub const CENTRAL_MAX_HEALTH: u32 = 1_000;

/// Damage the central structure deals per shot.
pub const CENTRAL_ATTACK_POWER: u32 = 25;

/// Cooldown period of the central structure measured in ticks.
pub const CENTRAL_COOLDOWN_PERIOD: u32 = 90;

/// Edge length of the central structure's square footprint in cells.
pub const CENTRAL_FOOTPRINT_CELLS: i32 = 3;

/// Firing radius of the central structure measured in world units from the
/// centre of its bounding box.
pub const CENTRAL_RANGE: f32 = 90.0;

/// Location of a single grid cell expressed as signed column/row coordinates.
///
/// Coordinates are signed because map records carry raw world-unit positions
/// and neighbourhood probes step outside the recorded region, where every
/// cell is implicitly empty.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct GridCoord {
    x: i32,
    y: i32,
}

impl GridCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal cell index.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical cell index.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the cell displaced by the provided deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The 4-neighbourhood of the cell in the fixed probe order west, east,
    /// north, south. Path tracing and endpoint classification depend on this
    /// exact order.
    #[must_use]
    pub const fn neighbours4(self) -> [GridCoord; 4] {
        [
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(0, 1),
        ]
    }

    /// World-unit position of the cell's top-left corner.
    #[must_use]
    pub fn world_origin(self) -> WorldPoint {
        WorldPoint::new(self.x as f32 * CELL_LENGTH, self.y as f32 * CELL_LENGTH)
    }

    /// World-unit position of the cell's centre.
    #[must_use]
    pub fn world_centre(self) -> WorldPoint {
        let origin = self.world_origin();
        WorldPoint::new(origin.x() + CELL_LENGTH / 2.0, origin.y() + CELL_LENGTH / 2.0)
    }
}

/// Continuous position expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new world-unit point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component in world units.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component in world units.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance to another point in the continuous plane.
    #[must_use]
    pub fn distance_to(self, other: WorldPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Facing assigned to a mobile unit, derived from its last waypoint delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Derives a facing from the coordinate delta between two adjacent cells.
    ///
    /// Horizontal displacement wins when both axes change, mirroring the
    /// delta checks the movement pass performs. Returns `None` for a zero
    /// delta.
    #[must_use]
    pub const fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        if dx > 0 {
            Some(Self::East)
        } else if dx < 0 {
            Some(Self::West)
        } else if dy > 0 {
            Some(Self::South)
        } else if dy < 0 {
            Some(Self::North)
        } else {
            None
        }
    }
}

/// Unique identifier assigned to a mobile unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a placed tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Kinds of mobile units the spawn system can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Melee unit that walks to the path end and besieges the base.
    Basic,
    /// Ranged unit that engages structures from a distance while en route.
    Ranged,
    /// Slow, durable unit that crushes structures at point-blank range.
    Heavy,
}

impl UnitKind {
    /// Numeric profile governing the kind's movement and combat cadence.
    #[must_use]
    pub const fn profile(self) -> UnitProfile {
        match self {
            Self::Basic => UnitProfile {
                max_health: 60,
                move_period: 45,
                attack_period: 40,
                attack_power: 0,
                attack_range_cells: 0.0,
                siege_damage: 10,
                reward: 15,
                score_value: 10,
            },
            Self::Ranged => UnitProfile {
                max_health: 120,
                move_period: 60,
                attack_period: 60,
                attack_power: 25,
                attack_range_cells: 4.0,
                siege_damage: 10,
                reward: 40,
                score_value: 25,
            },
            Self::Heavy => UnitProfile {
                max_health: 400,
                move_period: 75,
                attack_period: 120,
                attack_power: 75,
                attack_range_cells: 1.0,
                siege_damage: 75,
                reward: 80,
                score_value: 60,
            },
        }
    }
}

/// Per-kind numeric profile for mobile units.
///
/// Shared state-machine logic is parametrised by these values instead of
/// being re-implemented per kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitProfile {
    /// Health granted at spawn; health never exceeds this value.
    pub max_health: u32,
    /// Ticks that must accumulate before the unit attempts a waypoint step.
    pub move_period: u32,
    /// Ticks between successive attacks (siege or ranged).
    pub attack_period: u32,
    /// Damage dealt to structures engaged mid-path; zero for melee-only kinds.
    pub attack_power: u32,
    /// Structure-engagement range in cells; zero disables mid-path attacks.
    pub attack_range_cells: f32,
    /// Damage dealt to the central structure per besieging strike.
    pub siege_damage: u32,
    /// Money credited to the session when the unit dies.
    pub reward: u32,
    /// Score credited to the session when the unit dies.
    pub score_value: u32,
}

impl UnitProfile {
    /// Structure-engagement range converted into world units.
    #[must_use]
    pub fn attack_range(&self) -> f32 {
        self.attack_range_cells * CELL_LENGTH
    }
}

/// Kinds of towers the player can place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Balanced single-target tower.
    Basic,
    /// Cheap tower trading damage for a very short cooldown.
    Rapid,
    /// Long-range tower dealing area damage while decaying structurally.
    Splash,
}

impl TowerKind {
    /// Numeric profile governing the kind's combat behaviour and cost.
    #[must_use]
    pub const fn profile(self) -> TowerProfile {
        match self {
            Self::Basic => TowerProfile {
                max_health: 200,
                damage: 25,
                range_cells: 4.0,
                cooldown_period: 60,
                initial_cooldown: 60,
                cost: 50,
                decay: None,
            },
            // The rapid tower is armed with a longer initial cooldown than
            // its firing period; both values come from the original tuning.
            Self::Rapid => TowerProfile {
                max_health: 80,
                damage: 3,
                range_cells: 2.0,
                cooldown_period: 10,
                initial_cooldown: 15,
                cost: 25,
                decay: None,
            },
            Self::Splash => TowerProfile {
                max_health: 400,
                damage: 50,
                range_cells: 7.0,
                cooldown_period: 240,
                initial_cooldown: 240,
                cost: 120,
                decay: Some(DecayProfile {
                    damage: 2,
                    period: 9,
                }),
            },
        }
    }
}

/// Per-kind numeric profile for placed towers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerProfile {
    /// Health granted at placement.
    pub max_health: u32,
    /// Damage dealt per successful shot.
    pub damage: u32,
    /// Targeting range in cells, measured between cell origins.
    pub range_cells: f32,
    /// Ticks between successive shots once firing has begun.
    pub cooldown_period: u32,
    /// Cooldown the tower is placed with before its first possible shot.
    pub initial_cooldown: u32,
    /// Money deducted when the tower is placed.
    pub cost: u32,
    /// Structural decay applied independently of firing, if any.
    pub decay: Option<DecayProfile>,
}

impl TowerProfile {
    /// Targeting range converted into world units.
    #[must_use]
    pub fn range(&self) -> f32 {
        self.range_cells * CELL_LENGTH
    }
}

/// Periodic self-inflicted damage applied to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecayProfile {
    /// Health lost per decay event.
    pub damage: u32,
    /// Ticks between decay events, independent of the attack cooldown.
    pub period: u32,
}

/// Commands that express all permissible session mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation by exactly one fixed timestep.
    Tick,
    /// Requests that a unit of the provided kind spawn on the next
    /// round-robin lane. Silently ignored at the population cap or when the
    /// selected lane holds no path.
    SpawnUnit {
        /// Kind of unit to spawn.
        kind: UnitKind,
    },
    /// Requests placement of a tower on the provided cell.
    PlaceTower {
        /// Kind of tower to construct.
        kind: TowerKind,
        /// Cell the tower should occupy.
        cell: GridCoord,
    },
    /// Reinitialises the session from its immutable lane layout, resetting
    /// every counter and collection to construction-time values.
    Reset,
}

/// Events broadcast by the session after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a unit entered the simulation.
    UnitSpawned {
        /// Identifier assigned to the unit.
        unit: UnitId,
        /// Kind of unit that spawned.
        kind: UnitKind,
        /// Cell the unit occupies after spawning.
        cell: GridCoord,
    },
    /// Confirms that a unit died and its bounty was credited.
    UnitDied {
        /// Identifier of the unit that died.
        unit: UnitId,
        /// Kind of the unit that died.
        kind: UnitKind,
        /// Money credited for the kill.
        reward: u32,
        /// Score credited for the kill.
        score_value: u32,
    },
    /// Confirms that a tower was placed and its cost deducted.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Kind of tower that was placed.
        kind: TowerKind,
        /// Cell the tower occupies.
        cell: GridCoord,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Kind of tower requested for placement.
        kind: TowerKind,
        /// Cell provided in the placement request.
        cell: GridCoord,
        /// Specific reason the placement failed.
        reason: PlacementRejection,
    },
    /// Reports that a placed tower was destroyed and removed.
    TowerDestroyed {
        /// Identifier of the tower that was destroyed.
        tower: TowerId,
        /// Kind of the destroyed tower.
        kind: TowerKind,
    },
    /// Reports a survival score award.
    ScoreAwarded {
        /// Total session score after the award.
        total: u32,
    },
    /// Announces that the central structure fell and the session ended.
    SessionEnded {
        /// Final score at the moment of defeat.
        score: u32,
        /// Number of ticks survived.
        survival_ticks: u64,
    },
}

/// Reasons a tower placement request may be rejected.
///
/// Rejections are deliberate no-ops at the command surface; the reason is
/// reported through [`Event::TowerPlacementRejected`] for observability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementRejection {
    /// The cell is part of a path or the base and cannot host a tower.
    Blocked,
    /// The cell is already occupied by a structure.
    Occupied,
    /// The session balance cannot cover the tower's cost.
    InsufficientFunds,
}
