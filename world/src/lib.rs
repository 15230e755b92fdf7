#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for the Lane Defence engine.
//!
//! A [`Session`] is constructed once from a decoded [`GridMap`], extracting
//! its lanes immutably, and then mutates exclusively through [`apply`].
//! Commands advance the fixed-timestep simulation, spawn units, place
//! towers, or reset the session; every observable consequence is reported
//! through [`lane_defence_core::Event`] values. Reads go through [`query`].

mod map;
mod navigation;
mod occupancy;
#[cfg(feature = "scenario_scaffolding")]
pub mod scaffolding;
mod towers;
mod units;

pub use map::{CellKind, GridMap, MapError};

use lane_defence_core::{
    Command, Event, GridCoord, PlacementRejection, TowerId, TowerKind, UnitId, UnitKind,
    LANE_COUNT, SCORE_INTERVAL_TICKS, STARTING_MONEY, SURVIVAL_SCORE_AWARD, UNIT_CAP,
};
use lane_defence_system_waves::WaveSchedule;

use crate::navigation::LaneLayout;
use crate::towers::{Central, Tower};
use crate::units::Unit;

/// Units garrisoned onto the lanes when a session starts.
const GARRISON: [(UnitKind, usize); 3] = [
    (UnitKind::Basic, 0),
    (UnitKind::Ranged, 1),
    (UnitKind::Basic, 2),
];

/// Authoritative state of one defence session.
///
/// Sessions are fully independent values; external drivers may hold any
/// number of them side by side.
#[derive(Debug)]
pub struct Session {
    layout: LaneLayout,
    units: Vec<Unit>,
    towers: Vec<Tower>,
    central: Central,
    money: u32,
    score: u32,
    survival_ticks: u64,
    last_score_tick: u64,
    spawn_counter: u64,
    schedule: WaveSchedule,
    next_unit_id: u32,
    next_tower_id: u32,
    game_over: bool,
}

impl Session {
    /// Constructs a session from a decoded map.
    ///
    /// Lane extraction happens exactly once here; the resulting layout is
    /// immutable for the session's lifetime, including across resets. Fails
    /// when the map records no base cell.
    pub fn from_map(map: &GridMap) -> Result<Self, MapError> {
        let layout = LaneLayout::from_map(map)?;
        Ok(Self::fresh(layout))
    }

    fn fresh(layout: LaneLayout) -> Self {
        let central = Central::new(layout.base());
        let mut session = Self {
            layout,
            units: Vec::new(),
            towers: Vec::new(),
            central,
            money: STARTING_MONEY,
            score: 0,
            survival_ticks: 0,
            last_score_tick: 0,
            spawn_counter: 0,
            schedule: WaveSchedule::standard(),
            next_unit_id: 0,
            next_tower_id: 0,
            game_over: false,
        };
        for (kind, lane) in GARRISON {
            let _ = session.spawn_on_lane(kind, lane);
        }
        session
    }

    fn reinitialise(&mut self) {
        *self = Self::fresh(self.layout.clone());
    }

    fn spawn_on_lane(&mut self, kind: UnitKind, lane: usize) -> Option<(UnitId, GridCoord)> {
        let path = self.layout.spawn_path(lane)?;
        let cell = *path.cells().first()?;
        let id = UnitId::new(self.next_unit_id);
        self.next_unit_id += 1;
        self.units.push(Unit::deployed(id, kind, lane, 0, 0, cell));
        Some((id, cell))
    }

    fn spawn_round_robin(&mut self, kind: UnitKind, out_events: &mut Vec<Event>) {
        if self.units.len() >= UNIT_CAP {
            return;
        }
        let lane = self.units.len() % LANE_COUNT;
        if let Some((unit, cell)) = self.spawn_on_lane(kind, lane) {
            out_events.push(Event::UnitSpawned { unit, kind, cell });
        }
    }

    fn place_tower(&mut self, kind: TowerKind, cell: GridCoord, out_events: &mut Vec<Event>) {
        let rejection = if self.layout.category(cell) != CellKind::Empty {
            Some(PlacementRejection::Blocked)
        } else if occupancy::structure_occupies(&self.towers, &self.central, cell) {
            Some(PlacementRejection::Occupied)
        } else if self.money < kind.profile().cost {
            Some(PlacementRejection::InsufficientFunds)
        } else {
            None
        };
        if let Some(reason) = rejection {
            out_events.push(Event::TowerPlacementRejected { kind, cell, reason });
            return;
        }
        self.money -= kind.profile().cost;
        let id = TowerId::new(self.next_tower_id);
        self.next_tower_id += 1;
        self.towers.push(Tower::new(id, kind, cell));
        out_events.push(Event::TowerPlaced {
            tower: id,
            kind,
            cell,
        });
    }

    /// One fixed timestep, executed in a strict single-threaded phase order:
    /// score accrual, casualty pruning, spawning, structure fire, unit state
    /// machines, casualty settlement.
    fn advance_tick(&mut self, out_events: &mut Vec<Event>) {
        self.survival_ticks += 1;
        if self.survival_ticks - self.last_score_tick >= SCORE_INTERVAL_TICKS {
            self.last_score_tick = self.survival_ticks;
            self.score += SURVIVAL_SCORE_AWARD;
            out_events.push(Event::ScoreAwarded { total: self.score });
        }

        self.settle_casualties(out_events);

        self.spawn_counter += 1;
        if let Some(kind) = self.schedule.scheduled_kind(self.spawn_counter) {
            self.spawn_round_robin(kind, out_events);
        }

        towers::resolve_central_attack(&mut self.central, &mut self.units);
        towers::resolve_tower_attacks(&mut self.towers, &mut self.units, TowerKind::Basic);
        towers::resolve_decay(&mut self.towers);
        towers::resolve_tower_attacks(&mut self.towers, &mut self.units, TowerKind::Splash);
        towers::resolve_tower_attacks(&mut self.towers, &mut self.units, TowerKind::Rapid);

        for index in 0..self.units.len() {
            let (before, rest) = self.units.split_at_mut(index);
            let Some((unit, after)) = rest.split_first_mut() else {
                continue;
            };
            let (before, after) = (&*before, &*after);
            let Some(path) = self.layout.lane(unit.lane).get(unit.path_index) else {
                continue;
            };
            units::step_unit(
                unit,
                path.cells(),
                |cell| occupancy::unit_blocks(before, after, cell),
                &mut self.towers,
                &mut self.central,
            );
        }

        self.settle_casualties(out_events);
    }

    /// Removes dead entities, crediting each dead unit's bounty exactly
    /// once, and detects the end of the session.
    fn settle_casualties(&mut self, out_events: &mut Vec<Event>) {
        let mut index = 0;
        while index < self.units.len() {
            if self.units[index].is_alive() {
                index += 1;
                continue;
            }
            let unit = self.units.remove(index);
            let profile = unit.kind.profile();
            self.money += profile.reward;
            self.score += profile.score_value;
            out_events.push(Event::UnitDied {
                unit: unit.id,
                kind: unit.kind,
                reward: profile.reward,
                score_value: profile.score_value,
            });
        }

        let mut index = 0;
        while index < self.towers.len() {
            if self.towers[index].is_alive() {
                index += 1;
                continue;
            }
            let tower = self.towers.remove(index);
            out_events.push(Event::TowerDestroyed {
                tower: tower.id,
                kind: tower.kind,
            });
        }

        if !self.central.is_alive() && !self.game_over {
            self.game_over = true;
            out_events.push(Event::SessionEnded {
                score: self.score,
                survival_ticks: self.survival_ticks,
            });
        }
    }
}

/// Applies the provided command to the session, mutating state
/// deterministically.
///
/// Ticks become no-ops once the session has ended; every other command
/// remains valid.
pub fn apply(session: &mut Session, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            if session.game_over {
                return;
            }
            session.advance_tick(out_events);
        }
        Command::SpawnUnit { kind } => session.spawn_round_robin(kind, out_events),
        Command::PlaceTower { kind, cell } => session.place_tower(kind, cell, out_events),
        Command::Reset => session.reinitialise(),
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use lane_defence_core::{
        Direction, GridCoord, TowerId, TowerKind, UnitId, UnitKind, WorldPoint,
    };

    use super::Session;

    /// Read-only snapshot of a mobile unit.
    #[derive(Clone, Copy, Debug)]
    pub struct UnitSnapshot {
        /// Identifier of the unit.
        pub id: UnitId,
        /// Kind of the unit.
        pub kind: UnitKind,
        /// Lane the unit travels.
        pub lane: usize,
        /// Logical cell the unit occupies.
        pub cell: GridCoord,
        /// Remaining health.
        pub health: u32,
        /// Rendered position in world units.
        pub position: WorldPoint,
        /// Facing derived from the unit's last step.
        pub facing: Direction,
    }

    /// Read-only snapshot of a placed tower.
    #[derive(Clone, Copy, Debug)]
    pub struct TowerSnapshot {
        /// Identifier of the tower.
        pub id: TowerId,
        /// Kind of the tower.
        pub kind: TowerKind,
        /// Cell the tower occupies.
        pub cell: GridCoord,
        /// Remaining health.
        pub health: u32,
        /// Cumulative damage the tower has dealt.
        pub damage_dealt: u32,
    }

    /// Read-only snapshot of one lane's extracted paths.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct LaneSnapshot {
        /// Waypoint sequences of every path assigned to the lane.
        pub paths: Vec<Vec<GridCoord>>,
        /// Terminus classification of each path, where one was found.
        pub ends: Vec<Option<GridCoord>>,
    }

    /// Current money balance.
    #[must_use]
    pub fn money(session: &Session) -> u32 {
        session.money
    }

    /// Current score.
    #[must_use]
    pub fn score(session: &Session) -> u32 {
        session.score
    }

    /// Number of ticks the session has survived.
    #[must_use]
    pub fn survival_ticks(session: &Session) -> u64 {
        session.survival_ticks
    }

    /// Remaining health of the central structure.
    #[must_use]
    pub fn central_health(session: &Session) -> u32 {
        session.central.health
    }

    /// Cumulative damage dealt by the central structure.
    #[must_use]
    pub fn central_damage_dealt(session: &Session) -> u32 {
        session.central.damage_dealt
    }

    /// Footprint origin of the central structure.
    #[must_use]
    pub fn central_origin(session: &Session) -> GridCoord {
        session.central.origin
    }

    /// Whether the central structure has fallen and ticks are no-ops.
    #[must_use]
    pub fn game_over(session: &Session) -> bool {
        session.game_over
    }

    /// Number of active units.
    #[must_use]
    pub fn unit_count(session: &Session) -> usize {
        session.units.len()
    }

    /// Number of standing towers.
    #[must_use]
    pub fn tower_count(session: &Session) -> usize {
        session.towers.len()
    }

    /// Captures a read-only view of the active units, ordered by identifier.
    #[must_use]
    pub fn unit_view(session: &Session) -> Vec<UnitSnapshot> {
        let mut snapshots: Vec<UnitSnapshot> = session
            .units
            .iter()
            .map(|unit| UnitSnapshot {
                id: unit.id,
                kind: unit.kind,
                lane: unit.lane,
                cell: unit.cell,
                health: unit.health,
                position: unit.position,
                facing: unit.facing,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Captures a read-only view of the standing towers, ordered by
    /// identifier.
    #[must_use]
    pub fn tower_view(session: &Session) -> Vec<TowerSnapshot> {
        let mut snapshots: Vec<TowerSnapshot> = session
            .towers
            .iter()
            .map(|tower| TowerSnapshot {
                id: tower.id,
                kind: tower.kind,
                cell: tower.cell,
                health: tower.health,
                damage_dealt: tower.damage_dealt,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Captures the immutable lane layout, one snapshot per lane.
    #[must_use]
    pub fn lane_view(session: &Session) -> Vec<LaneSnapshot> {
        (0..lane_defence_core::LANE_COUNT)
            .map(|lane| LaneSnapshot {
                paths: session
                    .layout
                    .lane(lane)
                    .iter()
                    .map(|path| path.cells().to_vec())
                    .collect(),
                ends: session
                    .layout
                    .lane(lane)
                    .iter()
                    .map(|path| path.end())
                    .collect(),
            })
            .collect()
    }
}
