//! Mobile-unit state and the per-tick unit state machine.

use lane_defence_core::{Direction, GridCoord, TowerKind, UnitId, UnitKind, UnitProfile, WorldPoint};
use lane_defence_system_combat::{apply_damage, in_range, select_first_target, Cooldown, StepTimer};

use crate::towers::{Central, Tower};

/// World-unit distance a basic unit's rendered position covers per axis per
/// tick while gliding toward its logical cell.
const GLIDE_STEP: f32 = 2.0;

/// Number of equal sub-steps a ranged unit's rendered position takes to
/// cross one cell.
const RANGED_GLIDE_STEPS: u32 = 10;

/// Attack cadence, split by how the counter behaves between attacks.
///
/// Accumulating cadences keep counting while the attack is impossible and
/// fire on the first possible tick; draining cadences only count down and
/// hold at ready until a target appears.
#[derive(Clone, Copy, Debug)]
pub(crate) enum AttackCadence {
    /// Count-up cadence used by basic units for their siege strikes.
    Accumulate(StepTimer),
    /// Count-down cadence used by ranged and heavy units; starts ready so
    /// the first contact fires immediately.
    Drain(Cooldown),
}

/// In-flight rendered-position interpolation for ranged units.
#[derive(Clone, Copy, Debug)]
struct Glide {
    from: WorldPoint,
    to: WorldPoint,
    step: u32,
}

/// A mobile unit travelling one of the extracted paths.
#[derive(Clone, Debug)]
pub(crate) struct Unit {
    pub(crate) id: UnitId,
    pub(crate) kind: UnitKind,
    pub(crate) lane: usize,
    pub(crate) path_index: usize,
    pub(crate) waypoint: usize,
    /// Logical cell, always the waypoint's cell; all occupancy and range
    /// checks use this, never the rendered position.
    pub(crate) cell: GridCoord,
    pub(crate) health: u32,
    pub(crate) position: WorldPoint,
    pub(crate) facing: Direction,
    pub(crate) move_timer: StepTimer,
    pub(crate) cadence: AttackCadence,
    glide: Option<Glide>,
}

impl Unit {
    /// Creates a unit standing on the provided waypoint of its path.
    pub(crate) fn deployed(
        id: UnitId,
        kind: UnitKind,
        lane: usize,
        path_index: usize,
        waypoint: usize,
        cell: GridCoord,
    ) -> Self {
        let cadence = match kind {
            UnitKind::Basic => AttackCadence::Accumulate(StepTimer::new()),
            UnitKind::Ranged | UnitKind::Heavy => AttackCadence::Drain(Cooldown::ready()),
        };
        Self {
            id,
            kind,
            lane,
            path_index,
            waypoint,
            cell,
            health: kind.profile().max_health,
            position: cell.world_origin(),
            facing: Direction::East,
            move_timer: StepTimer::new(),
            cadence,
            glide: None,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub(crate) fn take_damage(&mut self, amount: u32) {
        apply_damage(&mut self.health, amount);
    }

    /// Commits a logical step onto the next waypoint.
    fn advance_to(&mut self, waypoint: usize, next: GridCoord) {
        let from = self.cell;
        if let Some(facing) = Direction::from_delta(next.x() - from.x(), next.y() - from.y()) {
            self.facing = facing;
        }
        self.waypoint = waypoint;
        self.cell = next;
        match self.kind {
            UnitKind::Basic => {}
            UnitKind::Ranged => {
                self.glide = Some(Glide {
                    from: self.position,
                    to: next.world_origin(),
                    step: 0,
                });
            }
            UnitKind::Heavy => self.position = next.world_origin(),
        }
    }

    /// Advances the rendered position one tick toward the logical cell.
    fn settle_position(&mut self) {
        match self.kind {
            UnitKind::Basic => {
                let target = self.cell.world_origin();
                self.position = WorldPoint::new(
                    approach(self.position.x(), target.x()),
                    approach(self.position.y(), target.y()),
                );
            }
            UnitKind::Ranged => {
                if let Some(glide) = &mut self.glide {
                    glide.step += 1;
                    let fraction = glide.step as f32 / RANGED_GLIDE_STEPS as f32;
                    self.position = WorldPoint::new(
                        glide.from.x() + (glide.to.x() - glide.from.x()) * fraction,
                        glide.from.y() + (glide.to.y() - glide.from.y()) * fraction,
                    );
                    if glide.step >= RANGED_GLIDE_STEPS {
                        self.glide = None;
                    }
                }
            }
            UnitKind::Heavy => self.position = self.cell.world_origin(),
        }
    }
}

fn approach(value: f32, target: f32) -> f32 {
    if value < target {
        (value + GLIDE_STEP).min(target)
    } else if value > target {
        (value - GLIDE_STEP).max(target)
    } else {
        value
    }
}

/// Structure the unit state machine picked as this tick's attack target.
enum StructureTarget {
    Tower(usize),
    Central,
}

/// Runs one tick of a single unit's state machine.
///
/// At the final waypoint the unit besieges the central structure on its
/// attack cadence. En route, ranged and heavy units scan structures
/// whenever their cooldown is ready; a hit fires and suppresses movement
/// until the cooldown drains again. Movement itself is gated by the move
/// timer and an occupancy check on the next waypoint's cell.
pub(crate) fn step_unit(
    unit: &mut Unit,
    path: &[GridCoord],
    is_occupied: impl Fn(GridCoord) -> bool,
    towers: &mut [Tower],
    central: &mut Central,
) {
    if !unit.is_alive() {
        return;
    }
    let Some(last) = path.len().checked_sub(1) else {
        return;
    };
    let profile = unit.kind.profile();

    if unit.waypoint >= last {
        besiege(unit, &profile, central);
        unit.settle_position();
        return;
    }

    let mut may_move = true;
    match &mut unit.cadence {
        AttackCadence::Drain(cooldown) => {
            if cooldown.is_ready() {
                if let Some(target) = select_structure(unit.cell, &profile, towers, central) {
                    match target {
                        StructureTarget::Tower(index) => {
                            towers[index].take_damage(profile.attack_power);
                        }
                        StructureTarget::Central => central.take_damage(profile.attack_power),
                    }
                    cooldown.reset(profile.attack_period);
                    may_move = false;
                }
            } else {
                cooldown.tick();
                may_move = false;
            }
        }
        AttackCadence::Accumulate(_) => {}
    }

    unit.move_timer.advance();
    if may_move && unit.move_timer.is_ready(profile.move_period) {
        let next = path[unit.waypoint + 1];
        if !is_occupied(next) {
            unit.advance_to(unit.waypoint + 1, next);
            unit.move_timer.restart();
        }
    }
    unit.settle_position();
}

/// Strikes the central structure on the unit's attack cadence.
fn besiege(unit: &mut Unit, profile: &UnitProfile, central: &mut Central) {
    match &mut unit.cadence {
        AttackCadence::Accumulate(timer) => {
            timer.advance();
            if timer.is_ready(profile.attack_period) {
                central.take_damage(profile.siege_damage);
                timer.restart();
            }
        }
        AttackCadence::Drain(cooldown) => {
            if cooldown.is_ready() {
                central.take_damage(profile.siege_damage);
                cooldown.reset(profile.attack_period);
            } else {
                cooldown.tick();
            }
        }
    }
}

/// Scans structures in the fixed priority order basic towers, splash
/// towers, rapid towers, central structure; within a kind the first
/// in-range structure in insertion order wins. Ranges are measured between
/// cell origins.
fn select_structure(
    cell: GridCoord,
    profile: &UnitProfile,
    towers: &[Tower],
    central: &Central,
) -> Option<StructureTarget> {
    if profile.attack_range_cells <= 0.0 {
        return None;
    }
    let origin = cell.world_origin();
    let range = profile.attack_range();
    for kind in [TowerKind::Basic, TowerKind::Splash, TowerKind::Rapid] {
        let candidates = towers
            .iter()
            .enumerate()
            .filter(|(_, tower)| tower.kind == kind && tower.is_alive())
            .map(|(index, tower)| (index, tower.cell.world_origin()));
        if let Some(index) = select_first_target(origin, range, candidates) {
            return Some(StructureTarget::Tower(index));
        }
    }
    if central.is_alive() && in_range(origin, central.origin.world_origin(), range) {
        return Some(StructureTarget::Central);
    }
    None
}
