//! Stationary-structure state and the per-tick structure firing passes.

use lane_defence_core::{
    GridCoord, TowerId, TowerKind, WorldPoint, CELL_LENGTH, CENTRAL_ATTACK_POWER,
    CENTRAL_COOLDOWN_PERIOD, CENTRAL_FOOTPRINT_CELLS, CENTRAL_MAX_HEALTH, CENTRAL_RANGE,
};
use lane_defence_system_combat::{
    apply_damage, is_splash_adjacent, select_first_target, Cooldown, StepTimer,
};

use crate::units::Unit;

/// A placed tower.
#[derive(Clone, Debug)]
pub(crate) struct Tower {
    pub(crate) id: TowerId,
    pub(crate) kind: TowerKind,
    pub(crate) cell: GridCoord,
    pub(crate) health: u32,
    pub(crate) cooldown: Cooldown,
    pub(crate) decay_timer: StepTimer,
    /// Cumulative damage dealt across the tower's lifetime; telemetry only.
    pub(crate) damage_dealt: u32,
}

impl Tower {
    /// Creates a tower on the provided cell, armed with its kind's initial
    /// cooldown.
    pub(crate) fn new(id: TowerId, kind: TowerKind, cell: GridCoord) -> Self {
        let profile = kind.profile();
        Self {
            id,
            kind,
            cell,
            health: profile.max_health,
            cooldown: Cooldown::armed(profile.initial_cooldown),
            decay_timer: StepTimer::new(),
            damage_dealt: 0,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub(crate) fn take_damage(&mut self, amount: u32) {
        apply_damage(&mut self.health, amount);
    }
}

/// The defended central structure.
#[derive(Clone, Debug)]
pub(crate) struct Central {
    /// Top-left cell of the square footprint.
    pub(crate) origin: GridCoord,
    pub(crate) health: u32,
    pub(crate) cooldown: Cooldown,
    pub(crate) damage_dealt: u32,
}

impl Central {
    /// Creates a full-health central structure anchored on the provided
    /// footprint origin, ready to fire immediately.
    pub(crate) fn new(origin: GridCoord) -> Self {
        Self {
            origin,
            health: CENTRAL_MAX_HEALTH,
            cooldown: Cooldown::ready(),
            damage_dealt: 0,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub(crate) fn take_damage(&mut self, amount: u32) {
        apply_damage(&mut self.health, amount);
    }

    /// Centre of the footprint's bounding box in world units; the point the
    /// firing radius is measured from.
    pub(crate) fn centre(&self) -> WorldPoint {
        let origin = self.origin.world_origin();
        let half = CENTRAL_FOOTPRINT_CELLS as f32 * CELL_LENGTH / 2.0;
        WorldPoint::new(origin.x() + half, origin.y() + half)
    }

    /// Whether the footprint covers the provided cell.
    pub(crate) fn footprint_contains(&self, cell: GridCoord) -> bool {
        let dx = cell.x() - self.origin.x();
        let dy = cell.y() - self.origin.y();
        (0..CENTRAL_FOOTPRINT_CELLS).contains(&dx) && (0..CENTRAL_FOOTPRINT_CELLS).contains(&dy)
    }
}

/// Fires the central structure at the first living unit within its radius.
///
/// The radius is measured from the footprint's bounding-box centre to unit
/// cell centres; every other structure measures between cell origins.
pub(crate) fn resolve_central_attack(central: &mut Central, units: &mut [Unit]) {
    if !central.is_alive() {
        return;
    }
    if central.cooldown.is_ready() {
        let centre = central.centre();
        let candidates = units
            .iter()
            .enumerate()
            .filter(|(_, unit)| unit.is_alive())
            .map(|(index, unit)| (index, unit.cell.world_centre()));
        if let Some(index) = select_first_target(centre, CENTRAL_RANGE, candidates) {
            units[index].take_damage(CENTRAL_ATTACK_POWER);
            central.damage_dealt += CENTRAL_ATTACK_POWER;
            central.cooldown.reset(CENTRAL_COOLDOWN_PERIOD);
        }
    } else {
        central.cooldown.tick();
    }
}

/// Runs the structural decay update for every decaying tower.
///
/// The decay update also drains the attack cooldown, so a decaying tower's
/// cooldown loses two ticks per idle tick and its effective firing interval
/// is half its nominal period.
pub(crate) fn resolve_decay(towers: &mut [Tower]) {
    for tower in towers.iter_mut() {
        if !tower.is_alive() {
            continue;
        }
        let Some(decay) = tower.kind.profile().decay else {
            continue;
        };
        tower.decay_timer.advance();
        if tower.decay_timer.is_ready(decay.period) {
            tower.take_damage(decay.damage);
            tower.decay_timer.restart();
        }
        tower.cooldown.tick();
    }
}

/// Fires every living tower of one kind, in placement order.
///
/// A ready tower damages the first living unit within range of its cell
/// origin and re-arms; splash towers then deal the same damage to every
/// living unit on the ring of cells around the primary target, counting
/// each victim toward the tower's damage telemetry. A ready tower with no
/// target keeps its cooldown at ready.
pub(crate) fn resolve_tower_attacks(towers: &mut [Tower], units: &mut [Unit], kind: TowerKind) {
    let profile = kind.profile();
    for tower in towers.iter_mut().filter(|tower| tower.kind == kind) {
        if !tower.is_alive() {
            continue;
        }
        if !tower.cooldown.is_ready() {
            tower.cooldown.tick();
            continue;
        }
        let origin = tower.cell.world_origin();
        let candidates = units
            .iter()
            .enumerate()
            .filter(|(_, unit)| unit.is_alive())
            .map(|(index, unit)| (index, unit.cell.world_origin()));
        let Some(primary) = select_first_target(origin, profile.range(), candidates) else {
            continue;
        };
        let primary_cell = units[primary].cell;
        units[primary].take_damage(profile.damage);
        tower.damage_dealt += profile.damage;
        if kind == TowerKind::Splash {
            for (index, unit) in units.iter_mut().enumerate() {
                if index != primary
                    && unit.is_alive()
                    && is_splash_adjacent(primary_cell, unit.cell)
                {
                    unit.take_damage(profile.damage);
                    tower.damage_dealt += profile.damage;
                }
            }
        }
        tower.cooldown.reset(profile.cooldown_period);
    }
}
