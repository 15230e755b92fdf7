//! Scenario scaffolding for integration tests.
//!
//! These helpers bypass the command surface to drive a session into a
//! precise combat scenario: units standing on chosen waypoints, towers with
//! drained cooldowns, an arbitrary money balance. They are compiled only
//! under the `scenario_scaffolding` feature and must never be used outside
//! tests.

use lane_defence_core::{GridCoord, UnitId, UnitKind};
use lane_defence_system_combat::Cooldown;

use crate::units::Unit;
use crate::Session;

/// Places a unit directly on a waypoint of a lane's first path.
///
/// Returns the identifier of the deployed unit, or `None` when the lane has
/// no path or the waypoint is out of bounds.
pub fn deploy_unit(
    session: &mut Session,
    kind: UnitKind,
    lane: usize,
    waypoint: usize,
) -> Option<UnitId> {
    let path = session.layout.spawn_path(lane)?;
    let cell = *path.cells().get(waypoint)?;
    let id = UnitId::new(session.next_unit_id);
    session.next_unit_id += 1;
    session
        .units
        .push(Unit::deployed(id, kind, lane, 0, waypoint, cell));
    Some(id)
}

/// Overwrites a unit's health, clamped to the kind's maximum.
///
/// Returns `false` when no unit carries the identifier.
pub fn set_unit_health(session: &mut Session, id: UnitId, health: u32) -> bool {
    match session.units.iter_mut().find(|unit| unit.id == id) {
        Some(unit) => {
            unit.health = health.min(unit.kind.profile().max_health);
            true
        }
        None => false,
    }
}

/// Removes every active unit without crediting bounties.
pub fn clear_units(session: &mut Session) {
    session.units.clear();
}

/// Drains every standing tower's cooldown so it may fire on the next tick.
pub fn ready_towers(session: &mut Session) {
    for tower in session.towers.iter_mut() {
        tower.cooldown = Cooldown::ready();
    }
}

/// Adds money to the session balance.
pub fn grant_money(session: &mut Session, amount: u32) {
    session.money += amount;
}

/// Returns the logical cell of a unit, when it is still active.
#[must_use]
pub fn unit_cell(session: &Session, id: UnitId) -> Option<GridCoord> {
    session
        .units
        .iter()
        .find(|unit| unit.id == id)
        .map(|unit| unit.cell)
}
