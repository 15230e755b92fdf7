#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Combat-resolution primitives shared by every attacker in the engine.
//!
//! Towers, the central structure, and mobile units all resolve their attacks
//! through the same three pieces: a countdown [`Cooldown`] gating how often
//! they may fire, first-match target selection over candidates in container
//! insertion order, and saturating damage application. Movement and siege
//! cadences use the count-up [`StepTimer`] instead, which keeps accumulating
//! while an action is blocked so the action retries on the next tick.

use lane_defence_core::{GridCoord, WorldPoint};

/// Count-down timer gating attacks.
///
/// A ready cooldown stays ready until the attacker actually fires; only a
/// successful shot re-arms it. Attackers that find no target on a non-ready
/// tick call [`Cooldown::tick`] to drain it instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cooldown {
    remaining: u32,
}

impl Cooldown {
    /// Creates a cooldown armed with the provided number of ticks.
    #[must_use]
    pub const fn armed(initial: u32) -> Self {
        Self { remaining: initial }
    }

    /// Creates a cooldown that is ready to fire immediately.
    #[must_use]
    pub const fn ready() -> Self {
        Self { remaining: 0 }
    }

    /// Whether the attacker may fire this tick.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.remaining == 0
    }

    /// Ticks remaining before the attacker may fire again.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Re-arms the cooldown after a successful shot.
    pub fn reset(&mut self, period: u32) {
        self.remaining = period;
    }

    /// Drains one tick, never dropping below ready.
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}

/// Count-up timer gating movement steps and siege strikes.
///
/// The timer advances every tick regardless of whether the gated action
/// succeeds, so a blocked action fires on the first tick its obstacle
/// clears. It only restarts when the action actually happens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepTimer {
    elapsed: u32,
}

impl StepTimer {
    /// Creates a timer with no accumulated ticks.
    #[must_use]
    pub const fn new() -> Self {
        Self { elapsed: 0 }
    }

    /// Accumulates one tick.
    pub fn advance(&mut self) {
        self.elapsed = self.elapsed.saturating_add(1);
    }

    /// Whether enough ticks accumulated for the gated action.
    #[must_use]
    pub const fn is_ready(&self, period: u32) -> bool {
        self.elapsed >= period
    }

    /// Clears the accumulator after the gated action succeeded.
    pub fn restart(&mut self) {
        self.elapsed = 0;
    }
}

/// Whether two points lie within the provided Euclidean range of each other.
#[must_use]
pub fn in_range(origin: WorldPoint, target: WorldPoint, range: f32) -> bool {
    origin.distance_to(target) <= range
}

/// Selects the first candidate within range, in iteration order.
///
/// Candidates must be yielded in container insertion order and already
/// filtered for liveness; the first in-range candidate wins even when a
/// later one is closer.
#[must_use]
pub fn select_first_target<K>(
    origin: WorldPoint,
    range: f32,
    candidates: impl IntoIterator<Item = (K, WorldPoint)>,
) -> Option<K> {
    candidates
        .into_iter()
        .find(|(_, position)| in_range(origin, *position, range))
        .map(|(key, _)| key)
}

/// Applies damage with health clamped at zero.
pub fn apply_damage(health: &mut u32, amount: u32) {
    *health = health.saturating_sub(amount);
}

/// Whether `cell` belongs to the eight-cell ring around a splash primary.
#[must_use]
pub const fn is_splash_adjacent(primary: GridCoord, cell: GridCoord) -> bool {
    let dx = cell.x() - primary.x();
    let dy = cell.y() - primary.y();
    dx >= -1 && dx <= 1 && dy >= -1 && dy <= 1 && !(dx == 0 && dy == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_cooldown_stays_ready_without_a_shot() {
        let mut cooldown = Cooldown::ready();
        cooldown.tick();
        assert!(cooldown.is_ready());
    }

    #[test]
    fn armed_cooldown_drains_to_ready() {
        let mut cooldown = Cooldown::armed(2);
        assert!(!cooldown.is_ready());
        cooldown.tick();
        cooldown.tick();
        assert!(cooldown.is_ready());
        cooldown.reset(5);
        assert_eq!(cooldown.remaining(), 5);
    }

    #[test]
    fn step_timer_keeps_accumulating_while_blocked() {
        let mut timer = StepTimer::new();
        for _ in 0..7 {
            timer.advance();
        }
        assert!(timer.is_ready(5));
        assert!(timer.is_ready(7));
        timer.restart();
        assert!(!timer.is_ready(1));
    }

    #[test]
    fn first_match_beats_nearest_match() {
        let origin = WorldPoint::new(0.0, 0.0);
        let far = WorldPoint::new(50.0, 0.0);
        let near = WorldPoint::new(10.0, 0.0);
        let selected = select_first_target(origin, 80.0, [("far", far), ("near", near)]);
        assert_eq!(selected, Some("far"));
    }

    #[test]
    fn out_of_range_candidates_are_skipped() {
        let origin = WorldPoint::new(0.0, 0.0);
        let outside = WorldPoint::new(100.0, 0.0);
        let inside = WorldPoint::new(30.0, 0.0);
        let selected = select_first_target(origin, 80.0, [(1, outside), (2, inside)]);
        assert_eq!(selected, Some(2));
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let origin = WorldPoint::new(0.0, 0.0);
        assert!(in_range(origin, WorldPoint::new(80.0, 0.0), 80.0));
        assert!(!in_range(origin, WorldPoint::new(80.5, 0.0), 80.0));
    }

    #[test]
    fn damage_clamps_health_at_zero() {
        let mut health = 30;
        apply_damage(&mut health, 50);
        assert_eq!(health, 0);
    }

    #[test]
    fn splash_ring_excludes_the_primary_cell() {
        let primary = GridCoord::new(5, 5);
        assert!(is_splash_adjacent(primary, GridCoord::new(4, 4)));
        assert!(is_splash_adjacent(primary, GridCoord::new(5, 6)));
        assert!(!is_splash_adjacent(primary, primary));
        assert!(!is_splash_adjacent(primary, GridCoord::new(7, 5)));
    }
}
