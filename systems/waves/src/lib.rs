#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave policy deciding which unit kind spawns on a given tick.

use lane_defence_core::UnitKind;

/// Spawn trigger periods measured in ticks of the global spawn counter.
///
/// A period of zero disables the corresponding trigger. Triggers are
/// evaluated in the fixed priority order heavy, ranged, basic, and at most
/// one fires per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveSchedule {
    heavy_period: u64,
    ranged_period: u64,
    basic_period: u64,
}

impl WaveSchedule {
    /// Creates a schedule with explicit per-kind trigger periods.
    #[must_use]
    pub const fn new(heavy_period: u64, ranged_period: u64, basic_period: u64) -> Self {
        Self {
            heavy_period,
            ranged_period,
            basic_period,
        }
    }

    /// The tuning the engine ships with: heavy every 1200 ticks, ranged
    /// every 600, basic every 150.
    #[must_use]
    pub const fn standard() -> Self {
        Self::new(1_200, 600, 150)
    }

    /// Decides which kind, if any, the spawn counter triggers on this tick.
    ///
    /// The counter is expected to be strictly positive; a counter of zero
    /// would satisfy every modulo test before any time has passed, so it
    /// never triggers.
    #[must_use]
    pub fn scheduled_kind(&self, spawn_counter: u64) -> Option<UnitKind> {
        if spawn_counter == 0 {
            return None;
        }
        if triggers(spawn_counter, self.heavy_period) {
            Some(UnitKind::Heavy)
        } else if triggers(spawn_counter, self.ranged_period) {
            Some(UnitKind::Ranged)
        } else if triggers(spawn_counter, self.basic_period) {
            Some(UnitKind::Basic)
        } else {
            None
        }
    }
}

impl Default for WaveSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

fn triggers(counter: u64, period: u64) -> bool {
    period != 0 && counter % period == 0
}
