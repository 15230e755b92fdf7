//! Cell-occupancy queries shared by movement and tower placement.

use lane_defence_core::GridCoord;

use crate::towers::{Central, Tower};
use crate::units::Unit;

/// Whether any living unit in either slice logically occupies the cell.
///
/// Movement calls this with the mover excluded by splitting the unit slice
/// around it; rendered positions are ignored, only logical cells count.
pub(crate) fn unit_blocks(before: &[Unit], after: &[Unit], cell: GridCoord) -> bool {
    before
        .iter()
        .chain(after.iter())
        .any(|unit| unit.is_alive() && unit.cell == cell)
}

/// Whether a tower or the central structure's footprint covers the cell.
pub(crate) fn structure_occupies(towers: &[Tower], central: &Central, cell: GridCoord) -> bool {
    towers.iter().any(|tower| tower.cell == cell) || central.footprint_contains(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_core::{TowerId, TowerKind, UnitId, UnitKind};

    fn unit_at(id: u32, cell: GridCoord) -> Unit {
        Unit::deployed(UnitId::new(id), UnitKind::Basic, 0, 0, 0, cell)
    }

    #[test]
    fn dead_units_do_not_block() {
        let mut blocker = unit_at(0, GridCoord::new(2, 2));
        blocker.take_damage(60);
        assert!(!unit_blocks(&[blocker], &[], GridCoord::new(2, 2)));
    }

    #[test]
    fn living_units_block_their_logical_cell() {
        let blocker = unit_at(0, GridCoord::new(2, 2));
        assert!(unit_blocks(&[], &[blocker], GridCoord::new(2, 2)));
    }

    #[test]
    fn central_footprint_occupies_every_covered_cell() {
        let central = Central::new(GridCoord::new(5, 5));
        let towers = vec![Tower::new(TowerId::new(0), TowerKind::Basic, GridCoord::new(1, 1))];
        assert!(structure_occupies(&towers, &central, GridCoord::new(1, 1)));
        assert!(structure_occupies(&towers, &central, GridCoord::new(6, 7)));
        assert!(!structure_occupies(&towers, &central, GridCoord::new(4, 4)));
    }
}
