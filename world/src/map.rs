//! Map asset decoding from the editor's JSON cell dump.

use std::collections::BTreeMap;

use lane_defence_core::{GridCoord, CELL_LENGTH_UNITS};
use serde::Deserialize;
use thiserror::Error;

/// Category assigned to a grid cell by the map asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    /// Buildable ground; also the implicit category of unrecorded cells.
    Empty,
    /// Part of a walkable lane.
    Path,
    /// Part of the region the central structure is anchored on.
    Base,
}

/// Errors raised while decoding or interpreting a map asset.
#[derive(Debug, Error)]
pub enum MapError {
    /// The asset was not a JSON array of `[x, y, label]` records, or a
    /// record carried an unknown label.
    #[error("malformed map record: {0}")]
    Format(String),
    /// No record classified any cell as part of the base.
    #[error("map contains no base cell")]
    MissingBase,
}

#[derive(Debug, Deserialize)]
struct CellRecord(i32, i32, String);

/// Immutable mapping from grid cells to their categories.
///
/// Records arrive at world-unit granularity and are floor-divided by the
/// cell length to find their containing cell. Later records overwrite
/// earlier ones for the same cell; the `BTreeMap` storage fixes the
/// iteration order to coordinate order regardless of record order.
#[derive(Clone, Debug)]
pub struct GridMap {
    cells: BTreeMap<GridCoord, CellKind>,
}

impl GridMap {
    /// Decodes a map asset from its JSON text.
    pub fn from_json(text: &str) -> Result<Self, MapError> {
        let records: Vec<CellRecord> =
            serde_json::from_str(text).map_err(|err| MapError::Format(err.to_string()))?;

        let mut cells = BTreeMap::new();
        for CellRecord(x, y, label) in records {
            let kind = match label.as_str() {
                "white" => CellKind::Empty,
                "grey" => CellKind::Path,
                "green" => CellKind::Base,
                other => return Err(MapError::Format(format!("unknown label {other:?}"))),
            };
            let cell = GridCoord::new(
                x.div_euclid(CELL_LENGTH_UNITS),
                y.div_euclid(CELL_LENGTH_UNITS),
            );
            let _ = cells.insert(cell, kind);
        }

        Ok(Self { cells })
    }

    /// Category of the provided cell; cells absent from the asset are empty.
    #[must_use]
    pub fn category(&self, cell: GridCoord) -> CellKind {
        self.cells.get(&cell).copied().unwrap_or(CellKind::Empty)
    }

    /// Iterates recorded cells in coordinate order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (GridCoord, CellKind)> + '_ {
        self.cells.iter().map(|(cell, kind)| (*cell, *kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_records_at_world_unit_granularity() {
        let map = GridMap::from_json(r#"[[40, 20, "grey"], [60, 20, "green"]]"#)
            .expect("valid asset");
        assert_eq!(map.category(GridCoord::new(2, 1)), CellKind::Path);
        assert_eq!(map.category(GridCoord::new(3, 1)), CellKind::Base);
        assert_eq!(map.category(GridCoord::new(0, 0)), CellKind::Empty);
    }

    #[test]
    fn negative_coordinates_floor_toward_negative_infinity() {
        let map = GridMap::from_json(r#"[[-20, -1, "grey"]]"#).expect("valid asset");
        assert_eq!(map.category(GridCoord::new(-1, -1)), CellKind::Path);
    }

    #[test]
    fn unknown_labels_are_rejected() {
        let err = GridMap::from_json(r#"[[0, 0, "purple"]]"#).unwrap_err();
        assert!(matches!(err, MapError::Format(_)));
    }

    #[test]
    fn non_array_assets_are_rejected() {
        let err = GridMap::from_json(r#"{"cells": []}"#).unwrap_err();
        assert!(matches!(err, MapError::Format(_)));
    }

    #[test]
    fn later_records_overwrite_earlier_ones() {
        let map = GridMap::from_json(r#"[[0, 0, "grey"], [0, 0, "white"]]"#)
            .expect("valid asset");
        assert_eq!(map.category(GridCoord::new(0, 0)), CellKind::Empty);
    }
}
