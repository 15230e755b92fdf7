//! Lane extraction from the decoded grid map.

use std::collections::BTreeSet;

use lane_defence_core::{GridCoord, LANE_COUNT};

use crate::map::{CellKind, GridMap, MapError};

/// A single walkable path traced through the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LanePath {
    cells: Vec<GridCoord>,
    end: Option<GridCoord>,
}

impl LanePath {
    /// Waypoints in traversal order, starting at the spawn cell.
    pub(crate) fn cells(&self) -> &[GridCoord] {
        &self.cells
    }

    /// The path cell classified as the lane's terminus, when one exists.
    pub(crate) fn end(&self) -> Option<GridCoord> {
        self.end
    }
}

/// Immutable navigation data extracted from a map at session construction.
#[derive(Clone, Debug)]
pub(crate) struct LaneLayout {
    lanes: [Vec<LanePath>; LANE_COUNT],
    base: GridCoord,
    map: GridMap,
}

impl LaneLayout {
    /// Extracts every traceable path and partitions them into lanes.
    ///
    /// Paths are discovered from start cells in coordinate order and path
    /// `i` joins lane `i mod 3`, so extraction from the same map always
    /// yields the same layout. Fails only when the map records no base cell.
    pub(crate) fn from_map(map: &GridMap) -> Result<Self, MapError> {
        let base = map
            .iter()
            .find(|(_, kind)| *kind == CellKind::Base)
            .map(|(cell, _)| cell)
            .ok_or(MapError::MissingBase)?;

        let starts: Vec<GridCoord> = map
            .iter()
            .filter(|(_, kind)| *kind == CellKind::Path)
            .map(|(cell, _)| cell)
            .filter(|cell| classify(map, *cell) == Some(Endpoint::Start))
            .collect();

        let mut lanes: [Vec<LanePath>; LANE_COUNT] = [Vec::new(), Vec::new(), Vec::new()];
        let mut visited: BTreeSet<GridCoord> = BTreeSet::new();
        let mut path_count = 0;

        for start in starts {
            if visited.contains(&start) {
                continue;
            }
            let path = trace_path(map, start, &mut visited);
            lanes[path_count % LANE_COUNT].push(path);
            path_count += 1;
        }

        Ok(Self {
            lanes,
            base,
            map: map.clone(),
        })
    }

    /// Paths assigned to the provided lane.
    pub(crate) fn lane(&self, lane: usize) -> &[LanePath] {
        self.lanes.get(lane).map_or(&[], Vec::as_slice)
    }

    /// First path of the provided lane, the one spawns enter on.
    pub(crate) fn spawn_path(&self, lane: usize) -> Option<&LanePath> {
        self.lanes.get(lane)?.first()
    }

    /// First base-classified cell in coordinate order; the central
    /// structure's footprint origin.
    pub(crate) fn base(&self) -> GridCoord {
        self.base
    }

    /// Category of a cell in the underlying map.
    pub(crate) fn category(&self, cell: GridCoord) -> CellKind {
        self.map.category(cell)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Endpoint {
    Start,
    End,
}

/// Classifies a path cell from the categories of its 4-neighbourhood.
///
/// A start touches exactly one path cell and three empty cells; an end
/// touches exactly one path cell, one base cell and two empty cells. The
/// rule counts a single base neighbour, so bases wider than one cell can
/// leave a terminus unclassified.
fn classify(map: &GridMap, cell: GridCoord) -> Option<Endpoint> {
    let mut path_count = 0;
    let mut base_count = 0;
    let mut empty_count = 0;
    for neighbour in cell.neighbours4() {
        match map.category(neighbour) {
            CellKind::Path => path_count += 1,
            CellKind::Base => base_count += 1,
            CellKind::Empty => empty_count += 1,
        }
    }
    if path_count == 1 && empty_count == 3 {
        Some(Endpoint::Start)
    } else if path_count == 1 && base_count == 1 && empty_count == 2 {
        Some(Endpoint::End)
    } else {
        None
    }
}

/// Traces one path depth-first from a start cell.
///
/// Neighbours are pushed in the fixed probe order west, east, north, south
/// and popped last-in first-out; the visit sequence is the path. Cells
/// already claimed by an earlier path are never revisited.
fn trace_path(map: &GridMap, start: GridCoord, visited: &mut BTreeSet<GridCoord>) -> LanePath {
    let mut cells = Vec::new();
    let mut end = None;
    let mut stack = vec![start];

    while let Some(cell) = stack.pop() {
        if !visited.insert(cell) {
            continue;
        }
        cells.push(cell);
        if end.is_none() && classify(map, cell) == Some(Endpoint::End) {
            end = Some(cell);
        }
        for neighbour in cell.neighbours4() {
            if map.category(neighbour) == CellKind::Path && !visited.contains(&neighbour) {
                stack.push(neighbour);
            }
        }
    }

    LanePath { cells, end }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn missing_base_is_fatal() {
        let map = map_from_cells(&[(0, 0), (1, 0)], &[]);
        assert!(matches!(
            LaneLayout::from_map(&map),
            Err(MapError::MissingBase)
        ));
    }

    #[test]
    fn straight_corridor_traces_in_order() {
        let map = map_from_cells(&[(1, 5), (2, 5), (3, 5), (4, 5)], &[(5, 5)]);
        let layout = LaneLayout::from_map(&map).expect("layout");
        let path = layout.spawn_path(0).expect("lane 0 path");
        assert_eq!(
            path.cells(),
            &[
                GridCoord::new(1, 5),
                GridCoord::new(2, 5),
                GridCoord::new(3, 5),
                GridCoord::new(4, 5),
            ]
        );
        assert_eq!(path.end(), Some(GridCoord::new(4, 5)));
        assert_eq!(layout.base(), GridCoord::new(5, 5));
    }

    #[test]
    fn branches_follow_the_probe_order() {
        // A corridor with a southern stub: the stub is visited before the
        // eastern continuation because south is probed off the stack first.
        let map = map_from_cells(
            &[
                (4, 4),
                (4, 5),
                (5, 5),
                (5, 6),
                (5, 7),
                (6, 6),
                (6, 5),
                (7, 5),
            ],
            &[(8, 5)],
        );
        let layout = LaneLayout::from_map(&map).expect("layout");
        let path = layout.spawn_path(0).expect("lane 0 path");
        assert_eq!(
            path.cells(),
            &[
                GridCoord::new(4, 4),
                GridCoord::new(4, 5),
                GridCoord::new(5, 5),
                GridCoord::new(5, 6),
                GridCoord::new(5, 7),
                GridCoord::new(6, 6),
                GridCoord::new(6, 5),
                GridCoord::new(7, 5),
            ]
        );
    }

    #[test]
    fn visited_starts_do_not_trace_twice() {
        // The dead-end stub at (5, 7) also classifies as a start, but the
        // first traversal claims it.
        let map = map_from_cells(
            &[
                (4, 4),
                (4, 5),
                (5, 5),
                (5, 6),
                (5, 7),
                (6, 6),
                (6, 5),
                (7, 5),
            ],
            &[(8, 5)],
        );
        let layout = LaneLayout::from_map(&map).expect("layout");
        let total: usize = (0..3).map(|lane| layout.lane(lane).len()).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn paths_round_robin_across_lanes() {
        let map = map_from_cells(
            &[
                (1, 5),
                (2, 5),
                (3, 5),
                (4, 5),
                (9, 1),
                (9, 2),
                (9, 3),
                (9, 4),
                (9, 9),
                (9, 8),
                (9, 7),
                (9, 6),
            ],
            &[(9, 5), (5, 5)],
        );
        let layout = LaneLayout::from_map(&map).expect("layout");
        assert_eq!(layout.lane(0).len(), 1);
        assert_eq!(layout.lane(1).len(), 1);
        assert_eq!(layout.lane(2).len(), 1);
        assert_eq!(
            layout.spawn_path(0).expect("lane 0").cells()[0],
            GridCoord::new(1, 5)
        );
        assert_eq!(
            layout.spawn_path(1).expect("lane 1").cells()[0],
            GridCoord::new(9, 1)
        );
        assert_eq!(
            layout.spawn_path(2).expect("lane 2").cells()[0],
            GridCoord::new(9, 9)
        );
    }

    #[test]
    fn extraction_is_idempotent() {
        let map = map_from_cells(&[(1, 5), (2, 5), (3, 5), (4, 5)], &[(5, 5)]);
        let first = LaneLayout::from_map(&map).expect("layout");
        let second = LaneLayout::from_map(&map).expect("layout");
        for lane in 0..3 {
            assert_eq!(first.lane(lane), second.lane(lane));
        }
        assert_eq!(first.base(), second.base());
    }
}
