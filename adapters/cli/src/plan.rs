//! Tower-placement plans decoded from JSON.
//!
//! A plan is the scripted stand-in for interactive tower placement: a JSON
//! array of `{"kind": ..., "cell": [x, y]}` records, applied in order
//! before the simulation starts. Cells are grid coordinates, not world
//! units. Search drivers emit these files to evaluate candidate layouts.

use anyhow::{bail, Context, Result};
use lane_defence_core::{GridCoord, TowerKind};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PlacementRecord {
    kind: String,
    cell: [i32; 2],
}

/// One requested tower placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Placement {
    kind: TowerKind,
    cell: GridCoord,
}

impl Placement {
    /// Kind of tower to place.
    #[must_use]
    pub(crate) fn kind(&self) -> TowerKind {
        self.kind
    }

    /// Grid cell to place it on.
    #[must_use]
    pub(crate) fn cell(&self) -> GridCoord {
        self.cell
    }
}

/// Ordered tower placements applied before a run.
#[derive(Debug)]
pub(crate) struct PlacementPlan {
    placements: Vec<Placement>,
}

impl PlacementPlan {
    /// Decodes a plan from its JSON text.
    pub(crate) fn from_json(text: &str) -> Result<Self> {
        let records: Vec<PlacementRecord> =
            serde_json::from_str(text).context("plan is not an array of placement records")?;
        let mut placements = Vec::with_capacity(records.len());
        for record in records {
            let kind = match record.kind.as_str() {
                "basic" => TowerKind::Basic,
                "rapid" => TowerKind::Rapid,
                "splash" => TowerKind::Splash,
                other => bail!("unknown tower kind {other:?}"),
            };
            placements.push(Placement {
                kind,
                cell: GridCoord::new(record.cell[0], record.cell[1]),
            });
        }
        Ok(Self { placements })
    }

    /// Placements in plan order.
    #[must_use]
    pub(crate) fn placements(&self) -> &[Placement] {
        &self.placements
    }
}
