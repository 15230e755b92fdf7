#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line runner for Lane Defence sessions.
//!
//! Loads a map asset, optionally applies a tower-placement plan, and runs
//! the fixed-timestep simulation to completion, printing a progress digest
//! every twenty simulated seconds and a final outcome summary. External
//! search drivers parse the summary as their fitness surface.

mod plan;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lane_defence_core::{Command, Event, TICKS_PER_SECOND};
use lane_defence_world::{apply, query, GridMap, Session};

use crate::plan::PlacementPlan;

const DIGEST_INTERVAL_TICKS: u64 = 20 * TICKS_PER_SECOND;

#[derive(Debug, Parser)]
#[command(name = "lane-defence", about = "Runs a headless Lane Defence session")]
struct Args {
    /// Path to the JSON map asset.
    map: PathBuf,

    /// Optional JSON tower-placement plan applied before the run.
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Maximum number of ticks to simulate (default: ten minutes).
    #[arg(long, default_value_t = 36_000)]
    max_ticks: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let map_text = fs::read_to_string(&args.map)
        .with_context(|| format!("reading map asset {}", args.map.display()))?;
    let map = GridMap::from_json(&map_text).context("decoding map asset")?;
    let mut session = Session::from_map(&map).context("constructing session")?;

    let mut events = Vec::new();
    if let Some(path) = &args.plan {
        let plan_text = fs::read_to_string(path)
            .with_context(|| format!("reading placement plan {}", path.display()))?;
        let plan = PlacementPlan::from_json(&plan_text).context("decoding placement plan")?;
        for placement in plan.placements() {
            apply(
                &mut session,
                Command::PlaceTower {
                    kind: placement.kind(),
                    cell: placement.cell(),
                },
                &mut events,
            );
        }
        for event in events.drain(..) {
            if let Event::TowerPlacementRejected { kind, cell, reason } = event {
                println!(
                    "placement rejected: {kind:?} at ({}, {}): {reason:?}",
                    cell.x(),
                    cell.y()
                );
            }
        }
    }

    for _ in 0..args.max_ticks {
        apply(&mut session, Command::Tick, &mut events);
        events.clear();
        if query::game_over(&session) {
            break;
        }
        if query::survival_ticks(&session) % DIGEST_INTERVAL_TICKS == 0 {
            print_digest(&session);
        }
    }

    print_summary(&session);
    Ok(())
}

fn print_digest(session: &Session) {
    println!(
        "t={}s money={} score={} units={} towers={} central={}",
        query::survival_ticks(session) / TICKS_PER_SECOND,
        query::money(session),
        query::score(session),
        query::unit_count(session),
        query::tower_count(session),
        query::central_health(session),
    );
}

fn print_summary(session: &Session) {
    let ticks = query::survival_ticks(session);
    let outcome = if query::game_over(session) {
        "central structure destroyed"
    } else {
        "survived"
    };
    println!("outcome: {outcome}");
    println!("score: {}", query::score(session));
    println!("survived: {}s ({ticks} ticks)", ticks / TICKS_PER_SECOND);
    println!("money: {}", query::money(session));
}
