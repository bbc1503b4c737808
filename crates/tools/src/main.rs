mod config;
mod map;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use delve_core::autopilot::{ExpeditionSummary, Policy, run_expedition};
use delve_core::dice::{SeededRolls, runtime_seed};
use delve_core::{Expedition, MapSnapshot};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use config::RunConfig;

#[derive(Parser)]
#[command(author, version, about = "Sends a party through a generated dungeon on autopilot")]
struct Args {
    /// Seed for dungeon layout and every die roll; random when neither flag nor config sets it
    #[arg(short, long)]
    seed: Option<u64>,
    /// Dungeon level
    #[arg(short, long)]
    level: Option<u32>,
    /// TOML file describing the party
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Print the summary and final map snapshot as JSON
    #[arg(long)]
    json: bool,
    /// Give up after entering this many rooms
    #[arg(long, default_value_t = 200)]
    max_rooms_visited: u32,
    /// Log filter, e.g. `debug` or `delve_core=trace`; falls back to RUST_LOG, then `info`
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Serialize)]
struct Report {
    seed: u64,
    summary: ExpeditionSummary,
    map: MapSnapshot,
}

fn init_tracing(log_level: Option<&str>) -> Result<()> {
    let filter = match log_level {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("Invalid log level: {directives}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref())?;

    let config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    let seed = args.seed.or(config.seed).unwrap_or_else(runtime_seed);
    let level = args.level.or(config.level).unwrap_or(1).max(1);
    let party = config.build_party(level);
    tracing::info!(seed, level, members = party.len(), "starting expedition");

    let mut expedition = Expedition::new(party, SeededRolls::new(seed));
    expedition.descend(config.dungeon_name(), level);
    let summary = run_expedition(&mut expedition, &Policy::default(), args.max_rooms_visited)
        .context("Expedition aborted")?;
    let map = expedition.dungeon().context("Expedition has no dungeon")?.snapshot();

    if args.json {
        let report = Report { seed, summary, map };
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize the report")?;
        println!("{json}");
        return Ok(());
    }

    println!("{} (level {}), seed {seed}", summary.dungeon, summary.level);
    println!("Result: {:?}", summary.result);
    println!(
        "Rooms: {}/{} visited in {} moves, {} rests, {} potions drunk",
        summary.rooms_visited, summary.rooms, summary.moves, summary.rests, summary.potions_used
    );
    println!(
        "Encounters: {} won, {} fled; traps sprung: {}; gold: {}",
        summary.tally.encounters_won,
        summary.tally.encounters_fled,
        summary.tally.traps_sprung,
        summary.gold
    );
    for member in &summary.party {
        let status = if member.dead { " (dead)" } else { "" };
        println!(
            "  {} the {} L{}: {}/{} HP, {} XP{status}",
            member.name,
            member.class,
            member.level,
            member.current_hp.max(0),
            member.max_hp,
            member.experience
        );
    }
    println!("Fingerprint: {:016x}", summary.fingerprint);
    println!();
    println!("{}", map::render(&map));
    println!("{}", map::LEGEND);
    Ok(())
}
