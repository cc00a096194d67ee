#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless runner that plays a scripted Bastion session and reports how it
//! ended.

mod autoplay;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use bastion_core::{GameMode, SimulationConfig, TimeScale};
use bastion_simulation::Simulation;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::autoplay::Autoplayer;

#[derive(Parser, Debug)]
#[command(name = "bastion")]
#[command(about = "Runs a scripted Bastion session without a window")]
struct Args {
    /// TOML file with session parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the seed from the configuration file
    #[arg(long)]
    seed: Option<u64>,

    /// How build phases end
    #[arg(long, value_enum, default_value = "relaxed")]
    mode: ModeArg,

    /// Stops after this many ticks even if the session is still running
    #[arg(long, default_value = "200000")]
    max_ticks: u64,

    /// Runs combat at double speed
    #[arg(long)]
    fast: bool,

    /// Prints the final snapshot as JSON instead of a summary line
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Relaxed,
    Timed,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Relaxed => GameMode::Relaxed,
            ModeArg::Timed => GameMode::Timed,
        }
    }
}

/// Entry point for the Bastion command-line runner.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let mode = GameMode::from(args.mode);
    info!(seed = config.seed, ?mode, "starting session");

    let mut simulation = Simulation::new(config);
    let mut player = Autoplayer::new(mode);
    simulation.start(mode);

    let mut ticks = 0;
    while ticks < args.max_ticks && !simulation.snapshot().state.is_terminal() {
        player.play(&mut simulation);
        if args.fast && simulation.snapshot().time_scale == TimeScale::Normal {
            simulation.set_time_scale(TimeScale::Fast);
        }
        simulation.advance();
        let _ = simulation.drain_events();
        ticks += 1;
    }

    let snapshot = simulation.snapshot();
    if args.json {
        let json =
            serde_json::to_string_pretty(&snapshot).context("failed to encode snapshot")?;
        println!("{json}");
    } else {
        println!(
            "{:?} after {} ticks: round {}, gold {}, base {}/{}",
            snapshot.state,
            snapshot.tick,
            snapshot.round,
            snapshot.gold,
            snapshot.base.health,
            snapshot.base.max_health,
        );
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}
