//! # doomharness
//!
//! Runs a scenario for a number of episodes with a uniform random policy over
//! the one-hot action set, logging every frame.
//!
//! Pacing follows the engine's tick rate unless `--headless` is given, in
//! which case episodes run as fast as the engine allows. Set `RUST_LOG=debug`
//! (or pass `-v`) to see per-frame observations.

mod app;
mod observer;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "doomharness", about = "Run random-policy episodes against a scenario")]
pub struct Cli {
    /// Scenario descriptor (JSON)
    #[arg(long)]
    pub config: PathBuf,

    /// Number of episodes to play
    #[arg(long, default_value_t = 10)]
    pub episodes: u32,

    /// Seed for the policy's random choices
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip real-time pacing
    #[arg(long)]
    pub headless: bool,

    /// Ticks each chosen action is held for
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub frame_skip: u32,

    /// Write the run report to this path as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// How the episode loop is paced
pub enum ExecutionMode {
    /// Sleep between ticks to approximate the engine's native speed
    RealTime,
    /// Submit actions back to back
    Headless,
}

impl ExecutionMode {
    fn should_pace(&self) -> bool {
        matches!(self, ExecutionMode::RealTime)
    }
}

fn determine_execution_mode(cli: &Cli) -> ExecutionMode {
    if cli.headless {
        ExecutionMode::Headless
    } else {
        ExecutionMode::RealTime
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let mode = determine_execution_mode(&cli);
    app::run(&cli, mode.should_pace())
}
