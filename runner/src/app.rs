//! # Run orchestration
//!
//! Loads the scenario descriptor, builds the engine session and policy, and
//! hands them to [`harness::run_episodes`]. The session is consumed by the
//! run, so the engine is closed exactly once whether the run completes or
//! fails part way.

use anyhow::{Context, Result};
use engine::ScriptedEngine;
use harness::{run_episodes, ActionSet, Pacer, RandomPolicy, RunOptions, RunReport, Session};
use std::fs;
use std::path::Path;

use crate::observer::LoggingObserver;
use crate::Cli;

/// Run the configured number of episodes.
///
/// When `pace` is `true` the loop sleeps between ticks so playback roughly
/// matches the engine's tick rate.
///
/// # Errors
///
/// Returns any error from loading the descriptor, from the harness, or from
/// writing the report.
pub fn run(cli: &Cli, pace: bool) -> Result<()> {
    let config = scenario::load_config(&cli.config)?;

    println!(
        "Available buttons: {:?}",
        config.available_buttons.iter().map(|b| b.name()).collect::<Vec<_>>()
    );

    let actions = ActionSet::one_hot(config.available_buttons.len())
        .context("scenario enables no buttons")?;
    let mut policy = match cli.seed {
        Some(seed) => RandomPolicy::with_seed(actions, seed),
        None => RandomPolicy::new(actions),
    };
    let pacer = if pace {
        Pacer::real_time(config.ticrate)
    } else {
        Pacer::unpaced()
    };
    tracing::info!(
        "Running {} episodes ({} pacing, frame skip {})",
        cli.episodes,
        if pace { "real-time" } else { "no" },
        cli.frame_skip
    );

    let session = Session::new(ScriptedEngine::new());
    let report = run_episodes(
        session,
        config,
        &mut policy,
        &mut LoggingObserver,
        RunOptions { episodes: cli.episodes, frame_skip: cli.frame_skip, pacer },
    )
    .with_context(|| format!("run of {} failed", cli.config.display()))?;

    if let Some(mean) = report.mean_reward() {
        tracing::info!(
            "{} episodes, {} ticks, mean reward {:.2}",
            report.episodes.len(),
            report.total_ticks(),
            mean
        );
    }
    if let Some(path) = &cli.report {
        write_report(&report, path)?;
    }

    println!("Game closed.");
    Ok(())
}

fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).with_context(|| format!("failed to write report {}", path.display()))?;
    tracing::info!("Report written to {}", path.display());
    Ok(())
}
