//! Frame exchange loop and the multi-episode driver built on it.

use crate::action::{Action, StepResult};
use crate::error::HarnessError;
use crate::pacing::Pacer;
use crate::policy::Policy;
use crate::session::Session;
use engine::{ObservationSnapshot, ScenarioConfig, SimEngine};
use serde::Serialize;

/// Hooks called by the loop. All methods default to doing nothing.
pub trait FrameObserver {
    /// Called with each snapshot before an action is chosen for it.
    fn on_frame(&mut self, _episode: u32, _snapshot: &ObservationSnapshot) {}

    fn on_step(&mut self, _episode: u32, _action: &Action, _result: &StepResult) {}

    fn on_episode_end(&mut self, _summary: &EpisodeSummary) {}
}

pub struct NoopObserver;

impl FrameObserver for NoopObserver {}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeSummary {
    /// 1-based episode index within the session.
    pub episode: u32,
    /// Agent ticks advanced.
    pub ticks: u32,
    /// Action submissions made; equals `ticks` without frame skipping.
    pub submissions: u32,
    pub total_reward: f64,
    /// Index of the last frame observed.
    pub last_frame: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub map: Option<String>,
    pub policy: String,
    pub episodes_requested: u32,
    pub episodes: Vec<EpisodeSummary>,
    /// Stopped at an episode boundary because the cancel token fired.
    pub cancelled: bool,
}

impl RunReport {
    #[must_use]
    pub fn total_ticks(&self) -> u64 {
        self.episodes.iter().map(|e| u64::from(e.ticks)).sum()
    }

    #[must_use]
    pub fn mean_reward(&self) -> Option<f64> {
        if self.episodes.is_empty() {
            return None;
        }
        let sum: f64 = self.episodes.iter().map(|e| e.total_reward).sum();
        #[allow(clippy::cast_precision_loss)]
        Some(sum / self.episodes.len() as f64)
    }
}

/// Settings for [`run_episodes`].
pub struct RunOptions {
    pub episodes: u32,
    /// Ticks each chosen action is held for. Must be at least 1.
    pub frame_skip: u32,
    pub pacer: Pacer,
}

impl RunOptions {
    /// `episodes` episodes, one tick per action, no pacing.
    #[must_use]
    pub fn headless(episodes: u32) -> Self {
        Self { episodes, frame_skip: 1, pacer: Pacer::unpaced() }
    }
}

/// Drive the running episode until it finishes.
///
/// Each iteration reads the snapshot, asks `policy` for an action, submits it
/// and then paces. The loop ends only when the episode is finished; any
/// error is returned immediately with the episode left as the failing call
/// found it.
///
/// # Errors
///
/// Propagates errors from [`Session::get_state`] and
/// [`Session::submit_action_for`].
pub fn run_episode<E: SimEngine>(
    session: &mut Session<E>,
    policy: &mut dyn Policy,
    pacer: &mut Pacer,
    observer: &mut dyn FrameObserver,
    frame_skip: u32,
) -> Result<EpisodeSummary, HarnessError> {
    let episode = session.episodes_started();
    let mut summary = EpisodeSummary {
        episode,
        ticks: 0,
        submissions: 0,
        total_reward: 0.0,
        last_frame: 0,
    };
    pacer.reset();

    while !session.is_episode_finished() {
        let action = {
            let snapshot = session.get_state()?;
            summary.last_frame = snapshot.number;
            observer.on_frame(episode, snapshot);
            policy.choose_action(snapshot)
        };
        let result = session.submit_action_for(&action, frame_skip)?;
        summary.ticks += result.tics;
        summary.submissions += 1;
        observer.on_step(episode, &action, &result);

        if !result.finished {
            pacer.pace(result.tics);
        }
    }

    summary.total_reward = session.total_reward();
    observer.on_episode_end(&summary);
    Ok(summary)
}

/// Run a whole session: configure, initialize, play `options.episodes`
/// episodes, shut down.
///
/// The session is consumed. It is shut down before returning on success and
/// released by its `Drop` on any error, so the engine is closed exactly once
/// either way. Cancelling the pacer's token stops the run at the next episode
/// boundary.
///
/// # Errors
///
/// Returns the first error from configuration, initialization or any
/// episode.
pub fn run_episodes<E: SimEngine>(
    mut session: Session<E>,
    config: ScenarioConfig,
    policy: &mut dyn Policy,
    observer: &mut dyn FrameObserver,
    mut options: RunOptions,
) -> Result<RunReport, HarnessError> {
    let mut report = RunReport {
        map: config.map.clone(),
        policy: policy.name().to_string(),
        episodes_requested: options.episodes,
        episodes: Vec::new(),
        cancelled: false,
    };

    session.configure(config)?;
    session.initialize()?;

    let cancel = options.pacer.cancel_token();
    for i in 0..options.episodes {
        if cancel.is_cancelled() {
            tracing::info!("Run cancelled after {} episodes", i);
            report.cancelled = true;
            break;
        }
        tracing::info!("Episode {}/{}", i + 1, options.episodes);
        session.start_episode()?;
        let summary = run_episode(
            &mut session,
            policy,
            &mut options.pacer,
            observer,
            options.frame_skip,
        )?;
        tracing::info!(
            "Episode {} finished after {} ticks, total reward {}",
            summary.episode,
            summary.ticks,
            summary.total_reward
        );
        report.episodes.push(summary);
    }

    session.shutdown();
    Ok(report)
}
