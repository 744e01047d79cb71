//! Session controller: owns the engine from configuration to shutdown.

use crate::action::{Action, StepResult};
use crate::error::{HarnessError, SessionStateError};
use engine::{Button, GameVariable, ObservationSnapshot, ScenarioConfig, SimEngine, DEFAULT_TICRATE};
use serde::Serialize;

/// Lifecycle of a [`Session`]. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Unconfigured,
    Configured,
    Initialized,
    Closed,
}

/// Lifecycle of the current episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EpisodeState {
    NotStarted,
    Running,
    Finished,
}

/// Exclusive owner of one engine.
///
/// The engine is released exactly once: by [`Session::shutdown`], by a failed
/// [`Session::initialize`], or when the session is dropped, whichever comes
/// first.
pub struct Session<E: SimEngine> {
    engine: E,
    config: Option<ScenarioConfig>,
    state: SessionState,
    episode: EpisodeState,
    episodes_started: u32,
    engine_acquired: bool,
}

impl<E: SimEngine> Session<E> {
    #[must_use]
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            config: None,
            state: SessionState::Unconfigured,
            episode: EpisodeState::NotStarted,
            episodes_started: 0,
            engine_acquired: false,
        }
    }

    fn state_error(&self, operation: &'static str) -> HarnessError {
        SessionStateError { operation, session: self.state, episode: self.episode }.into()
    }

    fn require(&self, operation: &'static str, state: SessionState) -> Result<(), HarnessError> {
        if self.state == state {
            Ok(())
        } else {
            Err(self.state_error(operation))
        }
    }

    fn require_running(&self, operation: &'static str) -> Result<(), HarnessError> {
        if self.state == SessionState::Initialized && self.episode == EpisodeState::Running {
            Ok(())
        } else {
            Err(self.state_error(operation))
        }
    }

    /// Validate and store the scenario configuration.
    ///
    /// # Errors
    ///
    /// `SessionState` unless the session is `Unconfigured`; `Config` if the
    /// configuration does not validate. A rejected configuration leaves the
    /// session `Unconfigured`.
    pub fn configure(&mut self, config: ScenarioConfig) -> Result<(), HarnessError> {
        self.require("configure", SessionState::Unconfigured)?;
        config.validate()?;

        tracing::info!(
            "Configured scenario {:?} map {:?}, buttons {:?}",
            config.scenario_path,
            config.map,
            config.available_buttons
        );
        self.config = Some(config);
        self.state = SessionState::Configured;
        Ok(())
    }

    /// Start the engine.
    ///
    /// # Errors
    ///
    /// `SessionState` unless the session is `Configured`; `Init` if the
    /// engine refuses to start, in which case the session is closed.
    pub fn initialize(&mut self) -> Result<(), HarnessError> {
        self.require("initialize", SessionState::Configured)?;
        let Some(config) = self.config.as_ref() else {
            return Err(self.state_error("initialize"));
        };

        self.engine_acquired = true;
        if let Err(e) = self.engine.init(config) {
            tracing::error!("Engine failed to start: {e}");
            self.shutdown();
            return Err(HarnessError::Init(e));
        }
        self.state = SessionState::Initialized;
        tracing::info!("Engine initialized");
        Ok(())
    }

    /// Begin a fresh episode, abandoning any episode still running.
    ///
    /// # Errors
    ///
    /// `SessionState` unless the session is `Initialized`; `Engine` if the
    /// engine cannot reset.
    pub fn start_episode(&mut self) -> Result<(), HarnessError> {
        self.require("start_episode", SessionState::Initialized)?;
        if self.episode == EpisodeState::Running {
            tracing::warn!("Abandoning running episode {}", self.episodes_started);
        }
        self.engine.new_episode().map_err(HarnessError::Engine)?;
        self.episodes_started += 1;
        self.episode = EpisodeState::Running;
        self.sync_episode();
        tracing::debug!("Episode {} started", self.episodes_started);
        Ok(())
    }

    /// True unless an episode is running and still accepting actions.
    #[must_use]
    pub fn is_episode_finished(&self) -> bool {
        self.episode != EpisodeState::Running
    }

    /// Observation for the current tick. Does not advance time.
    ///
    /// The returned borrow must end before the next submission.
    ///
    /// # Errors
    ///
    /// `SessionState` unless an episode is running.
    pub fn get_state(&self) -> Result<&ObservationSnapshot, HarnessError> {
        self.require_running("get_state")?;
        self.engine.state().ok_or_else(|| self.state_error("get_state"))
    }

    /// Apply `action` for exactly one tick.
    ///
    /// # Errors
    ///
    /// `SessionState` unless an episode is running, `ActionLength` if the
    /// action width differs from the number of enabled buttons, `Engine` if
    /// the engine fails the tick. The episode is untouched on every error.
    pub fn submit_action(&mut self, action: &Action) -> Result<StepResult, HarnessError> {
        self.require_running("submit_action")?;
        let expected = self.available_buttons().len();
        if action.len() != expected {
            return Err(HarnessError::ActionLength { expected, actual: action.len() });
        }

        let reward = self
            .engine
            .make_action(action.as_slice())
            .map_err(HarnessError::Engine)?;
        self.sync_episode();
        let result = StepResult {
            reward,
            finished: self.is_episode_finished(),
            tics: 1,
            episode_time: self.engine.episode_time(),
        };
        tracing::trace!(
            "tick {} reward {} finished {}",
            result.episode_time,
            result.reward,
            result.finished
        );
        Ok(result)
    }

    /// Hold `action` for up to `tics` ticks, stopping early if the episode
    /// finishes. Returns the summed reward and the ticks actually advanced.
    ///
    /// # Errors
    ///
    /// `ZeroTics` if `tics` is zero, otherwise as [`Session::submit_action`].
    /// Ticks applied before a failing tick stay applied.
    pub fn submit_action_for(&mut self, action: &Action, tics: u32) -> Result<StepResult, HarnessError> {
        if tics == 0 {
            return Err(HarnessError::ZeroTics);
        }
        let mut total = self.submit_action(action)?;
        while !total.finished && total.tics < tics {
            let step = self.submit_action(action)?;
            total.reward += step.reward;
            total.finished = step.finished;
            total.tics += 1;
            total.episode_time = step.episode_time;
        }
        Ok(total)
    }

    /// Release the engine. No-op once closed.
    pub fn shutdown(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        if self.engine_acquired {
            self.engine.close();
        }
        if self.episode == EpisodeState::Running {
            self.episode = EpisodeState::Finished;
        }
        self.state = SessionState::Closed;
        tracing::info!("Session closed after {} episodes", self.episodes_started);
    }

    fn sync_episode(&mut self) {
        if self.episode == EpisodeState::Running && self.engine.is_episode_finished() {
            self.episode = EpisodeState::Finished;
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn episode_state(&self) -> EpisodeState {
        self.episode
    }

    #[must_use]
    pub fn config(&self) -> Option<&ScenarioConfig> {
        self.config.as_ref()
    }

    /// Enabled buttons in action order; empty before `configure`.
    #[must_use]
    pub fn available_buttons(&self) -> &[Button] {
        self.config.as_ref().map(|c| c.available_buttons.as_slice()).unwrap_or_default()
    }

    #[must_use]
    pub fn available_game_variables(&self) -> &[GameVariable] {
        self.config
            .as_ref()
            .map(|c| c.available_game_variables.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn ticrate(&self) -> u32 {
        self.config.as_ref().map_or(DEFAULT_TICRATE, |c| c.ticrate)
    }

    /// Reward accumulated in the current (or last) episode.
    #[must_use]
    pub fn total_reward(&self) -> f64 {
        if self.state == SessionState::Initialized {
            self.engine.total_reward()
        } else {
            0.0
        }
    }

    /// Agent ticks elapsed in the current (or last) episode.
    #[must_use]
    pub fn episode_time(&self) -> u32 {
        if self.state == SessionState::Initialized {
            self.engine.episode_time()
        } else {
            0
        }
    }

    #[must_use]
    pub fn episodes_started(&self) -> u32 {
        self.episodes_started
    }
}

impl<E: SimEngine> Drop for Session<E> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
