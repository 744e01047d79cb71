use crate::{EngineError, ObservationSnapshot, ScenarioConfig};

#[cfg(feature = "mock")]
pub mod scripted;

pub trait SimEngine: Send {
    /// Starts the engine with the given scenario.
    ///
    /// The configuration has already been validated by the caller. The engine
    /// may still refuse it, e.g. when the asset cannot be loaded or the
    /// resolution is not supported.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] describing why the engine could not start.
    fn init(&mut self, config: &ScenarioConfig) -> Result<(), EngineError>;

    /// Resets the episode and runs the configured start offset.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotInitialized` if called before [`init`].
    ///
    /// [`init`]: SimEngine::init
    fn new_episode(&mut self) -> Result<(), EngineError>;

    fn is_episode_finished(&self) -> bool;

    /// Observation for the current tick, `None` once the episode is finished.
    fn state(&self) -> Option<&ObservationSnapshot>;

    /// Applies `buttons` for exactly one tick and returns the reward accrued
    /// during it.
    ///
    /// On error the engine state is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::EpisodeFinished`, `EngineError::ButtonCount` or a
    /// backend-specific failure.
    fn make_action(&mut self, buttons: &[bool]) -> Result<f64, EngineError>;

    /// Agent ticks elapsed in the current episode.
    fn episode_time(&self) -> u32;

    /// Reward accumulated in the current episode.
    fn total_reward(&self) -> f64;

    /// Releases the engine. Called at most once.
    fn close(&mut self);
}
