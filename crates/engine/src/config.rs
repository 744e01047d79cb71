//! Scenario configuration handed to the engine at initialization.

use crate::error::ConfigError;
use crate::types::{Button, GameVariable, ScreenResolution};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Native engine tick rate, in ticks per second.
pub const DEFAULT_TICRATE: u32 = 35;

/// Real-time duration of one tick at `ticrate` ticks per second. A zero rate
/// is treated as one tick per second.
#[must_use]
pub fn tick_interval(ticrate: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(ticrate.max(1)))
}

/// Everything the engine needs to run a scenario.
///
/// Built once by the caller and moved into the session, which never mutates
/// it. Fields that have no sensible default are `Option`s so that
/// [`ScenarioConfig::validate`] can report exactly which one is missing.
#[derive(Clone, Debug, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ScenarioConfig {
    /// Path to the scenario asset (a WAD file).
    pub scenario_path: Option<PathBuf>,
    /// Map identifier inside the asset, e.g. `map01`.
    pub map: Option<String>,
    pub resolution: ScreenResolution,
    /// Enabled action channels, in positional order.
    pub available_buttons: Vec<Button>,
    /// Game variables reported in every snapshot, in this order.
    pub available_game_variables: Vec<GameVariable>,
    /// Agent ticks before the episode times out. Zero disables the timeout.
    pub episode_timeout: u32,
    /// Ticks the engine runs after a reset before the agent gets control.
    pub episode_start_time: u32,
    /// Reward added on every agent tick.
    pub living_reward: f64,
    pub screen_buffer_enabled: bool,
    pub depth_buffer_enabled: bool,
    pub labels_buffer_enabled: bool,
    pub automap_buffer_enabled: bool,
    pub audio_buffer_enabled: bool,
    pub objects_info_enabled: bool,
    pub sectors_info_enabled: bool,
    pub ticrate: u32,
    /// Engine RNG seed. `None` lets the engine pick.
    pub seed: Option<u64>,
    pub window_visible: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            scenario_path: None,
            map: None,
            resolution: ScreenResolution::default(),
            available_buttons: Vec::new(),
            available_game_variables: Vec::new(),
            episode_timeout: 0,
            episode_start_time: 0,
            living_reward: 0.0,
            screen_buffer_enabled: true,
            depth_buffer_enabled: false,
            labels_buffer_enabled: false,
            automap_buffer_enabled: false,
            audio_buffer_enabled: false,
            objects_info_enabled: false,
            sectors_info_enabled: false,
            ticrate: DEFAULT_TICRATE,
            seed: None,
            window_visible: false,
        }
    }
}

impl ScenarioConfig {
    /// Check that the configuration can be handed to an engine.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: a missing required field, a scenario
    /// path that is not a file, a duplicated button or game variable, a zero
    /// tick rate or a non-finite living reward.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let path = self
            .scenario_path
            .as_ref()
            .ok_or(ConfigError::MissingField("scenario_path"))?;
        if !path.is_file() {
            return Err(ConfigError::UnresolvedPath(path.clone()));
        }

        match self.map.as_deref() {
            None | Some("") => return Err(ConfigError::MissingField("map")),
            Some(_) => {}
        }

        if self.available_buttons.is_empty() {
            return Err(ConfigError::MissingField("available_buttons"));
        }
        let mut seen = HashSet::new();
        for button in &self.available_buttons {
            if !seen.insert(*button) {
                return Err(ConfigError::DuplicateButton(*button));
            }
        }

        let mut seen = HashSet::new();
        for var in &self.available_game_variables {
            if !seen.insert(*var) {
                return Err(ConfigError::DuplicateGameVariable(*var));
            }
        }

        if self.ticrate == 0 {
            return Err(ConfigError::InvalidTicrate);
        }
        if !self.living_reward.is_finite() {
            return Err(ConfigError::NonFiniteReward(self.living_reward));
        }
        Ok(())
    }
}
