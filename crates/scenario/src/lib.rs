#![deny(clippy::all, clippy::pedantic)]
//! JSON scenario descriptors.
//!
//! A descriptor names the scenario asset and map and lists the settings the
//! engine is started with:
//!
//! ```json
//! {
//!   "scenario_path": "basic.wad",
//!   "map": "map01",
//!   "resolution": "RES_640X480",
//!   "available_buttons": ["MOVE_LEFT", "MOVE_RIGHT", "ATTACK"],
//!   "episode_timeout": 200,
//!   "episode_start_time": 10,
//!   "living_reward": -1
//! }
//! ```
//!
//! Relative asset paths are resolved against the descriptor's directory when
//! loaded with [`ScenarioFile::load`]. Semantic checks (missing fields,
//! duplicates, unresolvable paths) are left to
//! [`ScenarioConfig::validate`](engine::ScenarioConfig::validate), which the
//! session runs on `configure`.

use anyhow::{Context, Result};
use engine::{Button, GameVariable, ScenarioConfig, ScreenResolution, DEFAULT_TICRATE};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct ScenarioFile {
    #[serde(default)]
    pub scenario_path: Option<PathBuf>,
    #[serde(default)]
    pub map: Option<String>,
    #[serde(default)]
    pub resolution: ScreenResolution,
    #[serde(default)]
    pub available_buttons: Vec<Button>,
    #[serde(default)]
    pub available_game_variables: Vec<GameVariable>,
    #[serde(default)]
    pub episode_timeout: u32,
    #[serde(default)]
    pub episode_start_time: u32,
    #[serde(default)]
    pub living_reward: f64,
    #[serde(default = "enabled")]
    pub screen_buffer: bool,
    #[serde(default)]
    pub depth_buffer: bool,
    #[serde(default)]
    pub labels_buffer: bool,
    #[serde(default)]
    pub automap_buffer: bool,
    #[serde(default)]
    pub audio_buffer: bool,
    #[serde(default)]
    pub objects_info: bool,
    #[serde(default)]
    pub sectors_info: bool,
    #[serde(default = "default_ticrate")]
    pub ticrate: u32,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub window_visible: bool,
}

fn enabled() -> bool {
    true
}

fn default_ticrate() -> u32 {
    DEFAULT_TICRATE
}

impl FromStr for ScenarioFile {
    type Err = anyhow::Error;

    fn from_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl ScenarioFile {
    /// Read a descriptor from disk.
    ///
    /// A relative `scenario_path` is rewritten to be relative to the
    /// descriptor's own directory.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a valid descriptor.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario descriptor {}", path.display()))?;
        let mut file: Self = json
            .parse()
            .with_context(|| format!("invalid scenario descriptor {}", path.display()))?;

        if let (Some(asset), Some(dir)) = (file.scenario_path.as_mut(), path.parent()) {
            if asset.is_relative() {
                *asset = dir.join(&*asset);
            }
        }
        tracing::debug!("Loaded scenario descriptor {}", path.display());
        Ok(file)
    }

    #[must_use]
    pub fn into_config(self) -> ScenarioConfig {
        ScenarioConfig {
            scenario_path: self.scenario_path,
            map: self.map,
            resolution: self.resolution,
            available_buttons: self.available_buttons,
            available_game_variables: self.available_game_variables,
            episode_timeout: self.episode_timeout,
            episode_start_time: self.episode_start_time,
            living_reward: self.living_reward,
            screen_buffer_enabled: self.screen_buffer,
            depth_buffer_enabled: self.depth_buffer,
            labels_buffer_enabled: self.labels_buffer,
            automap_buffer_enabled: self.automap_buffer,
            audio_buffer_enabled: self.audio_buffer,
            objects_info_enabled: self.objects_info,
            sectors_info_enabled: self.sectors_info,
            ticrate: self.ticrate,
            seed: self.seed,
            window_visible: self.window_visible,
        }
    }
}

/// Load a descriptor and turn it into an engine configuration.
///
/// # Errors
///
/// Same as [`ScenarioFile::load`].
pub fn load_config(path: impl AsRef<Path>) -> Result<ScenarioConfig> {
    Ok(ScenarioFile::load(path)?.into_config())
}
