#![allow(dead_code)]

use engine::{Button, ScenarioConfig, ScreenResolution};
use std::path::PathBuf;

pub fn wad_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/basic.wad")
}

/// `[MOVE_LEFT, MOVE_RIGHT, ATTACK]`, timeout 200, start offset 10, living
/// reward -1.
pub fn basic_config() -> ScenarioConfig {
    ScenarioConfig {
        scenario_path: Some(wad_path()),
        map: Some("map01".to_string()),
        resolution: ScreenResolution::Res160x120,
        available_buttons: vec![Button::MoveLeft, Button::MoveRight, Button::Attack],
        episode_timeout: 200,
        episode_start_time: 10,
        living_reward: -1.0,
        ..Default::default()
    }
}

pub fn config_with_timeout(timeout: u32) -> ScenarioConfig {
    ScenarioConfig { episode_timeout: timeout, ..basic_config() }
}
