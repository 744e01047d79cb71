use crate::types::{Button, GameVariable, ScreenResolution};
use std::path::PathBuf;
use thiserror::Error;

/// Scenario configuration rejected before the engine is started.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("required field `{0}` is missing")]
    MissingField(&'static str),
    #[error("scenario path {0:?} does not resolve to a file")]
    UnresolvedPath(PathBuf),
    #[error("button {0} is enabled more than once")]
    DuplicateButton(Button),
    #[error("game variable {0:?} is enabled more than once")]
    DuplicateGameVariable(GameVariable),
    #[error("ticrate must be greater than zero")]
    InvalidTicrate,
    #[error("living reward must be finite, got {0}")]
    NonFiniteReward(f64),
}

/// Failure reported by a [`SimEngine`](crate::SimEngine) backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("scenario asset {0:?} not found")]
    AssetNotFound(PathBuf),
    #[error("scenario asset {path:?} is not a WAD file: {reason}")]
    InvalidAsset { path: PathBuf, reason: String },
    #[error("screen resolution {0} is not supported by this engine")]
    UnsupportedResolution(ScreenResolution),
    #[error("map `{0}` is not a valid map identifier")]
    UnknownMap(String),
    #[error("engine has not been initialized")]
    NotInitialized,
    #[error("episode is finished")]
    EpisodeFinished,
    #[error("engine failed while advancing tick {tick}")]
    StepFailed { tick: u32 },
    #[error("action has {actual} buttons, engine expects {expected}")]
    ButtonCount { expected: usize, actual: usize },
}
