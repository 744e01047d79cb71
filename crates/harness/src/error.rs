use crate::session::{EpisodeState, SessionState};
use engine::{ConfigError, EngineError};
use thiserror::Error;

/// An operation was invoked outside the state it is valid in.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("`{operation}` is not valid while the session is {session:?} and the episode is {episode:?}")]
pub struct SessionStateError {
    pub operation: &'static str,
    pub session: SessionState,
    pub episode: EpisodeState,
}

/// Every failure the harness reports. All of them end the session; none are
/// retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HarnessError {
    #[error("invalid scenario configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("engine failed to start")]
    Init(#[source] EngineError),
    #[error(transparent)]
    SessionState(#[from] SessionStateError),
    #[error("action has {actual} channels but {expected} buttons are enabled")]
    ActionLength { expected: usize, actual: usize },
    #[error("action set is invalid: {0}")]
    InvalidActionSet(&'static str),
    #[error("an action must be held for at least one tick")]
    ZeroTics,
    #[error("engine failed during the episode")]
    Engine(#[source] EngineError),
}
