#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Episode Interaction Harness
//!
//! Drives a frame-stepped [`SimEngine`](engine::SimEngine) through repeated
//! episodes.
//!
//! -   [`Session`] owns the engine and enforces its lifecycle:
//!     `Unconfigured → Configured → Initialized → Closed`. The engine is
//!     released exactly once, on every exit path.
//! -   [`run_episode`] is the frame exchange loop: read the snapshot, choose an
//!     action with a [`Policy`], submit it, pace, repeat until the episode is
//!     finished.
//! -   [`run_episodes`] strings the two together for a whole run.
//!
//! ```rust,ignore
//! use engine::ScriptedEngine;
//! use harness::{run_episodes, ActionSet, NoopObserver, RandomPolicy, RunOptions, Session};
//!
//! let mut policy = RandomPolicy::with_seed(ActionSet::one_hot(3)?, 7);
//! let report = run_episodes(
//!     Session::new(ScriptedEngine::new()),
//!     config,
//!     &mut policy,
//!     &mut NoopObserver,
//!     RunOptions::headless(10),
//! )?;
//! ```

pub mod action;
pub mod episode;
pub mod error;
pub mod pacing;
pub mod policy;
pub mod session;

pub use action::{Action, ActionSet, StepResult};
pub use episode::{
    run_episode, run_episodes, EpisodeSummary, FrameObserver, NoopObserver, RunOptions, RunReport,
};
pub use error::{HarnessError, SessionStateError};
pub use pacing::{CancelToken, Pacer};
pub use policy::{ConstantPolicy, FnPolicy, Policy, RandomPolicy};
pub use session::{EpisodeState, Session, SessionState};
