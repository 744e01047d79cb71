#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Engine interface
//!
//! Everything the episode harness needs to talk to a frame-stepped simulation
//! engine, and nothing about how the engine works inside.
//!
//! -   [`ScenarioConfig`] describes the scenario: asset, map, resolution,
//!     enabled buttons and game variables, timeout, start offset, living
//!     reward and which observation buffers to produce.
//! -   [`SimEngine`] is the backend trait. A backend owns the engine process
//!     (or an in-process stand-in) and advances it one tick per action.
//! -   [`ObservationSnapshot`] is what a backend reports for the current tick.
//!
//! With the `mock` feature (on by default) the crate also provides
//! [`ScriptedEngine`], a deterministic backend used by tests, benches and the
//! `doomharness` binary.

pub mod backend;
pub mod config;
pub mod error;
pub mod observation;
pub mod types;

pub use backend::SimEngine;
pub use config::{tick_interval, ScenarioConfig, DEFAULT_TICRATE};
pub use error::{ConfigError, EngineError};
pub use observation::{
    AudioBuffer, GameVariables, Label, Line, Object, ObservationSnapshot, PixelBuffer, PixelFormat,
    Sector,
};
pub use types::{Button, GameVariable, ScreenResolution};

#[cfg(feature = "mock")]
pub use backend::scripted::{EngineProbe, EventKind, ScriptedEngine, ScriptedEvent};
