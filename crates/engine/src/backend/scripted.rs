//! Deterministic stand-in for the real engine.
//!
//! `ScriptedEngine` steps a tiny one-room world: a player that strafes left
//! and right in front of a single target, with ammo spent on `ATTACK`. It
//! honours the scenario configuration (timeout, start offset, living reward,
//! enabled buffers and variables) and renders synthetic buffers of the
//! configured size. The target's spawn point is drawn from an RNG seeded with
//! the configured seed, so seeded runs replay exactly. Extra rewards, terminal conditions and engine faults are
//! injected with [`ScriptedEvent`]s, which makes every branch of a controller
//! reachable without a game process.

use crate::config::ScenarioConfig;
use crate::observation::{
    AudioBuffer, GameVariables, Label, Line, Object, ObservationSnapshot, PixelBuffer, PixelFormat,
    Sector,
};
use crate::types::{Button, GameVariable, ScreenResolution};
use crate::{EngineError, SimEngine};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

const STARTING_AMMO: u32 = 50;
const STARTING_HEALTH: f64 = 100.0;
const STRAFE_SPEED: f64 = 1.0;
const TURN_SPEED: f64 = 5.0;
/// The target spawns somewhere in `[-TARGET_SPREAD, TARGET_SPREAD]` along x.
const TARGET_SPREAD: f64 = 8.0;
const TARGET_DISTANCE: f64 = 10.0;
const ROOM_HALF_WIDTH: f64 = 16.0;
const AUDIO_SAMPLING_RATE: u32 = 22_050;
const AUDIO_BUFFER_TICS: u32 = 4;
const TARGET_LABEL: u8 = 1;

/// What a [`ScriptedEvent`] does when its tick is reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    /// Extra reward on top of the living reward.
    Reward(f64),
    /// Ends the episode after the tick is applied (death, goal reached).
    Terminal,
    /// The tick fails; nothing about the episode changes.
    Fault,
}

/// Event fired when the agent submits its `tick`-th action (1-based).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedEvent {
    /// Episode the event belongs to (1-based), `None` for every episode.
    pub episode: Option<u32>,
    pub tick: u32,
    pub kind: EventKind,
}

impl ScriptedEvent {
    #[must_use]
    pub fn every_episode(tick: u32, kind: EventKind) -> Self {
        Self { episode: None, tick, kind }
    }

    #[must_use]
    pub fn in_episode(episode: u32, tick: u32, kind: EventKind) -> Self {
        Self { episode: Some(episode), tick, kind }
    }

    fn applies(&self, episode: u32, tick: u32) -> bool {
        self.tick == tick && self.episode.is_none_or(|e| e == episode)
    }
}

#[derive(Debug, Default)]
struct Counters {
    inits: AtomicU32,
    episodes: AtomicU32,
    actions: AtomicU32,
    closes: AtomicU32,
}

/// Shared view of how often each engine entry point was called.
///
/// Clones observe the same counters, so a probe taken before the engine is
/// moved into a controller keeps reporting after the engine is dropped.
#[derive(Debug, Clone, Default)]
pub struct EngineProbe {
    counters: Arc<Counters>,
}

impl EngineProbe {
    #[must_use]
    pub fn inits(&self) -> u32 {
        self.counters.inits.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn episodes(&self) -> u32 {
        self.counters.episodes.load(Ordering::SeqCst)
    }

    /// Successful `make_action` calls.
    #[must_use]
    pub fn actions(&self) -> u32 {
        self.counters.actions.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn closes(&self) -> u32 {
        self.counters.closes.load(Ordering::SeqCst)
    }

    fn bump(counter: &AtomicU32) {
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy)]
struct Player {
    x: f64,
    y: f64,
    angle: f64,
    ammo: u32,
    health: f64,
    firing: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, angle: 90.0, ammo: STARTING_AMMO, health: STARTING_HEALTH, firing: false }
    }
}

#[derive(Default)]
pub struct ScriptedEngine {
    supported: Vec<ScreenResolution>,
    events: Vec<ScriptedEvent>,
    probe: EngineProbe,
    config: Option<ScenarioConfig>,
    episode: u32,
    tic: u32,
    time: u32,
    total_reward: f64,
    finished: bool,
    player: Player,
    target_x: f64,
    rng: Option<fastrand::Rng>,
    snapshot: Option<ObservationSnapshot>,
}

impl ScriptedEngine {
    /// Engine supporting every resolution, with no scripted events.
    #[must_use]
    pub fn new() -> Self {
        Self { finished: true, ..Self::default() }
    }

    /// Restrict the resolutions `init` accepts.
    #[must_use]
    pub fn supporting(mut self, resolutions: &[ScreenResolution]) -> Self {
        self.supported = resolutions.to_vec();
        self
    }

    #[must_use]
    pub fn with_event(mut self, event: ScriptedEvent) -> Self {
        self.events.push(event);
        self
    }

    #[must_use]
    pub fn probe(&self) -> EngineProbe {
        self.probe.clone()
    }

    fn config(&self) -> Result<&ScenarioConfig, EngineError> {
        self.config.as_ref().ok_or(EngineError::NotInitialized)
    }

    fn events_at(&self, tick: u32) -> impl Iterator<Item = &ScriptedEvent> {
        let episode = self.episode;
        self.events.iter().filter(move |e| e.applies(episode, tick))
    }

    fn apply_buttons(&mut self, buttons: &[Button], pressed: &[bool]) {
        let mut firing = false;
        for (button, _) in buttons.iter().zip(pressed).filter(|(_, p)| **p) {
            match button {
                Button::MoveLeft => self.player.x -= STRAFE_SPEED,
                Button::MoveRight => self.player.x += STRAFE_SPEED,
                Button::MoveForward => self.player.y += STRAFE_SPEED,
                Button::MoveBackward => self.player.y -= STRAFE_SPEED,
                Button::TurnLeft => self.player.angle = (self.player.angle + TURN_SPEED) % 360.0,
                Button::TurnRight => {
                    self.player.angle = (self.player.angle - TURN_SPEED).rem_euclid(360.0);
                }
                Button::Attack => {
                    if self.player.ammo > 0 {
                        self.player.ammo -= 1;
                        firing = true;
                    }
                }
                _ => {}
            }
        }
        self.player.x = self.player.x.clamp(-ROOM_HALF_WIDTH, ROOM_HALF_WIDTH);
        self.player.y = self.player.y.clamp(-ROOM_HALF_WIDTH, TARGET_DISTANCE - 1.0);
        self.player.firing = firing;
    }

    fn variable(&self, var: GameVariable) -> f64 {
        let p = &self.player;
        match var {
            GameVariable::Ammo2 | GameVariable::SelectedWeaponAmmo => f64::from(p.ammo),
            GameVariable::Health => p.health,
            GameVariable::PositionX => p.x,
            GameVariable::PositionY => p.y,
            GameVariable::Angle => p.angle,
            GameVariable::OnGround => 1.0,
            GameVariable::AttackReady => f64::from(u8::from(p.ammo > 0)),
            GameVariable::SelectedWeapon => 2.0,
            _ => 0.0,
        }
    }

    /// Screen-space box of the target, clipped to the frame.
    fn target_rect(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let w = f64::from(width);
        let scale = w / (2.0 * ROOM_HALF_WIDTH);
        let box_w = (w / 8.0).max(1.0);
        let center = w / 2.0 + (self.target_x - self.player.x) * scale;
        let left = (center - box_w / 2.0).max(0.0);
        let right = (center + box_w / 2.0).min(w);
        if right <= left {
            return None;
        }
        let box_h = (height / 4).max(1);
        let top = (height - box_h) / 2;
        // Truncation is fine: both ends are already clipped to [0, width].
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (x, x_end) = (left as u32, right as u32);
        if x_end <= x {
            return None;
        }
        Some((x, top, x_end - x, box_h))
    }

    fn render(&self, config: &ScenarioConfig) -> ObservationSnapshot {
        let (width, height) = config.resolution.dimensions();
        let target = self.target_rect(width, height);

        let mut game_variables = GameVariables::new();
        for var in &config.available_game_variables {
            game_variables.set(*var, self.variable(*var));
        }

        let labels = match target {
            Some(rect) if config.labels_buffer_enabled => vec![self.target_label(rect)],
            _ => Vec::new(),
        };
        let objects = if config.objects_info_enabled { self.objects() } else { Vec::new() };
        let sectors = if config.sectors_info_enabled { vec![room_sector()] } else { Vec::new() };

        ObservationSnapshot {
            number: u64::from(self.time) + 1,
            tic: self.tic,
            game_variables,
            screen_buffer: config.screen_buffer_enabled.then(|| self.screen(width, height, target)),
            depth_buffer: config.depth_buffer_enabled.then(|| depth(width, height)),
            labels_buffer: config.labels_buffer_enabled.then(|| labels_mask(width, height, target)),
            automap_buffer: config.automap_buffer_enabled.then(|| self.automap(width, height)),
            audio_buffer: config.audio_buffer_enabled.then(|| self.audio(config.ticrate)),
            labels,
            objects,
            sectors,
        }
    }

    fn target_position(&self) -> [f64; 3] {
        [self.target_x, TARGET_DISTANCE, 0.0]
    }

    fn target_label(&self, (x, y, width, height): (u32, u32, u32, u32)) -> Label {
        Label {
            object_id: 1,
            object_name: "Target".to_string(),
            value: TARGET_LABEL,
            x,
            y,
            width,
            height,
            object_position: self.target_position(),
            object_angle: 270.0,
        }
    }

    fn objects(&self) -> Vec<Object> {
        vec![
            Object {
                id: 0,
                name: "DoomPlayer".to_string(),
                position: [self.player.x, self.player.y, 0.0],
                angle: self.player.angle,
            },
            Object { id: 1, name: "Target".to_string(), position: self.target_position(), angle: 270.0 },
        ]
    }

    fn screen(&self, width: u32, height: u32, target: Option<(u32, u32, u32, u32)>) -> PixelBuffer {
        let mut buf = PixelBuffer::new(width, height, PixelFormat::Rgb24);
        #[allow(clippy::cast_possible_truncation)]
        let shade = (self.tic % 256) as u8;
        for px in buf.data.chunks_exact_mut(3) {
            px.copy_from_slice(&[shade, 32, 64]);
        }
        if let Some(rect) = target {
            fill_rect(&mut buf, rect, &[200, 40, 40]);
        }
        buf
    }

    fn automap(&self, width: u32, height: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(width, height, PixelFormat::Rgb24);
        let map_x = f64::from(width) * (self.player.x + ROOM_HALF_WIDTH) / (2.0 * ROOM_HALF_WIDTH);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let px = (map_x as u32).min(width - 1);
        fill_rect(&mut buf, (px, height / 2, 1, 1), &[255, 255, 255]);
        buf
    }

    fn audio(&self, ticrate: u32) -> AudioBuffer {
        let frames = AUDIO_SAMPLING_RATE / ticrate.max(1) * AUDIO_BUFFER_TICS;
        let mut samples = vec![0i16; frames as usize * 2];
        if self.player.firing {
            for (i, sample) in samples.iter_mut().enumerate() {
                *sample = if (i / 2) % 64 < 32 { 4096 } else { -4096 };
            }
        }
        AudioBuffer { sampling_rate: AUDIO_SAMPLING_RATE, channels: 2, samples }
    }
}

fn depth(width: u32, height: u32) -> PixelBuffer {
    let mut buf = PixelBuffer::new(width, height, PixelFormat::Gray8);
    for (row_index, row) in buf.data.chunks_exact_mut(width as usize).enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let value = (row_index * 255 / height as usize) as u8;
        row.fill(value);
    }
    buf
}

fn labels_mask(width: u32, height: u32, target: Option<(u32, u32, u32, u32)>) -> PixelBuffer {
    let mut buf = PixelBuffer::new(width, height, PixelFormat::Gray8);
    if let Some(rect) = target {
        fill_rect(&mut buf, rect, &[TARGET_LABEL]);
    }
    buf
}

fn fill_rect(buf: &mut PixelBuffer, (left, top, width, height): (u32, u32, u32, u32), value: &[u8]) {
    let channels = buf.format.channels();
    let stride = buf.width as usize * channels;
    for row in top..(top + height).min(buf.height) {
        for col in left..(left + width).min(buf.width) {
            let start = row as usize * stride + col as usize * channels;
            buf.data[start..start + channels].copy_from_slice(&value[..channels]);
        }
    }
}

fn room_sector() -> Sector {
    let (l, r) = (-ROOM_HALF_WIDTH, ROOM_HALF_WIDTH);
    let (b, t) = (-ROOM_HALF_WIDTH, TARGET_DISTANCE + 1.0);
    let wall = |x1, y1, x2, y2| Line { x1, y1, x2, y2, is_blocking: true };
    Sector {
        floor_height: 0.0,
        ceiling_height: 128.0,
        lines: vec![wall(l, b, r, b), wall(r, b, r, t), wall(r, t, l, t), wall(l, t, l, b)],
    }
}

fn check_wad(path: &Path) -> Result<(), EngineError> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => EngineError::AssetNotFound(path.to_path_buf()),
        _ => EngineError::InvalidAsset { path: path.to_path_buf(), reason: e.to_string() },
    })?;
    let mut magic = [0u8; 4];
    file.read_exact(&mut magic).map_err(|_| EngineError::InvalidAsset {
        path: path.to_path_buf(),
        reason: "file is shorter than a WAD header".to_string(),
    })?;
    if &magic == b"IWAD" || &magic == b"PWAD" {
        Ok(())
    } else {
        Err(EngineError::InvalidAsset {
            path: path.to_path_buf(),
            reason: format!("bad magic {magic:?}"),
        })
    }
}

/// `MAPxx` or `ExMy`, case-insensitive.
fn is_map_id(map: &str) -> bool {
    let map = map.to_ascii_uppercase();
    let b = map.as_bytes();
    match b {
        [b'M', b'A', b'P', d1, d2] => d1.is_ascii_digit() && d2.is_ascii_digit(),
        [b'E', e, b'M', m] => e.is_ascii_digit() && m.is_ascii_digit(),
        _ => false,
    }
}

impl SimEngine for ScriptedEngine {
    fn init(&mut self, config: &ScenarioConfig) -> Result<(), EngineError> {
        EngineProbe::bump(&self.probe.counters.inits);

        if !self.supported.is_empty() && !self.supported.contains(&config.resolution) {
            return Err(EngineError::UnsupportedResolution(config.resolution));
        }
        let path = config
            .scenario_path
            .as_deref()
            .ok_or_else(|| EngineError::AssetNotFound(PathBuf::new()))?;
        check_wad(path)?;
        let map = config.map.clone().unwrap_or_default();
        if !is_map_id(&map) {
            return Err(EngineError::UnknownMap(map));
        }

        tracing::info!(
            "Scripted engine started: {} {} at {} ({} buttons)",
            path.display(),
            map,
            config.resolution,
            config.available_buttons.len()
        );
        if config.window_visible {
            tracing::warn!("Scripted engine renders off-screen only; window_visible has no effect");
        }
        self.rng = Some(match config.seed {
            Some(seed) => {
                tracing::debug!("Scripted engine seed {seed}");
                fastrand::Rng::with_seed(seed)
            }
            None => fastrand::Rng::new(),
        });
        self.config = Some(config.clone());
        self.finished = true;
        Ok(())
    }

    fn new_episode(&mut self) -> Result<(), EngineError> {
        let start_time = self.config()?.episode_start_time;
        EngineProbe::bump(&self.probe.counters.episodes);

        self.episode += 1;
        self.player = Player::default();
        self.target_x = self
            .rng
            .as_ref()
            .map_or(0.0, |rng| (rng.f64() * 2.0 - 1.0) * TARGET_SPREAD);
        self.tic = start_time;
        self.time = 0;
        self.total_reward = 0.0;
        self.finished = false;
        let config = self.config()?;
        self.snapshot = Some(self.render(config));
        tracing::debug!("Scripted episode {} started at tic {}", self.episode, self.tic);
        Ok(())
    }

    fn is_episode_finished(&self) -> bool {
        self.finished
    }

    fn state(&self) -> Option<&ObservationSnapshot> {
        if self.finished {
            None
        } else {
            self.snapshot.as_ref()
        }
    }

    fn make_action(&mut self, buttons: &[bool]) -> Result<f64, EngineError> {
        let config = self.config()?;
        if self.finished {
            return Err(EngineError::EpisodeFinished);
        }
        if buttons.len() != config.available_buttons.len() {
            return Err(EngineError::ButtonCount {
                expected: config.available_buttons.len(),
                actual: buttons.len(),
            });
        }

        let tick = self.time + 1;
        if self.events_at(tick).any(|e| e.kind == EventKind::Fault) {
            return Err(EngineError::StepFailed { tick });
        }

        let mut reward = config.living_reward;
        let mut terminal = false;
        for event in self.events_at(tick) {
            match event.kind {
                EventKind::Reward(r) => reward += r,
                EventKind::Terminal => terminal = true,
                EventKind::Fault => {}
            }
        }
        let timeout = config.episode_timeout;
        let enabled = config.available_buttons.clone();

        self.apply_buttons(&enabled, buttons);
        self.time = tick;
        self.tic += 1;
        self.total_reward += reward;
        self.finished = terminal || (timeout > 0 && self.time >= timeout);
        self.snapshot = if self.finished {
            None
        } else {
            let config = self.config()?;
            Some(self.render(config))
        };
        EngineProbe::bump(&self.probe.counters.actions);
        Ok(reward)
    }

    fn episode_time(&self) -> u32 {
        self.time
    }

    fn total_reward(&self) -> f64 {
        self.total_reward
    }

    fn close(&mut self) {
        EngineProbe::bump(&self.probe.counters.closes);
        self.config = None;
        self.rng = None;
        self.snapshot = None;
        self.finished = true;
        tracing::info!("Scripted engine closed after {} episodes", self.episode);
    }
}
