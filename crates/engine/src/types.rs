//! Enumerations the engine exposes to its controller: action channels,
//! screen resolutions and game variables.
//!
//! The harness never interprets these beyond their order and count; they are
//! forwarded to the backend as-is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary input channel.
///
/// The order in which buttons are enabled fixes the positional meaning of
/// every action submitted afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Button {
    Attack,
    Use,
    Jump,
    Crouch,
    Turn180,
    AltAttack,
    Reload,
    Zoom,
    Speed,
    Strafe,
    MoveRight,
    MoveLeft,
    MoveBackward,
    MoveForward,
    TurnRight,
    TurnLeft,
    LookUp,
    LookDown,
    MoveUp,
    MoveDown,
    Land,
    SelectNextWeapon,
    SelectPrevWeapon,
}

impl Button {
    /// Name as written in scenario descriptors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Button::Attack => "ATTACK",
            Button::Use => "USE",
            Button::Jump => "JUMP",
            Button::Crouch => "CROUCH",
            Button::Turn180 => "TURN180",
            Button::AltAttack => "ALT_ATTACK",
            Button::Reload => "RELOAD",
            Button::Zoom => "ZOOM",
            Button::Speed => "SPEED",
            Button::Strafe => "STRAFE",
            Button::MoveRight => "MOVE_RIGHT",
            Button::MoveLeft => "MOVE_LEFT",
            Button::MoveBackward => "MOVE_BACKWARD",
            Button::MoveForward => "MOVE_FORWARD",
            Button::TurnRight => "TURN_RIGHT",
            Button::TurnLeft => "TURN_LEFT",
            Button::LookUp => "LOOK_UP",
            Button::LookDown => "LOOK_DOWN",
            Button::MoveUp => "MOVE_UP",
            Button::MoveDown => "MOVE_DOWN",
            Button::Land => "LAND",
            Button::SelectNextWeapon => "SELECT_NEXT_WEAPON",
            Button::SelectPrevWeapon => "SELECT_PREV_WEAPON",
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rendered frame size. Every pixel buffer in a snapshot uses this size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScreenResolution {
    #[serde(rename = "RES_160X120")]
    Res160x120,
    #[serde(rename = "RES_200X150")]
    Res200x150,
    #[serde(rename = "RES_256X192")]
    Res256x192,
    #[serde(rename = "RES_320X200")]
    Res320x200,
    #[serde(rename = "RES_320X240")]
    #[default]
    Res320x240,
    #[serde(rename = "RES_400X300")]
    Res400x300,
    #[serde(rename = "RES_512X384")]
    Res512x384,
    #[serde(rename = "RES_640X400")]
    Res640x400,
    #[serde(rename = "RES_640X480")]
    Res640x480,
    #[serde(rename = "RES_800X600")]
    Res800x600,
    #[serde(rename = "RES_1024X768")]
    Res1024x768,
    #[serde(rename = "RES_1280X1024")]
    Res1280x1024,
    #[serde(rename = "RES_1920X1080")]
    Res1920x1080,
}

impl ScreenResolution {
    /// `(width, height)` in pixels.
    #[must_use]
    pub const fn dimensions(self) -> (u32, u32) {
        match self {
            ScreenResolution::Res160x120 => (160, 120),
            ScreenResolution::Res200x150 => (200, 150),
            ScreenResolution::Res256x192 => (256, 192),
            ScreenResolution::Res320x200 => (320, 200),
            ScreenResolution::Res320x240 => (320, 240),
            ScreenResolution::Res400x300 => (400, 300),
            ScreenResolution::Res512x384 => (512, 384),
            ScreenResolution::Res640x400 => (640, 400),
            ScreenResolution::Res640x480 => (640, 480),
            ScreenResolution::Res800x600 => (800, 600),
            ScreenResolution::Res1024x768 => (1024, 768),
            ScreenResolution::Res1280x1024 => (1280, 1024),
            ScreenResolution::Res1920x1080 => (1920, 1080),
        }
    }

    #[must_use]
    pub const fn width(self) -> u32 {
        self.dimensions().0
    }

    #[must_use]
    pub const fn height(self) -> u32 {
        self.dimensions().1
    }
}

impl fmt::Display for ScreenResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.dimensions();
        write!(f, "RES_{w}X{h}")
    }
}

/// Scalar readable from the engine each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameVariable {
    KillCount,
    ItemCount,
    SecretCount,
    FragCount,
    DeathCount,
    HitCount,
    HitsTaken,
    DamageCount,
    DamageTaken,
    Health,
    Armor,
    Dead,
    OnGround,
    AttackReady,
    SelectedWeapon,
    SelectedWeaponAmmo,
    Ammo2,
    PositionX,
    PositionY,
    PositionZ,
    Angle,
}
