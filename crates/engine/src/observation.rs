//! Per-tick observation bundle.

use crate::types::GameVariable;

/// Layout of the bytes in a [`PixelBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Three bytes per pixel, row-major.
    Rgb24,
    /// One byte per pixel, row-major.
    Gray8,
}

impl PixelFormat {
    #[must_use]
    pub const fn channels(self) -> usize {
        match self {
            PixelFormat::Rgb24 => 3,
            PixelFormat::Gray8 => 1,
        }
    }
}

/// Fixed-size image produced by the engine for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Zeroed buffer of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let len = width as usize * height as usize * format.channels();
        Self { width, height, format, data: vec![0; len] }
    }

    /// Number of bytes a buffer of this shape holds.
    #[must_use]
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.channels()
    }

    /// Pixel at `(x, y)`, one slice of `format.channels()` bytes.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let c = self.format.channels();
        let start = (y as usize * self.width as usize + x as usize) * c;
        self.data.get(start..start + c)
    }
}

/// Interleaved audio captured over the last few ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub sampling_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl AudioBuffer {
    /// Number of sample frames (one sample per channel each).
    #[must_use]
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / usize::from(self.channels)
        }
    }
}

/// Object visible on screen, with its region in the labels buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub object_id: u32,
    pub object_name: String,
    /// Value written into the labels buffer for this object's pixels.
    pub value: u8,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub object_position: [f64; 3],
    pub object_angle: f64,
}

/// Any object present in the current map.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub id: u32,
    pub name: String,
    pub position: [f64; 3],
    pub angle: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub is_blocking: bool,
}

/// Map geometry: one sector and its boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Sector {
    pub floor_height: f64,
    pub ceiling_height: f64,
    pub lines: Vec<Line>,
}

/// Game variables in their configured order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameVariables {
    entries: Vec<(GameVariable, f64)>,
}

impl GameVariables {
    #[must_use]
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Set `var`, keeping its original position if already present.
    pub fn set(&mut self, var: GameVariable, value: f64) {
        if let Some((_, v)) = self.entries.iter_mut().find(|(k, _)| *k == var) {
            *v = value;
        } else {
            self.entries.push((var, value));
        }
    }

    #[must_use]
    pub fn get(&self, var: GameVariable) -> Option<f64> {
        self.entries.iter().find(|(k, _)| *k == var).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (GameVariable, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Values only, in order.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, v)| *v).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything observable at one tick.
///
/// Buffers that were not enabled in the scenario configuration are `None`,
/// never zero-filled.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSnapshot {
    /// Frame index within the episode, starting at 1.
    pub number: u64,
    /// Engine tick, including the episode start offset.
    pub tic: u32,
    pub game_variables: GameVariables,
    pub screen_buffer: Option<PixelBuffer>,
    pub depth_buffer: Option<PixelBuffer>,
    pub labels_buffer: Option<PixelBuffer>,
    pub automap_buffer: Option<PixelBuffer>,
    pub audio_buffer: Option<AudioBuffer>,
    pub labels: Vec<Label>,
    pub objects: Vec<Object>,
    pub sectors: Vec<Sector>,
}
