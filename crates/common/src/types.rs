use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Timestamp in microseconds on the local clock. Wraps after ~71 minutes;
/// always compare with [`elapsed_micros`].
pub type Micros = u32;

/// Heading/pitch angles travel in units of 1/11 degree.
pub const HPR_UNITS_PER_DEGREE: i32 = 11;

/// Convert HPR units to whole degrees, truncating toward zero.
pub fn hpr_to_degrees(units: i32) -> i32 {
    units / HPR_UNITS_PER_DEGREE
}

/// Convert a 0-255 rotation byte to degrees in 0..360.
pub fn byte_to_degrees(b: u8) -> i32 {
    (b as i32 * 360) >> 8
}

/// Signed time elapsed from `then` to `now`, tolerant of clock wraparound.
pub fn elapsed_micros(now: Micros, then: Micros) -> i32 {
    now.wrapping_sub(then) as i32
}

/// Palette color: an index into the 6x6x6 web-safe color cube.
///
/// Index `r*36 + g*6 + b` with each level in `0..=5`. Indices above 215 are
/// transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color(pub u8);

impl Color {
    pub const BLACK: Color = Color(0);
    pub const WHITE: Color = Color(215);
    pub const RED: Color = Color(180);
    pub const TRANSPARENT: Color = Color(216);

    /// Build a color from per-channel levels in `0..=5`. Levels are clamped.
    pub fn from_levels(r: u8, g: u8, b: u8) -> Self {
        Self(r.min(5) * 36 + g.min(5) * 6 + b.min(5))
    }

    pub fn is_transparent(self) -> bool {
        self.0 > 215
    }

    /// 8-bit RGB for this palette entry, or `None` if transparent.
    pub fn to_rgb(self) -> Option<[u8; 3]> {
        if self.is_transparent() {
            return None;
        }
        let i = self.0;
        Some([(i / 36) * 51, ((i / 6) % 6) * 51, (i % 6) * 51])
    }
}

/// Screen dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> IVec2 {
        IVec2::new(self.width / 2, self.height / 2)
    }

    /// True if the pixel lies inside `[0,width) x [0,height)`.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    pub fn pixel_count(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }
}

/// Tait-Bryan angles in whole degrees. Heading turns about Y, pitch about X,
/// roll about Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Euler {
    pub heading: i32,
    pub pitch: i32,
    pub roll: i32,
}

impl Euler {
    pub const IDENTITY: Euler = Euler {
        heading: 0,
        pitch: 0,
        roll: 0,
    };

    pub fn new(heading: i32, pitch: i32, roll: i32) -> Self {
        Self {
            heading,
            pitch,
            roll,
        }
    }
}
