use crate::foundation::error::{ReelError, ReelResult};

pub use kurbo::{Point, Vec2};

/// One discrete animation step. The first tick of a run is tick 1.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct TickIndex(pub u64);

impl TickIndex {
    /// Number of ticks from `earlier` to `self`, saturating at zero.
    pub fn since(self, earlier: TickIndex) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// The tick after this one.
    pub fn next(self) -> TickIndex {
        TickIndex(self.0.saturating_add(1))
    }
}

/// Fixed number of ticks per second of animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TickRate {
    /// Ticks per second, must be > 0.
    pub per_second: u32,
}

impl TickRate {
    /// Build a tick rate, rejecting zero.
    pub fn new(per_second: u32) -> ReelResult<Self> {
        if per_second == 0 {
            return Err(ReelError::validation("tick rate must be > 0"));
        }
        Ok(Self { per_second })
    }

    /// Duration of `ticks` in seconds.
    pub fn ticks_to_secs(self, ticks: u64) -> f64 {
        (ticks as f64) / f64::from(self.per_second)
    }

    /// Whole ticks that fit in `secs`.
    pub fn secs_to_ticks_floor(self, secs: f64) -> u64 {
        (secs * f64::from(self.per_second)).floor().max(0.0) as u64
    }
}

impl Default for TickRate {
    fn default() -> Self {
        Self { per_second: 60 }
    }
}

/// Output surface size in pixels. World coordinates are centred on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Offset that maps world coordinates (origin at centre) to canvas pixels.
    pub fn center(self) -> Vec2 {
        Vec2::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Straight (non-premultiplied) RGBA8 colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Rgba8 = Rgba8::rgb(0, 0, 0);
    pub const WHITE: Rgba8 = Rgba8::rgb(255, 255, 255);
    pub const ORANGE: Rgba8 = Rgba8::rgb(255, 165, 0);
    pub const SKY_BLUE: Rgba8 = Rgba8::rgb(135, 206, 235);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour with its alpha scaled by `factor` (clamped to `[0, 1]`).
    pub fn with_alpha(self, factor: f64) -> Self {
        let a = (f64::from(self.a) * factor.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Alpha as a fraction in `[0, 1]`.
    pub fn alpha_f64(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// `#rrggbb` hex string (alpha is emitted separately by SVG writers).
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
