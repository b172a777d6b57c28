use crate::foundation::core::{Point, Rgba8};

/// Horizontal anchoring of a text run relative to its position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Drawing surface driven once per tick by the sequencer.
///
/// The port is stateful in the immediate-mode sense: fill, stroke, global alpha and text size
/// apply to every primitive issued after them until changed or until the enclosing
/// `push_style`/`pop_style` pair ends. Coordinates are world units with the origin at the canvas
/// centre and +y pointing down.
pub trait RenderPort {
    /// Start a new frame cleared to `background`. Resets the style context.
    fn begin_frame(&mut self, background: Rgba8);

    fn push_style(&mut self);
    fn pop_style(&mut self);

    /// `None` disables filling.
    fn set_fill(&mut self, color: Option<Rgba8>);
    /// `None` disables stroking.
    fn set_stroke(&mut self, color: Option<Rgba8>);
    /// Global opacity multiplier in `[0, 1]` applied on top of fill/stroke alpha.
    fn set_alpha(&mut self, alpha: f64);
    fn set_text_size(&mut self, size: f64);

    /// Axis-aligned cube of edge `size` centred on `center`, spun by `rotation_y` radians.
    fn cuboid(&mut self, center: Point, size: f64, rotation_y: f64);
    fn square(&mut self, top_left: Point, size: f64);
    /// Text run at `at`, rotated by `rotation` radians around `at`.
    fn text(&mut self, text: &str, at: Point, align: TextAlign, rotation: f64);
}

/// Style context shared by the concrete ports.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    pub fill: Option<Rgba8>,
    pub stroke: Option<Rgba8>,
    pub alpha: f64,
    pub text_size: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Some(Rgba8::WHITE),
            stroke: Some(Rgba8::BLACK),
            alpha: 1.0,
            text_size: 36.0,
        }
    }
}

impl Style {
    /// Effective fill after the global alpha multiplier.
    pub fn effective_fill(&self) -> Option<Rgba8> {
        self.fill.map(|c| c.with_alpha(self.alpha))
    }

    /// Effective stroke after the global alpha multiplier.
    pub fn effective_stroke(&self) -> Option<Rgba8> {
        self.stroke.map(|c| c.with_alpha(self.alpha))
    }
}

/// Port that draws nothing. Used to fast-forward a run to a tick of interest.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPort;

impl RenderPort for NullPort {
    fn begin_frame(&mut self, _background: Rgba8) {}
    fn push_style(&mut self) {}
    fn pop_style(&mut self) {}
    fn set_fill(&mut self, _color: Option<Rgba8>) {}
    fn set_stroke(&mut self, _color: Option<Rgba8>) {}
    fn set_alpha(&mut self, _alpha: f64) {}
    fn set_text_size(&mut self, _size: f64) {}
    fn cuboid(&mut self, _center: Point, _size: f64, _rotation_y: f64) {}
    fn square(&mut self, _top_left: Point, _size: f64) {}
    fn text(&mut self, _text: &str, _at: Point, _align: TextAlign, _rotation: f64) {}
}
