use crate::{
    foundation::{
        core::{Point, Rgba8},
        math::Fnv1a64,
    },
    render::port::{RenderPort, TextAlign},
};

/// One call made against a [`RenderPort`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCmd {
    BeginFrame {
        background: Rgba8,
    },
    PushStyle,
    PopStyle,
    Fill {
        color: Option<Rgba8>,
    },
    Stroke {
        color: Option<Rgba8>,
    },
    Alpha {
        alpha: f64,
    },
    TextSize {
        size: f64,
    },
    Cuboid {
        center: Point,
        size: f64,
        rotation_y: f64,
    },
    Square {
        top_left: Point,
        size: f64,
    },
    Text {
        text: String,
        at: Point,
        align: TextAlign,
        rotation: f64,
    },
}

/// Port that records every call instead of drawing.
#[derive(Clone, Debug, Default)]
pub struct DrawRecorder {
    cmds: Vec<DrawCmd>,
}

impl DrawRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn take(&mut self) -> Vec<DrawCmd> {
        std::mem::take(&mut self.cmds)
    }

    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    /// Texts drawn so far, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.cmds.iter().filter_map(|c| match c {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Stable digest of the recorded command stream.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        for cmd in &self.cmds {
            hash_cmd(&mut h, cmd);
        }
        h.finish()
    }
}

fn hash_color(h: &mut Fnv1a64, c: Option<Rgba8>) {
    match c {
        None => h.write_u8(0),
        Some(c) => {
            h.write_u8(1);
            h.write_bytes(&[c.r, c.g, c.b, c.a]);
        }
    }
}

fn hash_point(h: &mut Fnv1a64, p: Point) {
    h.write_f64(p.x);
    h.write_f64(p.y);
}

fn hash_cmd(h: &mut Fnv1a64, cmd: &DrawCmd) {
    match cmd {
        DrawCmd::BeginFrame { background } => {
            h.write_u8(1);
            hash_color(h, Some(*background));
        }
        DrawCmd::PushStyle => h.write_u8(2),
        DrawCmd::PopStyle => h.write_u8(3),
        DrawCmd::Fill { color } => {
            h.write_u8(4);
            hash_color(h, *color);
        }
        DrawCmd::Stroke { color } => {
            h.write_u8(5);
            hash_color(h, *color);
        }
        DrawCmd::Alpha { alpha } => {
            h.write_u8(6);
            h.write_f64(*alpha);
        }
        DrawCmd::TextSize { size } => {
            h.write_u8(7);
            h.write_f64(*size);
        }
        DrawCmd::Cuboid {
            center,
            size,
            rotation_y,
        } => {
            h.write_u8(8);
            hash_point(h, *center);
            h.write_f64(*size);
            h.write_f64(*rotation_y);
        }
        DrawCmd::Square { top_left, size } => {
            h.write_u8(9);
            hash_point(h, *top_left);
            h.write_f64(*size);
        }
        DrawCmd::Text {
            text,
            at,
            align,
            rotation,
        } => {
            h.write_u8(10);
            h.write_bytes(text.as_bytes());
            h.write_u8(0);
            hash_point(h, *at);
            h.write_u8(*align as u8);
            h.write_f64(*rotation);
        }
    }
}

impl RenderPort for DrawRecorder {
    fn begin_frame(&mut self, background: Rgba8) {
        self.cmds.push(DrawCmd::BeginFrame { background });
    }

    fn push_style(&mut self) {
        self.cmds.push(DrawCmd::PushStyle);
    }

    fn pop_style(&mut self) {
        self.cmds.push(DrawCmd::PopStyle);
    }

    fn set_fill(&mut self, color: Option<Rgba8>) {
        self.cmds.push(DrawCmd::Fill { color });
    }

    fn set_stroke(&mut self, color: Option<Rgba8>) {
        self.cmds.push(DrawCmd::Stroke { color });
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.cmds.push(DrawCmd::Alpha { alpha });
    }

    fn set_text_size(&mut self, size: f64) {
        self.cmds.push(DrawCmd::TextSize { size });
    }

    fn cuboid(&mut self, center: Point, size: f64, rotation_y: f64) {
        self.cmds.push(DrawCmd::Cuboid {
            center,
            size,
            rotation_y,
        });
    }

    fn square(&mut self, top_left: Point, size: f64) {
        self.cmds.push(DrawCmd::Square { top_left, size });
    }

    fn text(&mut self, text: &str, at: Point, align: TextAlign, rotation: f64) {
        self.cmds.push(DrawCmd::Text {
            text: text.to_string(),
            at,
            align,
            rotation,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/recorder.rs"]
mod tests;
