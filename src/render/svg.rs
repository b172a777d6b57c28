use std::fmt::Write as _;

use kurbo::BezPath;

use crate::{
    foundation::core::{Canvas, Point, Rgba8, Vec2},
    render::port::{RenderPort, Style, TextAlign},
};

/// Fixed downward tilt of the container so its top face is visible.
const CUBOID_TILT_RAD: f64 = -0.45;

const CUBE_FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3], // front
    [5, 4, 7, 6], // back
    [4, 0, 3, 7], // left
    [1, 5, 6, 2], // right
    [4, 5, 1, 0], // top
    [3, 2, 6, 7], // bottom
];

/// Port that writes one SVG document per frame.
#[derive(Clone, Debug)]
pub struct SvgCanvas {
    canvas: Canvas,
    background: Rgba8,
    font_family: String,
    style: Style,
    stack: Vec<Style>,
    body: String,
}

impl SvgCanvas {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            background: Rgba8::SKY_BLUE,
            font_family: "monospace".to_string(),
            style: Style::default(),
            stack: Vec::new(),
            body: String::new(),
        }
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Complete SVG document for the current frame.
    pub fn document(&self) -> String {
        let Canvas { width, height } = self.canvas;
        let mut out = String::with_capacity(self.body.len() + 256);
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        let _ = write!(
            out,
            r#"<rect x="0" y="0" width="{width}" height="{height}" fill="{}"/>"#,
            self.background.to_hex()
        );
        out.push_str(&self.body);
        out.push_str("</svg>");
        out
    }

    fn to_px(&self, p: Point) -> Point {
        p + self.canvas.center()
    }

    fn paint_attrs(&self) -> String {
        let mut attrs = String::new();
        match self.style.effective_fill() {
            Some(c) => {
                let _ = write!(
                    attrs,
                    r#" fill="{}" fill-opacity="{:.3}""#,
                    c.to_hex(),
                    c.alpha_f64()
                );
            }
            None => attrs.push_str(r#" fill="none""#),
        }
        match self.style.effective_stroke() {
            Some(c) => {
                let _ = write!(
                    attrs,
                    r#" stroke="{}" stroke-opacity="{:.3}" stroke-width="2""#,
                    c.to_hex(),
                    c.alpha_f64()
                );
            }
            None => attrs.push_str(r#" stroke="none""#),
        }
        attrs
    }
}

/// Project the eight cube corners: spin about Y, tilt about X, drop Z.
fn project_cuboid(size: f64, rotation_y: f64) -> [(Vec2, f64); 8] {
    let h = size / 2.0;
    let corners = [
        (-h, -h, h),
        (h, -h, h),
        (h, h, h),
        (-h, h, h),
        (-h, -h, -h),
        (h, -h, -h),
        (h, h, -h),
        (-h, h, -h),
    ];
    let (sy, cy) = rotation_y.sin_cos();
    let (sx, cx) = CUBOID_TILT_RAD.sin_cos();
    corners.map(|(x, y, z)| {
        let x1 = x * cy + z * sy;
        let z1 = -x * sy + z * cy;
        let y2 = y * cx - z1 * sx;
        let z2 = y * sx + z1 * cx;
        (Vec2::new(x1, y2), z2)
    })
}

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

impl RenderPort for SvgCanvas {
    fn begin_frame(&mut self, background: Rgba8) {
        self.background = background;
        self.style = Style::default();
        self.stack.clear();
        self.body.clear();
    }

    fn push_style(&mut self) {
        self.stack.push(self.style);
    }

    fn pop_style(&mut self) {
        if let Some(style) = self.stack.pop() {
            self.style = style;
        }
    }

    fn set_fill(&mut self, color: Option<Rgba8>) {
        self.style.fill = color;
    }

    fn set_stroke(&mut self, color: Option<Rgba8>) {
        self.style.stroke = color;
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.style.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_text_size(&mut self, size: f64) {
        self.style.text_size = size;
    }

    fn cuboid(&mut self, center: Point, size: f64, rotation_y: f64) {
        let origin = self.to_px(center);
        let projected = project_cuboid(size, rotation_y);

        // Painter's order: farthest face first.
        let mut faces: Vec<(f64, [usize; 4])> = CUBE_FACES
            .iter()
            .map(|face| {
                let depth = face.iter().map(|&i| projected[i].1).sum::<f64>() / 4.0;
                (depth, *face)
            })
            .collect();
        faces.sort_by(|a, b| a.0.total_cmp(&b.0));

        let attrs = self.paint_attrs();
        for (_, face) in faces {
            let mut path = BezPath::new();
            for (n, &i) in face.iter().enumerate() {
                let p = origin + projected[i].0;
                if n == 0 {
                    path.move_to(p);
                } else {
                    path.line_to(p);
                }
            }
            path.close_path();
            let _ = write!(self.body, r#"<path d="{}"{attrs}/>"#, path.to_svg());
        }
    }

    fn square(&mut self, top_left: Point, size: f64) {
        let p = self.to_px(top_left);
        let attrs = self.paint_attrs();
        let _ = write!(
            self.body,
            r#"<rect x="{:.2}" y="{:.2}" width="{size:.2}" height="{size:.2}"{attrs}/>"#,
            p.x, p.y
        );
    }

    fn text(&mut self, text: &str, at: Point, align: TextAlign, rotation: f64) {
        // Text is filled only, matching the immediate-mode convention.
        let Some(fill) = self.style.effective_fill() else {
            return;
        };
        let p = self.to_px(at);
        let anchor = match align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        };
        let transform = if rotation == 0.0 {
            String::new()
        } else {
            format!(
                r#" transform="rotate({:.3} {:.2} {:.2})""#,
                rotation.to_degrees(),
                p.x,
                p.y
            )
        };
        let _ = write!(
            self.body,
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.1}" text-anchor="{anchor}" fill="{}" fill-opacity="{:.3}"{transform}>{}</text>"#,
            p.x,
            p.y,
            escape_text(&self.font_family),
            self.style.text_size,
            fill.to_hex(),
            fill.alpha_f64(),
            escape_text(text)
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
