use std::f64::consts::PI;

use crate::{
    foundation::core::{Point, Rgba8, Vec2},
    render::port::{RenderPort, TextAlign},
    search::state::Pointer,
};

const INDEX_TEXT_SIZE: f64 = 16.0;
const BANNER_TEXT_SIZE: f64 = 32.0;
const READOUT_TEXT_SIZE: f64 = 20.0;
const CARD_TEXT_SIZE: f64 = 24.0;
const OUTLINE_PAD: f64 = 5.0;
const READOUT_LANE_HEIGHT: f64 = 26.0;
const INK: Rgba8 = Rgba8::rgb(20, 20, 20);

/// Outline colour for each search pointer.
pub fn pointer_color(pointer: Pointer) -> Rgba8 {
    match pointer {
        Pointer::High => Rgba8::rgb(205, 40, 40),
        Pointer::Low => Rgba8::rgb(35, 80, 215),
        Pointer::Mid => Rgba8::rgb(25, 140, 60),
    }
}

fn lane(pointer: Pointer) -> f64 {
    match pointer {
        Pointer::High => 0.0,
        Pointer::Low => 1.0,
        Pointer::Mid => 2.0,
    }
}

/// One face-down card in the index grid.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct GridCell {
    pub origin: Point,
    pub index: usize,
}

/// Index text attached to a pointer outline.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum Readout {
    Steady(String),
    /// `outgoing` fades out with `alpha` while `incoming` fades in, both spinning.
    Crossfade {
        outgoing: String,
        incoming: String,
        alpha: f64,
    },
}

/// A value shown face-up on its card.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct RevealedCard {
    pub index: usize,
    pub origin: Point,
    pub value: i64,
    pub alpha: f64,
}

/// Everything needed to draw one reusable visual element.
///
/// Records hold parameters only; [`DrawProcedure::draw`] is the single rendering function for
/// all of them, so replaying a record always reproduces the same primitive calls.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawProcedure {
    IndexGrid {
        cells: Vec<GridCell>,
        size: f64,
    },
    NeedleBanner {
        needle: i64,
        at: Point,
    },
    PointerMarker {
        pointer: Pointer,
        outline_at: Point,
        size: f64,
        readout: Readout,
    },
    RevealedValues {
        cards: Vec<RevealedCard>,
        size: f64,
    },
}

impl DrawProcedure {
    pub fn draw(&self, port: &mut dyn RenderPort) {
        port.push_style();
        match self {
            Self::IndexGrid { cells, size } => draw_grid(port, cells, *size),
            Self::NeedleBanner { needle, at } => {
                port.set_stroke(None);
                port.set_fill(Some(INK));
                port.set_text_size(BANNER_TEXT_SIZE);
                port.text(&format!("find {needle}"), *at, TextAlign::Center, 0.0);
            }
            Self::PointerMarker {
                pointer,
                outline_at,
                size,
                readout,
            } => draw_marker(port, *pointer, *outline_at, *size, readout),
            Self::RevealedValues { cards, size } => draw_cards(port, cards, *size),
        }
        port.pop_style();
    }
}

fn draw_grid(port: &mut dyn RenderPort, cells: &[GridCell], size: f64) {
    for cell in cells {
        port.set_fill(Some(Rgba8::ORANGE));
        port.set_stroke(Some(Rgba8::BLACK));
        port.square(cell.origin, size);
    }
    port.set_stroke(None);
    port.set_fill(Some(INK));
    port.set_text_size(INDEX_TEXT_SIZE);
    for cell in cells {
        let at = cell.origin + Vec2::new(size / 2.0, size + 20.0);
        port.text(&cell.index.to_string(), at, TextAlign::Center, 0.0);
    }
}

fn draw_marker(
    port: &mut dyn RenderPort,
    pointer: Pointer,
    outline_at: Point,
    size: f64,
    readout: &Readout,
) {
    let color = pointer_color(pointer);
    port.set_fill(None);
    port.set_stroke(Some(color));
    port.square(
        outline_at - Vec2::new(OUTLINE_PAD, OUTLINE_PAD),
        size + 2.0 * OUTLINE_PAD,
    );

    let center_x = outline_at.x + size / 2.0;
    let y = outline_at.y + size + 50.0 + lane(pointer) * READOUT_LANE_HEIGHT;
    let label_at = Point::new(center_x - 2.0, y);
    let value_at = Point::new(center_x + 14.0, y);

    port.set_stroke(None);
    port.set_fill(Some(color));
    port.set_text_size(READOUT_TEXT_SIZE);
    port.text(
        &format!("{}:", pointer.name()),
        label_at,
        TextAlign::Right,
        0.0,
    );

    match readout {
        Readout::Steady(text) => port.text(text, value_at, TextAlign::Center, 0.0),
        Readout::Crossfade {
            outgoing,
            incoming,
            alpha,
        } => {
            port.push_style();
            port.set_alpha(*alpha);
            port.text(outgoing, value_at, TextAlign::Center, (1.0 - alpha) * PI);
            port.set_alpha(1.0 - alpha);
            port.text(incoming, value_at, TextAlign::Center, -alpha * PI);
            port.pop_style();
        }
    }
}

fn draw_cards(port: &mut dyn RenderPort, cards: &[RevealedCard], size: f64) {
    port.set_stroke(None);
    port.set_fill(Some(INK));
    port.set_text_size(CARD_TEXT_SIZE);
    for card in cards {
        port.set_alpha(card.alpha);
        let at = card.origin + Vec2::new(size / 2.0, size / 2.0 + CARD_TEXT_SIZE / 3.0);
        port.text(&card.value.to_string(), at, TextAlign::Center, 0.0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/draw/procedure.rs"]
mod tests;
