//! Recording `DrawSurface` for unit tests.

use tapsketch_engine::coords::{Rect, Vec2};
use tapsketch_engine::paint::{Color, Paint};

use crate::surface::{DrawSurface, TextRun};

/// Width of one character, as a fraction of the font size.
pub const ADVANCE: f32 = 0.5;
/// Line height as a fraction of the font size.
pub const LINE: f32 = 1.2;

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Rect { rect: Rect, color: Color },
    RoundedRect { rect: Rect, radius: f32, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    Line { from: Vec2, to: Vec2, width: f32, color: Color },
    Text { text: String, size: f32, brush: Paint, top_left: Vec2 },
    NativeText { text: String, baseline: Vec2, size: f32, color: Color },
}

/// Surface that logs every primitive. Text measures as a monospace box.
pub struct Recording {
    pub size: Vec2,
    pub ops: Vec<Op>,
}

impl Recording {
    pub fn new(w: f32, h: f32) -> Self {
        Self { size: Vec2::new(w, h), ops: Vec::new() }
    }

    pub fn take(&mut self) -> Vec<Op> {
        std::mem::take(&mut self.ops)
    }
}

impl DrawSurface for Recording {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(Op::Rect { rect, color });
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        self.ops.push(Op::RoundedRect { rect, radius, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ops.push(Op::Circle { center, radius, color });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.ops.push(Op::Line { from, to, width, color });
    }

    fn measure_text(&self, run: &TextRun) -> Vec2 {
        Vec2::new(run.text.chars().count() as f32 * run.size * ADVANCE, run.size * LINE)
    }

    fn draw_text(&mut self, run: &TextRun, top_left: Vec2) {
        self.ops.push(Op::Text {
            text: run.text.clone(),
            size: run.size,
            brush: run.brush.clone(),
            top_left,
        });
    }

    fn native_text(&mut self, text: &str, baseline: Vec2, size: f32, color: Color) {
        self.ops.push(Op::NativeText { text: text.to_string(), baseline, size, color });
    }
}
