//! Capability seams between the sketch core and whatever paints it.
//!
//! The core only ever sees these traits, so the same ledger/screen code
//! drives the GPU draw list at runtime and a recording surface in tests.

use std::collections::VecDeque;

use tapsketch_engine::coords::{Rect, Vec2};
use tapsketch_engine::paint::{Color, Paint};
use tapsketch_engine::text::FontId;

/// Source of completed tap gestures, in surface-local logical pixels.
pub trait GestureSource {
    /// Next pending tap, oldest first; `None` once drained.
    fn next_tap(&mut self) -> Option<Vec2>;
}

impl GestureSource for VecDeque<Vec2> {
    fn next_tap(&mut self) -> Option<Vec2> {
        self.pop_front()
    }
}

/// Taps recognized during one frame, borrowed from the engine's `InputFrame`.
pub struct FrameTaps<'a> {
    taps: std::slice::Iter<'a, Vec2>,
}

impl<'a> FrameTaps<'a> {
    pub fn new(taps: &'a [Vec2]) -> Self {
        Self { taps: taps.iter() }
    }
}

impl GestureSource for FrameTaps<'_> {
    fn next_tap(&mut self) -> Option<Vec2> {
        self.taps.next().copied()
    }
}

/// A single styled, unwrapped line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub font: FontId,
    /// Font size in logical pixels.
    pub size: f32,
    pub brush: Paint,
}

impl TextRun {
    pub fn new(text: impl Into<String>, font: FontId, size: f32, brush: impl Into<Paint>) -> Self {
        Self { text: text.into(), font, size, brush: brush.into() }
    }

    /// Same run with a different brush. Measurement does not depend on it.
    pub fn with_brush(mut self, brush: impl Into<Paint>) -> Self {
        self.brush = brush.into();
        self
    }
}

/// Immediate-mode canvas the sketch draws onto.
///
/// Coordinates are logical pixels, top-left origin, +Y down. Calls paint in
/// order: later calls cover earlier ones.
pub trait DrawSurface {
    /// Drawable bounds.
    fn size(&self) -> Vec2;

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Butt-capped segment of full width `width`.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);

    /// Unconstrained size of `run`.
    fn measure_text(&self, run: &TextRun) -> Vec2;

    /// Draws `run` with its box's top-left corner at `top_left`.
    fn draw_text(&mut self, run: &TextRun, top_left: Vec2);

    /// Plain text in the surface's default face, positioned by its baseline
    /// origin like a native canvas call.
    fn native_text(&mut self, text: &str, baseline: Vec2, size: f32, color: Color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_taps_drain_in_order() {
        let taps = [Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)];
        let mut src = FrameTaps::new(&taps);
        assert_eq!(src.next_tap(), Some(Vec2::new(1.0, 2.0)));
        assert_eq!(src.next_tap(), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(src.next_tap(), None);
    }

    #[test]
    fn queue_is_a_gesture_source() {
        let mut q: VecDeque<Vec2> = [Vec2::new(5.0, 5.0)].into_iter().collect();
        assert_eq!(q.next_tap(), Some(Vec2::new(5.0, 5.0)));
        assert!(q.next_tap().is_none());
    }

    #[test]
    fn with_brush_keeps_layout_fields() {
        let run = TextRun::new("Hola", FontId::MISSING, 20.0, Color::black()).with_brush(Color::red());
        assert_eq!(run.text, "Hola");
        assert_eq!(run.size, 20.0);
        assert_eq!(run.brush, Paint::Solid(Color::red()));
    }
}
