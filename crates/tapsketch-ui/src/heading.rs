//! Gradient "Text Drawing" title pinned to the bottom of the surface.

use tapsketch_engine::coords::{Rect, Vec2};
use tapsketch_engine::paint::{Color, LinearGradient};
use tapsketch_engine::text::FontId;

use crate::surface::{DrawSurface, TextRun};

pub const HEADING_TEXT: &str = "Text Drawing";
pub const HEADING_SIZE: f32 = 60.0;

/// Gradient stops, top to bottom.
pub fn palette() -> [Color; 6] {
    [Color::black(), Color::blue(), Color::yellow(), Color::red(), Color::green(), Color::magenta()]
}

/// Horizontally centered, bottom-flush title.
#[derive(Debug, Copy, Clone)]
pub struct Heading {
    font: FontId,
}

impl Heading {
    pub fn new(font: FontId) -> Self {
        Self { font }
    }

    /// Top-left corner for a block of `size` inside `bounds`.
    #[inline]
    pub fn placement(bounds: Vec2, size: Vec2) -> Vec2 {
        Vec2::new((bounds.x - size.x) / 2.0, bounds.y - size.y)
    }

    /// Measures and draws the heading; returns the box it occupies.
    ///
    /// Nothing is cached, so a resized surface repositions it on the next
    /// call. The gradient axis runs over the box's own height.
    pub fn paint<S: DrawSurface + ?Sized>(&self, surface: &mut S) -> Rect {
        let run = TextRun::new(HEADING_TEXT, self.font, HEADING_SIZE, Color::black());
        let size = surface.measure_text(&run);
        let top_left = Self::placement(surface.size(), size);

        let brush = LinearGradient::vertical(top_left.y, top_left.y + size.y, &palette());
        let run = run.with_brush(brush);
        surface.draw_text(&run, top_left);

        Rect::from_origin_size(top_left, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ADVANCE, LINE, Op, Recording};
    use tapsketch_engine::paint::Paint;

    #[test]
    fn centered_and_bottom_flush_on_400x800() {
        let mut s = Recording::new(400.0, 800.0);
        let placed = Heading::new(FontId::MISSING).paint(&mut s);

        let w = HEADING_TEXT.chars().count() as f32 * HEADING_SIZE * ADVANCE;
        let h = HEADING_SIZE * LINE;
        assert_eq!(placed.min(), Vec2::new((400.0 - w) / 2.0, 800.0 - h));
        assert_eq!(placed.min(), Vec2::new(20.0, 728.0));
        assert_eq!(placed.max(), Vec2::new(380.0, 800.0));
    }

    #[test]
    fn draws_one_gradient_run_spanning_its_box() {
        let mut s = Recording::new(400.0, 800.0);
        Heading::new(FontId::MISSING).paint(&mut s);

        let ops = s.take();
        assert_eq!(ops.len(), 1);
        let Op::Text { text, size, brush, top_left } = &ops[0] else {
            panic!("expected text, got {:?}", ops[0]);
        };
        assert_eq!(text, HEADING_TEXT);
        assert_eq!(*size, 60.0);
        assert_eq!(*top_left, Vec2::new(20.0, 728.0));

        let Paint::LinearGradient(g) = brush else { panic!("expected gradient brush") };
        assert_eq!(g.stops.len(), 6);
        assert_eq!(g.sample_at(Vec2::new(0.0, 728.0)), Color::black());
        assert_eq!(g.stops[5].color, Color::magenta());
        assert_eq!(g.t_at(Vec2::new(0.0, 800.0)), 1.0);
    }

    #[test]
    fn follows_surface_size() {
        let heading = Heading::new(FontId::MISSING);
        let mut a = Recording::new(400.0, 800.0);
        let mut b = Recording::new(1000.0, 600.0);
        assert_eq!(heading.paint(&mut a), heading.paint(&mut a));
        assert_eq!(heading.paint(&mut b).min(), Vec2::new(320.0, 528.0));
    }

    #[test]
    fn wider_than_surface_overhangs_both_sides() {
        let mut s = Recording::new(100.0, 200.0);
        let placed = Heading::new(FontId::MISSING).paint(&mut s);
        assert_eq!(placed.min().x, -130.0);
        assert_eq!(placed.max().x, 230.0);
    }
}
