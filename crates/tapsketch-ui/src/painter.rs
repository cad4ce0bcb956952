use tapsketch_engine::coords::{Rect, Vec2};
use tapsketch_engine::paint::Color;
use tapsketch_engine::scene::{DrawList, ZIndex};
use tapsketch_engine::text::{FontId, FontSystem};

use crate::surface::{DrawSurface, TextRun};

/// [`DrawSurface`] backed by the engine's `DrawList`.
///
/// Everything lands on the canvas layer, so paint order is call order.
/// Nothing is rasterized here; the scene renderer consumes the list after
/// the screen has painted.
pub struct Painter<'a> {
    draw_list: &'a mut DrawList,
    fonts: &'a FontSystem,
    /// Face used by [`DrawSurface::native_text`].
    body_font: FontId,
    size: Vec2,
    /// Physical-to-logical pixel ratio the renderer lays text out at.
    scale: f32,
}

impl<'a> Painter<'a> {
    pub fn new(
        draw_list: &'a mut DrawList,
        fonts: &'a FontSystem,
        body_font: FontId,
        size: Vec2,
        scale: f32,
    ) -> Self {
        Self { draw_list, fonts, body_font, size, scale }
    }
}

impl DrawSurface for Painter<'_> {
    #[inline]
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.draw_list.push_rect(ZIndex::CANVAS, rect, color);
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        self.draw_list.push_rounded_rect(ZIndex::CANVAS, rect, radius, color);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.draw_list.push_circle(ZIndex::CANVAS, center, radius, color);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.draw_list.push_line(ZIndex::CANVAS, from, to, width, color);
    }

    fn measure_text(&self, run: &TextRun) -> Vec2 {
        self.fonts.measure_text_scaled(&run.text, run.font, run.size, self.scale)
    }

    fn draw_text(&mut self, run: &TextRun, top_left: Vec2) {
        self.draw_list.push_text(
            ZIndex::CANVAS,
            run.text.as_str(),
            run.font,
            run.size,
            run.brush.clone(),
            top_left,
        );
    }

    fn native_text(&mut self, text: &str, baseline: Vec2, size: f32, color: Color) {
        let ascent = self.fonts.ascent(self.body_font, size);
        let top_left = Vec2::new(baseline.x, baseline.y - ascent);
        self.draw_list
            .push_text(ZIndex::CANVAS, text, self.body_font, size, color.into(), top_left);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapsketch_engine::paint::Paint;
    use tapsketch_engine::scene::DrawCmd;
    use tapsketch_engine::scene::shapes::TextCmd;

    use crate::heading::{HEADING_SIZE, HEADING_TEXT, Heading};

    const DEJAVU: &[u8] = include_bytes!("../../tapsketch-engine/assets/fonts/DejaVuSans.ttf");

    fn painter<'a>(dl: &'a mut DrawList, fonts: &'a FontSystem) -> Painter<'a> {
        Painter::new(dl, fonts, FontId::MISSING, Vec2::new(400.0, 800.0), 1.0)
    }

    fn only_text(dl: &DrawList) -> &TextCmd {
        match &dl.items()[0].cmd {
            DrawCmd::Text(cmd) => cmd,
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn calls_are_recorded_in_paint_order() {
        let fonts = FontSystem::new();
        let mut dl = DrawList::new();
        {
            let mut p = painter(&mut dl, &fonts);
            p.fill_circle(Vec2::new(5.0, 5.0), 4.0, Color::red());
            p.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::cyan());
            p.stroke_line(Vec2::zero(), Vec2::new(3.0, 4.0), 5.0, Color::blue());
            p.fill_rounded_rect(Rect::new(0.0, 0.0, 80.0, 40.0), 20.0, Color::magenta());
        }
        let kinds: Vec<&str> = dl
            .iter_in_paint_order()
            .map(|item| match item.cmd {
                DrawCmd::Rect(_) => "rect",
                DrawCmd::RoundedRect(_) => "rounded_rect",
                DrawCmd::Circle(_) => "circle",
                DrawCmd::Line(_) => "line",
                DrawCmd::Text(_) => "text",
            })
            .collect();
        assert_eq!(kinds, vec!["circle", "rect", "line", "rounded_rect"]);
    }

    #[test]
    fn draw_text_keeps_brush_and_origin() {
        let fonts = FontSystem::new();
        let mut dl = DrawList::new();
        let run = TextRun::new("hi", FontId::MISSING, 20.0, Color::green());
        painter(&mut dl, &fonts).draw_text(&run, Vec2::new(7.0, 9.0));

        let cmd = only_text(&dl);
        assert_eq!(cmd.text, "hi");
        assert_eq!(cmd.origin, Vec2::new(7.0, 9.0));
        assert_eq!(cmd.brush, Paint::Solid(Color::green()));
    }

    #[test]
    fn native_text_moves_baseline_up_by_ascent() {
        // Without a font the ascent falls back to the size.
        let fonts = FontSystem::new();
        let mut dl = DrawList::new();
        painter(&mut dl, &fonts).native_text("Hola", Vec2::new(100.0, 300.0), 150.0, Color::black());

        let cmd = only_text(&dl);
        assert_eq!(cmd.origin, Vec2::new(100.0, 150.0));
        assert_eq!(cmd.size, 150.0);
    }

    #[test]
    fn unknown_font_measures_as_an_empty_line() {
        let fonts = FontSystem::new();
        let mut dl = DrawList::new();
        let p = painter(&mut dl, &fonts);
        let run = TextRun::new("Text Drawing", FontId::MISSING, 60.0, Color::black());
        assert_eq!(p.measure_text(&run), Vec2::new(0.0, 72.0));
        assert_eq!(p.size(), Vec2::new(400.0, 800.0));
    }

    // ── real font ─────────────────────────────────────────────────────────

    fn heading_origin(scale: f32) -> (Vec2, Vec2) {
        let mut fonts = FontSystem::new();
        let font = fonts.load_font(DEJAVU).unwrap();
        let mut dl = DrawList::new();
        {
            let mut p = Painter::new(&mut dl, &fonts, font, Vec2::new(400.0, 800.0), scale);
            Heading::new(font).paint(&mut p);
        }
        let measured = fonts.measure_text_scaled(HEADING_TEXT, font, HEADING_SIZE, scale);
        (only_text(&dl).origin, measured)
    }

    #[test]
    fn heading_is_centered_with_real_measurement() {
        let (origin, m) = heading_origin(1.0);
        assert!(m.x > 0.0, "width {}", m.x);
        assert!(m.y > 0.0);
        assert_eq!(origin, Vec2::new((400.0 - m.x) / 2.0, 800.0 - m.y));
    }

    #[test]
    fn hidpi_heading_uses_the_raster_scale_width() {
        let (origin, m) = heading_origin(2.0);
        assert_eq!(origin, Vec2::new((400.0 - m.x) / 2.0, 800.0 - m.y));
    }

    #[test]
    fn native_text_with_real_font_sits_on_its_baseline() {
        let mut fonts = FontSystem::new();
        let font = fonts.load_font(DEJAVU).unwrap();
        let mut dl = DrawList::new();
        Painter::new(&mut dl, &fonts, font, Vec2::new(400.0, 800.0), 1.0)
            .native_text("Hola", Vec2::new(100.0, 300.0), 150.0, Color::black());

        let ascent = fonts.ascent(font, 150.0);
        assert!(ascent > 0.0 && ascent < 150.0);
        assert_eq!(only_text(&dl).origin, Vec2::new(100.0, 300.0 - ascent));
    }
}
