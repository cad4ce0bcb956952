//! Drawing routine for a single ledger record.

use rand::Rng;
use tapsketch_engine::coords::{Rect, Vec2};
use tapsketch_engine::paint::Color;

use crate::ledger::{ShapeKind, ShapeRecord};
use crate::surface::DrawSurface;

const FLAG_SIZE: Vec2 = Vec2::new(40.0, 20.0);
const FLAG_TOP_OFFSET: Vec2 = Vec2::new(-20.0, -20.0);
const FLAG_BOTTOM_OFFSET: Vec2 = Vec2::new(-10.0, 0.0);

const DISC_RADIUS: f32 = 40.0;

const GREETING: &str = "Hola";
const GREETING_SIZE: f32 = 150.0;

const PILL_SIZE: Vec2 = Vec2::new(80.0, 40.0);
const PILL_OFFSET: Vec2 = Vec2::new(-40.0, -20.0);
const PILL_RADIUS: f32 = 20.0;

const RAY_WIDTH: f32 = 5.0;

/// Paints `record` onto `surface`.
///
/// Pure dispatch on the record's kind. `Ray` draws a fresh endpoint from
/// `rng` on every call, spread uniformly over the surface bounds; the
/// endpoint is never written back to the record.
pub fn draw<S, R>(record: &ShapeRecord, surface: &mut S, rng: &mut R)
where
    S: DrawSurface + ?Sized,
    R: Rng + ?Sized,
{
    let at = record.position;
    match record.kind {
        ShapeKind::Flag => {
            surface.fill_rect(Rect::anchored(at, FLAG_TOP_OFFSET, FLAG_SIZE), Color::cyan());
            surface.fill_rect(Rect::anchored(at, FLAG_BOTTOM_OFFSET, FLAG_SIZE), Color::yellow());
        }
        ShapeKind::Disc => {
            surface.fill_circle(at, DISC_RADIUS, Color::red());
        }
        ShapeKind::Greeting => {
            surface.native_text(GREETING, at, GREETING_SIZE, Color::black());
        }
        ShapeKind::Pill => {
            surface.fill_rounded_rect(Rect::anchored(at, PILL_OFFSET, PILL_SIZE), PILL_RADIUS, Color::magenta());
        }
        ShapeKind::Ray => {
            let bounds = surface.size();
            let end = Vec2::new(rng.random::<f32>() * bounds.x, rng.random::<f32>() * bounds.y);
            surface.stroke_line(at, end, RAY_WIDTH, Color::blue());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Op, Recording};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rec(x: f32, y: f32, kind: ShapeKind) -> ShapeRecord {
        ShapeRecord { position: Vec2::new(x, y), kind }
    }

    fn draw_one(record: &ShapeRecord, surface: &mut Recording) -> Vec<Op> {
        draw(record, surface, &mut StdRng::seed_from_u64(7));
        surface.take()
    }

    // ── fixed geometry ────────────────────────────────────────────────────

    #[test]
    fn flag_is_cyan_then_yellow() {
        let mut s = Recording::new(400.0, 800.0);
        let ops = draw_one(&rec(10.0, 10.0, ShapeKind::Flag), &mut s);
        assert_eq!(
            ops,
            vec![
                Op::Rect { rect: Rect::new(-10.0, -10.0, 40.0, 20.0), color: Color::cyan() },
                Op::Rect { rect: Rect::new(0.0, 10.0, 40.0, 20.0), color: Color::yellow() },
            ]
        );
        // (-10,-10)-(30,10) and (0,10)-(40,30)
        if let Op::Rect { rect, .. } = &ops[0] {
            assert_eq!(rect.max(), Vec2::new(30.0, 10.0));
        }
        if let Op::Rect { rect, .. } = &ops[1] {
            assert_eq!(rect.max(), Vec2::new(40.0, 30.0));
        }
    }

    #[test]
    fn disc_is_centered_on_tap() {
        let mut s = Recording::new(400.0, 800.0);
        let ops = draw_one(&rec(50.0, 50.0, ShapeKind::Disc), &mut s);
        assert_eq!(ops, vec![Op::Circle { center: Vec2::new(50.0, 50.0), radius: 40.0, color: Color::red() }]);
    }

    #[test]
    fn greeting_uses_tap_as_baseline() {
        let mut s = Recording::new(400.0, 800.0);
        let ops = draw_one(&rec(120.0, 300.0, ShapeKind::Greeting), &mut s);
        assert_eq!(
            ops,
            vec![Op::NativeText {
                text: "Hola".into(),
                baseline: Vec2::new(120.0, 300.0),
                size: 150.0,
                color: Color::black(),
            }]
        );
    }

    #[test]
    fn pill_is_centered_rounded_rect() {
        let mut s = Recording::new(400.0, 800.0);
        let ops = draw_one(&rec(100.0, 100.0, ShapeKind::Pill), &mut s);
        assert_eq!(
            ops,
            vec![Op::RoundedRect {
                rect: Rect::new(60.0, 80.0, 80.0, 40.0),
                radius: 20.0,
                color: Color::magenta(),
            }]
        );
    }

    // ── ray ───────────────────────────────────────────────────────────────

    fn ray_end(op: &Op) -> Vec2 {
        match op {
            Op::Line { to, .. } => *to,
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn ray_starts_at_tap_and_ends_inside_bounds() {
        let mut s = Recording::new(400.0, 800.0);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            draw(&rec(30.0, 40.0, ShapeKind::Ray), &mut s, &mut rng);
        }
        for op in s.take() {
            let Op::Line { from, to, width, color } = op else { panic!("expected line") };
            assert_eq!(from, Vec2::new(30.0, 40.0));
            assert_eq!(width, 5.0);
            assert_eq!(color, Color::blue());
            assert!((0.0..400.0).contains(&to.x));
            assert!((0.0..800.0).contains(&to.y));
        }
    }

    #[test]
    fn ray_endpoint_changes_between_redraws() {
        let mut s = Recording::new(400.0, 800.0);
        let record = rec(0.0, 0.0, ShapeKind::Ray);
        let mut rng = StdRng::seed_from_u64(42);
        draw(&record, &mut s, &mut rng);
        draw(&record, &mut s, &mut rng);
        let ops = s.take();
        assert_ne!(ray_end(&ops[0]), ray_end(&ops[1]));
        // The record itself carries no endpoint.
        assert_eq!(record, rec(0.0, 0.0, ShapeKind::Ray));
    }

    #[test]
    fn ray_is_reproducible_under_a_fixed_seed() {
        let record = rec(5.0, 5.0, ShapeKind::Ray);
        let mut a = Recording::new(400.0, 800.0);
        let mut b = Recording::new(400.0, 800.0);
        draw(&record, &mut a, &mut StdRng::seed_from_u64(9));
        draw(&record, &mut b, &mut StdRng::seed_from_u64(9));
        assert_eq!(a.ops, b.ops);
    }
}
