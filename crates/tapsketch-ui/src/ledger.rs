//! Append-only record of every tap and the shape it produced.

use rand::Rng;
use tapsketch_engine::coords::Vec2;

use crate::shape;
use crate::surface::DrawSurface;

/// Which of the five drawing routines renders a record.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShapeKind {
    /// Two overlapping rectangles, cyan over yellow.
    Flag,
    /// Red circle.
    Disc,
    /// Large "Hola" text on the tap baseline.
    Greeting,
    /// Magenta rounded rectangle.
    Pill,
    /// Blue line to a random point.
    Ray,
}

impl ShapeKind {
    pub const COUNT: usize = 5;

    const ALL: [ShapeKind; Self::COUNT] =
        [ShapeKind::Flag, ShapeKind::Disc, ShapeKind::Greeting, ShapeKind::Pill, ShapeKind::Ray];

    /// Position in the cycle, `0..5`.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            ShapeKind::Flag => 0,
            ShapeKind::Disc => 1,
            ShapeKind::Greeting => 2,
            ShapeKind::Pill => 3,
            ShapeKind::Ray => 4,
        }
    }

    /// Kind for the `i`-th record; wraps every five.
    #[inline]
    pub const fn for_index(i: usize) -> Self {
        Self::ALL[i % Self::COUNT]
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShapeRecord {
    /// Tap location, logical pixels.
    pub position: Vec2,
    pub kind: ShapeKind,
}

/// Ordered shapes accumulated from taps.
///
/// Records are never removed or changed. Insertion order is draw order, so
/// later shapes cover earlier ones. Growth is unbounded.
#[derive(Debug, Clone, Default)]
pub struct ShapeLedger {
    records: Vec<ShapeRecord>,
}

impl ShapeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a tap; the kind is picked from the current length.
    pub fn append(&mut self, position: Vec2) -> &ShapeRecord {
        let kind = ShapeKind::for_index(self.records.len());
        self.records.push(ShapeRecord { position, kind });
        &self.records[self.records.len() - 1]
    }

    /// Redraws every record in insertion order.
    pub fn render<S, R>(&self, surface: &mut S, rng: &mut R)
    where
        S: DrawSurface + ?Sized,
        R: Rng + ?Sized,
    {
        for record in &self.records {
            shape::draw(record, surface, rng);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn records(&self) -> &[ShapeRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShapeRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&ShapeRecord> {
        self.records.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Op, Recording};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn taps(n: usize) -> Vec<Vec2> {
        (0..n).map(|i| Vec2::new(i as f32 * 3.0, 700.0 - i as f32)).collect()
    }

    // ── kinds ─────────────────────────────────────────────────────────────

    #[test]
    fn index_round_trips_through_for_index() {
        for i in 0..ShapeKind::COUNT {
            assert_eq!(ShapeKind::for_index(i).index(), i);
        }
        assert_eq!(ShapeKind::for_index(5), ShapeKind::Flag);
        assert_eq!(ShapeKind::for_index(14), ShapeKind::Ray);
    }

    #[test]
    fn n_taps_give_n_records_cycling_kinds() {
        let mut ledger = ShapeLedger::new();
        for p in taps(23) {
            ledger.append(p);
        }
        assert_eq!(ledger.len(), 23);
        for (i, r) in ledger.iter().enumerate() {
            assert_eq!(r.kind.index(), i % 5);
        }
    }

    #[test]
    fn replay_yields_same_kind_sequence() {
        let run = || {
            let mut ledger = ShapeLedger::new();
            for p in taps(12) {
                ledger.append(p);
            }
            ledger.iter().map(|r| r.kind).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn append_returns_the_new_record() {
        let mut ledger = ShapeLedger::new();
        assert!(ledger.is_empty());
        let r = *ledger.append(Vec2::new(10.0, 10.0));
        assert_eq!(r, ShapeRecord { position: Vec2::new(10.0, 10.0), kind: ShapeKind::Flag });
        let r = *ledger.append(Vec2::new(50.0, 50.0));
        assert_eq!(r.kind, ShapeKind::Disc);
        assert_eq!(ledger.last(), Some(&r));
        assert_eq!(ledger.records().len(), 2);
    }

    // ── rendering ─────────────────────────────────────────────────────────

    #[test]
    fn render_paints_in_insertion_order() {
        let mut ledger = ShapeLedger::new();
        ledger.append(Vec2::new(10.0, 10.0));
        ledger.append(Vec2::new(50.0, 50.0));
        ledger.append(Vec2::new(90.0, 90.0));
        ledger.append(Vec2::new(130.0, 130.0));

        let mut s = Recording::new(400.0, 800.0);
        ledger.render(&mut s, &mut StdRng::seed_from_u64(0));

        let tags: Vec<&str> = s
            .ops
            .iter()
            .map(|op| match op {
                Op::Rect { .. } => "rect",
                Op::Circle { .. } => "circle",
                Op::NativeText { .. } => "native_text",
                Op::RoundedRect { .. } => "rounded_rect",
                Op::Line { .. } => "line",
                Op::Text { .. } => "text",
            })
            .collect();
        assert_eq!(tags, vec!["rect", "rect", "circle", "native_text", "rounded_rect"]);
    }

    #[test]
    fn render_does_not_touch_records() {
        let mut ledger = ShapeLedger::new();
        for p in taps(5) {
            ledger.append(p);
        }
        let before = ledger.clone();
        let mut s = Recording::new(400.0, 800.0);
        let mut rng = StdRng::seed_from_u64(3);
        ledger.render(&mut s, &mut rng);
        ledger.render(&mut s, &mut rng);
        assert_eq!(ledger.records(), before.records());
    }

    #[test]
    fn empty_ledger_draws_nothing() {
        let mut s = Recording::new(400.0, 800.0);
        ShapeLedger::new().render(&mut s, &mut StdRng::seed_from_u64(0));
        assert!(s.ops.is_empty());
    }
}
