use crate::coords::Vec2;

use super::Color;

/// A single gradient stop.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub t: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

/// Linear gradient in logical pixel space.
///
/// Semantics:
/// - `start` and `end` are positions in the same coordinate space as geometry.
/// - `stops` are expected sorted by `t`.
/// - outside `[0, 1]` the edge stops are padded.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Vec2,
    pub end: Vec2,
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(start: Vec2, end: Vec2, stops: Vec<ColorStop>) -> Self {
        Self { start, end, stops }
    }

    /// Top-to-bottom gradient between `top` and `bottom` with `colors` spread
    /// evenly over the axis. Pads outside the span.
    pub fn vertical(top: f32, bottom: f32, colors: &[Color]) -> Self {
        let last = colors.len().saturating_sub(1).max(1) as f32;
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, &c)| ColorStop::new(i as f32 / last, c))
            .collect();
        Self::new(Vec2::new(0.0, top), Vec2::new(0.0, bottom), stops)
    }

    /// Projects `p` onto the gradient axis. `0` at `start`, `1` at `end`.
    ///
    /// A degenerate axis yields `0`.
    pub fn t_at(&self, p: Vec2) -> f32 {
        let axis = self.end - self.start;
        let len2 = axis.dot(axis);
        if len2 <= f32::EPSILON {
            return 0.0;
        }
        (p - self.start).dot(axis) / len2
    }

    /// Color at axis parameter `t`, clamped to `[0, 1]`.
    pub fn sample(&self, t: f32) -> Color {
        let Some(first) = self.stops.first() else {
            return Color::transparent();
        };
        let t = t.clamp(0.0, 1.0);

        if t <= first.t {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.t {
                let span = b.t - a.t;
                let local = if span > 0.0 { (t - a.t) / span } else { 1.0 };
                return a.color.lerp(b.color, local);
            }
        }
        // t is past the last stop.
        self.stops[self.stops.len() - 1].color
    }

    /// Color at point `p` in logical pixels.
    #[inline]
    pub fn sample_at(&self, p: Vec2) -> Color {
        self.sample(self.t_at(p))
    }
}
