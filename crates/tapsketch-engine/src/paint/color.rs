/// Linear premultiplied RGBA color.
///
/// Invariant:
/// - `rgb` components are multiplied by `a` (premultiplied alpha).
///
/// Renderers blend with `One, OneMinusSrcAlpha`, and the surface prefers an
/// sRGB format, so colors here are linear; use [`Color::from_srgb_u8`] for
/// values written in the usual 0–255 sRGB notation.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    // ── palette ───────────────────────────────────────────────────────────
    //
    // Saturated primaries are identical in sRGB and linear space, so they can
    // stay `const`.

    #[inline]
    pub const fn black() -> Self {
        Self::from_premul(0.0, 0.0, 0.0, 1.0)
    }

    #[inline]
    pub const fn white() -> Self {
        Self::from_premul(1.0, 1.0, 1.0, 1.0)
    }

    #[inline]
    pub const fn red() -> Self {
        Self::from_premul(1.0, 0.0, 0.0, 1.0)
    }

    #[inline]
    pub const fn green() -> Self {
        Self::from_premul(0.0, 1.0, 0.0, 1.0)
    }

    #[inline]
    pub const fn blue() -> Self {
        Self::from_premul(0.0, 0.0, 1.0, 1.0)
    }

    #[inline]
    pub const fn cyan() -> Self {
        Self::from_premul(0.0, 1.0, 1.0, 1.0)
    }

    #[inline]
    pub const fn magenta() -> Self {
        Self::from_premul(1.0, 0.0, 1.0, 1.0)
    }

    #[inline]
    pub const fn yellow() -> Self {
        Self::from_premul(1.0, 1.0, 0.0, 1.0)
    }

    /// `#CCCCCC`.
    #[inline]
    pub fn light_gray() -> Self {
        Self::from_srgb_u8(0xCC, 0xCC, 0xCC, 0xFF)
    }

    // ── constructors ──────────────────────────────────────────────────────

    /// Creates a premultiplied linear color from straight sRGB bytes.
    ///
    /// RGB channels are decoded with the sRGB transfer function; alpha is linear.
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(
            srgb_to_linear(r as f32 / 255.0),
            srgb_to_linear(g as f32 / 255.0),
            srgb_to_linear(b as f32 / 255.0),
            a as f32 / 255.0,
        )
    }

    /// Creates a premultiplied color from premultiplied components.
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a premultiplied color from straight alpha linear components.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: (r.clamp(0.0, 1.0)) * a,
            g: (g.clamp(0.0, 1.0)) * a,
            b: (b.clamp(0.0, 1.0)) * a,
            a,
        }
    }

    /// Component-wise interpolation. Interpolating premultiplied values is
    /// what keeps gradients between translucent stops free of dark fringes.
    #[inline]
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_extremes_are_exact() {
        assert_eq!(Color::from_srgb_u8(255, 0, 255, 255), Color::magenta());
        assert_eq!(Color::from_srgb_u8(0, 0, 0, 255), Color::black());
    }

    #[test]
    fn light_gray_is_linearized() {
        let c = Color::light_gray();
        assert!((c.r - 0.6038).abs() < 1e-3, "got {}", c.r);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn straight_alpha_is_premultiplied() {
        let c = Color::from_straight(1.0, 0.5, 0.0, 0.5);
        assert_eq!(c, Color::from_premul(0.5, 0.25, 0.0, 0.5));
    }

    #[test]
    fn lerp_midpoint() {
        let c = Color::black().lerp(Color::white(), 0.5);
        assert_eq!(c, Color::from_premul(0.5, 0.5, 0.5, 1.0));
    }
}
