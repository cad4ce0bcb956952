use std::fmt;

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

use crate::coords::Vec2;

/// Line height used when a font is missing or a run lays out no glyphs.
const FALLBACK_LINE_HEIGHT: f32 = 1.2;

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font loaded into a [`FontSystem`].
///
/// A handle that was never returned by `load_font` is valid to pass around;
/// text using it measures as empty and is not drawn.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

impl FontId {
    /// Handle that never resolves to a font.
    pub const MISSING: FontId = FontId(usize::MAX);
}

/// Owns a collection of loaded fonts.
///
/// Fonts are immutable after loading. The system is owned by the application
/// and passed to the text renderer each frame so new glyphs can be rasterized
/// on demand.
#[derive(Default)]
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        if bytes.is_empty() {
            return Err(FontLoadError("no font data".to_string()));
        }
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        Ok(id)
    }

    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    #[inline]
    pub fn contains(&self, id: FontId) -> bool {
        self.get(id).is_some()
    }

    /// Distance from the top of a line box to the baseline at `size`.
    ///
    /// Missing fonts report `size`, which puts the baseline at the bottom of
    /// an em box.
    pub fn ascent(&self, id: FontId, size: f32) -> f32 {
        self.get(id)
            .and_then(|f| f.horizontal_line_metrics(size))
            .map_or(size, |m| m.ascent)
    }

    /// Measures an unwrapped single run at 1:1 scale.
    ///
    /// Width is the pen extent after the last glyph's advance (trailing side
    /// bearing included); height is the laid-out line box. Returns
    /// `(0, size * 1.2)` for unknown fonts and empty text.
    #[must_use]
    pub fn measure_text(&self, text: &str, id: FontId, size: f32) -> Vec2 {
        self.measure_text_scaled(text, id, size, 1.0)
    }

    /// Like [`FontSystem::measure_text`] but lays out at `size * scale` and
    /// divides the result back to logical pixels.
    ///
    /// Pass the frame's scale factor so the width matches the positions the
    /// text renderer places glyphs at. fontdue advances are not proportional
    /// across pixel sizes, so measuring at 1:1 drifts on HiDPI.
    #[must_use]
    pub fn measure_text_scaled(&self, text: &str, id: FontId, size: f32, scale: f32) -> Vec2 {
        let empty = Vec2::new(0.0, size * FALLBACK_LINE_HEIGHT);
        let Some(font) = self.get(id) else {
            return empty;
        };

        let scale = raster_scale(scale);
        let phys_size = size * scale;

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[font], &TextStyle::new(text, phys_size, 0));

        let glyphs = layout.glyphs();
        if glyphs.is_empty() {
            return empty;
        }

        // Glyph x is the bitmap left edge, i.e. pen + xmin; undo that and add
        // the advance so the width matches where the next glyph would start.
        let w = glyphs
            .iter()
            .map(|g| {
                let m = font.metrics_indexed(g.key.glyph_index, phys_size);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max);
        let h = layout.height().max(
            glyphs.iter().map(|g| g.y + g.height as f32).fold(0.0f32, f32::max),
        );
        Vec2::new(w / scale, h / scale)
    }
}

/// Scale factor text is laid out and rasterized at. Non-finite or
/// non-positive factors fall back to 1.
#[inline]
pub fn raster_scale(scale_factor: f32) -> f32 {
    if scale_factor.is_finite() && scale_factor > 0.0 { scale_factor } else { 1.0 }
}
