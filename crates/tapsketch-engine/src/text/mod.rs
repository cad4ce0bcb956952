//! Font loading and text measurement (fontdue).

mod font_system;

pub use font_system::{FontId, FontLoadError, FontSystem, raster_scale};
