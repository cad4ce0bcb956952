//! GPU rendering subsystem.
//!
//! `SceneRenderer` consumes a `scene::DrawList` and issues wgpu commands for
//! one frame. Shapes and glyphs live in separate pipelines; the scene renderer
//! interleaves them so the list's paint order survives on screen.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using a viewport uniform.

mod common;
mod ctx;
mod scene;
mod shape;
mod text;

pub use ctx::{RenderCtx, RenderTarget};
pub use scene::SceneRenderer;
