//! tapsketch sketch layer.
//!
//! Taps append shape records to a ledger; every frame the whole ledger is
//! replayed onto a [`DrawSurface`], followed by the status text and the
//! gradient heading once the first tap has landed.
//!
//! The core (`ledger`, `shape`, `heading`, `screen`) only talks to the
//! capability traits in [`surface`]. [`Painter`] maps them onto the engine's
//! draw list, and [`Application`] wires everything into the winit runtime.

pub mod app;
pub mod heading;
pub mod ledger;
pub mod painter;
pub mod screen;
pub mod shape;
pub mod surface;

#[cfg(test)]
mod testing;

pub use app::Application;
pub use heading::Heading;
pub use ledger::{ShapeKind, ShapeLedger, ShapeRecord};
pub use painter::Painter;
pub use screen::{Phase, Screen};
pub use surface::{DrawSurface, FrameTaps, GestureSource, TextRun};
