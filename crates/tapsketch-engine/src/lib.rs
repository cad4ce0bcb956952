//! tapsketch engine crate.
//!
//! Owns the platform + GPU runtime pieces the sketch layer draws through:
//! geometry, paint, the recorded draw list, fonts, input/tap recognition,
//! the wgpu device, renderers and the winit loop.

pub mod device;
pub mod window;
pub mod input;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod scene;
pub mod text;
