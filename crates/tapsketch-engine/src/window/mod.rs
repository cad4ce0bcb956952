//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, translates pointer and touch input,
//! and wires both to the GPU layer.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
