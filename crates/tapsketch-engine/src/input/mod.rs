//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The runtime translates platform events into `InputEvent`s; `InputState`
//! folds them into the pointer position and the taps recorded per frame.

mod frame;
mod state;
mod tap;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use tap::{TapRecognizer, DEFAULT_TAP_SLOP};
pub use types::{
    InputEvent,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerMoveEvent,
    TouchEvent,
    TouchPhase,
};
