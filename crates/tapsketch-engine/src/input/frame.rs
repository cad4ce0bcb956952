use crate::coords::Vec2;

/// Per-frame input deltas.
///
/// `InputState` folds raw events and keeps only what outlives them: the
/// pointer position and the pending tap. Each `InputFrame` holds the taps
/// completed since the last frame and is cleared after it is painted.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Taps recognized this frame, in arrival order, logical pixels.
    pub taps: Vec<Vec2>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.taps.clear();
    }
}
