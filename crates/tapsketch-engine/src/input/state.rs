use super::frame::InputFrame;
use super::tap::TapRecognizer;
use super::types::{InputEvent, PointerButtonEvent, PointerMoveEvent};

/// Current input state for a single window.
///
/// Holds the pointer position (mouse button events carry it) and the tap
/// recognizer. Completed taps are recorded into an `InputFrame`; nothing
/// else is retained per event.
#[derive(Debug, Default)]
pub struct InputState {
    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    taps: TapRecognizer,
}

impl InputState {
    /// Applies a platform-agnostic input event and records a completed tap in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::PointerMoved(PointerMoveEvent { x, y })
            | InputEvent::PointerButton(PointerButtonEvent { x, y, .. }) => {
                self.pointer_pos = Some((x, y));
            }
            InputEvent::PointerLeft => self.pointer_pos = None,
            InputEvent::Touch(_) | InputEvent::Focused(_) => {}
        }

        if let Some(tap) = self.taps.on_event(&ev) {
            log::trace!("tap recognized at ({}, {})", tap.x, tap.y);
            frame.taps.push(tap);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::input::{MouseButton, MouseButtonState, TouchEvent, TouchPhase};

    fn button(state: MouseButtonState, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent { button: MouseButton::Left, state, x, y })
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y })
    }

    #[test]
    fn click_records_a_tap() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();
        st.apply_event(&mut fr, button(MouseButtonState::Pressed, 10.0, 10.0));
        assert!(fr.taps.is_empty());
        st.apply_event(&mut fr, button(MouseButtonState::Released, 10.0, 10.0));

        assert_eq!(fr.taps, vec![Vec2::new(10.0, 10.0)]);
        assert_eq!(st.pointer_pos, Some((10.0, 10.0)));
    }

    #[test]
    fn touch_tap_lands_in_frame() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();
        let t = |phase| InputEvent::Touch(TouchEvent { id: 0, phase, x: 4.0, y: 2.0 });
        st.apply_event(&mut fr, t(TouchPhase::Started));
        st.apply_event(&mut fr, t(TouchPhase::Ended));
        assert_eq!(fr.taps, vec![Vec2::new(4.0, 2.0)]);
    }

    #[test]
    fn frame_clear_drops_taps() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();
        st.apply_event(&mut fr, button(MouseButtonState::Pressed, 0.0, 0.0));
        st.apply_event(&mut fr, button(MouseButtonState::Released, 0.0, 0.0));
        fr.clear();
        assert!(fr.taps.is_empty());
    }

    #[test]
    fn pointer_motion_between_redraws_retains_nothing() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();
        for i in 0..10_000 {
            st.apply_event(&mut fr, moved(i as f32 % 400.0, 3.0));
        }
        assert!(fr.taps.is_empty());
        assert_eq!(fr.taps.capacity(), 0);
        assert_eq!(st.pointer_pos, Some((399.0, 3.0)));
    }

    #[test]
    fn focus_loss_cancels_a_held_press() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();
        st.apply_event(&mut fr, button(MouseButtonState::Pressed, 0.0, 0.0));
        st.apply_event(&mut fr, InputEvent::Focused(false));
        st.apply_event(&mut fr, button(MouseButtonState::Released, 0.0, 0.0));
        assert!(fr.taps.is_empty());
    }

    #[test]
    fn pointer_leaving_forgets_position() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();
        st.apply_event(&mut fr, moved(5.0, 6.0));
        st.apply_event(&mut fr, InputEvent::PointerLeft);
        assert_eq!(st.pointer_pos, None);
    }
}
