use crate::coords::Vec2;

use super::types::{
    InputEvent, MouseButton, MouseButtonState, PointerButtonEvent, PointerMoveEvent, TouchEvent,
    TouchPhase,
};

/// Maximum travel between press and release, in logical pixels, for the
/// gesture to still count as a tap.
pub const DEFAULT_TAP_SLOP: f32 = 8.0;

#[derive(Debug, Copy, Clone, PartialEq)]
enum Contact {
    Mouse,
    Touch(u64),
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Pending {
    contact: Contact,
    down_at: Vec2,
}

/// Single-pointer tap recognizer.
///
/// A tap is a primary-button press (or a touch start) followed by its release
/// without the contact travelling further than `slop` from the press point.
/// The tap is reported at the release position. Only one contact is tracked;
/// events from other contacts are ignored while one is pending.
#[derive(Debug, Clone)]
pub struct TapRecognizer {
    slop: f32,
    pending: Option<Pending>,
}

impl Default for TapRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_TAP_SLOP)
    }
}

impl TapRecognizer {
    pub fn new(slop: f32) -> Self {
        Self { slop: slop.max(0.0), pending: None }
    }

    /// True while a press is held and still eligible to become a tap.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops any in-flight press (focus loss, pointer leaving the window).
    #[inline]
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Feeds one event; returns the tap position when this event completes a tap.
    pub fn on_event(&mut self, ev: &InputEvent) -> Option<Vec2> {
        match *ev {
            InputEvent::PointerButton(PointerButtonEvent { button: MouseButton::Left, state, x, y }) => {
                let p = Vec2::new(x, y);
                match state {
                    MouseButtonState::Pressed => {
                        self.begin(Contact::Mouse, p);
                        None
                    }
                    MouseButtonState::Released => self.finish(Contact::Mouse, p),
                }
            }
            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.track(Contact::Mouse, Vec2::new(x, y));
                None
            }
            InputEvent::Touch(TouchEvent { id, phase, x, y }) => {
                let p = Vec2::new(x, y);
                let contact = Contact::Touch(id);
                match phase {
                    TouchPhase::Started => {
                        self.begin(contact, p);
                        None
                    }
                    TouchPhase::Moved => {
                        self.track(contact, p);
                        None
                    }
                    TouchPhase::Ended => self.finish(contact, p),
                    TouchPhase::Cancelled => {
                        if self.owns(contact) {
                            self.cancel();
                        }
                        None
                    }
                }
            }
            InputEvent::PointerLeft => {
                if self.owns(Contact::Mouse) {
                    self.cancel();
                }
                None
            }
            InputEvent::Focused(false) => {
                self.cancel();
                None
            }
            _ => None,
        }
    }

    fn owns(&self, contact: Contact) -> bool {
        self.pending.is_some_and(|p| p.contact == contact)
    }

    fn begin(&mut self, contact: Contact, at: Vec2) {
        if self.pending.is_none() {
            self.pending = Some(Pending { contact, down_at: at });
        }
    }

    fn track(&mut self, contact: Contact, at: Vec2) {
        if let Some(p) = self.pending {
            if p.contact == contact && (at - p.down_at).length() > self.slop {
                log::trace!("tap cancelled: moved past slop");
                self.pending = None;
            }
        }
    }

    fn finish(&mut self, contact: Contact, at: Vec2) -> Option<Vec2> {
        let p = self.pending.filter(|p| p.contact == contact)?;
        self.pending = None;
        ((at - p.down_at).length() <= self.slop).then_some(at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            x,
            y,
        })
    }

    fn release(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Released,
            x,
            y,
        })
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y })
    }

    fn touch(id: u64, phase: TouchPhase, x: f32, y: f32) -> InputEvent {
        InputEvent::Touch(TouchEvent { id, phase, x, y })
    }

    // ── mouse ─────────────────────────────────────────────────────────────

    #[test]
    fn press_release_in_place_is_a_tap() {
        let mut r = TapRecognizer::default();
        assert_eq!(r.on_event(&press(50.0, 50.0)), None);
        assert!(r.is_pending());
        assert_eq!(r.on_event(&release(50.0, 50.0)), Some(Vec2::new(50.0, 50.0)));
        assert!(!r.is_pending());
    }

    #[test]
    fn tap_reports_release_position_within_slop() {
        let mut r = TapRecognizer::default();
        r.on_event(&press(10.0, 10.0));
        r.on_event(&moved(13.0, 14.0));
        assert_eq!(r.on_event(&release(13.0, 14.0)), Some(Vec2::new(13.0, 14.0)));
    }

    #[test]
    fn drag_past_slop_is_not_a_tap() {
        let mut r = TapRecognizer::default();
        r.on_event(&press(10.0, 10.0));
        r.on_event(&moved(40.0, 10.0));
        r.on_event(&moved(10.0, 10.0));
        assert_eq!(r.on_event(&release(10.0, 10.0)), None);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut r = TapRecognizer::default();
        assert_eq!(r.on_event(&release(1.0, 1.0)), None);
    }

    #[test]
    fn right_button_never_taps() {
        let mut r = TapRecognizer::default();
        let right = |state| {
            InputEvent::PointerButton(PointerButtonEvent { button: MouseButton::Right, state, x: 0.0, y: 0.0 })
        };
        r.on_event(&right(MouseButtonState::Pressed));
        assert_eq!(r.on_event(&right(MouseButtonState::Released)), None);
    }

    #[test]
    fn focus_loss_cancels_pending_press() {
        let mut r = TapRecognizer::default();
        r.on_event(&press(5.0, 5.0));
        r.on_event(&InputEvent::Focused(false));
        assert_eq!(r.on_event(&release(5.0, 5.0)), None);
    }

    // ── touch ─────────────────────────────────────────────────────────────

    #[test]
    fn touch_start_end_is_a_tap() {
        let mut r = TapRecognizer::default();
        r.on_event(&touch(7, TouchPhase::Started, 100.0, 200.0));
        assert_eq!(
            r.on_event(&touch(7, TouchPhase::Ended, 101.0, 200.0)),
            Some(Vec2::new(101.0, 200.0))
        );
    }

    #[test]
    fn second_finger_is_ignored_while_first_is_down() {
        let mut r = TapRecognizer::default();
        r.on_event(&touch(1, TouchPhase::Started, 0.0, 0.0));
        r.on_event(&touch(2, TouchPhase::Started, 300.0, 300.0));
        assert_eq!(r.on_event(&touch(2, TouchPhase::Ended, 300.0, 300.0)), None);
        assert_eq!(r.on_event(&touch(1, TouchPhase::Ended, 0.0, 0.0)), Some(Vec2::zero()));
    }

    #[test]
    fn cancelled_touch_does_not_tap() {
        let mut r = TapRecognizer::default();
        r.on_event(&touch(3, TouchPhase::Started, 0.0, 0.0));
        r.on_event(&touch(3, TouchPhase::Cancelled, 0.0, 0.0));
        assert_eq!(r.on_event(&touch(3, TouchPhase::Ended, 0.0, 0.0)), None);
    }
}
