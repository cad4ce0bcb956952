//! The single sketch screen: tap handling plus the per-frame paint.

use rand::Rng;
use tapsketch_engine::coords::{Rect, Vec2};
use tapsketch_engine::paint::Color;
use tapsketch_engine::text::FontId;

use crate::heading::Heading;
use crate::ledger::ShapeLedger;
use crate::surface::{DrawSurface, GestureSource, TextRun};

pub const STATUS_SIZE: f32 = 20.0;
const STATUS_STRIP_Y: f32 = 100.0;
const STATUS_STRIP_HEIGHT: f32 = 30.0;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Phase {
    /// No tap yet; only the canvas shows.
    #[default]
    Idle,
    /// At least one tap; status text and heading are shown. Terminal.
    Active,
}

/// Screen state: the ledger, the last tap message and the phase.
#[derive(Debug, Clone)]
pub struct Screen {
    phase: Phase,
    ledger: ShapeLedger,
    status: String,
    body_font: FontId,
    heading: Heading,
}

impl Screen {
    pub fn new(body_font: FontId, heading_font: FontId) -> Self {
        Self {
            phase: Phase::Idle,
            ledger: ShapeLedger::new(),
            status: String::new(),
            body_font,
            heading: Heading::new(heading_font),
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn ledger(&self) -> &ShapeLedger {
        &self.ledger
    }

    /// Last tap message; empty while idle.
    #[inline]
    pub fn status_text(&self) -> &str {
        &self.status
    }

    pub fn on_tap(&mut self, position: Vec2) {
        let kind = self.ledger.append(position).kind;
        log::debug!(
            "tap #{} at ({}, {}) -> {:?}",
            self.ledger.len(),
            position.x,
            position.y,
            kind
        );

        // `{:?}` keeps the fractional part: 50.0 prints as "50.0".
        self.status = format!("Clicked at ({:?}, {:?})", position.x, position.y);

        if self.phase == Phase::Idle {
            self.phase = Phase::Active;
            log::info!("first tap received; status and heading enabled");
        }
    }

    /// Feeds every pending tap to [`Screen::on_tap`]. Returns how many.
    pub fn drain<G: GestureSource + ?Sized>(&mut self, source: &mut G) -> usize {
        let mut n = 0;
        while let Some(p) = source.next_tap() {
            self.on_tap(p);
            n += 1;
        }
        n
    }

    /// Paints one full frame onto an already-cleared surface.
    pub fn paint<S, R>(&self, surface: &mut S, rng: &mut R)
    where
        S: DrawSurface + ?Sized,
        R: Rng + ?Sized,
    {
        self.ledger.render(surface, rng);

        if self.phase == Phase::Idle {
            return;
        }

        let status = TextRun::new(self.status.as_str(), self.body_font, STATUS_SIZE, Color::black());
        surface.draw_text(&status, Vec2::zero());

        let width = surface.size().x;
        surface.fill_rect(Rect::new(0.0, STATUS_STRIP_Y, width, STATUS_STRIP_HEIGHT), Color::light_gray());

        self.heading.paint(surface);
    }
}
