//! Slap left, but only while the mosquito is on the left half.

use rand::Rng;

use super::{track, Challenge, ChallengeInput, ChallengeKind, Every, GameRng, Outcome, Resolution};

pub struct Mosquito {
    x: f32,
    hop: Every,
    slot: Resolution,
}

impl Mosquito {
    pub fn new(level: u32) -> Self {
        Self {
            x: 50.0,
            hop: Every::ms(1000 - 50 * i64::from(level)),
            slot: Resolution::Open,
        }
    }
}

impl Challenge for Mosquito {
    fn kind(&self) -> ChallengeKind {
        ChallengeKind::Mosquito
    }

    // Right swipes do nothing.
    fn handle_input(&mut self, input: ChallengeInput, _rng: &mut GameRng) {
        if input != ChallengeInput::Left || !self.slot.is_open() {
            return;
        }
        let outcome = if self.x < 50.0 { Outcome::Success } else { Outcome::Fail };
        self.slot.resolve(outcome);
    }

    fn tick(&mut self, _time_left: u32, rng: &mut GameRng) {
        if self.slot.is_open() && self.hop.fire() {
            self.x = rng.gen_range(10.0..90.0);
        }
    }

    fn resolution(&mut self) -> &mut Resolution {
        &mut self.slot
    }

    fn lines(&self) -> Vec<String> {
        vec![
            "Swipe LEFT to slap the mosquito!".into(),
            "(only when it's on the LEFT side)".into(),
            String::new(),
            track(21, &[(50.0, '|'), (self.x, '🦟')]),
        ]
    }

    fn controls(&self) -> &'static str {
        "[←/h] slap left"
    }
}
