//! Hit the button before the proposal countdown reaches zero.

use super::{Challenge, ChallengeInput, ChallengeKind, Every, GameRng, Outcome, Resolution};

pub struct Proposal {
    count: u32,
    step: Every,
    slot: Resolution,
}

impl Proposal {
    pub fn new(level: u32) -> Self {
        Self {
            count: 10,
            step: Every::ms(1000 - 50 * i64::from(level)),
            slot: Resolution::Open,
        }
    }

    fn urgency(&self) -> &'static str {
        if self.count > 7 {
            "Take your time..."
        } else if self.count > 4 {
            "Getting serious now..."
        } else {
            "URGENT! STOP IT NOW!"
        }
    }
}

impl Challenge for Proposal {
    fn kind(&self) -> ChallengeKind {
        ChallengeKind::Proposal
    }

    fn handle_input(&mut self, input: ChallengeInput, _rng: &mut GameRng) {
        if input == ChallengeInput::Tap && self.slot.is_open() {
            self.slot.resolve(Outcome::Success);
        }
    }

    fn tick(&mut self, _time_left: u32, _rng: &mut GameRng) {
        if self.slot.is_open() && self.step.fire() {
            self.count = self.count.saturating_sub(1);
            if self.count == 0 {
                self.slot.resolve(Outcome::Fail);
            }
        }
    }

    fn resolution(&mut self) -> &mut Resolution {
        &mut self.slot
    }

    fn lines(&self) -> Vec<String> {
        vec![
            "Stop the marriage proposal before the countdown ends!".into(),
            String::new(),
            format!("💍  {}", self.count),
            self.urgency().into(),
        ]
    }

    fn controls(&self) -> &'static str {
        "[Space] STOP!"
    }
}
