//! Catch the falling laddoo before it hits the ground.

use super::{Challenge, ChallengeInput, ChallengeKind, GameRng, Outcome, Resolution};

const START_Y: f32 = 20.0;
const GROUND_Y: f32 = 85.0;
const ROWS: usize = 8;

pub struct Laddoo {
    y: f32,
    /// Fall per tick.
    speed: f32,
    slot: Resolution,
}

impl Laddoo {
    pub fn new(level: u32) -> Self {
        Self {
            y: START_Y,
            speed: 2.0 + level as f32 * 0.5,
            slot: Resolution::Open,
        }
    }
}

impl Challenge for Laddoo {
    fn kind(&self) -> ChallengeKind {
        ChallengeKind::Laddoo
    }

    fn handle_input(&mut self, input: ChallengeInput, _rng: &mut GameRng) {
        if self.slot.is_open() && input == ChallengeInput::Tap {
            self.slot.resolve(Outcome::Success);
        }
    }

    fn tick(&mut self, _time_left: u32, _rng: &mut GameRng) {
        if !self.slot.is_open() {
            return;
        }
        let next = self.y + self.speed;
        if next >= GROUND_Y {
            self.slot.resolve(Outcome::Fail);
        } else {
            self.y = next;
        }
    }

    fn resolution(&mut self) -> &mut Resolution {
        &mut self.slot
    }

    fn lines(&self) -> Vec<String> {
        let row = ((self.y / GROUND_Y) * ROWS as f32) as usize;
        let mut out = vec!["Tap the laddoo before it falls!".to_string()];
        for r in 0..ROWS {
            out.push(if r == row.min(ROWS - 1) { "      🍬".into() } else { String::new() });
        }
        out.push("▔▔▔▔▔▔▔▔▔▔▔▔▔▔".into());
        out
    }

    fn controls(&self) -> &'static str {
        "[Space] catch"
    }
}
