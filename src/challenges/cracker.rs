//! Burst the cracker while the fuse is still burning.

use super::{ticks_for_ms, Challenge, ChallengeInput, ChallengeKind, Every, GameRng, Outcome, Resolution};

const LIGHT_MS: i64 = 1000;
const BURN_MS: i64 = 100;

pub struct Cracker {
    /// Ticks until the fuse is lit.
    unlit_ticks: u32,
    fuse: f32,
    burn: Every,
    burn_rate: f32,
    slot: Resolution,
}

impl Cracker {
    pub fn new(level: u32) -> Self {
        Self {
            unlit_ticks: ticks_for_ms(LIGHT_MS),
            fuse: 100.0,
            burn: Every::ms(BURN_MS),
            burn_rate: 2.0 + level as f32 * 0.5,
            slot: Resolution::Open,
        }
    }

    fn lit(&self) -> bool {
        self.unlit_ticks == 0
    }
}

impl Challenge for Cracker {
    fn kind(&self) -> ChallengeKind {
        ChallengeKind::Cracker
    }

    fn handle_input(&mut self, input: ChallengeInput, _rng: &mut GameRng) {
        if input == ChallengeInput::Tap && self.lit() && self.slot.is_open() {
            self.slot.resolve(Outcome::Success);
        }
    }

    fn tick(&mut self, _time_left: u32, _rng: &mut GameRng) {
        if !self.slot.is_open() {
            return;
        }
        if !self.lit() {
            self.unlit_ticks -= 1;
            return;
        }
        if self.burn.fire() {
            self.fuse -= self.burn_rate;
            if self.fuse <= 0.0 {
                self.fuse = 0.0;
                self.slot.resolve(Outcome::Fail);
            }
        }
    }

    fn resolution(&mut self) -> &mut Resolution {
        &mut self.slot
    }

    fn lines(&self) -> Vec<String> {
        let fuse_cells = (self.fuse / 10.0).ceil() as usize;
        vec![
            "Tap to burst the cracker before it explodes!".into(),
            String::new(),
            if self.lit() {
                format!("🧨{}🔥", "~".repeat(fuse_cells))
            } else {
                "🧨 (not lit yet)".into()
            },
        ]
    }

    fn controls(&self) -> &'static str {
        "[Space] burst"
    }
}
