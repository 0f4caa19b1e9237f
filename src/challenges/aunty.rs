//! Keep out of the aunty's line of sight until the clock runs out.

use rand::Rng;

use super::{track, Challenge, ChallengeInput, ChallengeKind, Deferred, Every, GameRng, Outcome, Resolution};
use crate::config::TICKS_PER_SEC;

const STEP: f32 = 15.0;
const SIGHT: f32 = 20.0;
const CAUGHT_MS: i64 = 500;
/// Survival time needed, in seconds. Fits inside the session countdown.
const SURVIVE_SECS: u32 = 4;

pub struct Aunty {
    player: f32,
    gaze: f32,
    look: Every,
    survived_ticks: u32,
    caught: Option<Deferred>,
    slot: Resolution,
}

impl Aunty {
    pub fn new(level: u32) -> Self {
        Self {
            player: 50.0,
            gaze: 50.0,
            look: Every::ms(1000 - 100 * i64::from(level)),
            survived_ticks: 0,
            caught: None,
            slot: Resolution::Open,
        }
    }
}

impl Challenge for Aunty {
    fn kind(&self) -> ChallengeKind {
        ChallengeKind::Aunty
    }

    fn handle_input(&mut self, input: ChallengeInput, _rng: &mut GameRng) {
        if self.caught.is_some() || !self.slot.is_open() {
            return;
        }
        let delta = match input {
            ChallengeInput::Left => -STEP,
            ChallengeInput::Right => STEP,
            _ => return,
        };
        self.player = (self.player + delta).clamp(10.0, 90.0);
    }

    fn tick(&mut self, _time_left: u32, rng: &mut GameRng) {
        if !self.slot.is_open() {
            return;
        }
        if let Some(caught) = self.caught.as_mut() {
            if let Some(outcome) = caught.poll() {
                self.slot.resolve(outcome);
            }
            return;
        }
        if self.look.fire() {
            self.gaze = rng.gen_range(10.0..90.0);
            if (self.gaze - self.player).abs() < SIGHT {
                self.caught = Some(Deferred::ms(Outcome::Fail, CAUGHT_MS));
                return;
            }
        }
        self.survived_ticks += 1;
        if self.survived_ticks >= SURVIVE_SECS * TICKS_PER_SEC {
            self.slot.resolve(Outcome::Success);
        }
    }

    fn resolution(&mut self) -> &mut Resolution {
        &mut self.slot
    }

    fn lines(&self) -> Vec<String> {
        let survived = self.survived_ticks as f32 / TICKS_PER_SEC as f32;
        let aunty = if self.caught.is_some() { '😠' } else { '👵' };
        vec![
            format!("Dodge aunty's stare for {SURVIVE_SECS} seconds!"),
            format!("Survived: {survived:.1}s"),
            String::new(),
            track(21, &[(self.gaze, aunty)]),
            track(21, &[(self.player, '🏃')]),
        ]
    }

    fn controls(&self) -> &'static str {
        "[←/h] step left  [→/l] step right"
    }
}
