//! Keep the chai glass level. The first tilt starts the clock and the drift.

use rand::Rng;

use super::{track, Challenge, ChallengeInput, ChallengeKind, Every, GameRng, Outcome, Resolution};
use crate::config::TICKS_PER_SEC;

const SPILL: f32 = 50.0;
const NUDGE: f32 = 15.0;
const DRIFT: f32 = 10.0;
/// Balanced time needed, in seconds. Fits inside the session countdown.
const HOLD_SECS: u32 = 3;

pub struct Chai {
    balance: f32,
    balancing: bool,
    held_ticks: u32,
    drift: Every,
    slot: Resolution,
}

impl Chai {
    pub fn new(level: u32) -> Self {
        Self {
            balance: 0.0,
            balancing: false,
            held_ticks: 0,
            drift: Every::ms(500 - 50 * i64::from(level)),
            slot: Resolution::Open,
        }
    }

    fn shift(&mut self, delta: f32) {
        self.balance += delta;
        if self.balance.abs() > SPILL {
            self.slot.resolve(Outcome::Fail);
        } else {
            self.balance = self.balance.clamp(-100.0, 100.0);
        }
    }
}

impl Challenge for Chai {
    fn kind(&self) -> ChallengeKind {
        ChallengeKind::Chai
    }

    fn handle_input(&mut self, input: ChallengeInput, _rng: &mut GameRng) {
        if !self.slot.is_open() {
            return;
        }
        let delta = match input {
            ChallengeInput::Left => -NUDGE,
            ChallengeInput::Right => NUDGE,
            _ => return,
        };
        self.balancing = true;
        self.shift(delta);
    }

    fn tick(&mut self, _time_left: u32, rng: &mut GameRng) {
        if !self.balancing || !self.slot.is_open() {
            return;
        }
        self.held_ticks += 1;
        if self.drift.fire() {
            self.shift(rng.gen_range(-DRIFT..DRIFT));
            if !self.slot.is_open() {
                return;
            }
        }
        if self.held_ticks >= HOLD_SECS * TICKS_PER_SEC {
            self.slot.resolve(Outcome::Success);
        }
    }

    fn resolution(&mut self) -> &mut Resolution {
        &mut self.slot
    }

    fn lines(&self) -> Vec<String> {
        let held = self.held_ticks as f32 / TICKS_PER_SEC as f32;
        vec![
            format!("Balance the chai glass for {HOLD_SECS} seconds!"),
            format!("Balanced: {held:.1}s"),
            String::new(),
            // ±50 spill zone mapped onto 0..100
            track(21, &[(0.0, '['), (100.0, ']'), (50.0 + self.balance, '☕')]),
            if self.balancing { String::new() } else { "Tilt to start".into() },
        ]
    }

    fn controls(&self) -> &'static str {
        "[←/h] tilt left  [→/l] tilt right"
    }
}
