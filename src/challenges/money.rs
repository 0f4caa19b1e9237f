//! Find the one genuine ₹500 note among fakes.

use rand::Rng;

use super::{Challenge, ChallengeInput, ChallengeKind, Deferred, GameRng, Outcome, Resolution};

const NOTES: usize = 6;
const REVEAL_MS: i64 = 500;

pub struct Money {
    real: usize,
    picked: Option<(usize, Deferred)>,
    slot: Resolution,
}

impl Money {
    pub fn new(rng: &mut GameRng) -> Self {
        Self {
            real: rng.gen_range(0..NOTES),
            picked: None,
            slot: Resolution::Open,
        }
    }
}

impl Challenge for Money {
    fn kind(&self) -> ChallengeKind {
        ChallengeKind::Money
    }

    fn handle_input(&mut self, input: ChallengeInput, _rng: &mut GameRng) {
        let ChallengeInput::Select(i) = input else {
            return;
        };
        if self.picked.is_some() || i >= NOTES {
            return;
        }
        let outcome = if i == self.real { Outcome::Success } else { Outcome::Fail };
        self.picked = Some((i, Deferred::ms(outcome, REVEAL_MS)));
    }

    fn tick(&mut self, _time_left: u32, _rng: &mut GameRng) {
        if let Some((_, reveal)) = self.picked.as_mut() {
            if let Some(outcome) = reveal.poll() {
                if self.slot.is_open() {
                    self.slot.resolve(outcome);
                }
            }
        }
    }

    fn resolution(&mut self) -> &mut Resolution {
        &mut self.slot
    }

    fn lines(&self) -> Vec<String> {
        let mut out = vec!["Find the REAL ₹500 note!".to_string(), String::new()];
        for i in 0..NOTES {
            let security = if i == self.real { "🔒 SECURE" } else { "✗ plain" };
            let mark = match &self.picked {
                Some((p, d)) if *p == i => match d.outcome() {
                    Outcome::Success => " ✅",
                    Outcome::Fail => " ❌",
                },
                _ => "",
            };
            out.push(format!("[{}] ₹500  {}{}", i + 1, security, mark));
        }
        out
    }

    fn controls(&self) -> &'static str {
        "[1-6] pick a note"
    }
}
