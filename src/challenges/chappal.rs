//! Pick the chappal that matches the background colour.

use rand::Rng;

use super::{Challenge, ChallengeInput, ChallengeKind, GameRng, Outcome, Resolution};

pub const COLORS: [&str; 6] = ["red", "blue", "green", "yellow", "purple", "orange"];

pub struct Chappal {
    target: usize,
    picked: Option<usize>,
    slot: Resolution,
}

impl Chappal {
    pub fn new(rng: &mut GameRng) -> Self {
        Self {
            target: rng.gen_range(0..COLORS.len()),
            picked: None,
            slot: Resolution::Open,
        }
    }
}

impl Challenge for Chappal {
    fn kind(&self) -> ChallengeKind {
        ChallengeKind::Chappal
    }

    fn handle_input(&mut self, input: ChallengeInput, _rng: &mut GameRng) {
        let ChallengeInput::Select(i) = input else {
            return;
        };
        if self.picked.is_some() || i >= COLORS.len() {
            return;
        }
        self.picked = Some(i);
        let outcome = if i == self.target { Outcome::Success } else { Outcome::Fail };
        self.slot.resolve(outcome);
    }

    fn tick(&mut self, _time_left: u32, _rng: &mut GameRng) {}

    fn resolution(&mut self) -> &mut Resolution {
        &mut self.slot
    }

    fn lines(&self) -> Vec<String> {
        let mut out = vec![
            "Match the chappal colour with the background!".to_string(),
            format!("Target: {}", COLORS[self.target].to_uppercase()),
            String::new(),
        ];
        for (i, color) in COLORS.iter().enumerate() {
            let mark = match self.picked {
                Some(p) if p == i && p == self.target => " ✅",
                Some(p) if p == i => " ❌",
                _ => "",
            };
            out.push(format!("[{}] 👡 {}{}", i + 1, color, mark));
        }
        out
    }

    fn controls(&self) -> &'static str {
        "[1-6] pick"
    }
}
