//! Tap a genuine message, never the scam forward.

use rand::seq::SliceRandom;

use super::{Challenge, ChallengeInput, ChallengeKind, Deferred, GameRng, Outcome, Resolution};

const SHOWN: usize = 4;
const REVEAL_MS: i64 = 500;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Notification {
    sender: &'static str,
    message: &'static str,
    real: bool,
}

const POOL: [Notification; 6] = [
    Notification { sender: "Mom", message: "Beta, khana kha liya?", real: true },
    Notification { sender: "Rahul", message: "Meeting at 5 PM", real: true },
    Notification { sender: "WhatsApp", message: "You won ₹50,000! Click here!", real: false },
    Notification { sender: "WhatsApp Team", message: "URGENT: Your account will be blocked", real: false },
    Notification { sender: "Priya", message: "Happy Birthday! 🎉", real: true },
    Notification { sender: "WhatsApp Official", message: "Free iPhone! Limited offer!", real: false },
];

pub struct WhatsApp {
    shown: Vec<Notification>,
    picked: Option<(usize, Deferred)>,
    slot: Resolution,
}

impl WhatsApp {
    pub fn new(rng: &mut GameRng) -> Self {
        let mut pool = POOL;
        pool.shuffle(rng);
        let shown = pool[..SHOWN].to_vec();
        Self {
            shown,
            picked: None,
            slot: Resolution::Open,
        }
    }
}

impl Challenge for WhatsApp {
    fn kind(&self) -> ChallengeKind {
        ChallengeKind::WhatsApp
    }

    fn handle_input(&mut self, input: ChallengeInput, _rng: &mut GameRng) {
        let ChallengeInput::Select(i) = input else {
            return;
        };
        if self.picked.is_some() {
            return;
        }
        let Some(n) = self.shown.get(i) else {
            return;
        };
        let outcome = if n.real { Outcome::Success } else { Outcome::Fail };
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
        let mut out = vec!["DON'T tap the FAKE notifications!".to_string(), String::new()];
        for (i, n) in self.shown.iter().enumerate() {
            let mark = match &self.picked {
                Some((p, _)) if *p == i => {
                    if n.real {
                        " ✅"
                    } else {
                        " ❌"
                    }
                }
                _ => "",
            };
            out.push(format!("[{}] {}: {}{}", i + 1, n.sender, n.message, mark));
        }
        out
    }

    fn controls(&self) -> &'static str {
        "[1-4] open a message"
    }
}
