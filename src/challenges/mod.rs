//! Mini-game contract and the ten challenge variants.

mod aunty;
mod chai;
mod chappal;
mod cracker;
mod dispatcher;
mod laddoo;
mod money;
mod mosquito;
mod proposal;
mod resolution;
mod traffic;
mod whatsapp;

pub use dispatcher::Dispatcher;
pub use resolution::Resolution;

use rand_chacha::ChaCha8Rng;

use crate::config::TICK_MS;

/// Seedable random source shared by the dispatcher and every challenge.
pub type GameRng = ChaCha8Rng;

/// How a challenge ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Fail,
}

/// Player input, already translated from keys or taps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChallengeInput {
    Tap,
    /// Pick the n-th item (0-based).
    Select(usize),
    Left,
    Right,
}

pub trait Challenge {
    fn kind(&self) -> ChallengeKind;

    fn handle_input(&mut self, input: ChallengeInput, rng: &mut GameRng);

    /// Advance one logic tick. `time_left` is the session countdown, for display only.
    fn tick(&mut self, time_left: u32, rng: &mut GameRng);

    fn resolution(&mut self) -> &mut Resolution;

    /// Text body for the renderer.
    fn lines(&self) -> Vec<String>;

    /// One-line control hint.
    fn controls(&self) -> &'static str;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChallengeKind {
    Laddoo,
    Chappal,
    Mosquito,
    Chai,
    Money,
    WhatsApp,
    Cracker,
    Traffic,
    Aunty,
    Proposal,
}

impl ChallengeKind {
    pub const ALL: [ChallengeKind; 10] = [
        ChallengeKind::Laddoo,
        ChallengeKind::Chappal,
        ChallengeKind::Mosquito,
        ChallengeKind::Chai,
        ChallengeKind::Money,
        ChallengeKind::WhatsApp,
        ChallengeKind::Cracker,
        ChallengeKind::Traffic,
        ChallengeKind::Aunty,
        ChallengeKind::Proposal,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ChallengeKind::Laddoo => "Catch the Laddoo",
            ChallengeKind::Chappal => "Chappal Match",
            ChallengeKind::Mosquito => "Slap the Mosquito",
            ChallengeKind::Chai => "Balance the Chai",
            ChallengeKind::Money => "Spot the Real Note",
            ChallengeKind::WhatsApp => "WhatsApp Forward",
            ChallengeKind::Cracker => "Diwali Cracker",
            ChallengeKind::Traffic => "Green Lights Only",
            ChallengeKind::Aunty => "Dodge the Aunty",
            ChallengeKind::Proposal => "Stop the Proposal",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ChallengeKind::Laddoo => "🍬",
            ChallengeKind::Chappal => "👡",
            ChallengeKind::Mosquito => "🦟",
            ChallengeKind::Chai => "☕",
            ChallengeKind::Money => "💸",
            ChallengeKind::WhatsApp => "📱",
            ChallengeKind::Cracker => "🎇",
            ChallengeKind::Traffic => "🚦",
            ChallengeKind::Aunty => "👵",
            ChallengeKind::Proposal => "💍",
        }
    }

    /// Start a fresh instance at `level`.
    pub fn create(self, level: u32, rng: &mut GameRng) -> Box<dyn Challenge> {
        match self {
            ChallengeKind::Laddoo => Box::new(laddoo::Laddoo::new(level)),
            ChallengeKind::Chappal => Box::new(chappal::Chappal::new(rng)),
            ChallengeKind::Mosquito => Box::new(mosquito::Mosquito::new(level)),
            ChallengeKind::Chai => Box::new(chai::Chai::new(level)),
            ChallengeKind::Money => Box::new(money::Money::new(rng)),
            ChallengeKind::WhatsApp => Box::new(whatsapp::WhatsApp::new(rng)),
            ChallengeKind::Cracker => Box::new(cracker::Cracker::new(level)),
            ChallengeKind::Traffic => Box::new(traffic::Traffic::new(rng)),
            ChallengeKind::Aunty => Box::new(aunty::Aunty::new(level)),
            ChallengeKind::Proposal => Box::new(proposal::Proposal::new(level)),
        }
    }
}

/// Ticks for a millisecond interval. Level-scaled intervals can shrink to
/// zero or below; those still fire once per tick.
pub fn ticks_for_ms(ms: i64) -> u32 {
    (ms / i64::from(TICK_MS)).max(1) as u32
}

/// Repeating timer.
#[derive(Clone, Debug)]
pub struct Every {
    period: u32,
    elapsed: u32,
}

impl Every {
    pub fn ms(ms: i64) -> Self {
        Self {
            period: ticks_for_ms(ms),
            elapsed: 0,
        }
    }

    /// Count one tick; true on every `period`-th call.
    pub fn fire(&mut self) -> bool {
        self.elapsed += 1;
        if self.elapsed >= self.period {
            self.elapsed = 0;
            true
        } else {
            false
        }
    }

    #[cfg(test)]
    pub fn period(&self) -> u32 {
        self.period
    }
}

/// An outcome already decided but shown for a moment before it lands.
#[derive(Clone, Debug)]
pub struct Deferred {
    outcome: Outcome,
    remaining: u32,
}

impl Deferred {
    pub fn ms(outcome: Outcome, ms: i64) -> Self {
        Self {
            outcome,
            remaining: ticks_for_ms(ms),
        }
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Count one tick; yields the outcome when the delay runs out.
    pub fn poll(&mut self) -> Option<Outcome> {
        self.remaining = self.remaining.saturating_sub(1);
        (self.remaining == 0).then_some(self.outcome)
    }
}

/// Horizontal position bar, `pos` in 0..=100.
pub(crate) fn track(width: usize, marks: &[(f32, char)]) -> String {
    let mut cells = vec!['·'; width];
    for &(pos, ch) in marks {
        let idx = ((pos.clamp(0.0, 100.0) / 100.0) * (width - 1) as f32).round() as usize;
        cells[idx] = ch;
    }
    cells.into_iter().collect()
}
