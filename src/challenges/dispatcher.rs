use rand::{Rng, SeedableRng};
use tracing::debug;

use super::{Challenge, ChallengeKind, GameRng};

/// Picks the next challenge uniformly from [`ChallengeKind::ALL`]. Repeats are allowed.
pub struct Dispatcher {
    rng: GameRng,
    script: Vec<ChallengeKind>,
    cursor: usize,
}

impl Dispatcher {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: GameRng::seed_from_u64(seed),
            script: Vec::new(),
            cursor: 0,
        }
    }

    /// Always hand out `kinds` in order, cycling. Challenge-internal
    /// randomness still comes from a fixed seed.
    #[cfg(test)]
    pub fn scripted(kinds: Vec<ChallengeKind>) -> Self {
        Self {
            script: kinds,
            ..Self::seeded(0)
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = GameRng::seed_from_u64(seed);
        self.cursor = 0;
    }

    pub fn pick(&mut self) -> ChallengeKind {
        if !self.script.is_empty() {
            let kind = self.script[self.cursor % self.script.len()];
            self.cursor += 1;
            return kind;
        }
        ChallengeKind::ALL[self.rng.gen_range(0..ChallengeKind::ALL.len())]
    }

    /// Pick and create the next challenge.
    pub fn begin(&mut self, level: u32) -> Box<dyn Challenge> {
        let kind = self.pick();
        debug!(?kind, level, "challenge picked");
        kind.create(level, &mut self.rng)
    }

    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }
}
