//! Tap every green light and nothing else.

use rand::Rng;

use super::{Challenge, ChallengeInput, ChallengeKind, Deferred, GameRng, Outcome, Resolution};

const LIGHTS: usize = 6;
const WRONG_MS: i64 = 300;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Light {
    Green,
    Red,
    Yellow,
}

pub struct Traffic {
    lights: [Light; LIGHTS],
    picked: [bool; LIGHTS],
    wrong: Option<Deferred>,
    slot: Resolution,
}

impl Traffic {
    pub fn new(rng: &mut GameRng) -> Self {
        let mut lights = [Light::Red; LIGHTS];
        for light in lights.iter_mut() {
            *light = if rng.gen_bool(0.5) {
                Light::Green
            } else if rng.gen_bool(0.5) {
                Light::Red
            } else {
                Light::Yellow
            };
        }
        if !lights.contains(&Light::Green) {
            lights[rng.gen_range(0..LIGHTS)] = Light::Green;
        }
        Self {
            lights,
            picked: [false; LIGHTS],
            wrong: None,
            slot: Resolution::Open,
        }
    }

    fn all_greens_picked(&self) -> bool {
        self.lights
            .iter()
            .zip(self.picked)
            .all(|(l, p)| *l != Light::Green || p)
    }
}

impl Challenge for Traffic {
    fn kind(&self) -> ChallengeKind {
        ChallengeKind::Traffic
    }

    fn handle_input(&mut self, input: ChallengeInput, _rng: &mut GameRng) {
        let ChallengeInput::Select(i) = input else {
            return;
        };
        if i >= LIGHTS || self.picked[i] || self.wrong.is_some() || !self.slot.is_open() {
            return;
        }
        self.picked[i] = true;
        if self.lights[i] != Light::Green {
            self.wrong = Some(Deferred::ms(Outcome::Fail, WRONG_MS));
        } else if self.all_greens_picked() {
            self.slot.resolve(Outcome::Success);
        }
    }

    fn tick(&mut self, _time_left: u32, _rng: &mut GameRng) {
        if let Some(outcome) = self.wrong.as_mut().and_then(Deferred::poll) {
            if self.slot.is_open() {
                self.slot.resolve(outcome);
            }
        }
    }

    fn resolution(&mut self) -> &mut Resolution {
        &mut self.slot
    }

    fn lines(&self) -> Vec<String> {
        let mut out = vec!["Tap ONLY the GREEN traffic lights!".to_string(), String::new()];
        for row in 0..LIGHTS / 3 {
            let cells: Vec<String> = (row * 3..row * 3 + 3)
                .map(|i| {
                    let icon = match self.lights[i] {
                        Light::Green => "🟢",
                        Light::Red => "🔴",
                        Light::Yellow => "🟡",
                    };
                    let tick = if self.picked[i] { "✓" } else { " " };
                    format!("[{}]{}{}", i + 1, icon, tick)
                })
                .collect();
            out.push(cells.join("  "));
        }
        out
    }

    fn controls(&self) -> &'static str {
        "[1-6] tap a light"
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{rng, run};
    use super::*;

    fn with_lights(lights: [Light; LIGHTS]) -> Traffic {
        Traffic {
            lights,
            picked: [false; LIGHTS],
            wrong: None,
            slot: Resolution::Open,
        }
    }

    use super::Light::{Green as G, Red as R, Yellow as Y};

    #[test]
    fn always_at_least_one_green() {
        for seed in 0..200 {
            let mut r = rng(seed);
            assert!(Traffic::new(&mut r).lights.contains(&Light::Green));
        }
    }

    #[test]
    fn all_greens_succeeds() {
        let mut r = rng(0);
        let mut c = with_lights([G, R, G, Y, R, R]);
        c.handle_input(ChallengeInput::Select(0), &mut r);
        assert!(c.slot.is_open());
        c.handle_input(ChallengeInput::Select(2), &mut r);
        assert_eq!(c.slot.peek(), Some(Outcome::Success));
    }

    #[test]
    fn wrong_light_fails_after_delay() {
        let mut r = rng(0);
        let mut c = with_lights([G, R, G, Y, R, R]);
        c.handle_input(ChallengeInput::Select(3), &mut r);
        assert!(c.slot.is_open());
        // further picks are locked out
        c.handle_input(ChallengeInput::Select(0), &mut r);
        c.handle_input(ChallengeInput::Select(2), &mut r);
        assert!(c.slot.is_open());
        assert_eq!(run(&mut c, &mut r, 6), Some(Outcome::Fail));
    }

    #[test]
    fn repeat_pick_ignored() {
        let mut r = rng(0);
        let mut c = with_lights([G, G, R, R, R, R]);
        c.handle_input(ChallengeInput::Select(0), &mut r);
        c.handle_input(ChallengeInput::Select(0), &mut r);
        assert!(c.slot.is_open());
    }
}
