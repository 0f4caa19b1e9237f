//! One play session. Dropping the challenge drops its timers.

use tracing::{debug, info};

use crate::challenges::{Challenge, ChallengeInput, ChallengeKind, Dispatcher, Outcome};
use crate::config::SessionConfig;
use crate::economy::{self, Reward};
use crate::error::EconomyError;
use crate::profile::BoosterId;
use crate::save::SaveSlot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Next tick picks a challenge.
    Loading,
    Active,
    /// Banner up; counts down `display_delay_ticks` before moving on.
    Resolving(Outcome),
    GameOver,
}

/// What changed, for the router's notices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    ChallengeStarted(ChallengeKind),
    Succeeded { reward: Reward, auto_win: bool },
    Failed { forced: bool, lives_left: u32 },
    LifeAdded { lives: u32 },
    GameOver { score: u32, new_high_score: bool },
    /// The profile change for this step could not be saved and was dropped.
    SaveFailed(String),
}

pub struct Session {
    config: SessionConfig,
    phase: Phase,
    challenge: Option<Box<dyn Challenge>>,
    timer: u32,
    step_ticks: u32,
    delay_left: u32,
}

impl Session {
    /// A session in `Loading`. The caller decides whether the profile's
    /// session fields were reset first.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            timer: config.countdown_start,
            config,
            phase: Phase::Loading,
            challenge: None,
            step_ticks: 0,
            delay_left: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn countdown_start(&self) -> u32 {
        self.config.countdown_start
    }

    pub fn challenge(&self) -> Option<&dyn Challenge> {
        self.challenge.as_deref()
    }

    /// Advance one logic tick.
    pub fn tick(&mut self, slot: &mut SaveSlot, dispatcher: &mut Dispatcher) -> Option<SessionEvent> {
        match self.phase {
            Phase::Loading => {
                let challenge = dispatcher.begin(slot.profile().level);
                let kind = challenge.kind();
                self.challenge = Some(challenge);
                self.timer = self.config.countdown_start;
                self.step_ticks = 0;
                self.phase = Phase::Active;
                debug!(?kind, "challenge started");
                Some(SessionEvent::ChallengeStarted(kind))
            }
            Phase::Active => {
                // challenge first: a signal raised this tick beats the countdown
                let timer = self.timer;
                let challenge = self.challenge.as_mut()?;
                challenge.tick(timer, dispatcher.rng_mut());
                if let Some(outcome) = challenge.resolution().take() {
                    return Some(self.resolve(outcome, false, slot));
                }

                self.step_ticks += 1;
                if self.step_ticks < self.config.countdown_step_ticks {
                    return None;
                }
                self.step_ticks = 0;
                self.timer = self.timer.saturating_sub(1);
                if self.timer == 0 {
                    return Some(self.resolve(Outcome::Fail, true, slot));
                }
                None
            }
            Phase::Resolving(outcome) => {
                self.delay_left = self.delay_left.saturating_sub(1);
                if self.delay_left > 0 {
                    return None;
                }
                if outcome == Outcome::Fail && slot.profile().lives == 0 {
                    self.phase = Phase::GameOver;
                    let score = slot.profile().score;
                    match slot.commit(|p| p.record_high_score()) {
                        Ok(new_high_score) => {
                            info!(score, new_high_score, "game over");
                            Some(SessionEvent::GameOver { score, new_high_score })
                        }
                        Err(e) => Some(SessionEvent::SaveFailed(e.to_string())),
                    }
                } else {
                    self.phase = Phase::Loading;
                    None
                }
            }
            Phase::GameOver => None,
        }
    }

    /// Run `n` ticks, collecting events.
    #[cfg(test)]
    pub fn tick_n(&mut self, n: u32, slot: &mut SaveSlot, dispatcher: &mut Dispatcher) -> Vec<SessionEvent> {
        (0..n).filter_map(|_| self.tick(slot, dispatcher)).collect()
    }

    /// Forward an input to the active challenge. Ignored outside `Active`.
    pub fn handle_input(
        &mut self,
        input: ChallengeInput,
        slot: &mut SaveSlot,
        dispatcher: &mut Dispatcher,
    ) -> Option<SessionEvent> {
        if self.phase != Phase::Active {
            return None;
        }
        let challenge = self.challenge.as_mut()?;
        challenge.handle_input(input, dispatcher.rng_mut());
        let outcome = challenge.resolution().take()?;
        Some(self.resolve(outcome, false, slot))
    }

    /// Spend a booster on the running challenge.
    pub fn use_booster(&mut self, booster: BoosterId, slot: &mut SaveSlot) -> Result<SessionEvent, EconomyError> {
        if self.phase != Phase::Active {
            return Err(EconomyError::NotInPlay);
        }
        match booster {
            BoosterId::ExtraLife => {
                let lives = slot.try_commit(economy::use_extra_life)?;
                info!(lives, "extra life used");
                Ok(SessionEvent::LifeAdded { lives })
            }
            BoosterId::AutoWin => {
                slot.try_commit(|p| economy::spend_booster(p, BoosterId::AutoWin))?;
                let event = match self.resolve(Outcome::Success, false, slot) {
                    SessionEvent::Succeeded { reward, .. } => SessionEvent::Succeeded { reward, auto_win: true },
                    other => other,
                };
                Ok(event)
            }
        }
    }

    /// Apply an outcome exactly once and leave `Active`.
    fn resolve(&mut self, outcome: Outcome, forced: bool, slot: &mut SaveSlot) -> SessionEvent {
        self.challenge = None;
        self.phase = Phase::Resolving(outcome);
        self.delay_left = self.config.display_delay_ticks.max(1);

        match outcome {
            Outcome::Success => {
                let reward = economy::success_reward(slot.profile().level, self.timer);
                if let Err(e) = slot.commit(|p| economy::apply_success(p, reward)) {
                    return SessionEvent::SaveFailed(e.to_string());
                }
                info!(points = reward.points, coins = reward.coins, timer = self.timer, "challenge cleared");
                SessionEvent::Succeeded { reward, auto_win: false }
            }
            Outcome::Fail => match slot.commit(economy::apply_failure) {
                Ok(lives_left) => {
                    info!(forced, lives_left, "challenge failed");
                    SessionEvent::Failed { forced, lives_left }
                }
                Err(e) => SessionEvent::SaveFailed(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::profile::PlayerProfile;
    use crate::save::{load, FullStorage, InMemoryStorage, Storage};

    fn slot_with(profile: PlayerProfile) -> SaveSlot {
        let mut slot = SaveSlot::open(Box::new(InMemoryStorage::new()));
        slot.commit(|p| *p = profile).unwrap();
        slot
    }

    fn fresh_slot() -> SaveSlot {
        slot_with(PlayerProfile::new())
    }

    fn config() -> SessionConfig {
        SessionConfig::default()
    }

    /// Session already `Active` on a scripted challenge.
    fn started(kind: ChallengeKind, slot: &mut SaveSlot) -> (Session, Dispatcher) {
        let mut d = Dispatcher::scripted(vec![kind]);
        let mut s = Session::new(config());
        assert_eq!(s.tick(slot, &mut d), Some(SessionEvent::ChallengeStarted(kind)));
        assert_eq!(s.phase(), Phase::Active);
        (s, d)
    }

    #[test]
    fn success_scenario_level_one_timer_sixty() {
        let mut slot = fresh_slot();
        // Proposal does nothing on its own for the first 19 ticks
        let (mut s, mut d) = started(ChallengeKind::Proposal, &mut slot);
        s.timer = 60;
        let ev = s.handle_input(ChallengeInput::Tap, &mut slot, &mut d);
        assert_eq!(
            ev,
            Some(SessionEvent::Succeeded {
                reward: Reward { points: 16, coins: 3 },
                auto_win: false
            })
        );
        let p = slot.profile();
        assert_eq!((p.score, p.coins, p.level, p.lives), (16, 103, 2, 3));
        assert_eq!(s.phase(), Phase::Resolving(Outcome::Success));
        assert!(s.challenge().is_none());
    }

    #[test]
    fn forced_fail_costs_exactly_one_life() {
        let mut slot = fresh_slot();
        // Chai never resolves until tilted
        let (mut s, mut d) = started(ChallengeKind::Chai, &mut slot);
        let events = s.tick_n(99, &mut slot, &mut d);
        assert!(events.is_empty());
        assert_eq!(s.timer(), 1);
        assert_eq!(
            s.tick(&mut slot, &mut d),
            Some(SessionEvent::Failed { forced: true, lives_left: 2 })
        );
        // banner, then nothing else happens to lives
        let events = s.tick_n(39, &mut slot, &mut d);
        assert!(events.is_empty());
        assert_eq!(slot.profile().lives, 2);
        assert_eq!(s.phase(), Phase::Resolving(Outcome::Fail));
        s.tick(&mut slot, &mut d);
        assert_eq!(s.phase(), Phase::Loading);
    }

    #[test]
    fn signalled_fail_costs_exactly_one_life() {
        let mut slot = fresh_slot();
        let (mut s, mut d) = started(ChallengeKind::Mosquito, &mut slot);
        // mosquito starts centred, which counts as the wrong side
        let ev = s.handle_input(ChallengeInput::Left, &mut slot, &mut d);
        assert_eq!(ev, Some(SessionEvent::Failed { forced: false, lives_left: 2 }));
        // further input after resolution goes nowhere
        assert_eq!(s.handle_input(ChallengeInput::Left, &mut slot, &mut d), None);
        s.tick_n(200, &mut slot, &mut d);
        assert_eq!(slot.profile().lives, 2);
    }

    #[test]
    fn challenge_signal_on_last_tick_beats_countdown() {
        let mut slot = fresh_slot();
        // Laddoo at level 20 falls 12/tick: ground in 6 ticks
        slot.commit(|p| p.level = 20).unwrap();
        let (mut s, mut d) = started(ChallengeKind::Laddoo, &mut slot);
        s.timer = 6;
        let events = s.tick_n(6, &mut slot, &mut d);
        assert_eq!(events, [SessionEvent::Failed { forced: false, lives_left: 2 }]);
    }

    #[test]
    fn last_life_leads_to_game_over_with_high_score() {
        let mut p = PlayerProfile::new();
        p.lives = 1;
        p.score = 250;
        p.high_score = 200;
        let mut slot = slot_with(p);
        let (mut s, mut d) = started(ChallengeKind::Mosquito, &mut slot);
        s.handle_input(ChallengeInput::Left, &mut slot, &mut d);
        assert_eq!(slot.profile().lives, 0);
        let events = s.tick_n(40, &mut slot, &mut d);
        assert_eq!(events, [SessionEvent::GameOver { score: 250, new_high_score: true }]);
        assert_eq!(s.phase(), Phase::GameOver);
        assert_eq!(slot.profile().high_score, 250);
        // terminal: no more challenges
        assert!(s.tick_n(100, &mut slot, &mut d).is_empty());
    }

    #[test]
    fn game_over_below_high_score_keeps_it() {
        let mut p = PlayerProfile::new();
        p.lives = 1;
        p.score = 10;
        p.high_score = 500;
        let mut slot = slot_with(p);
        let (mut s, mut d) = started(ChallengeKind::Mosquito, &mut slot);
        s.handle_input(ChallengeInput::Left, &mut slot, &mut d);
        let events = s.tick_n(40, &mut slot, &mut d);
        assert_eq!(events, [SessionEvent::GameOver { score: 10, new_high_score: false }]);
        assert_eq!(slot.profile().high_score, 500);
    }

    #[test]
    fn next_challenge_after_success_uses_new_level() {
        let mut slot = fresh_slot();
        let mut d = Dispatcher::scripted(vec![ChallengeKind::Proposal, ChallengeKind::Chappal]);
        let mut s = Session::new(config());
        s.tick(&mut slot, &mut d);
        s.handle_input(ChallengeInput::Tap, &mut slot, &mut d);
        let events = s.tick_n(41, &mut slot, &mut d);
        assert_eq!(events, [SessionEvent::ChallengeStarted(ChallengeKind::Chappal)]);
        assert_eq!(s.timer(), 100);
        assert_eq!(slot.profile().level, 2);
    }

    #[test]
    fn every_change_is_persisted() {
        let mut slot = fresh_slot();
        let (mut s, mut d) = started(ChallengeKind::Proposal, &mut slot);
        s.handle_input(ChallengeInput::Tap, &mut slot, &mut d);
        let json = slot.storage().read().unwrap().unwrap();
        let mut copy = InMemoryStorage::with_value(&json);
        assert_eq!(load(&mut copy).as_ref(), Some(slot.profile()));
        assert_eq!(slot.profile().score, 22);
    }

    #[test]
    fn auto_win_resolves_as_success() {
        let mut p = PlayerProfile::new();
        p.boosters.insert(BoosterId::AutoWin, 1);
        let mut slot = slot_with(p);
        let (mut s, _d) = started(ChallengeKind::Chai, &mut slot);
        let ev = s.use_booster(BoosterId::AutoWin, &mut slot).unwrap();
        assert!(matches!(ev, SessionEvent::Succeeded { auto_win: true, .. }));
        assert_eq!(slot.profile().booster_count(BoosterId::AutoWin), 0);
        assert_eq!(slot.profile().level, 2);
        assert_eq!(
            s.use_booster(BoosterId::AutoWin, &mut slot),
            Err(EconomyError::NotInPlay)
        );
    }

    #[test]
    fn auto_win_without_stock_changes_nothing() {
        let mut slot = fresh_slot();
        let (mut s, _d) = started(ChallengeKind::Chai, &mut slot);
        assert_eq!(
            s.use_booster(BoosterId::AutoWin, &mut slot),
            Err(EconomyError::NoBoosterOwned(BoosterId::AutoWin))
        );
        assert_eq!(s.phase(), Phase::Active);
        assert_eq!(slot.profile(), &PlayerProfile::new());
    }

    #[test]
    fn extra_life_in_play() {
        let mut p = PlayerProfile::new();
        p.boosters.insert(BoosterId::ExtraLife, 1);
        let mut slot = slot_with(p);
        let (mut s, _d) = started(ChallengeKind::Chai, &mut slot);
        assert_eq!(
            s.use_booster(BoosterId::ExtraLife, &mut slot),
            Ok(SessionEvent::LifeAdded { lives: 4 })
        );
        assert_eq!(s.phase(), Phase::Active);
        assert_eq!(
            s.use_booster(BoosterId::ExtraLife, &mut slot),
            Err(EconomyError::NoBoosterOwned(BoosterId::ExtraLife))
        );
    }

    #[test]
    fn boosters_refused_outside_play() {
        let mut slot = fresh_slot();
        let mut s = Session::new(config());
        assert_eq!(
            s.use_booster(BoosterId::ExtraLife, &mut slot),
            Err(EconomyError::NotInPlay)
        );
    }

    /// Index of a note that is not the real one.
    fn fake_note(s: &Session) -> usize {
        let lines = s.challenge().unwrap().lines();
        lines[2..].iter().position(|l| !l.contains("SECURE")).unwrap()
    }

    #[test]
    fn countdown_beats_a_pending_reveal_and_the_reveal_never_lands() {
        let mut slot = fresh_slot();
        let (mut s, mut d) = started(ChallengeKind::Money, &mut slot);
        let pick = fake_note(&s);
        // the reveal needs 10 ticks, the countdown only 3
        s.timer = 3;
        assert_eq!(s.handle_input(ChallengeInput::Select(pick), &mut slot, &mut d), None);
        let events = s.tick_n(3, &mut slot, &mut d);
        assert_eq!(events, [SessionEvent::Failed { forced: true, lives_left: 2 }]);

        let events = s.tick_n(41, &mut slot, &mut d);
        assert_eq!(events, [SessionEvent::ChallengeStarted(ChallengeKind::Money)]);
        assert!(s.challenge.as_mut().unwrap().resolution().is_open());
        assert!(s.tick_n(20, &mut slot, &mut d).is_empty());
        assert_eq!(slot.profile().lives, 2);
    }

    #[test]
    fn pending_whatsapp_reveal_is_dropped_with_its_challenge() {
        let mut slot = fresh_slot();
        let (mut s, mut d) = started(ChallengeKind::WhatsApp, &mut slot);
        s.timer = 2;
        s.handle_input(ChallengeInput::Select(0), &mut slot, &mut d);
        let events = s.tick_n(2, &mut slot, &mut d);
        assert_eq!(events, [SessionEvent::Failed { forced: true, lives_left: 2 }]);
        let events = s.tick_n(41, &mut slot, &mut d);
        assert_eq!(events, [SessionEvent::ChallengeStarted(ChallengeKind::WhatsApp)]);
        assert!(s.challenge.as_mut().unwrap().resolution().is_open());
        assert!(s.tick_n(20, &mut slot, &mut d).is_empty());
        assert_eq!(slot.profile().lives, 2);
    }

    #[test]
    fn unsaved_failure_costs_no_life() {
        let mut slot = SaveSlot::open(Box::new(FullStorage));
        let (mut s, mut d) = started(ChallengeKind::Mosquito, &mut slot);
        let ev = s.handle_input(ChallengeInput::Left, &mut slot, &mut d);
        assert!(matches!(ev, Some(SessionEvent::SaveFailed(_))));
        assert_eq!(slot.profile(), &PlayerProfile::new());
        // the session still moves on to the next challenge
        let events = s.tick_n(41, &mut slot, &mut d);
        assert_eq!(events, [SessionEvent::ChallengeStarted(ChallengeKind::Mosquito)]);
    }

    proptest! {
        #[test]
        fn high_score_never_drops(scores in prop::collection::vec(0u32..1000, 1..6)) {
            let mut slot = fresh_slot();
            let mut last_high = 0;
            for score in scores {
                slot.commit(|p| { p.reset_session(); p.score = score; p.lives = 1; }).unwrap();
                let (mut s, mut d) = started(ChallengeKind::Mosquito, &mut slot);
                s.handle_input(ChallengeInput::Left, &mut slot, &mut d);
                s.tick_n(40, &mut slot, &mut d);
                prop_assert_eq!(s.phase(), Phase::GameOver);
                prop_assert!(slot.profile().high_score >= last_high);
                prop_assert!(slot.profile().high_score >= score);
                last_high = slot.profile().high_score;
            }
        }

        #[test]
        fn lives_stay_in_range(inputs in prop::collection::vec(0u8..4, 0..60)) {
            let mut slot = fresh_slot();
            let mut d = Dispatcher::seeded(5);
            let mut s = Session::new(config());
            for i in inputs {
                let input = match i {
                    0 => ChallengeInput::Tap,
                    1 => ChallengeInput::Left,
                    2 => ChallengeInput::Right,
                    _ => ChallengeInput::Select(0),
                };
                s.handle_input(input, &mut slot, &mut d);
                s.tick_n(7, &mut slot, &mut d);
                prop_assert!(slot.profile().lives <= 5);
            }
        }
    }
}
