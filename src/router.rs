//! Screen router: the top-level app state the web shell drives.

use tracing::{debug, info, warn};

use crate::ads::{AdPlacement, AdProvider};
use crate::catalog::{self, ItemId, ALL_ITEMS};
use crate::challenges::{ChallengeInput, Dispatcher};
use crate::config::GameConfig;
use crate::economy::{self, RealMoneyGrant, SkinChange};
use crate::error::{EconomyError, GatewayError};
use crate::gateway::{Checkout, PaymentGateway};
use crate::profile::{BoosterId, PlayerProfile, SkinId};
use crate::save::SaveSlot;
use crate::session::{Phase, Session, SessionEvent};

const MAX_NOTICES: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Home,
    Game,
    Fail,
    Shop,
    Skins,
    Leaderboard,
}

/// One line in the notice log.
#[derive(Clone, Debug)]
pub struct Notice {
    pub text: String,
    pub is_important: bool,
}

pub struct App {
    screen: Screen,
    slot: SaveSlot,
    config: GameConfig,
    session: Option<Session>,
    dispatcher: Dispatcher,
    checkout: Checkout,
    gateway: Box<dyn PaymentGateway>,
    ads: Box<dyn AdProvider>,
    /// A continue ad was requested from the Fail screen and is still wanted.
    awaiting_continue: bool,
    notices: Vec<Notice>,
}

impl App {
    pub fn new(
        slot: SaveSlot,
        config: GameConfig,
        dispatcher: Dispatcher,
        gateway: Box<dyn PaymentGateway>,
        ads: Box<dyn AdProvider>,
    ) -> Self {
        Self {
            screen: Screen::Home,
            slot,
            config,
            session: None,
            dispatcher,
            checkout: Checkout::new(),
            gateway,
            ads,
            awaiting_continue: false,
            notices: Vec::new(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn profile(&self) -> &PlayerProfile {
        self.slot.profile()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn payments_enabled(&self) -> bool {
        self.config.payments_enabled()
    }

    pub fn awaiting_continue(&self) -> bool {
        self.awaiting_continue
    }

    pub fn add_notice(&mut self, text: impl Into<String>, is_important: bool) {
        self.notices.push(Notice {
            text: text.into(),
            is_important,
        });
        if self.notices.len() > MAX_NOTICES {
            self.notices.remove(0);
        }
    }

    fn go(&mut self, screen: Screen) {
        debug!(from = ?self.screen, to = ?screen, "screen change");
        self.screen = screen;
    }

    /// Back to Home. Drops the session and anything still pending for it.
    fn go_home(&mut self) {
        self.session = None;
        self.awaiting_continue = false;
        self.go(Screen::Home);
    }

    /// New session from scratch: Play on Home or Play Again on Fail.
    fn start_session(&mut self) {
        // A fixed seed replays the same run every time.
        if let Some(seed) = self.config.seed {
            self.dispatcher.reseed(seed);
        }
        if let Err(e) = self.slot.commit(PlayerProfile::reset_session) {
            self.add_notice(format!("💾 Could not start: {e}"), true);
            return;
        }
        self.session = Some(Session::new(self.config.session.clone()));
        self.awaiting_continue = false;
        self.go(Screen::Game);
    }

    pub fn handle_key(&mut self, key: char) {
        match self.screen {
            Screen::Home => match key {
                'p' => self.start_session(),
                's' => self.go(Screen::Shop),
                'k' => self.go(Screen::Skins),
                'l' => self.go(Screen::Leaderboard),
                _ => {}
            },
            Screen::Game => match key {
                ' ' => self.challenge_input(ChallengeInput::Tap),
                '1'..='6' => self.challenge_input(ChallengeInput::Select(digit(key))),
                'h' => self.challenge_input(ChallengeInput::Left),
                'l' => self.challenge_input(ChallengeInput::Right),
                'e' => self.use_booster(BoosterId::ExtraLife),
                'a' => self.use_booster(BoosterId::AutoWin),
                'b' => self.go_home(),
                _ => {}
            },
            Screen::Fail => match key {
                'r' => self.start_session(),
                'w' => self.watch_ad(AdPlacement::ContinueRun),
                'b' => self.go_home(),
                _ => {}
            },
            Screen::Shop => match key {
                '1'..='4' => self.buy(ALL_ITEMS[digit(key)]),
                'w' => self.watch_ad(AdPlacement::ShopReward),
                'b' => self.go_home(),
                _ => {}
            },
            Screen::Skins => match key {
                '1'..='8' => self.pick_skin(SkinId::all()[digit(key)]),
                'b' => self.go_home(),
                _ => {}
            },
            Screen::Leaderboard => {
                if key == 'b' {
                    self.go_home();
                }
            }
        }
    }

    /// One logic tick.
    pub fn tick(&mut self) {
        self.drain_ads();
        self.drain_payments();

        if self.screen != Screen::Game {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(event) = session.tick(&mut self.slot, &mut self.dispatcher) {
            self.on_session_event(event);
        }
    }

    fn challenge_input(&mut self, input: ChallengeInput) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(event) = session.handle_input(input, &mut self.slot, &mut self.dispatcher) {
            self.on_session_event(event);
        }
    }

    fn use_booster(&mut self, booster: BoosterId) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.use_booster(booster, &mut self.slot) {
            Ok(event) => self.on_session_event(event),
            Err(EconomyError::NotInPlay) => {}
            Err(e) => self.add_notice(economy_message(&e), false),
        }
    }

    fn on_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::ChallengeStarted(_) => {}
            SessionEvent::Succeeded { reward, auto_win } => {
                let prefix = if auto_win { "⚡ Auto Win! " } else { "🎉 " };
                self.add_notice(
                    format!("{prefix}+{} points, +{} coins", reward.points, reward.coins),
                    false,
                );
            }
            SessionEvent::Failed { forced, lives_left } => {
                let why = if forced { "⏰ Time's up!" } else { "💥 Failed!" };
                self.add_notice(format!("{why} Lives left: {lives_left}"), false);
            }
            SessionEvent::LifeAdded { lives } => {
                self.add_notice(format!("❤️ Extra life! Lives: {lives}"), false);
            }
            SessionEvent::GameOver { score, new_high_score } => {
                if new_high_score {
                    self.add_notice(format!("🎉 New High Score! You scored {score} points!"), true);
                }
                self.go(Screen::Fail);
            }
            SessionEvent::SaveFailed(error) => {
                self.add_notice(format!("💾 Progress not saved: {error}"), true);
                if self.session.as_ref().map(Session::phase) == Some(Phase::GameOver) {
                    self.go(Screen::Fail);
                }
            }
        }
    }

    fn watch_ad(&mut self, placement: AdPlacement) {
        if placement == AdPlacement::ContinueRun {
            self.awaiting_continue = true;
        }
        self.ads.show(placement);
    }

    fn drain_ads(&mut self) {
        while let Some(placement) = self.ads.poll() {
            match placement {
                AdPlacement::ShopReward => match self.slot.commit(economy::grant_ad_reward) {
                    Ok(()) => {
                        info!("ad reward granted");
                        self.add_notice(
                            format!("📺 Ad watched! +{} coins and 1 extra life", economy::AD_REWARD_COINS),
                            false,
                        );
                    }
                    Err(e) => self.add_notice(format!("💾 Ad reward not saved: {e}"), true),
                },
                AdPlacement::ContinueRun => self.continue_run(),
            }
        }
    }

    /// Back into play with one life, keeping score and level.
    fn continue_run(&mut self) {
        if self.screen != Screen::Fail || !self.awaiting_continue {
            debug!(screen = ?self.screen, "continue ad finished too late, dropped");
            return;
        }
        self.awaiting_continue = false;
        if let Err(e) = self.slot.commit(|p| p.lives = 1) {
            self.add_notice(format!("💾 Could not continue: {e}"), true);
            return;
        }
        self.session = Some(Session::new(self.config.session.clone()));
        self.add_notice("📺 Continue with ad! You can keep playing!", false);
        self.go(Screen::Game);
    }

    fn buy(&mut self, id: ItemId) {
        let item = catalog::item(id);
        if item.is_real_money() {
            match self.checkout.begin(id, &self.config, self.gateway.as_mut()) {
                Ok(request) => {
                    info!(order = %request.order_ref, "checkout started");
                    self.add_notice(format!("💳 Opening checkout for {}...", item.name), false);
                }
                Err(GatewayError::NotConfigured) => {
                    self.add_notice("Payments are not configured for this build.", true);
                }
                Err(e) => self.add_notice(e.to_string(), true),
            }
            return;
        }

        match self.slot.try_commit(|p| economy::purchase_booster(p, id)) {
            Ok(owned) => {
                info!(item = id.as_str(), owned, "booster bought");
                self.add_notice(format!("🎉 You bought {}!", item.name), false);
            }
            Err(e) => self.add_notice(economy_message(&e), false),
        }
    }

    fn drain_payments(&mut self) {
        while let Some(callback) = self.gateway.poll() {
            let confirmed = match self.checkout.settle(callback) {
                Ok(c) => c,
                Err(e) => {
                    self.add_notice(format!("💳 {e}"), true);
                    continue;
                }
            };
            let name = catalog::item(confirmed.item()).name;
            info!(payment = %confirmed.receipt().payment_id, item = confirmed.item().as_str(), "payment applied");
            match self
                .slot
                .try_commit(|p| economy::apply_real_money_purchase(p, &confirmed))
            {
                Ok(RealMoneyGrant::Coins(n)) => {
                    self.add_notice(format!("🎉 Payment successful! +{n} coins ({name})"), true);
                }
                Ok(RealMoneyGrant::Vip) => {
                    self.add_notice("🌟 VIP activated! You are now a VIP member!", true);
                }
                Err(e) => {
                    warn!(error = %e, "confirmed payment could not be applied");
                    self.add_notice(e.to_string(), true);
                }
            }
        }
    }

    fn pick_skin(&mut self, skin: SkinId) {
        let name = catalog::skin_info(skin).name;
        match self.slot.try_commit(|p| economy::unlock_or_select_skin(p, skin)) {
            Ok(SkinChange::Selected) => self.add_notice(format!("Now wearing {name}"), false),
            Ok(SkinChange::Unlocked { price }) => {
                info!(skin = skin.as_str(), price, "skin unlocked");
                self.add_notice(format!("🎉 Unlocked {name}!"), false);
            }
            Err(e) => self.add_notice(economy_message(&e), false),
        }
    }

    /// True while the banner after a resolution is up.
    pub fn is_resolving(&self) -> bool {
        matches!(self.session.as_ref().map(Session::phase), Some(Phase::Resolving(_)))
    }
}

fn digit(key: char) -> usize {
    key.to_digit(10).map_or(0, |d| d as usize).saturating_sub(1)
}

fn economy_message(e: &EconomyError) -> String {
    match e.shortfall() {
        Some(n) => format!("💰 Not enough coins! You need {n} more coins!"),
        None => e.to_string(),
    }
}
