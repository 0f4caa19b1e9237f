//! Build-time configuration from `option_env!`.

/// Milliseconds per logic tick. Every timer in the game counts these ticks.
pub const TICK_MS: u32 = 50;
/// Logic ticks per real-time second.
pub const TICKS_PER_SEC: u32 = 1000 / TICK_MS;

/// Placeholder from sample env files; treated as "no key".
const PLACEHOLDER_KEY: &str = "YOUR_RAZORPAY_KEY_ID";

/// Timing of one play session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Countdown value at the start of each challenge.
    pub countdown_start: u32,
    /// Ticks per countdown unit.
    pub countdown_step_ticks: u32,
    /// Ticks the success/fail banner stays up before the session moves on.
    pub display_delay_ticks: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            countdown_start: 100,
            countdown_step_ticks: 1,
            display_delay_ticks: 2 * TICKS_PER_SEC,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameConfig {
    pub session: SessionConfig,
    /// Payment gateway key. Live configuration: never persisted.
    pub payment_key_id: Option<String>,
    /// Fixed dispatcher seed; `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Read `RAGE_TAP_PAYMENT_KEY` and `RAGE_TAP_SEED` as baked in at compile time.
    pub fn from_build_env() -> Self {
        Self::from_values(option_env!("RAGE_TAP_PAYMENT_KEY"), option_env!("RAGE_TAP_SEED"))
    }

    fn from_values(key: Option<&str>, seed: Option<&str>) -> Self {
        let payment_key_id = key
            .map(str::trim)
            .filter(|k| !k.is_empty() && *k != PLACEHOLDER_KEY)
            .map(String::from);
        let seed = seed.and_then(|s| s.trim().parse().ok());
        Self {
            session: SessionConfig::default(),
            payment_key_id,
            seed,
        }
    }

    pub fn payments_enabled(&self) -> bool {
        self.payment_key_id.is_some()
    }
}
