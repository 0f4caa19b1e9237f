//! Frame clock: `performance.now()` to whole logic ticks.

use crate::config::TICK_MS;

/// Longest gap credited in one frame. A tab that was backgrounded for a
/// minute should not replay a minute of countdown in one go.
const MAX_FRAME_GAP_MS: f64 = 500.0;

pub struct FrameClock {
    tick_ms: f64,
    carry_ms: f64,
    last_frame: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_tick_ms(TICK_MS)
    }

    pub fn with_tick_ms(tick_ms: u32) -> Self {
        Self {
            tick_ms: f64::from(tick_ms.max(1)),
            carry_ms: 0.0,
            last_frame: None,
        }
    }

    /// Ticks owed for the frame drawn at `now_ms`. The first frame owes none.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let gap = self
            .last_frame
            .map_or(0.0, |prev| (now_ms - prev).clamp(0.0, MAX_FRAME_GAP_MS));
        self.last_frame = Some(now_ms);

        self.carry_ms += gap;
        let ticks = (self.carry_ms / self.tick_ms).floor();
        self.carry_ms -= ticks * self.tick_ms;
        ticks as u32
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
