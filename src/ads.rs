//! Rewarded-ad collaborator. Fire and forget; the router polls for completion.

use std::collections::VecDeque;

use tracing::debug;

/// Where an ad was requested from. Decides what its completion grants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdPlacement {
    /// Shop button: +25 coins and +1 life.
    ShopReward,
    /// Fail screen: continue the run with one life.
    ContinueRun,
}

pub trait AdProvider {
    fn show(&mut self, placement: AdPlacement);

    /// Next completed ad, if any.
    fn poll(&mut self) -> Option<AdPlacement>;
}

/// Completes every ad on the next poll. Stands in for an ad SDK.
#[derive(Default)]
pub struct InstantAds {
    completed: VecDeque<AdPlacement>,
}

impl InstantAds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AdProvider for InstantAds {
    fn show(&mut self, placement: AdPlacement) {
        debug!(?placement, "ad shown");
        self.completed.push_back(placement);
    }

    fn poll(&mut self) -> Option<AdPlacement> {
        self.completed.pop_front()
    }
}
