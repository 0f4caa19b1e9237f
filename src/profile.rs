//! The persistent player record and its session-scoped fields.

use std::collections::{BTreeMap, BTreeSet};

/// Hard cap on lives, also the ceiling for ad rewards and extra-life boosters.
pub const MAX_LIVES: u32 = 5;
/// Lives granted at the start of every new session.
pub const START_LIVES: u32 = 3;
/// Coins on a brand-new profile.
pub const START_COINS: u32 = 100;

/// Cosmetic character skins, in catalog order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkinId {
    Default,
    Kurta,
    Samosa,
    Saree,
    Bollywood,
    Cricket,
    Chef,
    Royal,
}

impl SkinId {
    /// All skins in display order.
    pub fn all() -> [SkinId; 8] {
        [
            SkinId::Default,
            SkinId::Kurta,
            SkinId::Samosa,
            SkinId::Saree,
            SkinId::Bollywood,
            SkinId::Cricket,
            SkinId::Chef,
            SkinId::Royal,
        ]
    }

    /// Stable id used in saves.
    pub fn as_str(&self) -> &'static str {
        match self {
            SkinId::Default => "default",
            SkinId::Kurta => "kurta",
            SkinId::Samosa => "samosa",
            SkinId::Saree => "saree",
            SkinId::Bollywood => "bollywood",
            SkinId::Cricket => "cricket",
            SkinId::Chef => "chef",
            SkinId::Royal => "royal",
        }
    }

    pub fn parse(id: &str) -> Option<SkinId> {
        SkinId::all().into_iter().find(|s| s.as_str() == id)
    }
}

/// Consumable boosters bought in the shop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BoosterId {
    ExtraLife,
    AutoWin,
}

impl BoosterId {
    pub fn all() -> [BoosterId; 2] {
        [BoosterId::ExtraLife, BoosterId::AutoWin]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoosterId::ExtraLife => "extraLife",
            BoosterId::AutoWin => "autoWin",
        }
    }

    pub fn parse(id: &str) -> Option<BoosterId> {
        BoosterId::all().into_iter().find(|b| b.as_str() == id)
    }
}

/// The player record. `lives`, `score` and `level` are session-scoped.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerProfile {
    pub lives: u32,
    pub score: u32,
    pub coins: u32,
    pub level: u32,
    pub high_score: u32,
    pub unlocked_skins: BTreeSet<SkinId>,
    pub current_skin: SkinId,
    pub boosters: BTreeMap<BoosterId, u32>,
    pub is_vip: bool,
}

impl PlayerProfile {
    pub fn new() -> Self {
        Self {
            lives: START_LIVES,
            score: 0,
            coins: START_COINS,
            level: 1,
            high_score: 0,
            unlocked_skins: BTreeSet::from([SkinId::Default]),
            current_skin: SkinId::Default,
            boosters: BoosterId::all().into_iter().map(|b| (b, 0)).collect(),
            is_vip: false,
        }
    }

    /// Start a fresh session. Coins, high score, skins and boosters are kept.
    pub fn reset_session(&mut self) {
        self.lives = START_LIVES;
        self.score = 0;
        self.level = 1;
    }

    pub fn booster_count(&self, booster: BoosterId) -> u32 {
        self.boosters.get(&booster).copied().unwrap_or(0)
    }

    pub fn has_skin(&self, skin: SkinId) -> bool {
        self.unlocked_skins.contains(&skin)
    }

    /// Raise the high score if the current score beats it.
    /// Returns true when a new high score was set.
    pub fn record_high_score(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }

    /// Repair a profile that came from outside (e.g. an edited save) so the
    /// data-model invariants hold again.
    pub fn normalize(&mut self) {
        self.lives = self.lives.min(MAX_LIVES);
        self.level = self.level.max(1);
        self.unlocked_skins.insert(SkinId::Default);
        if !self.unlocked_skins.contains(&self.current_skin) {
            self.current_skin = SkinId::Default;
        }
        for booster in BoosterId::all() {
            self.boosters.entry(booster).or_insert(0);
        }
    }
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_profile_defaults() {
        let p = PlayerProfile::new();
        assert_eq!(p.lives, 3);
        assert_eq!(p.score, 0);
        assert_eq!(p.coins, 100);
        assert_eq!(p.level, 1);
        assert_eq!(p.high_score, 0);
        assert!(p.has_skin(SkinId::Default));
        assert_eq!(p.current_skin, SkinId::Default);
        assert_eq!(p.booster_count(BoosterId::ExtraLife), 0);
        assert!(!p.is_vip);
    }

    #[test]
    fn reset_session_keeps_economy() {
        let mut p = PlayerProfile::new();
        p.lives = 0;
        p.score = 420;
        p.level = 9;
        p.coins = 777;
        p.high_score = 500;
        p.unlocked_skins.insert(SkinId::Chef);
        p.current_skin = SkinId::Chef;
        p.boosters.insert(BoosterId::AutoWin, 2);

        p.reset_session();

        assert_eq!((p.lives, p.score, p.level), (3, 0, 1));
        assert_eq!(p.coins, 777);
        assert_eq!(p.high_score, 500);
        assert_eq!(p.current_skin, SkinId::Chef);
        assert_eq!(p.booster_count(BoosterId::AutoWin), 2);
    }

    #[test]
    fn high_score_only_rises() {
        let mut p = PlayerProfile::new();
        p.score = 50;
        assert!(p.record_high_score());
        assert_eq!(p.high_score, 50);
        p.score = 20;
        assert!(!p.record_high_score());
        assert_eq!(p.high_score, 50);
        p.score = 50;
        assert!(!p.record_high_score());
    }

    #[test]
    fn normalize_repairs_invariants() {
        let mut p = PlayerProfile::new();
        p.lives = 99;
        p.level = 0;
        p.unlocked_skins.clear();
        p.current_skin = SkinId::Royal;
        p.boosters.clear();

        p.normalize();

        assert_eq!(p.lives, MAX_LIVES);
        assert_eq!(p.level, 1);
        assert!(p.has_skin(SkinId::Default));
        assert_eq!(p.current_skin, SkinId::Default);
        assert_eq!(p.boosters.len(), 2);
    }

    #[test]
    fn skin_ids_roundtrip_through_str() {
        for skin in SkinId::all() {
            assert_eq!(SkinId::parse(skin.as_str()), Some(skin));
        }
        assert_eq!(SkinId::parse("ninja"), None);
        assert_eq!(BoosterId::parse("autoWin"), Some(BoosterId::AutoWin));
    }
}
