//! Economy rules over [`PlayerProfile`]. An `Err` leaves the profile untouched.

use crate::catalog::{self, ItemId, ItemKind, Price};
use crate::error::EconomyError;
use crate::gateway::ConfirmedPayment;
use crate::profile::{BoosterId, PlayerProfile, SkinId, MAX_LIVES};

/// Coins granted for watching a rewarded ad.
pub const AD_REWARD_COINS: u32 = 25;

/// Points and coins for clearing one challenge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reward {
    pub points: u32,
    pub coins: u32,
}

/// `points = 10 + 2·level + timer/10`, `coins = points/5`, both floored.
pub fn success_reward(level: u32, timer: u32) -> Reward {
    let points = 10u32
        .saturating_add(level.saturating_mul(2))
        .saturating_add(timer / 10);
    Reward {
        points,
        coins: points / 5,
    }
}

/// Bank a cleared challenge: score and coins go up, the next one is harder.
pub fn apply_success(profile: &mut PlayerProfile, reward: Reward) {
    profile.score = profile.score.saturating_add(reward.points);
    profile.coins = profile.coins.saturating_add(reward.coins);
    profile.level = profile.level.saturating_add(1);
}

/// Take one life for a failed challenge, never going below zero.
/// Returns the lives left.
pub fn apply_failure(profile: &mut PlayerProfile) -> u32 {
    profile.lives = profile.lives.saturating_sub(1);
    profile.lives
}

fn charge(profile: &mut PlayerProfile, price: u32) -> Result<(), EconomyError> {
    if profile.coins < price {
        return Err(EconomyError::InsufficientFunds {
            price,
            available: profile.coins,
        });
    }
    profile.coins -= price;
    Ok(())
}

/// Buy one booster with coins. Each call re-validates funds; boosters stack.
/// Returns how many of that booster are now owned.
pub fn purchase_booster(profile: &mut PlayerProfile, id: ItemId) -> Result<u32, EconomyError> {
    let item = catalog::item(id);
    let (price, booster) = match (item.price, item.kind) {
        (Price::Coins(price), ItemKind::Booster(booster)) => (price, booster),
        _ => return Err(EconomyError::NotForCoins(id)),
    };
    charge(profile, price)?;
    let owned = profile.boosters.entry(booster).or_insert(0);
    *owned += 1;
    Ok(*owned)
}

/// Result of a skin tap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkinChange {
    /// Already owned, now worn.
    Selected,
    /// Bought and worn.
    Unlocked { price: u32 },
}

/// Wear an owned skin for free, or buy and wear a locked one.
pub fn unlock_or_select_skin(
    profile: &mut PlayerProfile,
    skin: SkinId,
) -> Result<SkinChange, EconomyError> {
    if profile.has_skin(skin) {
        profile.current_skin = skin;
        return Ok(SkinChange::Selected);
    }
    let price = catalog::skin_info(skin).price;
    charge(profile, price)?;
    profile.unlocked_skins.insert(skin);
    profile.current_skin = skin;
    Ok(SkinChange::Unlocked { price })
}

/// Rewarded ad: +25 coins and one life, capped at [`MAX_LIVES`].
pub fn grant_ad_reward(profile: &mut PlayerProfile) {
    profile.coins = profile.coins.saturating_add(AD_REWARD_COINS);
    profile.lives = (profile.lives + 1).min(MAX_LIVES);
}

/// What a confirmed real-money purchase granted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RealMoneyGrant {
    Coins(u32),
    Vip,
}

/// Deliver a real-money item. Only callable with a [`ConfirmedPayment`],
/// which exists only after the gateway reported success.
pub fn apply_real_money_purchase(
    profile: &mut PlayerProfile,
    payment: &ConfirmedPayment,
) -> Result<RealMoneyGrant, EconomyError> {
    let item = catalog::item(payment.item());
    match item.kind {
        ItemKind::CoinPack(amount) => {
            profile.coins = profile.coins.saturating_add(amount);
            Ok(RealMoneyGrant::Coins(amount))
        }
        ItemKind::Subscription => {
            profile.is_vip = true;
            Ok(RealMoneyGrant::Vip)
        }
        ItemKind::Booster(_) => Err(EconomyError::NotRealMoney(item.id)),
    }
}

/// Spend one owned booster without applying its effect.
pub fn spend_booster(profile: &mut PlayerProfile, booster: BoosterId) -> Result<(), EconomyError> {
    match profile.boosters.get_mut(&booster) {
        Some(n) if *n > 0 => {
            *n -= 1;
            Ok(())
        }
        _ => Err(EconomyError::NoBoosterOwned(booster)),
    }
}

/// Spend an extra-life booster for +1 life. Refused when lives are full.
pub fn use_extra_life(profile: &mut PlayerProfile) -> Result<u32, EconomyError> {
    if profile.booster_count(BoosterId::ExtraLife) == 0 {
        return Err(EconomyError::NoBoosterOwned(BoosterId::ExtraLife));
    }
    if profile.lives >= MAX_LIVES {
        return Err(EconomyError::LivesFull);
    }
    spend_booster(profile, BoosterId::ExtraLife)?;
    profile.lives += 1;
    Ok(profile.lives)
}
