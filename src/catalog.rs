//! Static skin and shop catalogs. Read-only for the life of the process.

use crate::profile::{BoosterId, SkinId};

/// Static info about a skin.
pub struct SkinInfo {
    pub name: &'static str,
    pub emoji: &'static str,
    pub price: u32,
    pub description: &'static str,
}

pub fn skin_info(skin: SkinId) -> SkinInfo {
    match skin {
        SkinId::Default => SkinInfo {
            name: "Default Dude",
            emoji: "🤪",
            price: 0,
            description: "The classic crazy guy",
        },
        SkinId::Kurta => SkinInfo {
            name: "Kurta Guy",
            emoji: "🧔",
            price: 100,
            description: "Traditional and stylish",
        },
        SkinId::Samosa => SkinInfo {
            name: "Samosa Head",
            emoji: "🥟",
            price: 150,
            description: "Crispy and delicious",
        },
        SkinId::Saree => SkinInfo {
            name: "Saree Ghost",
            emoji: "👻",
            price: 200,
            description: "Spooky but elegant",
        },
        SkinId::Bollywood => SkinInfo {
            name: "Bollywood Star",
            emoji: "🕺",
            price: 250,
            description: "Dance like nobody's watching",
        },
        SkinId::Cricket => SkinInfo {
            name: "Cricket Hero",
            emoji: "🏏",
            price: 300,
            description: "Hit it for a six!",
        },
        SkinId::Chef => SkinInfo {
            name: "Desi Chef",
            emoji: "👨‍🍳",
            price: 350,
            description: "Master of spices",
        },
        SkinId::Royal => SkinInfo {
            name: "Maharaja",
            emoji: "👑",
            price: 500,
            description: "Royal and majestic",
        },
    }
}

/// Shop entries, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemId {
    ExtraLife,
    AutoWin,
    Coins500,
    Vip,
}

pub const ALL_ITEMS: [ItemId; 4] = [ItemId::ExtraLife, ItemId::AutoWin, ItemId::Coins500, ItemId::Vip];

/// How an item is paid for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Price {
    /// In-game coins.
    Coins(u32),
    /// Real currency, whole rupees. `product_id` is the gateway's identifier.
    Real { rupees: u32, product_id: &'static str },
}

/// What buying an item grants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    Booster(BoosterId),
    CoinPack(u32),
    Subscription,
}

pub struct ShopItem {
    pub id: ItemId,
    pub name: &'static str,
    pub description: &'static str,
    pub price: Price,
    pub kind: ItemKind,
}

impl ShopItem {
    pub fn is_real_money(&self) -> bool {
        matches!(self.price, Price::Real { .. })
    }
}

/// Currency code sent to the payment gateway.
pub const CURRENCY: &str = "INR";

pub fn item(id: ItemId) -> ShopItem {
    match id {
        ItemId::ExtraLife => ShopItem {
            id,
            name: "Extra Life",
            description: "Get +1 life to continue playing",
            price: Price::Coins(50),
            kind: ItemKind::Booster(BoosterId::ExtraLife),
        },
        ItemId::AutoWin => ShopItem {
            id,
            name: "Auto Win",
            description: "Automatically win the next game",
            price: Price::Coins(100),
            kind: ItemKind::Booster(BoosterId::AutoWin),
        },
        ItemId::Coins500 => ShopItem {
            id,
            name: "500 Coins",
            description: "Get 500 coins instantly",
            price: Price::Real { rupees: 49, product_id: "prod_coins_500" },
            kind: ItemKind::CoinPack(500),
        },
        ItemId::Vip => ShopItem {
            id,
            name: "VIP Membership",
            description: "No ads + 2 daily boosters",
            price: Price::Real { rupees: 99, product_id: "prod_vip_monthly" },
            kind: ItemKind::Subscription,
        },
    }
}

impl ItemId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemId::ExtraLife => "extraLife",
            ItemId::AutoWin => "autoWin",
            ItemId::Coins500 => "coins500",
            ItemId::Vip => "vip",
        }
    }
}
