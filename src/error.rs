//! Error types. None are fatal.

use thiserror::Error;

use crate::catalog::ItemId;
use crate::profile::BoosterId;

/// Rejected purchases, unlocks and booster uses. The profile is untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EconomyError {
    #[error("not enough coins: need {price}, have {available}")]
    InsufficientFunds { price: u32, available: u32 },

    #[error("{0:?} cannot be bought with coins")]
    NotForCoins(ItemId),

    #[error("{0:?} is not a real-money item")]
    NotRealMoney(ItemId),

    #[error("no {0:?} booster owned")]
    NoBoosterOwned(BoosterId),

    #[error("lives already full")]
    LivesFull,

    #[error("no challenge in play")]
    NotInPlay,

    #[error("could not save: {0}")]
    SaveFailed(String),
}

impl From<PersistError> for EconomyError {
    fn from(e: PersistError) -> Self {
        EconomyError::SaveFailed(e.to_string())
    }
}

impl EconomyError {
    /// Coins still missing, for the "need N more" notice.
    pub fn shortfall(&self) -> Option<u32> {
        match self {
            EconomyError::InsufficientFunds { price, available } => Some(price.saturating_sub(*available)),
            _ => None,
        }
    }
}

/// Problems reading or writing the stored profile snapshot.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("stored profile is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("stored profile version {saved} is older than {min}")]
    Incompatible { saved: u32, min: u32 },

    #[error("storage unavailable: {0}")]
    Storage(String),
}

/// Payment collaborator failures. Surfaced to the player, never applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("payment key is not configured for this build")]
    NotConfigured,

    #[error("{0:?} is paid with coins, not through the gateway")]
    NotRealMoney(ItemId),

    #[error("no pending order {0}")]
    UnknownOrder(String),

    #[error("payment failed: {0}")]
    Declined(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortfall_for_insufficient_funds() {
        let e = EconomyError::InsufficientFunds { price: 50, available: 40 };
        assert_eq!(e.shortfall(), Some(10));
        assert_eq!(EconomyError::LivesFull.shortfall(), None);
    }

    #[test]
    fn messages_read_naturally() {
        let e = EconomyError::InsufficientFunds { price: 50, available: 40 };
        assert_eq!(e.to_string(), "not enough coins: need 50, have 40");
        assert_eq!(
            GatewayError::Declined("card expired".into()).to_string(),
            "payment failed: card expired"
        );
    }

    #[test]
    fn persist_errors_become_economy_errors() {
        let e = EconomyError::from(PersistError::Storage("QuotaExceededError".into()));
        assert_eq!(e.to_string(), "could not save: storage unavailable: QuotaExceededError");
        assert_eq!(e.shortfall(), None);
    }
}
