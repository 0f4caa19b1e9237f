//! Payment gateway collaborator. Only a matched success becomes a [`ConfirmedPayment`].

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::catalog::{self, ItemId, Price, CURRENCY};
use crate::config::GameConfig;
use crate::error::GatewayError;

/// Order sent to the gateway.
#[derive(Clone, Debug, PartialEq)]
pub struct PaymentRequest {
    pub order_ref: String,
    pub amount_minor_units: u64,
    pub currency: &'static str,
    pub product_id: &'static str,
    pub description: String,
}

/// Gateway receipt for a successful payment.
#[derive(Clone, Debug, PartialEq)]
pub struct Receipt {
    pub payment_id: String,
}

/// Asynchronous answer from the gateway.
#[derive(Clone, Debug, PartialEq)]
pub enum PaymentCallback {
    Success { order_ref: String, receipt: Receipt },
    Failure { order_ref: String, error: String },
}

pub trait PaymentGateway {
    /// Start checkout for `request`. Must not block.
    fn open(&mut self, request: &PaymentRequest);

    /// Next finished checkout, if any.
    fn poll(&mut self) -> Option<PaymentCallback>;
}

/// Proof that the gateway confirmed payment for `item`.
#[derive(Debug, PartialEq)]
pub struct ConfirmedPayment {
    item: ItemId,
    receipt: Receipt,
}

impl ConfirmedPayment {
    pub fn item(&self) -> ItemId {
        self.item
    }

    pub fn receipt(&self) -> &Receipt {
        &self.receipt
    }
}

/// Unanswered orders kept at most. Older ones are forgotten.
const MAX_PENDING_ORDERS: usize = 16;

/// Orders that were opened and have not been answered yet.
pub struct Checkout {
    pending: Vec<(String, ItemId)>,
    next_order: u64,
}

impl Checkout {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_order: 1,
        }
    }

    /// Open checkout for a real-money item.
    pub fn begin(
        &mut self,
        item: ItemId,
        config: &GameConfig,
        gateway: &mut dyn PaymentGateway,
    ) -> Result<PaymentRequest, GatewayError> {
        let entry = catalog::item(item);
        let (rupees, product_id) = match entry.price {
            Price::Real { rupees, product_id } => (rupees, product_id),
            Price::Coins(_) => return Err(GatewayError::NotRealMoney(item)),
        };
        if !config.payments_enabled() {
            return Err(GatewayError::NotConfigured);
        }

        let order_ref = format!("receipt_{}_{}", item.as_str(), self.next_order);
        self.next_order += 1;
        let request = PaymentRequest {
            order_ref: order_ref.clone(),
            // paise
            amount_minor_units: u64::from(rupees) * 100,
            currency: CURRENCY,
            product_id,
            description: format!("Purchase: {}", entry.name),
        };
        if self.pending.len() == MAX_PENDING_ORDERS {
            let (stale, _) = self.pending.remove(0);
            warn!(order = %stale, "unanswered order forgotten");
        }
        self.pending.push((order_ref, item));
        debug!(order = %request.order_ref, amount = request.amount_minor_units, "checkout opened");
        gateway.open(&request);
        Ok(request)
    }

    /// Match a gateway answer to its order. Every callback closes its order,
    /// success or not.
    pub fn settle(&mut self, callback: PaymentCallback) -> Result<ConfirmedPayment, GatewayError> {
        let order_ref = match &callback {
            PaymentCallback::Success { order_ref, .. } | PaymentCallback::Failure { order_ref, .. } => {
                order_ref.clone()
            }
        };
        let pos = self
            .pending
            .iter()
            .position(|(r, _)| *r == order_ref)
            .ok_or_else(|| GatewayError::UnknownOrder(order_ref.clone()))?;
        let (_, item) = self.pending.remove(pos);

        match callback {
            PaymentCallback::Success { receipt, .. } => {
                info!(order = %order_ref, payment = %receipt.payment_id, "payment confirmed");
                Ok(ConfirmedPayment { item, receipt })
            }
            PaymentCallback::Failure { error, .. } => {
                warn!(order = %order_ref, %error, "payment failed");
                Err(GatewayError::Declined(error))
            }
        }
    }

    #[cfg(test)]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Default for Checkout {
    fn default() -> Self {
        Self::new()
    }
}

/// Gateway for builds without a checkout SDK: declines every order.
#[derive(Default)]
pub struct OfflineGateway {
    answers: VecDeque<PaymentCallback>,
}

impl OfflineGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PaymentGateway for OfflineGateway {
    fn open(&mut self, request: &PaymentRequest) {
        self.answers.push_back(PaymentCallback::Failure {
            order_ref: request.order_ref.clone(),
            error: "checkout is not available in this build".into(),
        });
    }

    fn poll(&mut self) -> Option<PaymentCallback> {
        self.answers.pop_front()
    }
}


#[cfg(test)]
mod tests {
    use super::scripted::ScriptedGateway;
    use super::*;
    use crate::economy::{apply_real_money_purchase, RealMoneyGrant};
    use crate::profile::PlayerProfile;

    fn live_config() -> GameConfig {
        GameConfig {
            payment_key_id: Some("rzp_test_key".into()),
            ..GameConfig::default()
        }
    }

    #[test]
    fn begin_builds_request_in_paise() {
        let mut checkout = Checkout::new();
        let mut gw = ScriptedGateway::default();
        let req = checkout.begin(ItemId::Coins500, &live_config(), &mut gw).unwrap();
        assert_eq!(req.amount_minor_units, 4900);
        assert_eq!(req.currency, "INR");
        assert_eq!(req.product_id, "prod_coins_500");
        assert_eq!(req.description, "Purchase: 500 Coins");
        assert_eq!(gw.0.borrow().opened.len(), 1);
        assert_eq!(checkout.pending_count(), 1);
    }

    #[test]
    fn begin_refused_without_key() {
        let mut checkout = Checkout::new();
        let mut gw = ScriptedGateway::default();
        let err = checkout
            .begin(ItemId::Vip, &GameConfig::default(), &mut gw)
            .unwrap_err();
        assert_eq!(err, GatewayError::NotConfigured);
        assert!(gw.0.borrow().opened.is_empty());
        assert_eq!(checkout.pending_count(), 0);
    }

    #[test]
    fn begin_refused_for_coin_items() {
        let mut checkout = Checkout::new();
        let mut gw = ScriptedGateway::default();
        assert_eq!(
            checkout.begin(ItemId::AutoWin, &live_config(), &mut gw),
            Err(GatewayError::NotRealMoney(ItemId::AutoWin))
        );
    }

    #[test]
    fn success_confirms_and_grants_coins() {
        let mut checkout = Checkout::new();
        let mut gw = ScriptedGateway::default();
        checkout.begin(ItemId::Coins500, &live_config(), &mut gw).unwrap();
        gw.approve_last("pay_001");

        let confirmed = checkout.settle(gw.poll().unwrap()).unwrap();
        assert_eq!(confirmed.item(), ItemId::Coins500);
        assert_eq!(confirmed.receipt().payment_id, "pay_001");

        let mut p = PlayerProfile::new();
        assert_eq!(apply_real_money_purchase(&mut p, &confirmed), Ok(RealMoneyGrant::Coins(500)));
        assert_eq!(p.coins, 600);
        assert_eq!(checkout.pending_count(), 0);
    }

    #[test]
    fn subscription_sets_vip() {
        let mut checkout = Checkout::new();
        let mut gw = ScriptedGateway::default();
        checkout.begin(ItemId::Vip, &live_config(), &mut gw).unwrap();
        gw.approve_last("pay_vip");
        let confirmed = checkout.settle(gw.poll().unwrap()).unwrap();

        let mut p = PlayerProfile::new();
        assert_eq!(apply_real_money_purchase(&mut p, &confirmed), Ok(RealMoneyGrant::Vip));
        assert!(p.is_vip);
        assert_eq!(p.coins, 100);
    }

    #[test]
    fn failure_is_declined_and_closes_order() {
        let mut checkout = Checkout::new();
        let mut gw = ScriptedGateway::default();
        checkout.begin(ItemId::Coins500, &live_config(), &mut gw).unwrap();
        gw.decline_last("card declined");

        let err = checkout.settle(gw.poll().unwrap()).unwrap_err();
        assert_eq!(err, GatewayError::Declined("card declined".into()));
        assert_eq!(checkout.pending_count(), 0);
    }

    #[test]
    fn unknown_or_repeated_callback_rejected() {
        let mut checkout = Checkout::new();
        let mut gw = ScriptedGateway::default();
        checkout.begin(ItemId::Coins500, &live_config(), &mut gw).unwrap();
        gw.approve_last("pay_1");
        gw.approve_last("pay_1");

        assert!(checkout.settle(gw.poll().unwrap()).is_ok());
        assert!(matches!(
            checkout.settle(gw.poll().unwrap()),
            Err(GatewayError::UnknownOrder(_))
        ));
    }

    #[test]
    fn unanswered_orders_are_capped() {
        let mut checkout = Checkout::new();
        let mut gw = ScriptedGateway::default();
        let refs: Vec<String> = (0..MAX_PENDING_ORDERS + 4)
            .map(|_| checkout.begin(ItemId::Coins500, &live_config(), &mut gw).unwrap().order_ref)
            .collect();
        assert_eq!(checkout.pending_count(), MAX_PENDING_ORDERS);

        let answer = |order_ref: &String| PaymentCallback::Success {
            order_ref: order_ref.clone(),
            receipt: Receipt { payment_id: "pay_late".into() },
        };
        assert!(matches!(
            checkout.settle(answer(&refs[0])),
            Err(GatewayError::UnknownOrder(_))
        ));
        assert!(checkout.settle(answer(&refs[refs.len() - 1])).is_ok());
        assert_eq!(checkout.pending_count(), MAX_PENDING_ORDERS - 1);
    }

    #[test]
    fn order_refs_are_unique() {
        let mut checkout = Checkout::new();
        let mut gw = ScriptedGateway::default();
        let a = checkout.begin(ItemId::Coins500, &live_config(), &mut gw).unwrap();
        let b = checkout.begin(ItemId::Coins500, &live_config(), &mut gw).unwrap();
        assert_ne!(a.order_ref, b.order_ref);
    }

    #[test]
    fn offline_gateway_declines() {
        let mut checkout = Checkout::new();
        let mut gw = OfflineGateway::default();
        checkout.begin(ItemId::Vip, &live_config(), &mut gw).unwrap();
        assert!(matches!(
            checkout.settle(gw.poll().unwrap()),
            Err(GatewayError::Declined(_))
        ));
        assert!(gw.poll().is_none());
    }
}
