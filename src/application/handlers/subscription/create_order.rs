//! CreateOrderHandler - one-off checkout order.

use std::sync::Arc;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::subscription::SubscriptionError;
use crate::ports::{CreateOrderRequest, PaymentGateway};

/// Provider-side settings for one-off orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSettings {
    /// Public key id handed to the checkout widget.
    pub key_id: String,
    pub currency: String,
    /// Amount charged when the client sends none, in minor units.
    pub default_amount: i64,
}

#[derive(Debug, Clone)]
pub struct CreateOrderCommand {
    pub user_id: UserId,
    /// Amount in major currency units (rupees).
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrderResult {
    pub order_id: String,
    /// Minor units, as echoed by the provider.
    pub amount: i64,
    pub currency: String,
    pub key: String,
}

pub struct CreateOrderHandler {
    gateway: Arc<dyn PaymentGateway>,
    settings: OrderSettings,
}

impl CreateOrderHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, settings: OrderSettings) -> Self {
        Self { gateway, settings }
    }

    pub async fn handle(&self, cmd: CreateOrderCommand) -> Result<CreateOrderResult, SubscriptionError> {
        let amount = match cmd.amount {
            Some(major) => to_minor_units(major)?,
            None => self.settings.default_amount,
        };

        let request = CreateOrderRequest {
            user_id: cmd.user_id,
            amount,
            currency: self.settings.currency.clone(),
            receipt: format!("order_{}_{}", cmd.user_id, Timestamp::now().as_unix_secs()),
        };

        let order = self.gateway.create_order(request).await.map_err(|e| {
            tracing::error!(user_id = %cmd.user_id, error = %e, "order creation failed");
            SubscriptionError::upstream(e.message)
        })?;

        tracing::info!(user_id = %cmd.user_id, order_id = %order.id, amount = order.amount, "order created");

        Ok(CreateOrderResult {
            order_id: order.id,
            amount: order.amount,
            currency: order.currency,
            key: self.settings.key_id.clone(),
        })
    }
}

fn to_minor_units(major: f64) -> Result<i64, SubscriptionError> {
    if !major.is_finite() || major <= 0.0 {
        return Err(SubscriptionError::invalid_input("amount", "Amount must be positive"));
    }
    let minor = (major * 100.0).round();
    if minor < 1.0 || minor > i64::MAX as f64 {
        return Err(SubscriptionError::invalid_input("amount", "Amount out of range"));
    }
    Ok(minor as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::razorpay::MockPaymentGateway;

    fn settings() -> OrderSettings {
        OrderSettings {
            key_id: "rzp_test_key".into(),
            currency: "INR".into(),
            default_amount: 100,
        }
    }

    #[test]
    fn converts_rupees_to_paise() {
        assert_eq!(to_minor_units(1.0).unwrap(), 100);
        assert_eq!(to_minor_units(499.99).unwrap(), 49_999);
        assert_eq!(to_minor_units(2.5).unwrap(), 250);
    }

    #[test]
    fn rejects_non_positive_amounts() {
        assert!(to_minor_units(0.0).is_err());
        assert!(to_minor_units(-5.0).is_err());
        assert!(to_minor_units(f64::NAN).is_err());
        assert!(to_minor_units(0.001).is_err());
    }

    #[tokio::test]
    async fn uses_default_amount_and_builds_receipt() {
        let gateway = Arc::new(MockPaymentGateway::new());
        let handler = CreateOrderHandler::new(gateway.clone(), settings());

        let result = handler
            .handle(CreateOrderCommand {
                user_id: UserId::new(4),
                amount: None,
            })
            .await
            .unwrap();

        assert_eq!(result.amount, 100);
        assert_eq!(result.currency, "INR");
        assert_eq!(result.key, "rzp_test_key");

        let request = &gateway.order_requests()[0];
        assert!(request.receipt.starts_with("order_4_"));
        assert_eq!(request.currency, "INR");
    }

    #[tokio::test]
    async fn invalid_amount_never_reaches_gateway() {
        let gateway = Arc::new(MockPaymentGateway::new());
        let handler = CreateOrderHandler::new(gateway.clone(), settings());

        let result = handler
            .handle(CreateOrderCommand {
                user_id: UserId::new(4),
                amount: Some(-1.0),
            })
            .await;

        assert!(matches!(result, Err(SubscriptionError::InvalidInput { .. })));
        assert!(gateway.order_requests().is_empty());
    }
}
