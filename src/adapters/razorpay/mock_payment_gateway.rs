//! Mock payment gateway for testing.
//!
//! Records every request it receives and can be told to fail, so handler
//! and HTTP tests run without a live provider.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{
    CreateOrderRequest, CreateSubscriptionRequest, PaymentError, PaymentGateway, ProviderOrder,
    ProviderSubscription,
};

/// Mock payment gateway.
///
/// ```ignore
/// let gateway = MockPaymentGateway::new();
/// let sub = gateway.create_subscription(request).await?;
/// assert_eq!(gateway.subscription_requests().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Error returned by every call while set.
    error: Option<PaymentError>,
    short_url: Option<String>,
    subscription_requests: Vec<CreateSubscriptionRequest>,
    order_requests: Vec<CreateOrderRequest>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose calls all fail with `error`.
    pub fn failing(error: PaymentError) -> Self {
        let mock = Self::new();
        mock.set_error(error);
        mock
    }

    pub fn set_error(&self, error: PaymentError) {
        self.inner.lock().unwrap().error = Some(error);
    }

    pub fn set_short_url(&self, url: impl Into<String>) {
        self.inner.lock().unwrap().short_url = Some(url.into());
    }

    pub fn subscription_requests(&self) -> Vec<CreateSubscriptionRequest> {
        self.inner.lock().unwrap().subscription_requests.clone()
    }

    pub fn order_requests(&self) -> Vec<CreateOrderRequest> {
        self.inner.lock().unwrap().order_requests.clone()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<ProviderSubscription, PaymentError> {
        let mut state = self.inner.lock().unwrap();
        state.subscription_requests.push(request);
        if let Some(error) = &state.error {
            return Err(error.clone());
        }

        Ok(ProviderSubscription {
            id: format!("sub_mock_{}", state.subscription_requests.len()),
            status: "created".to_string(),
            short_url: state.short_url.clone(),
        })
    }

    async fn create_order(&self, request: CreateOrderRequest) -> Result<ProviderOrder, PaymentError> {
        let mut state = self.inner.lock().unwrap();
        let order = ProviderOrder {
            id: format!("order_mock_{}", state.order_requests.len() + 1),
            amount: request.amount,
            currency: request.currency.clone(),
        };
        state.order_requests.push(request);
        if let Some(error) = &state.error {
            return Err(error.clone());
        }

        Ok(order)
    }
}
