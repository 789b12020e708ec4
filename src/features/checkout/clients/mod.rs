//! Hosted checkout providers.
//!
//! Every provider implements [`CheckoutGateway`]; [`create_gateway`] is the only
//! place that turns configuration into a provider instance.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::config::PaymentConfig;
use crate::core::error::AppError;

mod dummy_gateway;
mod stripe_gateway;

pub use dummy_gateway::DummyGateway;
pub use stripe_gateway::StripeGateway;

/// Placeholder the provider replaces with the real session id on redirect
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Metadata key carrying the listing slug on provider sessions
pub const SLUG_METADATA_KEY: &str = "tool_slug";

/// Build the provider for the configured payment mode, `None` when disabled
pub fn create_gateway(config: &PaymentConfig) -> Option<Arc<dyn CheckoutGateway>> {
    match config {
        PaymentConfig::Disabled => None,
        PaymentConfig::Stripe(stripe) => Some(Arc::new(StripeGateway::from(stripe.clone()))),
        PaymentConfig::Dummy(urls) => Some(Arc::new(DummyGateway::new(urls.clone()))),
    }
}

/// Append the listing slug and the session id placeholder to a success URL
pub fn success_url_for(base: &str, slug: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!(
        "{}{}slug={}&session_id={}",
        base,
        separator,
        urlencoding::encode(slug),
        SESSION_ID_PLACEHOLDER
    )
}

pub type PaymentResult<T> = std::result::Result<T, PaymentError>;

/// Errors raised while talking to a checkout provider
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment provider API error: {0}")]
    ProviderApi(String),

    #[error("Payment not completed yet")]
    PaymentNotCompleted,

    #[error("Invalid payment data: {0}")]
    InvalidData(String),

    #[error("Webhook signature invalid: {0}")]
    WebhookSignature(String),

    #[error("Webhook secret is not configured")]
    WebhookNotConfigured,
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::ProviderApi(msg) => AppError::ExternalServiceError(msg),
            PaymentError::PaymentNotCompleted => {
                AppError::BadRequest("Payment has not been completed yet".to_string())
            }
            PaymentError::InvalidData(msg) => AppError::BadRequest(msg),
            PaymentError::WebhookSignature(msg) => {
                tracing::warn!("Rejected webhook: {}", msg);
                AppError::BadRequest("Invalid webhook signature".to_string())
            }
            PaymentError::WebhookNotConfigured => {
                AppError::NotConfigured("Webhook endpoint is not configured".to_string())
            }
        }
    }
}

/// What to sell: one listing
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub slug: String,
    pub tool_name: String,
}

/// A freshly created hosted checkout session
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub id: String,
    /// Where to send the browser
    pub url: String,
}

/// Provider view of an existing session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub id: String,
    /// Listing the session was created for, if the provider echoed it back
    pub slug: Option<String>,
    pub is_paid: bool,
}

/// Result of a verified webhook delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    CheckoutCompleted(SessionStatus),
    Ignored { event_type: String },
}

#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// Short provider name for logs
    fn provider_name(&self) -> &'static str;

    /// Create a hosted checkout session for one listing
    async fn create_session(&self, request: &CheckoutRequest) -> PaymentResult<CheckoutSession>;

    /// Fetch a session by id to check its payment state
    async fn retrieve_session(&self, session_id: &str) -> PaymentResult<SessionStatus>;

    /// Verify and decode a webhook delivery
    fn parse_webhook(&self, signature: Option<&str>, payload: &str)
        -> PaymentResult<WebhookOutcome>;
}
