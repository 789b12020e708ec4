use std::collections::HashMap;

use async_trait::async_trait;
use stripe::{
    CheckoutSession as StripeCheckoutSession, CheckoutSessionId, CheckoutSessionMode,
    CheckoutSessionPaymentStatus, Client, CreateCheckoutSession, CreateCheckoutSessionLineItems,
    EventObject, EventType, Webhook,
};

use crate::core::config::{CheckoutUrls, StripeConfig};
use crate::features::checkout::clients::{
    success_url_for, CheckoutGateway, CheckoutRequest, CheckoutSession, PaymentError,
    PaymentResult, SessionStatus, WebhookOutcome, SLUG_METADATA_KEY,
};

/// Stripe hosted checkout for a single fixed price
pub struct StripeGateway {
    client: Client,
    price_id: String,
    urls: CheckoutUrls,
    webhook_secret: Option<String>,
}

impl From<StripeConfig> for StripeGateway {
    fn from(config: StripeConfig) -> Self {
        Self {
            client: Client::new(config.secret_key),
            price_id: config.price_id,
            urls: config.urls,
            webhook_secret: config.webhook_secret,
        }
    }
}

/// Slug from the client reference, falling back to session metadata
fn session_status(session: &StripeCheckoutSession) -> SessionStatus {
    let slug = session.client_reference_id.clone().or_else(|| {
        session
            .metadata
            .as_ref()
            .and_then(|m| m.get(SLUG_METADATA_KEY).cloned())
    });

    SessionStatus {
        id: session.id.to_string(),
        slug,
        is_paid: session.payment_status == CheckoutSessionPaymentStatus::Paid,
    }
}

#[async_trait]
impl CheckoutGateway for StripeGateway {
    fn provider_name(&self) -> &'static str {
        "stripe"
    }

    async fn create_session(&self, request: &CheckoutRequest) -> PaymentResult<CheckoutSession> {
        let success_url = success_url_for(&self.urls.success_url, &request.slug);

        let mut params = CreateCheckoutSession::new();
        params.mode = Some(CheckoutSessionMode::Payment);
        params.success_url = Some(&success_url);
        params.cancel_url = Some(&self.urls.cancel_url);
        params.client_reference_id = Some(&request.slug);

        let mut metadata = HashMap::new();
        metadata.insert(SLUG_METADATA_KEY.to_string(), request.slug.clone());
        metadata.insert("tool_name".to_string(), request.tool_name.clone());
        params.metadata = Some(metadata);

        params.line_items = Some(vec![CreateCheckoutSessionLineItems {
            price: Some(self.price_id.clone()),
            quantity: Some(1),
            ..Default::default()
        }]);

        let session = StripeCheckoutSession::create(&self.client, params)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create Stripe checkout session: {:?}", e);
                PaymentError::ProviderApi(e.to_string())
            })?;

        let url = session
            .url
            .ok_or_else(|| PaymentError::ProviderApi("No checkout URL returned".to_string()))?;

        tracing::info!(
            "Stripe checkout session created: session_id={}, slug={}",
            session.id,
            request.slug
        );

        Ok(CheckoutSession {
            id: session.id.to_string(),
            url,
        })
    }

    async fn retrieve_session(&self, session_id: &str) -> PaymentResult<SessionStatus> {
        let id: CheckoutSessionId = session_id
            .parse()
            .map_err(|_| PaymentError::InvalidData(format!("Invalid session id: {}", session_id)))?;

        let session = StripeCheckoutSession::retrieve(&self.client, &id, &[])
            .await
            .map_err(|e| {
                tracing::error!("Failed to retrieve Stripe checkout session: {:?}", e);
                PaymentError::ProviderApi(e.to_string())
            })?;

        Ok(session_status(&session))
    }

    fn parse_webhook(
        &self,
        signature: Option<&str>,
        payload: &str,
    ) -> PaymentResult<WebhookOutcome> {
        let secret = self
            .webhook_secret
            .as_deref()
            .ok_or(PaymentError::WebhookNotConfigured)?;
        let signature = signature.ok_or_else(|| {
            PaymentError::WebhookSignature("Missing Stripe-Signature header".to_string())
        })?;

        let event = Webhook::construct_event(payload, signature, secret)
            .map_err(|e| PaymentError::WebhookSignature(e.to_string()))?;

        match event.type_ {
            EventType::CheckoutSessionCompleted => {
                if let EventObject::CheckoutSession(session) = &event.data.object {
                    Ok(WebhookOutcome::CheckoutCompleted(session_status(session)))
                } else {
                    Err(PaymentError::InvalidData(
                        "Invalid checkout session data".to_string(),
                    ))
                }
            }
            other => Ok(WebhookOutcome::Ignored {
                event_type: format!("{:?}", other),
            }),
        }
    }
}
