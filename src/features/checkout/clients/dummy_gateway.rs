//! Local development provider.
//!
//! Sessions are "paid" the moment they are created: the checkout URL is the
//! success URL itself, so the whole flow runs without network access.

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::config::CheckoutUrls;
use crate::features::checkout::clients::{
    success_url_for, CheckoutGateway, CheckoutRequest, CheckoutSession, PaymentError,
    PaymentResult, SessionStatus, WebhookOutcome, SESSION_ID_PLACEHOLDER,
};

const SESSION_PREFIX: &str = "dummy_session_";

pub struct DummyGateway {
    urls: CheckoutUrls,
}

impl DummyGateway {
    pub fn new(urls: CheckoutUrls) -> Self {
        Self { urls }
    }
}

#[async_trait]
impl CheckoutGateway for DummyGateway {
    fn provider_name(&self) -> &'static str {
        "dummy"
    }

    async fn create_session(&self, request: &CheckoutRequest) -> PaymentResult<CheckoutSession> {
        // Format: dummy_session_{uuid}_{slug}; slugs never contain '_'
        let id = format!(
            "{}{}_{}",
            SESSION_PREFIX,
            Uuid::new_v4().simple(),
            request.slug
        );
        let url = success_url_for(&self.urls.success_url, &request.slug)
            .replace(SESSION_ID_PLACEHOLDER, &id);

        tracing::info!(
            "Dummy checkout session created: session_id={}, slug={}",
            id,
            request.slug
        );

        Ok(CheckoutSession { id, url })
    }

    async fn retrieve_session(&self, session_id: &str) -> PaymentResult<SessionStatus> {
        let slug = session_id
            .strip_prefix(SESSION_PREFIX)
            .and_then(|rest| rest.split_once('_'))
            .map(|(_, slug)| slug)
            .filter(|slug| !slug.is_empty())
            .ok_or_else(|| {
                PaymentError::InvalidData("Invalid dummy session ID format".to_string())
            })?;

        Ok(SessionStatus {
            id: session_id.to_string(),
            slug: Some(slug.to_string()),
            is_paid: true,
        })
    }

    fn parse_webhook(
        &self,
        _signature: Option<&str>,
        _payload: &str,
    ) -> PaymentResult<WebhookOutcome> {
        // No webhooks; the success redirect is the only confirmation
        Ok(WebhookOutcome::Ignored {
            event_type: "dummy".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> DummyGateway {
        DummyGateway::new(CheckoutUrls {
            success_url: "http://localhost:5000/checkout/success".into(),
            cancel_url: "http://localhost:5000/checkout/cancel".into(),
        })
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let gateway = gateway();
        let session = gateway
            .create_session(&CheckoutRequest {
                slug: "acme-ai-2".into(),
                tool_name: "Acme AI".into(),
            })
            .await
            .unwrap();

        assert!(session.id.starts_with("dummy_session_"));
        assert!(session.url.starts_with(
            "http://localhost:5000/checkout/success?slug=acme-ai-2&session_id=dummy_session_"
        ));
        assert!(!session.url.contains(SESSION_ID_PLACEHOLDER));

        let status = gateway.retrieve_session(&session.id).await.unwrap();
        assert_eq!(status.slug.as_deref(), Some("acme-ai-2"));
        assert!(status.is_paid);
    }

    #[tokio::test]
    async fn test_rejects_foreign_session_id() {
        let gateway = gateway();
        for id in ["cs_test_123", "dummy_session_", "dummy_session_abc"] {
            assert!(matches!(
                gateway.retrieve_session(id).await,
                Err(PaymentError::InvalidData(_))
            ));
        }
    }
}
