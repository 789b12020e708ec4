use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::checkout::clients::{
    CheckoutGateway, CheckoutRequest, PaymentError, WebhookOutcome,
};
use crate::features::tools::models::Tool;
use crate::features::tools::services::ToolStore;

/// Outcome of starting a checkout for a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutStart {
    /// Send the browser to the hosted payment page
    Redirect(String),
    /// Listing is already live, nothing to pay
    AlreadyActive,
}

/// Reconciles hosted checkout outcomes with listing status
pub struct CheckoutService {
    store: Arc<ToolStore>,
    gateway: Option<Arc<dyn CheckoutGateway>>,
}

impl CheckoutService {
    pub fn new(store: Arc<ToolStore>, gateway: Option<Arc<dyn CheckoutGateway>>) -> Self {
        Self { store, gateway }
    }

    /// Whether new listings must be paid for before going live
    pub fn is_enabled(&self) -> bool {
        self.gateway.is_some()
    }

    fn gateway(&self) -> Result<&Arc<dyn CheckoutGateway>> {
        self.gateway
            .as_ref()
            .ok_or_else(|| AppError::NotConfigured("Payment is not configured".to_string()))
    }

    /// Create a hosted checkout session for a pending listing
    pub async fn start_checkout(&self, slug: &str) -> Result<CheckoutStart> {
        let gateway = self.gateway()?;
        let tool = self.store.get(slug).await?;

        if tool.is_active() {
            tracing::info!("Checkout skipped, tool already active: slug={}", slug);
            return Ok(CheckoutStart::AlreadyActive);
        }

        let session = gateway
            .create_session(&CheckoutRequest {
                slug: tool.slug.clone(),
                tool_name: tool.name.clone(),
            })
            .await?;

        tracing::info!(
            "Checkout started: provider={}, session_id={}, slug={}",
            gateway.provider_name(),
            session.id,
            tool.slug
        );

        Ok(CheckoutStart::Redirect(session.url))
    }

    /// Publish a listing directly when no payment step exists
    pub async fn activate_without_payment(&self, slug: &str) -> Result<Tool> {
        self.store.activate(slug).await
    }

    /// Look up a listing by slug without touching its status
    pub async fn find_listing(&self, slug: &str) -> Result<Option<Tool>> {
        self.store.find(slug).await
    }

    /// Confirm a returning checkout session and publish its listing.
    ///
    /// The slug the provider stored on the session wins over the one in the
    /// return URL.
    pub async fn confirm_success(&self, session_id: &str, slug_hint: Option<&str>) -> Result<Tool> {
        let gateway = self.gateway()?;

        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(AppError::BadRequest("Missing checkout session".to_string()));
        }

        let status = gateway.retrieve_session(session_id).await?;
        if !status.is_paid {
            tracing::info!("Checkout session not paid yet: session_id={}", status.id);
            return Err(PaymentError::PaymentNotCompleted.into());
        }

        let slug = match (status.slug.as_deref(), slug_hint) {
            (Some(slug), Some(hint)) if slug != hint => {
                tracing::warn!(
                    "Checkout return slug mismatch: session={}, url={}",
                    slug,
                    hint
                );
                slug
            }
            (Some(slug), _) => slug,
            (None, Some(hint)) => hint,
            (None, None) => {
                return Err(PaymentError::InvalidData(
                    "Checkout session is not linked to a tool".to_string(),
                )
                .into())
            }
        };

        let tool = self.store.activate(slug).await?;
        tracing::info!(
            "Checkout confirmed: session_id={}, slug={}",
            status.id,
            tool.slug
        );
        Ok(tool)
    }

    /// The customer abandoned checkout; the listing stays pending
    pub fn confirm_cancel(&self) {
        tracing::info!("Checkout cancelled by customer");
    }

    /// Verify a provider webhook and publish the listing of a paid session.
    ///
    /// Returns the activated listing, or `None` for events that change nothing.
    pub async fn handle_webhook(&self, signature: Option<&str>, payload: &str) -> Result<Option<Tool>> {
        let gateway = self.gateway()?;

        match gateway.parse_webhook(signature, payload)? {
            WebhookOutcome::CheckoutCompleted(status) if status.is_paid => {
                let Some(slug) = status.slug else {
                    tracing::warn!("Paid session without tool reference: session_id={}", status.id);
                    return Ok(None);
                };

                match self.store.activate(&slug).await {
                    Ok(tool) => {
                        tracing::info!(
                            "Webhook activated tool: session_id={}, slug={}",
                            status.id,
                            tool.slug
                        );
                        Ok(Some(tool))
                    }
                    Err(AppError::NotFound(_)) => {
                        tracing::warn!("Webhook for unknown tool: slug={}", slug);
                        Ok(None)
                    }
                    Err(e) => Err(e),
                }
            }
            WebhookOutcome::CheckoutCompleted(status) => {
                tracing::info!("Webhook session not paid yet: session_id={}", status.id);
                Ok(None)
            }
            WebhookOutcome::Ignored { event_type } => {
                tracing::debug!("Ignoring webhook event: {}", event_type);
                Ok(None)
            }
        }
    }
}
