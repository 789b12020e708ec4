use std::sync::Arc;

use axum_test::TestServer;
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::core::config::{CheckoutUrls, PaymentConfig, StripeConfig};
use crate::core::database::MIGRATOR;
use crate::core::router::{app_routes, AppServices};
use crate::features::tools::dtos::SubmitToolDto;
use crate::features::tools::models::{Category, ListingStatus, NewTool};
use crate::shared::templates::PageRenderer;

pub const TEST_SECRET_KEY: &str = "test-secret-key";

pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_secret";

/// Fresh in-memory database with migrations applied.
///
/// A single connection that never expires keeps the in-memory database alive.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub fn new_tool(slug: &str, name: &str, category: Category, status: ListingStatus) -> NewTool {
    NewTool {
        slug: slug.to_string(),
        name: name.to_string(),
        website_url: format!("https://{}.example", slug),
        short_description: format!("{} does useful things", name),
        long_description: None,
        category,
        tags: Some("ai, productivity".to_string()),
        target_audience: None,
        pricing: Some("Freemium".to_string()),
        status,
    }
}

pub fn acme_submission() -> SubmitToolDto {
    SubmitToolDto {
        name: "Acme AI".to_string(),
        website_url: "https://acme.example".to_string(),
        short_description: "Writes marketing copy in seconds".to_string(),
        category: "Writing".to_string(),
        ..Default::default()
    }
}

pub fn dummy_payment() -> PaymentConfig {
    PaymentConfig::Dummy(checkout_urls())
}

fn checkout_urls() -> CheckoutUrls {
    CheckoutUrls {
        success_url: "http://localhost:5000/checkout/success".to_string(),
        cancel_url: "http://localhost:5000/checkout/cancel".to_string(),
    }
}

/// Stripe mode with a webhook secret; no request reaches Stripe unless a
/// session is created or retrieved
pub fn stripe_payment() -> PaymentConfig {
    PaymentConfig::Stripe(StripeConfig {
        secret_key: "sk_test_123".to_string(),
        price_id: "price_123".to_string(),
        urls: checkout_urls(),
        webhook_secret: Some(TEST_WEBHOOK_SECRET.to_string()),
    })
}

/// Stripe event payload wrapping a checkout session for `slug`
pub fn checkout_session_event(event_type: &str, slug: &str, payment_status: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    json!({
        "id": "evt_test_123",
        "object": "event",
        "api_version": "2023-10-16",
        "created": now,
        "livemode": false,
        "pending_webhooks": 1,
        "request": null,
        "type": event_type,
        "data": {
            "object": {
                "id": "cs_test_123",
                "object": "checkout.session",
                "automatic_tax": { "enabled": false },
                "client_reference_id": slug,
                "created": now,
                "custom_fields": [],
                "custom_text": {},
                "expires_at": now + 86400,
                "livemode": false,
                "metadata": { "tool_slug": slug },
                "mode": "payment",
                "payment_method_types": ["card"],
                "payment_status": payment_status,
                "shipping_options": [],
                "status": "complete"
            }
        }
    })
    .to_string()
}

/// `Stripe-Signature` header value for `payload`, signed now with `secret`
pub fn sign_webhook(payload: &str, secret: &str) -> String {
    let timestamp = chrono::Utc::now().timestamp();
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(format!("{}.{}", timestamp, payload).as_bytes());
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}

/// Full application router over an in-memory database
pub async fn test_server(payment: PaymentConfig) -> TestServer {
    let renderer = Arc::new(PageRenderer::bundled().expect("Failed to load templates"));
    let services = AppServices::new(test_pool().await, &payment, renderer, TEST_SECRET_KEY);

    TestServer::new(app_routes(&services, 6)).expect("Failed to start test server")
}
