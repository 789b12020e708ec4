use std::sync::Arc;

use axum::{routing::get, Router};
use sqlx::SqlitePool;

use crate::core::config::PaymentConfig;
use crate::features::checkout::{create_gateway, routes as checkout_routes, CheckoutService};
use crate::features::tools::{
    routes as tools_routes, CatalogService, SubmissionService, ToolStore,
};
use crate::shared::flash::FlashSigner;
use crate::shared::templates::{PageRenderer, Pages};

/// Services shared by every router, built once at startup
pub struct AppServices {
    pub catalog: Arc<CatalogService>,
    pub submissions: Arc<SubmissionService>,
    pub checkout: Arc<CheckoutService>,
    pub pages: Pages,
}

impl AppServices {
    pub fn new(
        pool: SqlitePool,
        payment: &PaymentConfig,
        renderer: Arc<PageRenderer>,
        secret_key: &str,
    ) -> Self {
        let store = Arc::new(ToolStore::new(pool));

        let payment_required = payment.is_enabled();
        let gateway = create_gateway(payment);
        match &gateway {
            Some(gateway) => tracing::info!(
                "Payment enabled: provider={}",
                gateway.provider_name()
            ),
            None => tracing::info!("Payment disabled: listings go live immediately"),
        }

        let checkout = Arc::new(CheckoutService::new(Arc::clone(&store), gateway));

        Self {
            catalog: Arc::new(CatalogService::new(Arc::clone(&store))),
            submissions: Arc::new(SubmissionService::new(store, payment_required)),
            pages: Pages::new(
                renderer,
                Arc::new(FlashSigner::new(secret_key)),
                payment_required,
            ),
            checkout,
        }
    }
}

async fn health_check() -> axum::http::StatusCode {
    axum::http::StatusCode::OK
}

/// All application routes; the page router carries the 404 fallback
pub fn app_routes(services: &AppServices, preview_limit: i64) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(tools_routes::api_routes(
            Arc::clone(&services.catalog),
            Arc::clone(&services.submissions),
        ))
        .merge(checkout_routes::routes(
            Arc::clone(&services.checkout),
            services.pages.clone(),
        ))
        .merge(tools_routes::page_routes(
            Arc::clone(&services.catalog),
            Arc::clone(&services.submissions),
            services.pages.clone(),
            preview_limit,
        ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use super::AppServices;
    use crate::core::config::PaymentConfig;
    use crate::features::tools::dtos::SubmitToolDto;
    use crate::shared::templates::PageRenderer;
    use crate::shared::test_helpers::{
        acme_submission, checkout_session_event, dummy_payment, sign_webhook, stripe_payment,
        test_pool, test_server, TEST_SECRET_KEY, TEST_WEBHOOK_SECRET,
    };

    fn location(response: &axum_test::TestResponse) -> String {
        response
            .header("location")
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_services_follow_payment_mode() {
        for (payment, enabled) in [(PaymentConfig::Disabled, false), (dummy_payment(), true)] {
            let renderer = Arc::new(PageRenderer::bundled().unwrap());
            let services = AppServices::new(test_pool().await, &payment, renderer, TEST_SECRET_KEY);
            assert_eq!(services.checkout.is_enabled(), enabled);
            assert_eq!(services.submissions.payment_required(), enabled);
        }
    }

    #[tokio::test]
    async fn test_health() {
        let server = test_server(PaymentConfig::Disabled).await;
        server.get("/health").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_submit_without_payment_is_listed_immediately() {
        let server = test_server(PaymentConfig::Disabled).await;

        let response = server.post("/add").form(&acme_submission()).await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/directory");

        let detail = server.get("/tool/acme-ai").await;
        detail.assert_status_ok();
        assert!(detail.text().contains("Acme AI"));

        let api: Value = server.get("/api/tools/acme-ai").await.json();
        assert_eq!(api["data"]["status"], "active");
        assert_eq!(api["data"]["category"], "content-design");

        let directory = server.get("/directory").await;
        directory.assert_status_ok();
        // Autoescaping renders `/` as `&#x2f;` inside attributes and text
        assert!(directory.text().contains("href=\"&#x2f;tool&#x2f;acme-ai\""));
    }

    #[tokio::test]
    async fn test_unknown_pages_are_404() {
        let server = test_server(PaymentConfig::Disabled).await;

        let page = server.get("/tool/does-not-exist").await;
        page.assert_status_not_found();
        assert!(page.text().contains("Page not found"));

        server
            .get("/api/tools/does-not-exist")
            .await
            .assert_status_not_found();
        server.get("/no/such/page").await.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_invalid_form_is_rerendered_with_values() {
        let server = test_server(PaymentConfig::Disabled).await;

        let response = server
            .post("/ajouter")
            .form(&SubmitToolDto {
                name: "Half Done".into(),
                website_url: "ftp://half.example".into(),
                ..Default::default()
            })
            .await;

        response.assert_status_bad_request();
        let html = response.text();
        assert!(html.contains("Website URL must be a valid http:&#x2f;&#x2f; or https:&#x2f;&#x2f; address"));
        assert!(html.contains("Short description is required"));
        assert!(html.contains("value=\"Half Done\""));
    }

    #[tokio::test]
    async fn test_same_name_gets_distinct_slugs() {
        let server = test_server(PaymentConfig::Disabled).await;

        let first = server.post("/api/tools").json(&acme_submission()).await;
        first.assert_status(StatusCode::CREATED);
        let second = server.post("/api/tools").json(&acme_submission()).await;
        second.assert_status(StatusCode::CREATED);

        let first: Value = first.json();
        let second: Value = second.json();
        assert_eq!(first["data"]["tool"]["slug"], "acme-ai");
        assert_eq!(second["data"]["tool"]["slug"], "acme-ai-2");
        assert!(first["data"].get("checkout_path").is_none());
    }

    #[tokio::test]
    async fn test_category_filter() {
        let server = test_server(PaymentConfig::Disabled).await;

        for (name, category) in [
            ("Zeta Writer", "Writing"),
            ("alpha copy", "content-design"),
            ("Lead Bot", "Sales & Marketing"),
        ] {
            server
                .post("/api/tools")
                .json(&json!({
                    "name": name,
                    "website_url": "https://tool.example",
                    "short_description": "Does things",
                    "category": category,
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let body: Value = server
            .get("/api/tools")
            .add_query_param("category", "content-design")
            .await
            .json();
        let names: Vec<_> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["alpha copy", "Zeta Writer"]);
        assert_eq!(body["meta"]["total"], 2);

        server
            .get("/directory")
            .add_query_param("category", "gardening")
            .await
            .assert_status_bad_request();

        let categories: Value = server.get("/api/categories").await.json();
        assert_eq!(categories["data"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_paid_listing_hidden_until_checkout_success() {
        let server = test_server(dummy_payment()).await;

        let submitted = server.post("/add").form(&acme_submission()).await;
        submitted.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&submitted), "/checkout/acme-ai");

        server.get("/tool/acme-ai").await.assert_status_not_found();
        let listed: Value = server.get("/api/tools").await.json();
        assert_eq!(listed["meta"]["total"], 0);

        let checkout = server.get("/checkout/acme-ai").await;
        checkout.assert_status(StatusCode::SEE_OTHER);
        let hosted = location(&checkout);
        let return_path = hosted
            .strip_prefix("http://localhost:5000")
            .unwrap()
            .to_string();
        assert!(return_path.starts_with("/checkout/success?slug=acme-ai&session_id="));

        let success = server.get(&return_path).await;
        success.assert_status_ok();
        assert!(success.text().contains("Acme AI"));

        server.get("/tool/acme-ai").await.assert_status_ok();

        let again = server.get("/checkout/acme-ai").await;
        again.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&again), "/tool/acme-ai");
    }

    #[tokio::test]
    async fn test_checkout_cancel_sets_flash() {
        let server = test_server(dummy_payment()).await;

        let response = server.get("/checkout/cancel").await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/directory");

        let cookie = response.header("set-cookie");
        assert!(cookie.to_str().unwrap().starts_with("spectra_flash="));
    }

    #[tokio::test]
    async fn test_flash_is_shown_once_on_next_page() {
        let server = test_server(PaymentConfig::Disabled).await;

        let response = server.get("/checkout/cancel").await;
        let cookie = response.header("set-cookie");
        let pair = cookie.to_str().unwrap().split(';').next().unwrap().to_string();

        let page = server.get("/directory").add_header("cookie", pair).await;
        page.assert_status_ok();
        assert!(page.text().contains("Payment cancelled."));
        assert!(page
            .header("set-cookie")
            .to_str()
            .unwrap()
            .contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_checkout_without_payment_activates_directly() {
        let server = test_server(PaymentConfig::Disabled).await;
        server
            .post("/api/tools")
            .json(&acme_submission())
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.get("/checkout/acme-ai").await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/tool/acme-ai");

        server
            .get("/checkout/missing")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn test_success_page_without_payment() {
        let server = test_server(PaymentConfig::Disabled).await;
        server
            .post("/api/tools")
            .json(&acme_submission())
            .await
            .assert_status(StatusCode::CREATED);

        let page = server
            .get("/checkout/success")
            .add_query_param("slug", "acme-ai")
            .await;
        page.assert_status_ok();
        assert!(page.text().contains("<strong>Acme AI</strong> is listed"));

        let bare = server.get("/checkout/success").await;
        bare.assert_status_ok();
        assert!(bare.text().contains("Your AI tool has been received."));
    }

    #[tokio::test]
    async fn test_stripe_webhook_publishes_listing() {
        let server = test_server(stripe_payment()).await;

        let submitted = server.post("/api/tools").json(&acme_submission()).await;
        submitted.assert_status(StatusCode::CREATED);
        let submitted: Value = submitted.json();
        assert_eq!(submitted["data"]["tool"]["status"], "pending");
        server.get("/tool/acme-ai").await.assert_status_not_found();

        for slug in ["acme-ai", "acme-ai", "ghost-tool"] {
            let payload = checkout_session_event("checkout.session.completed", slug, "paid");
            server
                .post("/checkout/webhook")
                .add_header("stripe-signature", sign_webhook(&payload, TEST_WEBHOOK_SECRET))
                .text(payload)
                .await
                .assert_status_ok();
        }

        server.get("/tool/acme-ai").await.assert_status_ok();

        server
            .post("/checkout/webhook")
            .add_header("stripe-signature", "t=1,v1=deadbeef")
            .text("{}")
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_webhook_requires_provider() {
        let server = test_server(PaymentConfig::Disabled).await;
        server
            .post("/checkout/webhook")
            .text("{}")
            .await
            .assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }
}
