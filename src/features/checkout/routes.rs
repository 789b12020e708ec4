use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::checkout::handlers::{self, CheckoutState};
use crate::features::checkout::services::CheckoutService;
use crate::shared::templates::Pages;

/// Create routes for the checkout feature
///
/// `/checkout/success` and `/checkout/cancel` are static segments and take
/// precedence over `/checkout/{slug}`.
pub fn routes(checkout: Arc<CheckoutService>, pages: Pages) -> Router {
    Router::new()
        .route("/checkout/success", get(handlers::checkout_success))
        .route("/checkout/cancel", get(handlers::checkout_cancel))
        .route("/checkout/webhook", post(handlers::checkout_webhook))
        .route("/checkout/{slug}", get(handlers::start_checkout))
        .with_state(CheckoutState { checkout, pages })
}
