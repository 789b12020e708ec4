use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{FromRef, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use minijinja::context;
use serde::Deserialize;

use crate::core::error::{AppError, Result};
use crate::features::checkout::services::{CheckoutService, CheckoutStart};
use crate::features::tools::dtos::ToolResponseDto;
use crate::shared::flash::{FlashMessage, IncomingFlash};
use crate::shared::templates::Pages;
use crate::shared::types::ApiResponse;

const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

#[derive(Clone, FromRef)]
pub struct CheckoutState {
    pub checkout: Arc<CheckoutService>,
    pub pages: Pages,
}

/// Query params on the provider's success redirect
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutSuccessQuery {
    pub slug: Option<String>,
    pub session_id: Option<String>,
}

fn tool_path(slug: &str) -> String {
    format!("/tool/{}", slug)
}

/// Send the browser to the hosted payment page, or publish directly without payment
pub async fn start_checkout(
    State(state): State<CheckoutState>,
    Path(slug): Path<String>,
) -> Response {
    if !state.checkout.is_enabled() {
        return match state.checkout.activate_without_payment(&slug).await {
            Ok(tool) => state.pages.redirect(
                &tool_path(&tool.slug),
                Some(FlashMessage::success("Your AI tool is now listed in the directory.")),
            ),
            Err(e) => state.pages.error(e),
        };
    }

    match state.checkout.start_checkout(&slug).await {
        Ok(CheckoutStart::Redirect(url)) => state.pages.redirect(&url, None),
        Ok(CheckoutStart::AlreadyActive) => state.pages.redirect(
            &tool_path(&slug),
            Some(FlashMessage::info("This AI tool is already listed.")),
        ),
        Err(e) => state.pages.error(e),
    }
}

pub async fn checkout_success(
    State(state): State<CheckoutState>,
    Query(query): Query<CheckoutSuccessQuery>,
    flash: IncomingFlash,
) -> Response {
    if !state.checkout.is_enabled() {
        let slug = query.slug.filter(|s| !s.trim().is_empty());
        let tool = match slug.as_deref() {
            Some(slug) => match state.checkout.find_listing(slug).await {
                Ok(tool) => tool.map(ToolResponseDto::from),
                Err(e) => return state.pages.error(e),
            },
            None => None,
        };
        return state.pages.render(
            "checkout_success.html",
            context! { slug => slug, tool => tool },
            flash,
        );
    }

    let session_id = query.session_id.as_deref().unwrap_or_default();

    match state
        .checkout
        .confirm_success(session_id, query.slug.as_deref())
        .await
    {
        Ok(tool) => {
            let tool = ToolResponseDto::from(tool);
            state.pages.render(
                "checkout_success.html",
                context! { slug => tool.slug.clone(), tool => tool },
                flash,
            )
        }
        Err(e) => state.pages.error(e),
    }
}

pub async fn checkout_cancel(State(state): State<CheckoutState>) -> Response {
    state.checkout.confirm_cancel();
    state.pages.redirect(
        "/directory",
        Some(FlashMessage::error(
            "Payment cancelled. Your AI tool is still saved but not confirmed yet.",
        )),
    )
}

/// Provider webhook; the raw body is needed for signature verification
pub async fn checkout_webhook(
    State(state): State<CheckoutState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let payload = std::str::from_utf8(&body)
        .map_err(|_| AppError::BadRequest("Webhook body must be UTF-8".to_string()))?;
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let activated = state.checkout.handle_webhook(signature, payload).await?;
    let message = match activated {
        Some(tool) => format!("Tool '{}' activated", tool.slug),
        None => "Event ignored".to_string(),
    };

    Ok((
        StatusCode::OK,
        Json(ApiResponse::<()>::success(None, Some(message), None)),
    )
        .into_response())
}
