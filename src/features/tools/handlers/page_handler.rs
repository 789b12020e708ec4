use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::Response,
    Form,
};
use minijinja::context;

use crate::core::error::AppError;
use crate::features::tools::dtos::{DirectoryQuery, SubmitToolDto};
use crate::features::tools::services::{CatalogService, SubmissionService};
use crate::shared::flash::{FlashMessage, IncomingFlash};
use crate::shared::templates::Pages;

#[derive(Clone, FromRef)]
pub struct ToolPageState {
    pub catalog: Arc<CatalogService>,
    pub submissions: Arc<SubmissionService>,
    pub pages: Pages,
    pub preview_limit: i64,
}

/// Landing page: preview of active listings plus category counts
pub async fn index(State(state): State<ToolPageState>, flash: IncomingFlash) -> Response {
    let tools = match state.catalog.landing_preview(state.preview_limit).await {
        Ok(tools) => tools,
        Err(e) => return state.pages.error(e),
    };
    let summaries = match state.catalog.category_summaries().await {
        Ok(summaries) => summaries,
        Err(e) => return state.pages.error(e),
    };

    state.pages.render(
        "index.html",
        context! { tools => tools, category_summaries => summaries },
        flash,
    )
}

/// Full directory, optionally filtered by `?category=`
pub async fn directory(
    State(state): State<ToolPageState>,
    Query(query): Query<DirectoryQuery>,
    flash: IncomingFlash,
) -> Response {
    let category = match query.category_filter() {
        Ok(category) => category,
        Err(e) => return state.pages.error(e),
    };

    let tools = match state.catalog.list_directory(category).await {
        Ok(tools) => tools,
        Err(e) => return state.pages.error(e),
    };
    let summaries = match state.catalog.category_summaries().await {
        Ok(summaries) => summaries,
        Err(e) => return state.pages.error(e),
    };

    state.pages.render(
        "directory.html",
        context! {
            tools => tools,
            category_summaries => summaries,
            selected_category => category.map(|c| c.key()),
            selected_label => category.map(|c| c.label()),
        },
        flash,
    )
}

pub async fn tool_detail(
    State(state): State<ToolPageState>,
    Path(slug): Path<String>,
    flash: IncomingFlash,
) -> Response {
    match state.catalog.get_detail(&slug).await {
        Ok(tool) => state
            .pages
            .render("tool_detail.html", context! { tool => tool }, flash),
        Err(e) => state.pages.error(e),
    }
}

pub async fn add_form(State(state): State<ToolPageState>, flash: IncomingFlash) -> Response {
    state.pages.render(
        "add_tool.html",
        context! {
            form => SubmitToolDto::default(),
            errors => Vec::<String>::new(),
        },
        flash,
    )
}

/// Create a listing from the HTML form.
///
/// Invalid input re-renders the form with the entered values; success redirects
/// to checkout when payment is required, else to the directory.
pub async fn submit_form(
    State(state): State<ToolPageState>,
    flash: IncomingFlash,
    Form(dto): Form<SubmitToolDto>,
) -> Response {
    let entered = dto.normalized();

    let (status, errors) = match state.submissions.submit(dto).await {
        Ok(tool) => {
            return if state.submissions.payment_required() {
                state.pages.redirect(
                    &format!("/checkout/{}", tool.slug),
                    Some(FlashMessage::success(
                        "Thanks! Your AI tool has been saved. Complete the payment to publish it.",
                    )),
                )
            } else {
                state.pages.redirect(
                    "/directory",
                    Some(FlashMessage::success(
                        "Thanks! Your AI tool has been added to the directory.",
                    )),
                )
            };
        }
        Err(AppError::Validation(errors)) => (StatusCode::BAD_REQUEST, errors),
        Err(AppError::Conflict(message)) => (StatusCode::CONFLICT, vec![message]),
        Err(e) => return state.pages.error(e),
    };

    tracing::debug!("Submission rejected: {}", errors.join("; "));

    state.pages.render_with_status(
        status,
        "add_tool.html",
        context! { form => entered, errors => errors },
        flash,
    )
}

/// Rendered 404 for any unknown path
pub async fn not_found(State(pages): State<Pages>) -> Response {
    pages.error(AppError::NotFound("Page not found".to_string()))
}
