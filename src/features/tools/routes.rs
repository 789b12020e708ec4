use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::tools::handlers::{self, ToolApiState, ToolPageState};
use crate::features::tools::services::{CatalogService, SubmissionService};
use crate::shared::templates::Pages;

/// HTML pages, including the 404 fallback for unknown paths
pub fn page_routes(
    catalog: Arc<CatalogService>,
    submissions: Arc<SubmissionService>,
    pages: Pages,
    preview_limit: i64,
) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/directory", get(handlers::directory))
        .route("/annuaire", get(handlers::directory))
        .route("/tool/{slug}", get(handlers::tool_detail))
        .route("/add", get(handlers::add_form).post(handlers::submit_form))
        .route("/ajouter", get(handlers::add_form).post(handlers::submit_form))
        .fallback(handlers::not_found)
        .with_state(ToolPageState {
            catalog,
            submissions,
            pages,
            preview_limit,
        })
}

/// JSON API
pub fn api_routes(catalog: Arc<CatalogService>, submissions: Arc<SubmissionService>) -> Router {
    Router::new()
        .route(
            "/api/tools",
            get(handlers::list_tools).post(handlers::submit_tool),
        )
        .route("/api/tools/{slug}", get(handlers::get_tool))
        .route("/api/categories", get(handlers::list_categories))
        .with_state(ToolApiState {
            catalog,
            submissions,
        })
}
