use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::tools::dtos::{
    CategorySummaryDto, DirectoryQuery, SubmitToolDto, SubmittedToolDto, ToolResponseDto,
};
use crate::features::tools::services::{CatalogService, SubmissionService};
use crate::shared::types::{ApiResponse, Meta};

#[derive(Clone, FromRef)]
pub struct ToolApiState {
    pub catalog: Arc<CatalogService>,
    pub submissions: Arc<SubmissionService>,
}

/// List active tools
#[utoipa::path(
    get,
    path = "/api/tools",
    params(DirectoryQuery),
    responses(
        (status = 200, description = "Active tools ordered by name", body = ApiResponse<Vec<ToolResponseDto>>),
        (status = 400, description = "Unknown category")
    ),
    tag = "tools"
)]
pub async fn list_tools(
    State(catalog): State<Arc<CatalogService>>,
    Query(query): Query<DirectoryQuery>,
) -> Result<Json<ApiResponse<Vec<ToolResponseDto>>>> {
    let tools = catalog.list_directory(query.category_filter()?).await?;
    let total = tools.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(tools),
        None,
        Some(Meta { total }),
    )))
}

/// Get an active tool by slug
#[utoipa::path(
    get,
    path = "/api/tools/{slug}",
    params(
        ("slug" = String, Path, description = "Tool slug")
    ),
    responses(
        (status = 200, description = "Tool found", body = ApiResponse<ToolResponseDto>),
        (status = 404, description = "Tool not found or not yet active")
    ),
    tag = "tools"
)]
pub async fn get_tool(
    State(catalog): State<Arc<CatalogService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<ToolResponseDto>>> {
    let tool = catalog.get_detail(&slug).await?;
    Ok(Json(ApiResponse::success(Some(tool), None, None)))
}

/// Submit a new tool
///
/// The listing is active immediately unless payment is configured, in which case
/// `checkout_path` points at the checkout redirect.
#[utoipa::path(
    post,
    path = "/api/tools",
    request_body = SubmitToolDto,
    responses(
        (status = 201, description = "Tool submitted", body = ApiResponse<SubmittedToolDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "No free slug for this name")
    ),
    tag = "tools"
)]
pub async fn submit_tool(
    State(submissions): State<Arc<SubmissionService>>,
    AppJson(dto): AppJson<SubmitToolDto>,
) -> Result<(StatusCode, Json<ApiResponse<SubmittedToolDto>>)> {
    let tool = submissions.submit(dto).await?;
    let checkout_path =
        (!tool.is_active()).then(|| format!("/checkout/{}", tool.slug));

    let submitted = SubmittedToolDto {
        tool: tool.into(),
        checkout_path,
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(submitted),
            Some("Tool submitted successfully".to_string()),
            None,
        )),
    ))
}

/// List categories with active tool counts
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "All categories in display order", body = ApiResponse<Vec<CategorySummaryDto>>),
    ),
    tag = "tools"
)]
pub async fn list_categories(
    State(catalog): State<Arc<CatalogService>>,
) -> Result<Json<ApiResponse<Vec<CategorySummaryDto>>>> {
    let categories = catalog.category_summaries().await?;
    Ok(Json(ApiResponse::success(Some(categories), None, None)))
}
