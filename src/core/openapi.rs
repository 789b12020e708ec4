use utoipa::{Modify, OpenApi};

use crate::features::tools::{dtos as tools_dtos, handlers as tools_handlers, models as tools_models};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        tools_handlers::api_handler::list_tools,
        tools_handlers::api_handler::get_tool,
        tools_handlers::api_handler::submit_tool,
        tools_handlers::api_handler::list_categories,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Tools
            tools_models::Category,
            tools_models::ListingStatus,
            tools_dtos::SubmitToolDto,
            tools_dtos::ToolResponseDto,
            tools_dtos::SubmittedToolDto,
            tools_dtos::CategorySummaryDto,
            ApiResponse<Vec<tools_dtos::ToolResponseDto>>,
            ApiResponse<tools_dtos::ToolResponseDto>,
            ApiResponse<tools_dtos::SubmittedToolDto>,
            ApiResponse<Vec<tools_dtos::CategorySummaryDto>>,
        )
    ),
    tags(
        (name = "tools", description = "AI tool directory (public)"),
    ),
    info(
        title = "Spectra AI Directory API",
        version = "0.1.0",
        description = "Read-only catalog and submission API",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
