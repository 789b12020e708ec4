use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::features::tools::models::{Category, ListingStatus, Tool};
use crate::shared::constants::{
    MAX_LONG_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, MAX_SHORT_DESCRIPTION_LENGTH,
    MAX_SHORT_FIELD_LENGTH, MAX_URL_LENGTH,
};
use crate::shared::validation::is_http_url;

/// Request DTO for submitting a new tool.
///
/// Shared by the HTML form (`application/x-www-form-urlencoded`) and the JSON API,
/// so every field defaults to empty when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitToolDto {
    /// Display name, also the source of the slug
    #[serde(default)]
    #[validate(length(min = 1, max = MAX_NAME_LENGTH, message = "Name is required (max 120 characters)"))]
    pub name: String,

    #[serde(default)]
    #[validate(
        length(min = 1, max = MAX_URL_LENGTH, message = "Website URL is required"),
        custom(function = "validate_http_url")
    )]
    pub website_url: String,

    #[serde(default)]
    #[validate(length(
        min = 1,
        max = MAX_SHORT_DESCRIPTION_LENGTH,
        message = "Short description is required (max 280 characters)"
    ))]
    pub short_description: String,

    #[serde(default)]
    #[validate(length(
        max = MAX_LONG_DESCRIPTION_LENGTH,
        message = "Long description must not exceed 5000 characters"
    ))]
    pub long_description: String,

    /// Category key, label or alias; empty selects the default category
    #[serde(default)]
    #[validate(custom(function = "validate_category"))]
    pub category: String,

    /// Comma separated tags
    #[serde(default)]
    #[validate(length(max = MAX_SHORT_FIELD_LENGTH, message = "Tags must not exceed 255 characters"))]
    pub tags: String,

    #[serde(default)]
    #[validate(length(
        max = MAX_SHORT_FIELD_LENGTH,
        message = "Target audience must not exceed 255 characters"
    ))]
    pub target_audience: String,

    #[serde(default)]
    #[validate(length(max = MAX_SHORT_FIELD_LENGTH, message = "Pricing must not exceed 255 characters"))]
    pub pricing: String,
}

impl SubmitToolDto {
    /// Copy with surrounding whitespace removed from every field
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            website_url: self.website_url.trim().to_string(),
            short_description: self.short_description.trim().to_string(),
            long_description: self.long_description.trim().to_string(),
            category: self.category.trim().to_string(),
            tags: self.tags.trim().to_string(),
            target_audience: self.target_audience.trim().to_string(),
            pricing: self.pricing.trim().to_string(),
        }
    }
}

fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || is_http_url(value) {
        return Ok(());
    }
    Err(ValidationError::new("url")
        .with_message("Website URL must be a valid http:// or https:// address".into()))
}

fn validate_category(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || Category::parse(value).is_some() {
        return Ok(());
    }
    Err(ValidationError::new("category").with_message("Please choose one of the listed categories".into()))
}

/// Response DTO for a tool listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ToolResponseDto {
    pub slug: String,
    pub name: String,
    pub website_url: String,
    pub short_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    pub category: Category,
    pub category_label: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<String>,
    pub is_featured: bool,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    /// Relative URL of the public detail page
    pub detail_path: String,
}

impl From<Tool> for ToolResponseDto {
    fn from(t: Tool) -> Self {
        Self {
            tags: t.tag_list(),
            detail_path: format!("/tool/{}", t.slug),
            category_label: t.category.label().to_string(),
            slug: t.slug,
            name: t.name,
            website_url: t.website_url,
            short_description: t.short_description,
            long_description: t.long_description,
            category: t.category,
            target_audience: t.target_audience,
            pricing: t.pricing,
            is_featured: t.is_featured,
            status: t.status,
            created_at: t.created_at,
        }
    }
}

/// Response DTO after a successful submission
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmittedToolDto {
    pub tool: ToolResponseDto,
    /// Where to send the user to pay; absent when the listing is already live
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_path: Option<String>,
}

/// Category with the number of active listings in it
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategorySummaryDto {
    pub key: Category,
    pub label: String,
    pub count: i64,
}

/// Query params for directory listings
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DirectoryQuery {
    /// Category key, label or alias
    pub category: Option<String>,
}

impl DirectoryQuery {
    /// Parse the optional filter; an empty value means "all categories"
    pub fn category_filter(&self) -> crate::core::error::Result<Option<Category>> {
        match self.category.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value.parse().map(Some),
        }
    }
}
