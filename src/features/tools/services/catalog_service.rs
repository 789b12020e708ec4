use std::collections::HashMap;
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::tools::dtos::{CategorySummaryDto, ToolResponseDto};
use crate::features::tools::models::{Category, ListingStatus};
use crate::features::tools::services::ToolStore;
use crate::shared::validation::SLUG_REGEX;

/// Public, read-only view of the directory. Only active listings are visible.
pub struct CatalogService {
    store: Arc<ToolStore>,
}

impl CatalogService {
    pub fn new(store: Arc<ToolStore>) -> Self {
        Self { store }
    }

    /// Active listings, optionally restricted to one category, ordered by name
    pub async fn list_directory(&self, category: Option<Category>) -> Result<Vec<ToolResponseDto>> {
        let tools = self
            .store
            .list(Some(ListingStatus::Active), category)
            .await?;

        Ok(tools.into_iter().map(Into::into).collect())
    }

    /// One active listing; pending and unknown slugs are both `NotFound`
    pub async fn get_detail(&self, slug: &str) -> Result<ToolResponseDto> {
        if !SLUG_REGEX.is_match(slug) {
            return Err(AppError::NotFound(format!("Tool '{}' not found", slug)));
        }

        match self.store.find(slug).await? {
            Some(tool) if tool.is_active() => Ok(tool.into()),
            _ => Err(AppError::NotFound(format!("Tool '{}' not found", slug))),
        }
    }

    pub async fn landing_preview(&self, limit: i64) -> Result<Vec<ToolResponseDto>> {
        let tools = self.store.list_preview(limit).await?;
        Ok(tools.into_iter().map(Into::into).collect())
    }

    /// Every category in display order with its active listing count
    pub async fn category_summaries(&self) -> Result<Vec<CategorySummaryDto>> {
        let counts: HashMap<Category, i64> = self
            .store
            .count_by_category(ListingStatus::Active)
            .await?
            .into_iter()
            .collect();

        Ok(Category::ALL
            .into_iter()
            .map(|category| CategorySummaryDto {
                key: category,
                label: category.label().to_string(),
                count: counts.get(&category).copied().unwrap_or(0),
            })
            .collect())
    }
}
