use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

use super::Category;

/// Listing status; only ever moves from `Pending` to `Active`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    /// Waiting for checkout confirmation, hidden from public views
    Pending,
    /// Visible in the public directory
    Active,
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingStatus::Pending => write!(f, "pending"),
            ListingStatus::Active => write!(f, "active"),
        }
    }
}

/// Database model for a tool listing
#[derive(Debug, Clone, FromRow)]
pub struct Tool {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub website_url: String,
    pub short_description: String,
    pub long_description: Option<String>,
    pub category: Category,
    pub tags: Option<String>,
    pub target_audience: Option<String>,
    pub pricing: Option<String>,
    pub is_featured: bool,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub activated_at: Option<DateTime<Utc>>,
}

impl Tool {
    pub fn is_active(&self) -> bool {
        self.status == ListingStatus::Active
    }

    /// Comma separated tags, trimmed, empties dropped
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Data for inserting a new listing
#[derive(Debug, Clone)]
pub struct NewTool {
    pub slug: String,
    pub name: String,
    pub website_url: String,
    pub short_description: String,
    pub long_description: Option<String>,
    pub category: Category,
    pub tags: Option<String>,
    pub target_audience: Option<String>,
    pub pricing: Option<String>,
    pub status: ListingStatus,
}
