use serde::{Deserialize, Serialize};
use sqlx::Type;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::core::error::AppError;

/// The six directory categories, stored by their kebab-case key
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[default]
    ProductivityAutomation,
    SalesMarketing,
    CustomerSupport,
    DataAnalytics,
    ContentDesign,
    DeveloperOps,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 6] = [
        Category::ProductivityAutomation,
        Category::SalesMarketing,
        Category::CustomerSupport,
        Category::DataAnalytics,
        Category::ContentDesign,
        Category::DeveloperOps,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Category::ProductivityAutomation => "productivity-automation",
            Category::SalesMarketing => "sales-marketing",
            Category::CustomerSupport => "customer-support",
            Category::DataAnalytics => "data-analytics",
            Category::ContentDesign => "content-design",
            Category::DeveloperOps => "developer-ops",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::ProductivityAutomation => "Productivity & Automation",
            Category::SalesMarketing => "Sales & Marketing",
            Category::CustomerSupport => "Customer Support",
            Category::DataAnalytics => "Data & Analytics",
            Category::ContentDesign => "Content & Design",
            Category::DeveloperOps => "Developer & Ops",
        }
    }

    /// Short names people type instead of the full label
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Category::ProductivityAutomation => &["productivity", "automation", "workflow"],
            Category::SalesMarketing => &["sales", "marketing", "seo"],
            Category::CustomerSupport => &["support", "customer service", "chatbot"],
            Category::DataAnalytics => &["data", "analytics", "research"],
            Category::ContentDesign => &["content", "design", "writing", "image", "video"],
            Category::DeveloperOps => &["developer", "dev", "ops", "devops", "coding"],
        }
    }

    /// Match a key, label or alias, ignoring case and surrounding whitespace
    pub fn parse(input: &str) -> Option<Category> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        Self::ALL.into_iter().find(|c| {
            c.key() == needle
                || c.label().to_lowercase() == needle
                || c.aliases().contains(&needle.as_str())
        })
    }

    /// Like [`Category::parse`], but an empty value selects the default category
    pub fn parse_or_default(input: &str) -> Result<Category, AppError> {
        if input.trim().is_empty() {
            return Ok(Category::default());
        }
        input.parse()
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::parse(s).ok_or_else(|| AppError::validation(format!("Unknown category '{}'", s)))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_label_and_alias() {
        assert_eq!(
            Category::parse("content-design"),
            Some(Category::ContentDesign)
        );
        assert_eq!(
            Category::parse("  Sales & Marketing "),
            Some(Category::SalesMarketing)
        );
        assert_eq!(Category::parse("Writing"), Some(Category::ContentDesign));
        assert_eq!(Category::parse("DEVOPS"), Some(Category::DeveloperOps));
        assert_eq!(Category::parse("gardening"), None);
        assert_eq!(Category::parse(""), None);
    }

    #[test]
    fn test_parse_or_default() {
        assert_eq!(
            Category::parse_or_default("   ").unwrap(),
            Category::ProductivityAutomation
        );
        assert!(matches!(
            Category::parse_or_default("gardening"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_keys_are_unique_and_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.key()), Some(category));
            assert_eq!(Category::parse(category.label()), Some(category));
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.key()));
        }
    }
}
