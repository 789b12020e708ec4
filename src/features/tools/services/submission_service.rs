use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::tools::dtos::SubmitToolDto;
use crate::features::tools::models::{Category, ListingStatus, NewTool, Tool};
use crate::features::tools::services::ToolStore;
use crate::shared::constants::{FALLBACK_SLUG, MAX_SLUG_ATTEMPTS};
use crate::shared::validation::NON_SLUG_CHARS;

/// Derive a URL-safe slug from a display name.
///
/// Lowercases, replaces every run of characters outside `[a-z0-9]` with a single
/// hyphen and trims hyphens from both ends.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let slug = NON_SLUG_CHARS.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// `base` for the first attempt, then `base-2`, `base-3`, ...
fn slug_candidate(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{}-{}", base, attempt)
    }
}

fn optional(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Validates submissions and creates listings
pub struct SubmissionService {
    store: Arc<ToolStore>,
    payment_required: bool,
}

impl SubmissionService {
    pub fn new(store: Arc<ToolStore>, payment_required: bool) -> Self {
        Self {
            store,
            payment_required,
        }
    }

    pub fn payment_required(&self) -> bool {
        self.payment_required
    }

    /// Validate and store a new listing.
    ///
    /// The listing is `Pending` when payment is required and `Active` otherwise.
    /// Slug collisions are resolved with a numeric suffix; an insert that loses a
    /// race to a concurrent submission moves on to the next suffix.
    pub async fn submit(&self, dto: SubmitToolDto) -> Result<Tool> {
        let dto = dto.normalized();
        dto.validate()?;

        let category = Category::parse_or_default(&dto.category)?;
        let status = if self.payment_required {
            ListingStatus::Pending
        } else {
            ListingStatus::Active
        };
        let base = slugify(&dto.name);

        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let slug = slug_candidate(&base, attempt);
            if self.store.slug_exists(&slug).await? {
                continue;
            }

            let new_tool = NewTool {
                slug,
                name: dto.name.clone(),
                website_url: dto.website_url.clone(),
                short_description: dto.short_description.clone(),
                long_description: optional(dto.long_description.clone()),
                category,
                tags: optional(dto.tags.clone()),
                target_audience: optional(dto.target_audience.clone()),
                pricing: optional(dto.pricing.clone()),
                status,
            };

            match self.store.create(new_tool).await {
                Ok(tool) => return Ok(tool),
                Err(AppError::Conflict(msg)) => {
                    tracing::debug!("Slug taken concurrently, trying next suffix: {}", msg);
                }
                Err(e) => return Err(e),
            }
        }

        tracing::warn!(
            "Gave up finding a free slug: base={}, attempts={}",
            base,
            MAX_SLUG_ATTEMPTS
        );
        Err(AppError::Conflict(format!(
            "Too many tools are already named '{}'. Please choose a more specific name.",
            dto.name
        )))
    }
}
