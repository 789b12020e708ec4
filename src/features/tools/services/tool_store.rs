//! Record store for tool listings backed by the `tools` table.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::core::error::{AppError, Result};
use crate::features::tools::models::{Category, ListingStatus, NewTool, Tool};

const TOOL_COLUMNS: &str = "id, slug, name, website_url, short_description, long_description, \
     category, tags, target_audience, pricing, is_featured, status, created_at, activated_at";

/// Durable storage and lookup of listings
pub struct ToolStore {
    pool: SqlitePool,
}

impl ToolStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a listing. Fails with `Conflict` when the slug is already taken.
    pub async fn create(&self, new_tool: NewTool) -> Result<Tool> {
        let now = Utc::now();
        let activated_at = (new_tool.status == ListingStatus::Active).then_some(now);

        let sql = format!(
            r#"
            INSERT INTO tools (
                slug, name, website_url, short_description, long_description,
                category, tags, target_audience, pricing, is_featured,
                status, created_at, activated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?)
            RETURNING {}
            "#,
            TOOL_COLUMNS
        );

        let tool = sqlx::query_as::<_, Tool>(&sql)
            .bind(&new_tool.slug)
            .bind(&new_tool.name)
            .bind(&new_tool.website_url)
            .bind(&new_tool.short_description)
            .bind(&new_tool.long_description)
            .bind(new_tool.category)
            .bind(&new_tool.tags)
            .bind(&new_tool.target_audience)
            .bind(&new_tool.pricing)
            .bind(new_tool.status)
            .bind(now)
            .bind(activated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    AppError::Conflict(format!("Slug '{}' is already taken", new_tool.slug))
                }
                e => {
                    tracing::error!("Failed to insert tool: {:?}", e);
                    AppError::Database(e)
                }
            })?;

        tracing::info!(
            "Tool created: slug={}, category={}, status={}",
            tool.slug,
            tool.category.key(),
            tool.status
        );

        Ok(tool)
    }

    /// Get a listing by slug regardless of status
    pub async fn get(&self, slug: &str) -> Result<Tool> {
        self.find(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tool '{}' not found", slug)))
    }

    pub async fn find(&self, slug: &str) -> Result<Option<Tool>> {
        let sql = format!("SELECT {} FROM tools WHERE slug = ?", TOOL_COLUMNS);

        sqlx::query_as::<_, Tool>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get tool by slug: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn slug_exists(&self, slug: &str) -> Result<bool> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tools WHERE slug = ?")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check slug: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(count > 0)
    }

    /// List listings ordered by name (case-insensitive), slug as tie break
    pub async fn list(
        &self,
        status: Option<ListingStatus>,
        category: Option<Category>,
    ) -> Result<Vec<Tool>> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM tools WHERE 1 = 1", TOOL_COLUMNS));

        if let Some(status) = status {
            query.push(" AND status = ").push_bind(status);
        }
        if let Some(category) = category {
            query.push(" AND category = ").push_bind(category);
        }
        query.push(" ORDER BY name COLLATE NOCASE ASC, slug ASC");

        query
            .build_query_as::<Tool>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list tools: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Active listings for the landing page: featured first, then by name
    pub async fn list_preview(&self, limit: i64) -> Result<Vec<Tool>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM tools
            WHERE status = ?
            ORDER BY is_featured DESC, name COLLATE NOCASE ASC, slug ASC
            LIMIT ?
            "#,
            TOOL_COLUMNS
        );

        sqlx::query_as::<_, Tool>(&sql)
            .bind(ListingStatus::Active)
            .bind(limit.max(0))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list preview tools: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Number of listings per category with the given status.
    ///
    /// Categories without listings are absent from the result.
    pub async fn count_by_category(&self, status: ListingStatus) -> Result<Vec<(Category, i64)>> {
        sqlx::query_as::<_, (Category, i64)>(
            "SELECT category, COUNT(*) FROM tools WHERE status = ? GROUP BY category",
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count tools by category: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Move a listing from pending to active.
    ///
    /// Activating an already active listing returns it unchanged.
    pub async fn activate(&self, slug: &str) -> Result<Tool> {
        let sql = format!(
            r#"
            UPDATE tools
            SET status = ?, activated_at = ?
            WHERE slug = ? AND status = ?
            RETURNING {}
            "#,
            TOOL_COLUMNS
        );

        let updated = sqlx::query_as::<_, Tool>(&sql)
            .bind(ListingStatus::Active)
            .bind(Utc::now())
            .bind(slug)
            .bind(ListingStatus::Pending)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to activate tool: {:?}", e);
                AppError::Database(e)
            })?;

        match updated {
            Some(tool) => {
                tracing::info!("Tool activated: slug={}", tool.slug);
                Ok(tool)
            }
            None => {
                let tool = self.get(slug).await?;
                tracing::debug!("Tool already active: slug={}", tool.slug);
                Ok(tool)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{new_tool, test_pool};

    #[tokio::test]
    async fn test_create_and_get() {
        let store = ToolStore::new(test_pool().await);

        let created = store
            .create(new_tool("acme-ai", "Acme AI", Category::ContentDesign, ListingStatus::Active))
            .await
            .unwrap();
        assert_eq!(created.slug, "acme-ai");
        assert!(created.is_active());
        assert!(created.activated_at.is_some());

        let fetched = store.get("acme-ai").await.unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.category, Category::ContentDesign);
    }

    #[tokio::test]
    async fn test_get_unknown_slug_is_not_found() {
        let store = ToolStore::new(test_pool().await);
        assert!(matches!(
            store.get("nope").await,
            Err(AppError::NotFound(_))
        ));
        assert!(!store.slug_exists("nope").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_conflict() {
        let store = ToolStore::new(test_pool().await);
        store
            .create(new_tool("acme-ai", "Acme AI", Category::ContentDesign, ListingStatus::Active))
            .await
            .unwrap();

        let result = store
            .create(new_tool("acme-ai", "Acme AI", Category::SalesMarketing, ListingStatus::Pending))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert!(store.slug_exists("acme-ai").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_filters_and_orders_by_name() {
        let store = ToolStore::new(test_pool().await);
        for (slug, name, category, status) in [
            ("zeta", "zeta", Category::DataAnalytics, ListingStatus::Active),
            ("alpha", "Alpha", Category::DataAnalytics, ListingStatus::Active),
            ("beta", "beta", Category::DataAnalytics, ListingStatus::Pending),
            ("gamma", "Gamma", Category::DeveloperOps, ListingStatus::Active),
        ] {
            store.create(new_tool(slug, name, category, status)).await.unwrap();
        }

        let all: Vec<_> = store
            .list(None, None)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.slug)
            .collect();
        assert_eq!(all, vec!["alpha", "beta", "gamma", "zeta"]);

        let active_data: Vec<_> = store
            .list(Some(ListingStatus::Active), Some(Category::DataAnalytics))
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.slug)
            .collect();
        assert_eq!(active_data, vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn test_activate_is_one_way_and_idempotent() {
        let store = ToolStore::new(test_pool().await);
        store
            .create(new_tool("acme-ai", "Acme AI", Category::ContentDesign, ListingStatus::Pending))
            .await
            .unwrap();

        let first = store.activate("acme-ai").await.unwrap();
        assert!(first.is_active());
        let activated_at = first.activated_at;
        assert!(activated_at.is_some());

        let second = store.activate("acme-ai").await.unwrap();
        assert!(second.is_active());
        assert_eq!(second.activated_at, activated_at);

        assert!(matches!(
            store.activate("missing").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_count_by_category_only_counts_status() {
        let store = ToolStore::new(test_pool().await);
        store
            .create(new_tool("a", "A", Category::SalesMarketing, ListingStatus::Active))
            .await
            .unwrap();
        store
            .create(new_tool("b", "B", Category::SalesMarketing, ListingStatus::Active))
            .await
            .unwrap();
        store
            .create(new_tool("c", "C", Category::SalesMarketing, ListingStatus::Pending))
            .await
            .unwrap();

        let counts = store.count_by_category(ListingStatus::Active).await.unwrap();
        assert_eq!(counts, vec![(Category::SalesMarketing, 2)]);
    }

    #[tokio::test]
    async fn test_preview_limit() {
        let store = ToolStore::new(test_pool().await);
        for name in ["d", "c", "b", "a"] {
            store
                .create(new_tool(name, name, Category::DataAnalytics, ListingStatus::Active))
                .await
                .unwrap();
        }

        let preview: Vec<_> = store
            .list_preview(2)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.slug)
            .collect();
        assert_eq!(preview, vec!["a", "b"]);
    }
}
