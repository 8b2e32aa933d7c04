//! MySQL category repository implementation.

use super::parse_uuid;
use crate::traits::CategoryRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fintrack_core::{Category, CategoryId, FintrackError, FintrackResult, UserId};
use sqlx::{FromRow, MySqlPool};
use tracing::debug;

/// MySQL category repository implementation.
#[derive(Clone)]
pub struct MySqlCategoryRepository {
    pool: MySqlPool,
}

impl MySqlCategoryRepository {
    /// Creates a new MySQL category repository.
    #[must_use]
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: String,
    user_id: String,
    name: String,
    color: String,
    icon: String,
    is_default: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<CategoryRow> for Category {
    type Error = FintrackError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Category {
            id: CategoryId::from_uuid(parse_uuid(&row.id)?),
            user_id: UserId::from_uuid(parse_uuid(&row.user_id)?),
            name: row.name,
            color: row.color,
            icon: row.icon,
            is_default: row.is_default,
            created_at: row.created_at,
        })
    }
}

const CATEGORY_COLUMNS: &str = "id, user_id, name, color, icon, is_default, created_at";

#[async_trait]
impl CategoryRepository for MySqlCategoryRepository {
    async fn find_by_id(
        &self,
        user_id: UserId,
        id: CategoryId,
    ) -> FintrackResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ? AND user_id = ?"
        ))
        .bind(id.into_inner().to_string())
        .bind(user_id.into_inner().to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Category::try_from).transpose()
    }

    async fn find_all(&self, user_id: UserId) -> FintrackResult<Vec<Category>> {
        debug!("Listing categories for user {}", user_id);

        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE user_id = ? ORDER BY name ASC"
        ))
        .bind(user_id.into_inner().to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Category::try_from).collect()
    }

    async fn find_by_name(&self, user_id: UserId, name: &str) -> FintrackResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories \
             WHERE user_id = ? AND LOWER(name) = LOWER(?)"
        ))
        .bind(user_id.into_inner().to_string())
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Category::try_from).transpose()
    }

    async fn exists_by_name(&self, user_id: UserId, name: &str) -> FintrackResult<bool> {
        let result: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM categories WHERE user_id = ? AND LOWER(name) = LOWER(?) LIMIT 1",
        )
        .bind(user_id.into_inner().to_string())
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result.is_some())
    }

    async fn save(&self, category: &Category) -> FintrackResult<Category> {
        debug!("Saving category '{}' for user {}", category.name, category.user_id);

        sqlx::query(
            r#"
            INSERT INTO categories (id, user_id, name, color, icon, is_default, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(category.id.into_inner().to_string())
        .bind(category.user_id.into_inner().to_string())
        .bind(&category.name)
        .bind(&category.color)
        .bind(&category.icon)
        .bind(category.is_default)
        .bind(category.created_at)
        .execute(&self.pool)
        .await?;

        self.find_by_id(category.user_id, category.id)
            .await?
            .ok_or_else(|| FintrackError::Internal("Failed to fetch inserted category".to_string()))
    }

    async fn save_all(&self, categories: &[Category]) -> FintrackResult<()> {
        let mut tx = self.pool.begin().await?;

        for category in categories {
            sqlx::query(
                r#"
                INSERT INTO categories (id, user_id, name, color, icon, is_default, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(category.id.into_inner().to_string())
            .bind(category.user_id.into_inner().to_string())
            .bind(&category.name)
            .bind(&category.color)
            .bind(&category.icon)
            .bind(category.is_default)
            .bind(category.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn update(&self, category: &Category) -> FintrackResult<Category> {
        debug!("Updating category: {}", category.id);

        sqlx::query(
            "UPDATE categories SET name = ?, color = ?, icon = ? WHERE id = ? AND user_id = ?",
        )
        .bind(&category.name)
        .bind(&category.color)
        .bind(&category.icon)
        .bind(category.id.into_inner().to_string())
        .bind(category.user_id.into_inner().to_string())
        .execute(&self.pool)
        .await?;

        self.find_by_id(category.user_id, category.id)
            .await?
            .ok_or_else(|| FintrackError::Internal("Failed to fetch updated category".to_string()))
    }

    async fn delete(&self, user_id: UserId, id: CategoryId) -> FintrackResult<bool> {
        debug!("Deleting category: {}", id);

        // transactions.category_id is ON DELETE SET NULL, so spending
        // history survives as uncategorized
        let result = sqlx::query("DELETE FROM categories WHERE id = ? AND user_id = ?")
            .bind(id.into_inner().to_string())
            .bind(user_id.into_inner().to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for MySqlCategoryRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlCategoryRepository").finish_non_exhaustive()
    }
}
