//! MySQL goal repository implementation.

use super::parse_uuid;
use crate::traits::GoalRepository;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use fintrack_core::{
    FintrackError, FintrackResult, Goal, GoalId, GoalType, Page, PageRequest, UserId,
};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySqlPool};
use tracing::debug;

/// MySQL goal repository implementation.
#[derive(Clone)]
pub struct MySqlGoalRepository {
    pool: MySqlPool,
}

impl MySqlGoalRepository {
    /// Creates a new MySQL goal repository.
    #[must_use]
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct GoalRow {
    id: String,
    user_id: String,
    name: String,
    description: Option<String>,
    goal_type: String,
    target_amount: Decimal,
    current_amount: Decimal,
    target_date: NaiveDate,
    is_achieved: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<GoalRow> for Goal {
    type Error = FintrackError;

    fn try_from(row: GoalRow) -> Result<Self, Self::Error> {
        Ok(Goal {
            id: GoalId::from_uuid(parse_uuid(&row.id)?),
            user_id: UserId::from_uuid(parse_uuid(&row.user_id)?),
            name: row.name,
            description: row.description,
            goal_type: GoalType::from_str(&row.goal_type).unwrap_or_default(),
            target_amount: row.target_amount,
            current_amount: row.current_amount,
            target_date: row.target_date,
            is_achieved: row.is_achieved,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const GOAL_COLUMNS: &str = "id, user_id, name, description, goal_type, target_amount, \
                            current_amount, target_date, is_achieved, created_at, updated_at";

#[async_trait]
impl GoalRepository for MySqlGoalRepository {
    async fn find_by_id(&self, user_id: UserId, id: GoalId) -> FintrackResult<Option<Goal>> {
        let row = sqlx::query_as::<_, GoalRow>(&format!(
            "SELECT {GOAL_COLUMNS} FROM goals WHERE id = ? AND user_id = ?"
        ))
        .bind(id.into_inner().to_string())
        .bind(user_id.into_inner().to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Goal::try_from).transpose()
    }

    async fn find_page(&self, user_id: UserId, page: PageRequest) -> FintrackResult<Page<Goal>> {
        debug!("Listing goals for user {} page {}", user_id, page.page);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM goals WHERE user_id = ?")
            .bind(user_id.into_inner().to_string())
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, GoalRow>(&format!(
            "SELECT {GOAL_COLUMNS} FROM goals WHERE user_id = ? \
             ORDER BY created_at DESC LIMIT ? OFFSET ?"
        ))
        .bind(user_id.into_inner().to_string())
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let goals: Vec<Goal> = rows
            .into_iter()
            .map(Goal::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(goals, page.page, page.size, total.unsigned_abs()))
    }

    async fn find_all(&self, user_id: UserId) -> FintrackResult<Vec<Goal>> {
        let rows = sqlx::query_as::<_, GoalRow>(&format!(
            "SELECT {GOAL_COLUMNS} FROM goals WHERE user_id = ? ORDER BY created_at DESC"
        ))
        .bind(user_id.into_inner().to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Goal::try_from).collect()
    }

    async fn find_active(&self, user_id: UserId) -> FintrackResult<Vec<Goal>> {
        let rows = sqlx::query_as::<_, GoalRow>(&format!(
            "SELECT {GOAL_COLUMNS} FROM goals WHERE user_id = ? AND is_achieved = FALSE \
             ORDER BY target_date ASC"
        ))
        .bind(user_id.into_inner().to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Goal::try_from).collect()
    }

    async fn find_unachieved_with_deadline_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FintrackResult<Vec<Goal>> {
        let rows = sqlx::query_as::<_, GoalRow>(&format!(
            "SELECT {GOAL_COLUMNS} FROM goals \
             WHERE is_achieved = FALSE AND target_date BETWEEN ? AND ? \
             ORDER BY target_date ASC"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Goal::try_from).collect()
    }

    async fn save(&self, goal: &Goal) -> FintrackResult<Goal> {
        debug!("Saving goal for user {}", goal.user_id);

        sqlx::query(
            r#"
            INSERT INTO goals (id, user_id, name, description, goal_type, target_amount,
                              current_amount, target_date, is_achieved, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(goal.id.into_inner().to_string())
        .bind(goal.user_id.into_inner().to_string())
        .bind(&goal.name)
        .bind(&goal.description)
        .bind(goal.goal_type.as_str())
        .bind(goal.target_amount)
        .bind(goal.current_amount)
        .bind(goal.target_date)
        .bind(goal.is_achieved)
        .bind(goal.created_at)
        .bind(goal.updated_at)
        .execute(&self.pool)
        .await?;

        self.find_by_id(goal.user_id, goal.id)
            .await?
            .ok_or_else(|| FintrackError::Internal("Failed to fetch inserted goal".to_string()))
    }

    async fn update(&self, goal: &Goal) -> FintrackResult<Goal> {
        debug!("Updating goal: {}", goal.id);

        sqlx::query(
            r#"
            UPDATE goals
            SET name = ?, description = ?, goal_type = ?, target_amount = ?,
                current_amount = ?, target_date = ?, is_achieved = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&goal.name)
        .bind(&goal.description)
        .bind(goal.goal_type.as_str())
        .bind(goal.target_amount)
        .bind(goal.current_amount)
        .bind(goal.target_date)
        .bind(goal.is_achieved)
        .bind(goal.updated_at)
        .bind(goal.id.into_inner().to_string())
        .bind(goal.user_id.into_inner().to_string())
        .execute(&self.pool)
        .await?;

        self.find_by_id(goal.user_id, goal.id)
            .await?
            .ok_or_else(|| FintrackError::Internal("Failed to fetch updated goal".to_string()))
    }

    async fn delete(&self, user_id: UserId, id: GoalId) -> FintrackResult<bool> {
        debug!("Deleting goal: {}", id);

        let result = sqlx::query("DELETE FROM goals WHERE id = ? AND user_id = ?")
            .bind(id.into_inner().to_string())
            .bind(user_id.into_inner().to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for MySqlGoalRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlGoalRepository").finish_non_exhaustive()
    }
}
