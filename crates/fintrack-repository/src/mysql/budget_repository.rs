//! MySQL budget repository implementation.
//!
//! Spent amounts come from a `LEFT JOIN` against expense transactions in
//! the budget's category and date window, so listing N budgets is a
//! single round trip.

use super::parse_uuid;
use crate::traits::BudgetRepository;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use fintrack_core::{
    Budget, BudgetId, BudgetPeriod, CategoryId, FintrackError, FintrackResult, Page, PageRequest,
    UserId,
};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySqlPool};
use tracing::debug;

/// MySQL budget repository implementation.
#[derive(Clone)]
pub struct MySqlBudgetRepository {
    pool: MySqlPool,
}

impl MySqlBudgetRepository {
    /// Creates a new MySQL budget repository.
    #[must_use]
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct BudgetRow {
    id: String,
    user_id: String,
    category_id: String,
    amount: Decimal,
    period: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    alert_threshold: Decimal,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BudgetRow> for Budget {
    type Error = FintrackError;

    fn try_from(row: BudgetRow) -> Result<Self, Self::Error> {
        Ok(Budget {
            id: BudgetId::from_uuid(parse_uuid(&row.id)?),
            user_id: UserId::from_uuid(parse_uuid(&row.user_id)?),
            category_id: CategoryId::from_uuid(parse_uuid(&row.category_id)?),
            amount: row.amount,
            period: BudgetPeriod::from_str(&row.period).unwrap_or_default(),
            start_date: row.start_date,
            end_date: row.end_date,
            alert_threshold: row.alert_threshold,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct BudgetWithSpentRow {
    #[sqlx(flatten)]
    budget: BudgetRow,
    spent: Decimal,
}

impl TryFrom<BudgetWithSpentRow> for (Budget, Decimal) {
    type Error = FintrackError;

    fn try_from(row: BudgetWithSpentRow) -> Result<Self, Self::Error> {
        Ok((Budget::try_from(row.budget)?, row.spent))
    }
}

const BUDGET_COLUMNS: &str = "id, user_id, category_id, amount, period, start_date, end_date, \
                              alert_threshold, is_active, created_at, updated_at";

/// Selects budgets alongside the summed expense transactions that fall in
/// each budget's category and date window.
const BUDGET_WITH_SPENT_SELECT: &str = r"
    SELECT b.id, b.user_id, b.category_id, b.amount, b.period, b.start_date, b.end_date,
           b.alert_threshold, b.is_active, b.created_at, b.updated_at,
           COALESCE(SUM(t.amount), 0) AS spent
    FROM budgets b
    LEFT JOIN transactions t
           ON t.user_id = b.user_id
          AND t.category_id = b.category_id
          AND t.transaction_type = 'EXPENSE'
          AND t.date BETWEEN b.start_date AND b.end_date
";

#[async_trait]
impl BudgetRepository for MySqlBudgetRepository {
    async fn find_by_id(&self, user_id: UserId, id: BudgetId) -> FintrackResult<Option<Budget>> {
        let row = sqlx::query_as::<_, BudgetRow>(&format!(
            "SELECT {BUDGET_COLUMNS} FROM budgets WHERE id = ? AND user_id = ?"
        ))
        .bind(id.into_inner().to_string())
        .bind(user_id.into_inner().to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Budget::try_from).transpose()
    }

    async fn find_by_id_with_spent(
        &self,
        user_id: UserId,
        id: BudgetId,
    ) -> FintrackResult<Option<(Budget, Decimal)>> {
        let row = sqlx::query_as::<_, BudgetWithSpentRow>(&format!(
            "{BUDGET_WITH_SPENT_SELECT} WHERE b.id = ? AND b.user_id = ? GROUP BY b.id"
        ))
        .bind(id.into_inner().to_string())
        .bind(user_id.into_inner().to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(<(Budget, Decimal)>::try_from).transpose()
    }

    async fn find_page_with_spent(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> FintrackResult<Page<(Budget, Decimal)>> {
        debug!("Listing budgets for user {} page {}", user_id, page.page);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM budgets WHERE user_id = ?")
            .bind(user_id.into_inner().to_string())
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, BudgetWithSpentRow>(&format!(
            "{BUDGET_WITH_SPENT_SELECT} WHERE b.user_id = ? GROUP BY b.id \
             ORDER BY b.created_at DESC LIMIT ? OFFSET ?"
        ))
        .bind(user_id.into_inner().to_string())
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let budgets: Vec<(Budget, Decimal)> = rows
            .into_iter()
            .map(<(Budget, Decimal)>::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(budgets, page.page, page.size, total.unsigned_abs()))
    }

    async fn find_all_with_spent(
        &self,
        user_id: UserId,
    ) -> FintrackResult<Vec<(Budget, Decimal)>> {
        let rows = sqlx::query_as::<_, BudgetWithSpentRow>(&format!(
            "{BUDGET_WITH_SPENT_SELECT} WHERE b.user_id = ? GROUP BY b.id \
             ORDER BY b.created_at DESC"
        ))
        .bind(user_id.into_inner().to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(<(Budget, Decimal)>::try_from).collect()
    }

    async fn find_current_with_spent_all_users(
        &self,
        today: NaiveDate,
    ) -> FintrackResult<Vec<(Budget, Decimal)>> {
        let rows = sqlx::query_as::<_, BudgetWithSpentRow>(&format!(
            "{BUDGET_WITH_SPENT_SELECT} \
             WHERE b.is_active = TRUE AND ? BETWEEN b.start_date AND b.end_date \
             GROUP BY b.id"
        ))
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(<(Budget, Decimal)>::try_from).collect()
    }

    async fn find_all(&self, user_id: UserId) -> FintrackResult<Vec<Budget>> {
        let rows = sqlx::query_as::<_, BudgetRow>(&format!(
            "SELECT {BUDGET_COLUMNS} FROM budgets WHERE user_id = ? ORDER BY created_at DESC"
        ))
        .bind(user_id.into_inner().to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Budget::try_from).collect()
    }

    async fn save(&self, budget: &Budget) -> FintrackResult<Budget> {
        debug!("Saving budget for user {}", budget.user_id);

        sqlx::query(
            r#"
            INSERT INTO budgets (id, user_id, category_id, amount, period, start_date,
                                end_date, alert_threshold, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(budget.id.into_inner().to_string())
        .bind(budget.user_id.into_inner().to_string())
        .bind(budget.category_id.into_inner().to_string())
        .bind(budget.amount)
        .bind(budget.period.as_str())
        .bind(budget.start_date)
        .bind(budget.end_date)
        .bind(budget.alert_threshold)
        .bind(budget.is_active)
        .bind(budget.created_at)
        .bind(budget.updated_at)
        .execute(&self.pool)
        .await?;

        self.find_by_id(budget.user_id, budget.id)
            .await?
            .ok_or_else(|| FintrackError::Internal("Failed to fetch inserted budget".to_string()))
    }

    async fn update(&self, budget: &Budget) -> FintrackResult<Budget> {
        debug!("Updating budget: {}", budget.id);

        sqlx::query(
            r#"
            UPDATE budgets
            SET category_id = ?, amount = ?, period = ?, start_date = ?, end_date = ?,
                alert_threshold = ?, is_active = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(budget.category_id.into_inner().to_string())
        .bind(budget.amount)
        .bind(budget.period.as_str())
        .bind(budget.start_date)
        .bind(budget.end_date)
        .bind(budget.alert_threshold)
        .bind(budget.is_active)
        .bind(budget.updated_at)
        .bind(budget.id.into_inner().to_string())
        .bind(budget.user_id.into_inner().to_string())
        .execute(&self.pool)
        .await?;

        self.find_by_id(budget.user_id, budget.id)
            .await?
            .ok_or_else(|| FintrackError::Internal("Failed to fetch updated budget".to_string()))
    }

    async fn delete(&self, user_id: UserId, id: BudgetId) -> FintrackResult<bool> {
        debug!("Deleting budget: {}", id);

        let result = sqlx::query("DELETE FROM budgets WHERE id = ? AND user_id = ?")
            .bind(id.into_inner().to_string())
            .bind(user_id.into_inner().to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for MySqlBudgetRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlBudgetRepository").finish_non_exhaustive()
    }
}
