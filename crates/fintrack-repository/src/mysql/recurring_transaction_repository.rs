//! MySQL recurring transaction repository implementation.

use super::parse_uuid;
use crate::traits::RecurringTransactionRepository;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use fintrack_core::{
    CategoryId, FintrackError, FintrackResult, Frequency, Page, PageRequest, RecurringTransaction,
    RecurringTransactionId, TransactionType, UserId,
};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySqlPool};
use tracing::debug;

/// MySQL recurring transaction repository implementation.
#[derive(Clone)]
pub struct MySqlRecurringTransactionRepository {
    pool: MySqlPool,
}

impl MySqlRecurringTransactionRepository {
    /// Creates a new MySQL recurring transaction repository.
    #[must_use]
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RecurringTransactionRow {
    id: String,
    user_id: String,
    description: String,
    amount: Decimal,
    category_id: Option<String>,
    transaction_type: String,
    frequency: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    next_occurrence: NaiveDate,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<RecurringTransactionRow> for RecurringTransaction {
    type Error = FintrackError;

    fn try_from(row: RecurringTransactionRow) -> Result<Self, Self::Error> {
        let category_id = row
            .category_id
            .as_deref()
            .map(parse_uuid)
            .transpose()?
            .map(CategoryId::from_uuid);

        Ok(RecurringTransaction {
            id: RecurringTransactionId::from_uuid(parse_uuid(&row.id)?),
            user_id: UserId::from_uuid(parse_uuid(&row.user_id)?),
            description: row.description,
            amount: row.amount,
            category_id,
            transaction_type: TransactionType::from_str(&row.transaction_type)
                .unwrap_or(TransactionType::Expense),
            frequency: Frequency::from_str(&row.frequency).unwrap_or_default(),
            start_date: row.start_date,
            end_date: row.end_date,
            next_occurrence: row.next_occurrence,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

const RECURRING_COLUMNS: &str =
    "id, user_id, description, amount, category_id, transaction_type, frequency, \
     start_date, end_date, next_occurrence, is_active, created_at";

#[async_trait]
impl RecurringTransactionRepository for MySqlRecurringTransactionRepository {
    async fn find_by_id(
        &self,
        user_id: UserId,
        id: RecurringTransactionId,
    ) -> FintrackResult<Option<RecurringTransaction>> {
        let row = sqlx::query_as::<_, RecurringTransactionRow>(&format!(
            "SELECT {RECURRING_COLUMNS} FROM recurring_transactions WHERE id = ? AND user_id = ?"
        ))
        .bind(id.into_inner().to_string())
        .bind(user_id.into_inner().to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(RecurringTransaction::try_from).transpose()
    }

    async fn find_page(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> FintrackResult<Page<RecurringTransaction>> {
        debug!(
            "Listing recurring transactions for user {} page {}",
            user_id, page.page
        );

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM recurring_transactions WHERE user_id = ?")
                .bind(user_id.into_inner().to_string())
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query_as::<_, RecurringTransactionRow>(&format!(
            "SELECT {RECURRING_COLUMNS} FROM recurring_transactions WHERE user_id = ? \
             ORDER BY created_at DESC LIMIT ? OFFSET ?"
        ))
        .bind(user_id.into_inner().to_string())
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let schedules: Vec<RecurringTransaction> = rows
            .into_iter()
            .map(RecurringTransaction::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(schedules, page.page, page.size, total.unsigned_abs()))
    }

    async fn find_all(&self, user_id: UserId) -> FintrackResult<Vec<RecurringTransaction>> {
        let rows = sqlx::query_as::<_, RecurringTransactionRow>(&format!(
            "SELECT {RECURRING_COLUMNS} FROM recurring_transactions WHERE user_id = ? \
             ORDER BY created_at DESC"
        ))
        .bind(user_id.into_inner().to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(RecurringTransaction::try_from).collect()
    }

    async fn find_due(&self, today: NaiveDate) -> FintrackResult<Vec<RecurringTransaction>> {
        let rows = sqlx::query_as::<_, RecurringTransactionRow>(&format!(
            "SELECT {RECURRING_COLUMNS} FROM recurring_transactions \
             WHERE is_active = TRUE AND next_occurrence <= ? \
             ORDER BY next_occurrence ASC"
        ))
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(RecurringTransaction::try_from).collect()
    }

    async fn save(
        &self,
        recurring: &RecurringTransaction,
    ) -> FintrackResult<RecurringTransaction> {
        debug!("Saving recurring transaction for user {}", recurring.user_id);

        sqlx::query(
            r#"
            INSERT INTO recurring_transactions (id, user_id, description, amount, category_id,
                                               transaction_type, frequency, start_date, end_date,
                                               next_occurrence, is_active, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(recurring.id.into_inner().to_string())
        .bind(recurring.user_id.into_inner().to_string())
        .bind(&recurring.description)
        .bind(recurring.amount)
        .bind(recurring.category_id.map(|id| id.into_inner().to_string()))
        .bind(recurring.transaction_type.as_str())
        .bind(recurring.frequency.as_str())
        .bind(recurring.start_date)
        .bind(recurring.end_date)
        .bind(recurring.next_occurrence)
        .bind(recurring.is_active)
        .bind(recurring.created_at)
        .execute(&self.pool)
        .await?;

        self.find_by_id(recurring.user_id, recurring.id)
            .await?
            .ok_or_else(|| {
                FintrackError::Internal("Failed to fetch inserted recurring transaction".to_string())
            })
    }

    async fn update(
        &self,
        recurring: &RecurringTransaction,
    ) -> FintrackResult<RecurringTransaction> {
        debug!("Updating recurring transaction: {}", recurring.id);

        sqlx::query(
            r#"
            UPDATE recurring_transactions
            SET description = ?, amount = ?, category_id = ?, transaction_type = ?,
                frequency = ?, start_date = ?, end_date = ?, next_occurrence = ?, is_active = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&recurring.description)
        .bind(recurring.amount)
        .bind(recurring.category_id.map(|id| id.into_inner().to_string()))
        .bind(recurring.transaction_type.as_str())
        .bind(recurring.frequency.as_str())
        .bind(recurring.start_date)
        .bind(recurring.end_date)
        .bind(recurring.next_occurrence)
        .bind(recurring.is_active)
        .bind(recurring.id.into_inner().to_string())
        .bind(recurring.user_id.into_inner().to_string())
        .execute(&self.pool)
        .await?;

        self.find_by_id(recurring.user_id, recurring.id)
            .await?
            .ok_or_else(|| {
                FintrackError::Internal("Failed to fetch updated recurring transaction".to_string())
            })
    }

    async fn delete(&self, user_id: UserId, id: RecurringTransactionId) -> FintrackResult<bool> {
        debug!("Deleting recurring transaction: {}", id);

        let result = sqlx::query("DELETE FROM recurring_transactions WHERE id = ? AND user_id = ?")
            .bind(id.into_inner().to_string())
            .bind(user_id.into_inner().to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for MySqlRecurringTransactionRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlRecurringTransactionRepository")
            .finish_non_exhaustive()
    }
}
