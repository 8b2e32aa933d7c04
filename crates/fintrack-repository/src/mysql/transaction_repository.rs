//! MySQL transaction repository implementation.

use super::parse_uuid;
use crate::traits::{
    CategorySpend, DayOfWeekSpend, MonthlyTotals, PeriodTotals, TransactionFilter,
    TransactionRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use fintrack_core::{
    CategoryId, FintrackError, FintrackResult, Page, PageRequest, Transaction, TransactionId,
    TransactionType, UserId,
};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};
use tracing::debug;

/// MySQL transaction repository implementation.
#[derive(Clone)]
pub struct MySqlTransactionRepository {
    pool: MySqlPool,
}

impl MySqlTransactionRepository {
    /// Creates a new MySQL transaction repository.
    #[must_use]
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TransactionRow {
    id: String,
    user_id: String,
    description: String,
    amount: Decimal,
    transaction_type: String,
    date: NaiveDate,
    category_id: Option<String>,
    notes: Option<String>,
    is_recurring: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = FintrackError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let category_id = row
            .category_id
            .as_deref()
            .map(parse_uuid)
            .transpose()?
            .map(CategoryId::from_uuid);

        Ok(Transaction {
            id: TransactionId::from_uuid(parse_uuid(&row.id)?),
            user_id: UserId::from_uuid(parse_uuid(&row.user_id)?),
            description: row.description,
            amount: row.amount,
            transaction_type: TransactionType::from_str(&row.transaction_type)
                .unwrap_or(TransactionType::Expense),
            date: row.date,
            category_id,
            notes: row.notes,
            is_recurring: row.is_recurring,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct PeriodTotalsRow {
    income: Decimal,
    expenses: Decimal,
    transaction_count: i64,
}

#[derive(Debug, FromRow)]
struct CategorySpendRow {
    category_id: Option<String>,
    name: Option<String>,
    color: Option<String>,
    icon: Option<String>,
    total: Decimal,
    transaction_count: i64,
}

#[derive(Debug, FromRow)]
struct MonthlyTotalsRow {
    year: i32,
    month: i32,
    income: Decimal,
    expenses: Decimal,
}

#[derive(Debug, FromRow)]
struct DayOfWeekRow {
    weekday: i32,
    total: Decimal,
    transaction_count: i64,
}

const TRANSACTION_COLUMNS: &str = "id, user_id, description, amount, transaction_type, date, \
                                   category_id, notes, is_recurring, created_at, updated_at";

fn push_filters(builder: &mut QueryBuilder<'_, MySql>, filter: &TransactionFilter) {
    if let Some(start) = filter.start_date {
        builder.push(" AND date >= ").push_bind(start);
    }
    if let Some(end) = filter.end_date {
        builder.push(" AND date <= ").push_bind(end);
    }
    if let Some(category_id) = filter.category_id {
        builder
            .push(" AND category_id = ")
            .push_bind(category_id.into_inner().to_string());
    }
    if let Some(transaction_type) = filter.transaction_type {
        builder
            .push(" AND transaction_type = ")
            .push_bind(transaction_type.as_str());
    }
}

#[async_trait]
impl TransactionRepository for MySqlTransactionRepository {
    async fn find_by_id(
        &self,
        user_id: UserId,
        id: TransactionId,
    ) -> FintrackResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ? AND user_id = ?"
        ))
        .bind(id.into_inner().to_string())
        .bind(user_id.into_inner().to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Transaction::try_from).transpose()
    }

    async fn find_page(
        &self,
        user_id: UserId,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> FintrackResult<Page<Transaction>> {
        debug!("Listing transactions for user {} page {}", user_id, page.page);

        let mut count_builder =
            QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM transactions WHERE user_id = ");
        count_builder.push_bind(user_id.into_inner().to_string());
        push_filters(&mut count_builder, filter);

        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder = QueryBuilder::<MySql>::new(format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE user_id = "
        ));
        builder.push_bind(user_id.into_inner().to_string());
        push_filters(&mut builder, filter);
        builder
            .push(" ORDER BY date DESC, created_at DESC LIMIT ")
            .push_bind(page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);

        let rows = builder
            .build_query_as::<TransactionRow>()
            .fetch_all(&self.pool)
            .await?;

        let transactions: Vec<Transaction> = rows
            .into_iter()
            .map(Transaction::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(
            transactions,
            page.page,
            page.size,
            total.unsigned_abs(),
        ))
    }

    async fn find_all(&self, user_id: UserId) -> FintrackResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE user_id = ? \
             ORDER BY date DESC, created_at DESC"
        ))
        .bind(user_id.into_inner().to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    async fn find_recent(&self, user_id: UserId, limit: u32) -> FintrackResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE user_id = ? \
             ORDER BY date DESC, created_at DESC LIMIT ?"
        ))
        .bind(user_id.into_inner().to_string())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    async fn save(&self, transaction: &Transaction) -> FintrackResult<Transaction> {
        debug!("Saving transaction for user {}", transaction.user_id);

        sqlx::query(
            r#"
            INSERT INTO transactions (id, user_id, description, amount, transaction_type,
                                     date, category_id, notes, is_recurring, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.id.into_inner().to_string())
        .bind(transaction.user_id.into_inner().to_string())
        .bind(&transaction.description)
        .bind(transaction.amount)
        .bind(transaction.transaction_type.as_str())
        .bind(transaction.date)
        .bind(transaction.category_id.map(|id| id.into_inner().to_string()))
        .bind(&transaction.notes)
        .bind(transaction.is_recurring)
        .bind(transaction.created_at)
        .bind(transaction.updated_at)
        .execute(&self.pool)
        .await?;

        self.find_by_id(transaction.user_id, transaction.id)
            .await?
            .ok_or_else(|| {
                FintrackError::Internal("Failed to fetch inserted transaction".to_string())
            })
    }

    async fn update(&self, transaction: &Transaction) -> FintrackResult<Transaction> {
        debug!("Updating transaction: {}", transaction.id);

        sqlx::query(
            r#"
            UPDATE transactions
            SET description = ?, amount = ?, transaction_type = ?, date = ?,
                category_id = ?, notes = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&transaction.description)
        .bind(transaction.amount)
        .bind(transaction.transaction_type.as_str())
        .bind(transaction.date)
        .bind(transaction.category_id.map(|id| id.into_inner().to_string()))
        .bind(&transaction.notes)
        .bind(transaction.updated_at)
        .bind(transaction.id.into_inner().to_string())
        .bind(transaction.user_id.into_inner().to_string())
        .execute(&self.pool)
        .await?;

        self.find_by_id(transaction.user_id, transaction.id)
            .await?
            .ok_or_else(|| {
                FintrackError::Internal("Failed to fetch updated transaction".to_string())
            })
    }

    async fn delete(&self, user_id: UserId, id: TransactionId) -> FintrackResult<bool> {
        debug!("Deleting transaction: {}", id);

        let result = sqlx::query("DELETE FROM transactions WHERE id = ? AND user_id = ?")
            .bind(id.into_inner().to_string())
            .bind(user_id.into_inner().to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn period_totals(
        &self,
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FintrackResult<PeriodTotals> {
        let row = sqlx::query_as::<_, PeriodTotalsRow>(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN transaction_type = 'INCOME' THEN amount END), 0) AS income,
                COALESCE(SUM(CASE WHEN transaction_type = 'EXPENSE' THEN amount END), 0) AS expenses,
                COUNT(*) AS transaction_count
            FROM transactions
            WHERE user_id = ? AND date BETWEEN ? AND ?
            "#,
        )
        .bind(user_id.into_inner().to_string())
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(PeriodTotals {
            income: row.income,
            expenses: row.expenses,
            transaction_count: row.transaction_count.unsigned_abs(),
        })
    }

    async fn expenses_by_category(
        &self,
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
        limit: Option<u32>,
    ) -> FintrackResult<Vec<CategorySpend>> {
        let mut builder = QueryBuilder::<MySql>::new(
            r#"
            SELECT t.category_id, c.name, c.color, c.icon,
                   SUM(t.amount) AS total, COUNT(*) AS transaction_count
            FROM transactions t
            LEFT JOIN categories c ON c.id = t.category_id
            WHERE t.transaction_type = 'EXPENSE' AND t.user_id = "#,
        );
        builder.push_bind(user_id.into_inner().to_string());
        builder.push(" AND t.date BETWEEN ").push_bind(start);
        builder.push(" AND ").push_bind(end);
        builder.push(
            " GROUP BY t.category_id, c.name, c.color, c.icon \
             ORDER BY total DESC",
        );
        if let Some(limit) = limit {
            builder.push(" LIMIT ").push_bind(i64::from(limit));
        }

        let rows = builder
            .build_query_as::<CategorySpendRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                let category_id = row
                    .category_id
                    .as_deref()
                    .map(parse_uuid)
                    .transpose()?
                    .map(CategoryId::from_uuid);
                Ok(CategorySpend {
                    category_id,
                    name: row.name,
                    color: row.color,
                    icon: row.icon,
                    total: row.total,
                    transaction_count: row.transaction_count.unsigned_abs(),
                })
            })
            .collect()
    }

    async fn monthly_totals(
        &self,
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FintrackResult<Vec<MonthlyTotals>> {
        let rows = sqlx::query_as::<_, MonthlyTotalsRow>(
            r#"
            SELECT
                YEAR(date) AS year, MONTH(date) AS month,
                COALESCE(SUM(CASE WHEN transaction_type = 'INCOME' THEN amount END), 0) AS income,
                COALESCE(SUM(CASE WHEN transaction_type = 'EXPENSE' THEN amount END), 0) AS expenses
            FROM transactions
            WHERE user_id = ? AND date BETWEEN ? AND ?
            GROUP BY YEAR(date), MONTH(date)
            ORDER BY year ASC, month ASC
            "#,
        )
        .bind(user_id.into_inner().to_string())
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| MonthlyTotals {
                year: row.year,
                month: row.month.unsigned_abs(),
                income: row.income,
                expenses: row.expenses,
            })
            .collect())
    }

    async fn day_of_week_expenses(
        &self,
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FintrackResult<Vec<DayOfWeekSpend>> {
        let rows = sqlx::query_as::<_, DayOfWeekRow>(
            r#"
            SELECT DAYOFWEEK(date) AS weekday,
                   SUM(amount) AS total, COUNT(*) AS transaction_count
            FROM transactions
            WHERE user_id = ? AND transaction_type = 'EXPENSE' AND date BETWEEN ? AND ?
            GROUP BY DAYOFWEEK(date)
            ORDER BY weekday ASC
            "#,
        )
        .bind(user_id.into_inner().to_string())
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| DayOfWeekSpend {
                weekday: row.weekday.unsigned_abs(),
                total: row.total,
                transaction_count: row.transaction_count.unsigned_abs(),
            })
            .collect())
    }

    async fn user_ids_with_activity(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FintrackResult<Vec<UserId>> {
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT user_id FROM transactions WHERE date BETWEEN ? AND ?",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        ids.iter()
            .map(|id| parse_uuid(id).map(UserId::from_uuid))
            .collect()
    }

    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> FintrackResult<u64> {
        let result = sqlx::query("DELETE FROM transactions WHERE created_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

impl std::fmt::Debug for MySqlTransactionRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlTransactionRepository").finish_non_exhaustive()
    }
}
