//! Transaction service implementation.
//!
//! Covers CRUD, the summary and category-analysis reports, CSV bulk
//! import, and the retention purge used by the cleanup job.

use crate::dto::{
    BulkUploadResponse, CategoryAnalysisEntry, CategorySpendEntry, CreateTransactionRequest,
    SummaryPeriod, SummaryResponse, TransactionResponse, UpdateTransactionRequest,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use fintrack_core::{
    FintrackError, FintrackResult, Page, PageRequest, Service, Transaction, TransactionId,
    TransactionType, UserId, ValidateExt,
};
use fintrack_repository::{CategoryRepository, TransactionFilter, TransactionRepository};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

/// Transaction service trait.
#[async_trait]
pub trait TransactionService: Service {
    /// Lists transactions with filters and pagination.
    async fn list_transactions(
        &self,
        user_id: UserId,
        filter: TransactionFilter,
        page: PageRequest,
    ) -> FintrackResult<Page<TransactionResponse>>;

    /// Gets a transaction by ID.
    async fn get_transaction(
        &self,
        user_id: UserId,
        id: TransactionId,
    ) -> FintrackResult<TransactionResponse>;

    /// Creates a new transaction.
    async fn create_transaction(
        &self,
        user_id: UserId,
        request: CreateTransactionRequest,
    ) -> FintrackResult<TransactionResponse>;

    /// Updates an existing transaction.
    async fn update_transaction(
        &self,
        user_id: UserId,
        id: TransactionId,
        request: UpdateTransactionRequest,
    ) -> FintrackResult<TransactionResponse>;

    /// Deletes a transaction.
    async fn delete_transaction(&self, user_id: UserId, id: TransactionId) -> FintrackResult<()>;

    /// Income/expense summary over a trailing window ending today.
    async fn summary(&self, user_id: UserId, period: SummaryPeriod)
        -> FintrackResult<SummaryResponse>;

    /// Per-category expense analysis; the window defaults to the last
    /// 30 days ending today.
    async fn category_analysis(
        &self,
        user_id: UserId,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> FintrackResult<Vec<CategoryAnalysisEntry>>;

    /// Imports transactions from CSV data, row by row.
    async fn bulk_upload(
        &self,
        user_id: UserId,
        data: &[u8],
    ) -> FintrackResult<BulkUploadResponse>;

    /// Deletes transactions created before the cutoff (retention job).
    async fn purge_created_before(&self, cutoff: DateTime<Utc>) -> FintrackResult<u64>;
}

/// Expected CSV columns. `category` and `type` may be blank or absent.
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    description: String,
    amount: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, rename = "type")]
    transaction_type: Option<String>,
}

/// Transaction service implementation.
pub struct TransactionServiceImpl<T, C>
where
    T: TransactionRepository,
    C: CategoryRepository,
{
    transaction_repository: Arc<T>,
    category_repository: Arc<C>,
}

impl<T, C> TransactionServiceImpl<T, C>
where
    T: TransactionRepository,
    C: CategoryRepository,
{
    /// Creates a new transaction service.
    pub fn new(transaction_repository: Arc<T>, category_repository: Arc<C>) -> Self {
        Self {
            transaction_repository,
            category_repository,
        }
    }

    /// Rejects zero and negative amounts.
    fn validate_amount(amount: Decimal) -> FintrackResult<()> {
        if amount <= Decimal::ZERO {
            return Err(FintrackError::Validation(
                "Amount must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Checks that a referenced category exists and belongs to the user.
    async fn validate_category(
        &self,
        user_id: UserId,
        category_id: fintrack_core::CategoryId,
    ) -> FintrackResult<()> {
        if self
            .category_repository
            .find_by_id(user_id, category_id)
            .await?
            .is_none()
        {
            return Err(FintrackError::Validation(format!(
                "Unknown category: {category_id}"
            )));
        }
        Ok(())
    }

    /// Imports one parsed CSV row. Returns a row-level error message on
    /// failure so the caller can continue with the remaining rows.
    async fn import_row(&self, user_id: UserId, row: CsvRow) -> Result<Transaction, String> {
        let date_str = row.date.trim();
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|_| format!("invalid date '{date_str}', expected YYYY-MM-DD"))?;

        let description = row.description.trim().to_string();
        if description.is_empty() {
            return Err("description is required".to_string());
        }

        let amount_str = row.amount.trim();
        let amount =
            Decimal::from_str(amount_str).map_err(|_| format!("invalid amount '{amount_str}'"))?;
        if amount <= Decimal::ZERO {
            return Err("amount must be positive".to_string());
        }

        let transaction_type = match row.transaction_type.as_deref().map(str::trim) {
            None | Some("") => TransactionType::Expense,
            Some(value) => TransactionType::from_str(value)
                .ok_or_else(|| format!("invalid transaction type '{value}'"))?,
        };

        // Unknown category names import as uncategorized.
        let category_id = match row.category.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) => self
                .category_repository
                .find_by_name(user_id, name)
                .await
                .map_err(|e| e.to_string())?
                .map(|c| c.id),
        };

        let transaction =
            Transaction::new(user_id, description, amount, transaction_type, date, category_id);
        self.transaction_repository
            .save(&transaction)
            .await
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl<T, C> TransactionService for TransactionServiceImpl<T, C>
where
    T: TransactionRepository + 'static,
    C: CategoryRepository + 'static,
{
    async fn list_transactions(
        &self,
        user_id: UserId,
        filter: TransactionFilter,
        page: PageRequest,
    ) -> FintrackResult<Page<TransactionResponse>> {
        debug!(
            "Listing transactions for user: {}, page: {}, size: {}",
            user_id, page.page, page.size
        );

        let transactions = self
            .transaction_repository
            .find_page(user_id, &filter, page)
            .await?;
        Ok(transactions.map(TransactionResponse::from))
    }

    async fn get_transaction(
        &self,
        user_id: UserId,
        id: TransactionId,
    ) -> FintrackResult<TransactionResponse> {
        let transaction = self
            .transaction_repository
            .find_by_id(user_id, id)
            .await?
            .ok_or_else(|| FintrackError::not_found("Transaction", id))?;

        Ok(TransactionResponse::from(transaction))
    }

    async fn create_transaction(
        &self,
        user_id: UserId,
        request: CreateTransactionRequest,
    ) -> FintrackResult<TransactionResponse> {
        debug!("Creating transaction for user: {}", user_id);

        request.validate_request()?;
        Self::validate_amount(request.amount)?;

        if let Some(category_id) = request.category_id {
            self.validate_category(user_id, category_id).await?;
        }

        let mut transaction = Transaction::new(
            user_id,
            request.description,
            request.amount,
            request.transaction_type,
            request.date,
            request.category_id,
        );
        transaction.notes = request.notes;

        let saved = self.transaction_repository.save(&transaction).await?;

        info!("Transaction created: {}", saved.id);
        Ok(TransactionResponse::from(saved))
    }

    async fn update_transaction(
        &self,
        user_id: UserId,
        id: TransactionId,
        request: UpdateTransactionRequest,
    ) -> FintrackResult<TransactionResponse> {
        debug!("Updating transaction: {}", id);

        request.validate_request()?;

        let mut transaction = self
            .transaction_repository
            .find_by_id(user_id, id)
            .await?
            .ok_or_else(|| FintrackError::not_found("Transaction", id))?;

        if let Some(description) = request.description {
            transaction.description = description;
        }
        if let Some(amount) = request.amount {
            Self::validate_amount(amount)?;
            transaction.amount = amount;
        }
        if let Some(transaction_type) = request.transaction_type {
            transaction.transaction_type = transaction_type;
        }
        if let Some(date) = request.date {
            transaction.date = date;
        }
        if let Some(category_id) = request.category_id {
            self.validate_category(user_id, category_id).await?;
            transaction.category_id = Some(category_id);
        }
        if let Some(notes) = request.notes {
            transaction.notes = Some(notes);
        }
        transaction.updated_at = Utc::now();

        let updated = self.transaction_repository.update(&transaction).await?;

        info!("Transaction updated: {}", id);
        Ok(TransactionResponse::from(updated))
    }

    async fn delete_transaction(&self, user_id: UserId, id: TransactionId) -> FintrackResult<()> {
        debug!("Deleting transaction: {}", id);

        let deleted = self.transaction_repository.delete(user_id, id).await?;
        if !deleted {
            return Err(FintrackError::not_found("Transaction", id));
        }

        info!("Transaction deleted: {}", id);
        Ok(())
    }

    async fn summary(
        &self,
        user_id: UserId,
        period: SummaryPeriod,
    ) -> FintrackResult<SummaryResponse> {
        debug!("Summary for user: {}, period: {}", user_id, period.as_str());

        let today = Utc::now().date_naive();
        let start = period.window_start(today);

        let totals = self
            .transaction_repository
            .period_totals(user_id, start, today)
            .await?;
        let top_categories = self
            .transaction_repository
            .expenses_by_category(user_id, start, today, Some(5))
            .await?;

        Ok(SummaryResponse {
            period: period.as_str().to_string(),
            total_income: totals.income,
            total_expenses: totals.expenses,
            net_amount: totals.income - totals.expenses,
            transaction_count: totals.transaction_count,
            top_categories: top_categories
                .into_iter()
                .map(CategorySpendEntry::from)
                .collect(),
        })
    }

    async fn category_analysis(
        &self,
        user_id: UserId,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> FintrackResult<Vec<CategoryAnalysisEntry>> {
        let today = Utc::now().date_naive();
        let start = start_date.unwrap_or_else(|| today - Duration::days(30));
        let end = end_date.unwrap_or(today);

        debug!(
            "Category analysis for user: {}, window: {} to {}",
            user_id, start, end
        );

        let spends = self
            .transaction_repository
            .expenses_by_category(user_id, start, end, None)
            .await?;
        let total: Decimal = spends.iter().map(|s| s.total).sum();

        Ok(spends
            .into_iter()
            .map(|spend| {
                let percentage_of_total = if total > Decimal::ZERO {
                    (spend.total * Decimal::ONE_HUNDRED / total).round_dp(2)
                } else {
                    Decimal::ZERO
                };
                CategoryAnalysisEntry {
                    category: spend.name,
                    color: spend.color,
                    icon: spend.icon,
                    total_amount: spend.total,
                    transaction_count: spend.transaction_count,
                    percentage_of_total,
                }
            })
            .collect())
    }

    async fn bulk_upload(
        &self,
        user_id: UserId,
        data: &[u8],
    ) -> FintrackResult<BulkUploadResponse> {
        debug!("Bulk upload for user: {}", user_id);

        let mut reader = csv::Reader::from_reader(data);
        let mut transactions = Vec::new();
        let mut errors = Vec::new();

        // Rows count from 2; line 1 is the header.
        for (index, record) in reader.deserialize::<CsvRow>().enumerate() {
            let row_number = index + 2;
            match record {
                Ok(row) => match self.import_row(user_id, row).await {
                    Ok(transaction) => transactions.push(TransactionResponse::from(transaction)),
                    Err(message) => errors.push(format!("Row {row_number}: {message}")),
                },
                Err(e) => errors.push(format!("Row {row_number}: {e}")),
            }
        }

        info!(
            "Bulk upload for user {}: {} created, {} failed",
            user_id,
            transactions.len(),
            errors.len()
        );

        Ok(BulkUploadResponse {
            created_count: transactions.len(),
            errors,
            transactions,
        })
    }

    async fn purge_created_before(&self, cutoff: DateTime<Utc>) -> FintrackResult<u64> {
        let removed = self
            .transaction_repository
            .delete_created_before(cutoff)
            .await?;

        info!("Purged {} transactions created before {}", removed, cutoff);
        Ok(removed)
    }
}

impl<T, C> Service for TransactionServiceImpl<T, C>
where
    T: TransactionRepository + 'static,
    C: CategoryRepository + 'static,
{
}

impl<T, C> std::fmt::Debug for TransactionServiceImpl<T, C>
where
    T: TransactionRepository,
    C: CategoryRepository,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionServiceImpl").finish_non_exhaustive()
    }
}
