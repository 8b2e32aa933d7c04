//! Transaction DTOs, including summary/analysis and bulk import shapes.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use fintrack_core::{CategoryId, Transaction, TransactionId, TransactionType};
use fintrack_repository::{CategorySpend, TransactionFilter};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request to create a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTransactionRequest {
    #[validate(length(min = 1, max = 255, message = "Description must be 1-255 characters"))]
    pub description: String,

    pub amount: Decimal,

    pub transaction_type: TransactionType,

    pub date: NaiveDate,

    pub category_id: Option<CategoryId>,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// Request to update a transaction. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTransactionRequest {
    #[validate(length(min = 1, max = 255, message = "Description must be 1-255 characters"))]
    pub description: Option<String>,

    pub amount: Option<Decimal>,

    pub transaction_type: Option<TransactionType>,

    pub date: Option<NaiveDate>,

    pub category_id: Option<CategoryId>,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// Transaction list filters, as query parameters.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct TransactionFilterQuery {
    /// Earliest date (inclusive).
    pub start_date: Option<NaiveDate>,
    /// Latest date (inclusive).
    pub end_date: Option<NaiveDate>,
    /// Restrict to one category.
    pub category: Option<CategoryId>,
    /// Restrict to INCOME or EXPENSE.
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
}

impl TransactionFilterQuery {
    /// Converts the query parameters into a repository filter.
    #[must_use]
    pub fn into_filter(self) -> TransactionFilter {
        TransactionFilter {
            start_date: self.start_date,
            end_date: self.end_date,
            category_id: self.category,
            transaction_type: self.transaction_type,
        }
    }
}

/// Transaction response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionResponse {
    pub id: TransactionId,
    pub description: String,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub date: NaiveDate,
    pub category_id: Option<CategoryId>,
    pub notes: Option<String>,
    pub is_recurring: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            description: tx.description,
            amount: tx.amount,
            transaction_type: tx.transaction_type,
            date: tx.date,
            category_id: tx.category_id,
            notes: tx.notes,
            is_recurring: tx.is_recurring,
            created_at: tx.created_at,
            updated_at: tx.updated_at,
        }
    }
}

impl From<&Transaction> for TransactionResponse {
    fn from(tx: &Transaction) -> Self {
        tx.clone().into()
    }
}

/// Reporting window for the transaction summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryPeriod {
    /// Last 30 days.
    Daily,
    /// Last 12 weeks.
    Weekly,
    /// Last 12 months.
    #[default]
    Monthly,
    /// Last 5 years.
    Yearly,
}

impl SummaryPeriod {
    /// Parses a period name; anything unrecognized falls back to monthly.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("daily") => Self::Daily,
            Some("weekly") => Self::Weekly,
            Some("yearly") => Self::Yearly,
            _ => Self::Monthly,
        }
    }

    /// First day of the window ending at `today`.
    #[must_use]
    pub fn window_start(self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::Daily => today - Duration::days(30),
            Self::Weekly => today - Duration::weeks(12),
            Self::Monthly => today - Duration::days(365),
            Self::Yearly => today - Duration::days(365 * 5),
        }
    }

    /// The period name used in responses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

/// One expense category with its total, as reported by summaries and
/// the dashboard. A `None` category is uncategorized spending.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategorySpendEntry {
    pub category: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub total: Decimal,
}

impl From<CategorySpend> for CategorySpendEntry {
    fn from(spend: CategorySpend) -> Self {
        Self {
            category: spend.name,
            color: spend.color,
            icon: spend.icon,
            total: spend.total,
        }
    }
}

/// Transaction summary over a reporting window.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SummaryResponse {
    pub period: String,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_amount: Decimal,
    pub transaction_count: u64,
    /// Top 5 expense categories in the window.
    pub top_categories: Vec<CategorySpendEntry>,
}

/// Per-category spending analysis entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryAnalysisEntry {
    pub category: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub total_amount: Decimal,
    pub transaction_count: u64,
    /// Share of the window's total expenses; 0 when there are none.
    pub percentage_of_total: Decimal,
}

/// Result of a bulk CSV import.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkUploadResponse {
    pub created_count: usize,
    /// Per-row failures as `"Row {n}: {error}"`, n counting from 2.
    pub errors: Vec<String>,
    pub transactions: Vec<TransactionResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_core::UserId;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_summary_period_parse_defaults_to_monthly() {
        assert_eq!(SummaryPeriod::parse(Some("daily")), SummaryPeriod::Daily);
        assert_eq!(SummaryPeriod::parse(Some("weekly")), SummaryPeriod::Weekly);
        assert_eq!(SummaryPeriod::parse(Some("yearly")), SummaryPeriod::Yearly);
        assert_eq!(SummaryPeriod::parse(Some("hourly")), SummaryPeriod::Monthly);
        assert_eq!(SummaryPeriod::parse(None), SummaryPeriod::Monthly);
    }

    #[test]
    fn test_summary_period_windows() {
        let today = date(2025, 6, 30);
        assert_eq!(
            SummaryPeriod::Daily.window_start(today),
            date(2025, 5, 31)
        );
        assert_eq!(
            SummaryPeriod::Weekly.window_start(today),
            date(2025, 4, 7)
        );
        assert_eq!(
            SummaryPeriod::Monthly.window_start(today),
            date(2024, 6, 30)
        );
        assert_eq!(
            SummaryPeriod::Yearly.window_start(today),
            date(2020, 7, 1)
        );
    }

    #[test]
    fn test_filter_query_into_filter() {
        let category_id = CategoryId::new();
        let query = TransactionFilterQuery {
            start_date: Some(date(2025, 1, 1)),
            end_date: None,
            category: Some(category_id),
            transaction_type: Some(TransactionType::Expense),
        };

        let filter = query.into_filter();
        assert_eq!(filter.start_date, Some(date(2025, 1, 1)));
        assert_eq!(filter.category_id, Some(category_id));
        assert_eq!(filter.transaction_type, Some(TransactionType::Expense));
    }

    #[test]
    fn test_filter_query_type_param_name() {
        let query: TransactionFilterQuery =
            serde_json::from_str(r#"{"type": "EXPENSE"}"#).unwrap();
        assert_eq!(query.transaction_type, Some(TransactionType::Expense));
    }

    #[test]
    fn test_transaction_response_from_entity() {
        let tx = Transaction::new(
            UserId::new(),
            "Coffee".to_string(),
            dec!(4.50),
            TransactionType::Expense,
            date(2025, 6, 1),
            None,
        );

        let response = TransactionResponse::from(&tx);
        assert_eq!(response.id, tx.id);
        assert_eq!(response.amount, dec!(4.50));
        assert!(!response.is_recurring);
    }
}
