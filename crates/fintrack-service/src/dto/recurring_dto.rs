//! Recurring transaction DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use fintrack_core::{CategoryId, Frequency, RecurringTransaction, RecurringTransactionId, TransactionType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to create a recurring transaction template.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRecurringRequest {
    #[validate(length(min = 1, max = 255, message = "Description must be 1-255 characters"))]
    pub description: String,

    pub amount: Decimal,

    pub transaction_type: TransactionType,

    pub frequency: Frequency,

    pub start_date: NaiveDate,

    pub end_date: Option<NaiveDate>,

    pub category_id: Option<CategoryId>,
}

/// Request to update a template. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateRecurringRequest {
    #[validate(length(min = 1, max = 255, message = "Description must be 1-255 characters"))]
    pub description: Option<String>,

    pub amount: Option<Decimal>,

    pub transaction_type: Option<TransactionType>,

    pub frequency: Option<Frequency>,

    pub end_date: Option<NaiveDate>,

    pub category_id: Option<CategoryId>,

    pub is_active: Option<bool>,
}

/// Recurring transaction template response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecurringResponse {
    pub id: RecurringTransactionId,
    pub description: String,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub next_occurrence: NaiveDate,
    pub is_active: bool,
    pub category_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
}

impl From<RecurringTransaction> for RecurringResponse {
    fn from(rt: RecurringTransaction) -> Self {
        Self {
            id: rt.id,
            description: rt.description,
            amount: rt.amount,
            transaction_type: rt.transaction_type,
            frequency: rt.frequency,
            start_date: rt.start_date,
            end_date: rt.end_date,
            next_occurrence: rt.next_occurrence,
            is_active: rt.is_active,
            category_id: rt.category_id,
            created_at: rt.created_at,
        }
    }
}

impl From<&RecurringTransaction> for RecurringResponse {
    fn from(rt: &RecurringTransaction) -> Self {
        rt.clone().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_core::UserId;
    use rust_decimal_macros::dec;

    #[test]
    fn test_response_from_template() {
        let rt = RecurringTransaction::new(
            UserId::new(),
            "Rent".to_string(),
            dec!(1500),
            TransactionType::Expense,
            Frequency::Monthly,
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            None,
        );

        let response = RecurringResponse::from(&rt);
        assert_eq!(response.id, rt.id);
        assert_eq!(response.next_occurrence, rt.start_date);
        assert!(response.is_active);
    }
}
