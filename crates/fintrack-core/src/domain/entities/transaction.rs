//! Transaction entity.

use super::super::value_objects::TransactionType;
use crate::{CategoryId, Entity, TransactionId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single income or expense entry.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Transaction {
    /// Unique identifier for the transaction.
    pub id: TransactionId,

    /// Owning user.
    pub user_id: UserId,

    /// What the transaction was for.
    #[validate(length(min = 1, max = 255))]
    pub description: String,

    /// Absolute amount; the sign comes from `transaction_type`.
    pub amount: Decimal,

    /// Income or expense.
    pub transaction_type: TransactionType,

    /// The date the transaction occurred.
    pub date: NaiveDate,

    /// Optional category; uncategorized when `None`.
    pub category_id: Option<CategoryId>,

    /// Free-form notes.
    #[validate(length(max = 1000))]
    pub notes: Option<String>,

    /// Set when the transaction was materialized from a recurring schedule.
    pub is_recurring: bool,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Creates a new transaction.
    #[must_use]
    pub fn new(
        user_id: UserId,
        description: String,
        amount: Decimal,
        transaction_type: TransactionType,
        date: NaiveDate,
        category_id: Option<CategoryId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            user_id,
            description,
            amount,
            transaction_type,
            date,
            category_id,
            notes: None,
            is_recurring: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the amount with the type's sign applied (expenses negative).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.transaction_type.signed(self.amount)
    }

    /// Checks if this is an expense.
    #[must_use]
    pub const fn is_expense(&self) -> bool {
        self.transaction_type.is_expense()
    }
}

impl Entity<TransactionId> for Transaction {
    fn id(&self) -> &TransactionId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample(amount: Decimal, transaction_type: TransactionType) -> Transaction {
        Transaction::new(
            UserId::new(),
            "Test".to_string(),
            amount,
            transaction_type,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            None,
        )
    }

    #[test]
    fn test_signed_amount() {
        assert_eq!(
            sample(dec!(25.00), TransactionType::Expense).signed_amount(),
            dec!(-25.00)
        );
        assert_eq!(
            sample(dec!(1000.00), TransactionType::Income).signed_amount(),
            dec!(1000.00)
        );
    }

    #[test]
    fn test_new_transaction_is_not_recurring() {
        let tx = sample(dec!(10), TransactionType::Expense);
        assert!(!tx.is_recurring);
        assert!(tx.category_id.is_none());
        assert!(tx.notes.is_none());
    }
}
