//! Recurring transaction entity.

use super::super::value_objects::{Frequency, TransactionType};
use crate::{CategoryId, Entity, RecurringTransactionId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A template that materializes transactions on a schedule.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecurringTransaction {
    /// Unique identifier for the schedule.
    pub id: RecurringTransactionId,

    /// Owning user.
    pub user_id: UserId,

    /// Description copied onto materialized transactions.
    #[validate(length(min = 1, max = 255))]
    pub description: String,

    /// Amount of each occurrence.
    pub amount: Decimal,

    /// Optional category for materialized transactions.
    pub category_id: Option<CategoryId>,

    /// Income or expense.
    pub transaction_type: TransactionType,

    /// How often the schedule fires.
    pub frequency: Frequency,

    /// First occurrence date.
    pub start_date: NaiveDate,

    /// Optional last date; occurrences past this deactivate the schedule.
    pub end_date: Option<NaiveDate>,

    /// The next date a transaction should be materialized.
    pub next_occurrence: NaiveDate,

    /// Inactive schedules are skipped by the processor.
    pub is_active: bool,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl RecurringTransaction {
    /// Creates a new active schedule whose first occurrence is `start_date`.
    #[must_use]
    pub fn new(
        user_id: UserId,
        description: String,
        amount: Decimal,
        transaction_type: TransactionType,
        frequency: Frequency,
        start_date: NaiveDate,
        category_id: Option<CategoryId>,
    ) -> Self {
        Self {
            id: RecurringTransactionId::new(),
            user_id,
            description,
            amount,
            category_id,
            transaction_type,
            frequency,
            start_date,
            end_date: None,
            next_occurrence: start_date,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Checks if the schedule should fire on or before `today`.
    #[must_use]
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.is_active && self.next_occurrence <= today
    }

    /// Advances `next_occurrence` by one step of the frequency.
    ///
    /// Returns the new occurrence date, or `None` when the step would
    /// pass `end_date`, in which case the schedule is deactivated and
    /// `next_occurrence` is left unchanged.
    pub fn advance_occurrence(&mut self) -> Option<NaiveDate> {
        let next = self.frequency.next_date(self.next_occurrence);
        if self.end_date.is_some_and(|end| next > end) {
            self.is_active = false;
            return None;
        }
        self.next_occurrence = next;
        Some(next)
    }
}

impl Entity<RecurringTransactionId> for RecurringTransaction {
    fn id(&self) -> &RecurringTransactionId {
        &self.id
    }
}
