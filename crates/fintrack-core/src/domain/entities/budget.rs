//! Budget entity.

use super::super::value_objects::BudgetPeriod;
use crate::{BudgetId, CategoryId, Entity, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Alert threshold applied when a budget does not specify one, in percent.
pub const DEFAULT_ALERT_THRESHOLD: Decimal = dec!(80);

/// A spending limit for one category over a date range.
///
/// The spent amount is not stored on the entity; it is aggregated from
/// expense transactions at read time and passed into the computed methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier for the budget.
    pub id: BudgetId,

    /// Owning user.
    pub user_id: UserId,

    /// The category this budget limits.
    pub category_id: CategoryId,

    /// The spending limit.
    pub amount: Decimal,

    /// Planning cadence.
    pub period: BudgetPeriod,

    /// First day the budget covers.
    pub start_date: NaiveDate,

    /// Last day the budget covers (inclusive).
    pub end_date: NaiveDate,

    /// Percentage of the limit at which the budget counts as near its limit.
    pub alert_threshold: Decimal,

    /// Inactive budgets are kept for history but excluded from alerts.
    pub is_active: bool,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Creates a new active budget.
    #[must_use]
    pub fn new(
        user_id: UserId,
        category_id: CategoryId,
        amount: Decimal,
        period: BudgetPeriod,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            user_id,
            category_id,
            amount,
            period,
            start_date,
            end_date,
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Amount left before the limit is reached. Negative when over budget.
    #[must_use]
    pub fn remaining_amount(&self, spent: Decimal) -> Decimal {
        self.amount - spent
    }

    /// Percentage of the limit consumed; 0 when the limit itself is 0.
    #[must_use]
    pub fn percentage_used(&self, spent: Decimal) -> Decimal {
        if self.amount.is_zero() {
            Decimal::ZERO
        } else {
            spent / self.amount * dec!(100)
        }
    }

    /// Checks if spending has exceeded the limit.
    #[must_use]
    pub fn is_over_budget(&self, spent: Decimal) -> bool {
        spent > self.amount
    }

    /// Checks if spending has crossed the alert threshold without going over.
    #[must_use]
    pub fn is_near_limit(&self, spent: Decimal) -> bool {
        !self.is_over_budget(spent) && self.percentage_used(spent) >= self.alert_threshold
    }

    /// Checks if the budget is active and covers `today`.
    #[must_use]
    pub fn is_current(&self, today: NaiveDate) -> bool {
        self.is_active && self.start_date <= today && today <= self.end_date
    }
}

impl Entity<BudgetId> for Budget {
    fn id(&self) -> &BudgetId {
        &self.id
    }
}
