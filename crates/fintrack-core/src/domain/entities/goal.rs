//! Goal entity.

use super::super::value_objects::GoalType;
use crate::{Entity, GoalId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A savings target with a deadline.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Goal {
    /// Unique identifier for the goal.
    pub id: GoalId,

    /// Owning user.
    pub user_id: UserId,

    /// Goal name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Optional longer description.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// What kind of goal this is.
    pub goal_type: GoalType,

    /// The amount to reach.
    pub target_amount: Decimal,

    /// Progress so far; never exceeds `target_amount`.
    pub current_amount: Decimal,

    /// The date the goal should be reached by.
    pub target_date: NaiveDate,

    /// Set once `current_amount` reaches `target_amount`.
    pub is_achieved: bool,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Creates a new goal with no progress.
    #[must_use]
    pub fn new(
        user_id: UserId,
        name: String,
        goal_type: GoalType,
        target_amount: Decimal,
        target_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: GoalId::new(),
            user_id,
            name,
            description: None,
            goal_type,
            target_amount,
            current_amount: Decimal::ZERO,
            target_date,
            is_achieved: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Progress towards the target in percent, capped at 100.
    ///
    /// Returns 0 when the target itself is 0.
    #[must_use]
    pub fn progress_percentage(&self) -> Decimal {
        if self.target_amount.is_zero() {
            Decimal::ZERO
        } else {
            (self.current_amount / self.target_amount * dec!(100)).min(dec!(100))
        }
    }

    /// Amount still needed to reach the target, floored at 0.
    #[must_use]
    pub fn remaining_amount(&self) -> Decimal {
        (self.target_amount - self.current_amount).max(Decimal::ZERO)
    }

    /// Days left until the target date, floored at 0.
    #[must_use]
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.target_date - today).num_days().max(0)
    }

    /// Amount to save per month to reach the target on time.
    ///
    /// Months left is `ceil(days_remaining / 30)`, never less than 1, so
    /// an overdue goal still reports the full remaining amount.
    #[must_use]
    pub fn monthly_savings_needed(&self, today: NaiveDate) -> Decimal {
        let days = self.days_remaining(today);
        let months_left = ((days + 29) / 30).max(1);
        self.remaining_amount() / Decimal::from(months_left)
    }

    /// Adds `amount` to the current progress.
    ///
    /// Progress clamps at the target amount, and the goal is marked
    /// achieved once the target is reached.
    pub fn record_progress(&mut self, amount: Decimal) {
        self.current_amount = (self.current_amount + amount).min(self.target_amount);
        if self.current_amount >= self.target_amount {
            self.is_achieved = true;
        }
        self.updated_at = Utc::now();
    }
}

impl Entity<GoalId> for Goal {
    fn id(&self) -> &GoalId {
        &self.id
    }
}
