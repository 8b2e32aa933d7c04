//! Advisor DTOs (categorization and plan generation).

use fintrack_core::CategoryId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request to suggest a category for a transaction description.
///
/// The description is optional so a missing field surfaces as a 400
/// from the service rather than a deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategorizeRequest {
    pub description: Option<String>,
}

/// Category suggestion for a description.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategorizeResponse {
    pub description: String,
    /// The classifier's label.
    pub suggested_category: String,
    /// The user's matching category, when one exists.
    pub category_id: Option<CategoryId>,
}

/// Request for a generated financial plan. All four figures are
/// required; the service reports which are missing with a 400.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlanRequest {
    pub income: Option<Decimal>,
    pub expenses: Option<Decimal>,
    pub savings: Option<Decimal>,
    pub goal: Option<String>,
}

impl PlanRequest {
    /// Names of the required fields that are absent.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.income.is_none() {
            missing.push("income");
        }
        if self.expenses.is_none() {
            missing.push("expenses");
        }
        if self.savings.is_none() {
            missing.push("savings");
        }
        if self.goal.is_none() {
            missing.push("goal");
        }
        missing
    }
}
