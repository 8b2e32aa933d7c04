//! Goal DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use fintrack_core::{Goal, GoalId, GoalType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to create a goal.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateGoalRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub goal_type: GoalType,

    pub target_amount: Decimal,

    pub target_date: NaiveDate,
}

/// Request to update a goal. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateGoalRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub goal_type: Option<GoalType>,

    pub target_amount: Option<Decimal>,

    pub target_date: Option<NaiveDate>,
}

/// Request to record progress towards a goal.
///
/// The amount is optional so a missing field surfaces as a 400 from the
/// service rather than a deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GoalProgressRequest {
    pub amount: Option<Decimal>,
}

/// Goal response with computed progress fields.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GoalResponse {
    pub id: GoalId,
    pub name: String,
    pub description: Option<String>,
    pub goal_type: GoalType,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub target_date: NaiveDate,
    pub is_achieved: bool,
    pub progress_percentage: Decimal,
    pub remaining_amount: Decimal,
    pub days_remaining: i64,
    pub monthly_savings_needed: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GoalResponse {
    /// Builds the response; `today` anchors the date-derived fields.
    #[must_use]
    pub fn new(goal: Goal, today: NaiveDate) -> Self {
        Self {
            progress_percentage: goal.progress_percentage(),
            remaining_amount: goal.remaining_amount(),
            days_remaining: goal.days_remaining(today),
            monthly_savings_needed: goal.monthly_savings_needed(today),
            id: goal.id,
            name: goal.name,
            description: goal.description,
            goal_type: goal.goal_type,
            target_amount: goal.target_amount,
            current_amount: goal.current_amount,
            target_date: goal.target_date,
            is_achieved: goal.is_achieved,
            created_at: goal.created_at,
            updated_at: goal.updated_at,
        }
    }
}
