//! User profile DTOs.

use chrono::{DateTime, Utc};
use fintrack_core::UserProfile;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

/// Partial profile update; absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    /// ISO 4217 currency code.
    pub currency: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub timezone: Option<String>,

    pub monthly_income: Option<Decimal>,

    /// Notification opt-ins; replaces the stored object wholesale.
    pub notification_preferences: Option<Value>,
}

/// Profile response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub currency: String,
    pub timezone: String,
    pub monthly_income: Option<Decimal>,
    #[schema(value_type = Object)]
    pub notification_preferences: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            currency: profile.currency,
            timezone: profile.timezone,
            monthly_income: profile.monthly_income,
            notification_preferences: profile.notification_preferences,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_core::UserId;

    #[test]
    fn test_response_from_profile() {
        let profile = UserProfile::new(UserId::new());
        let response = ProfileResponse::from(profile);

        assert_eq!(response.currency, "USD");
        assert_eq!(response.timezone, "UTC");
        assert!(response.monthly_income.is_none());
    }
}
