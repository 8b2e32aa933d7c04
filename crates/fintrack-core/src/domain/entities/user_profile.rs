//! User profile entity.

use crate::UserId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Per-user preferences, created lazily on first access.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserProfile {
    /// The user this profile belongs to (one profile per user).
    pub user_id: UserId,

    /// ISO 4217 currency code.
    #[validate(length(min = 3, max = 3))]
    pub currency: String,

    /// IANA timezone name.
    #[validate(length(min = 1, max = 64))]
    pub timezone: String,

    /// Expected monthly income, used for planning.
    pub monthly_income: Option<Decimal>,

    /// Notification opt-ins as a JSON object.
    ///
    /// Known keys: `budget_alerts`, `goal_reminders`, `monthly_reports`.
    /// A missing key means the notification is wanted.
    pub notification_preferences: Value,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Creates a profile with default settings.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            currency: "USD".to_string(),
            timezone: "UTC".to_string(),
            monthly_income: None,
            notification_preferences: Value::Object(serde_json::Map::new()),
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks whether the user wants the named notification.
    ///
    /// Absent keys and non-boolean values default to `true`.
    #[must_use]
    pub fn wants_notification(&self, key: &str) -> bool {
        self.notification_preferences
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_profile_defaults() {
        let profile = UserProfile::new(UserId::new());
        assert_eq!(profile.currency, "USD");
        assert_eq!(profile.timezone, "UTC");
        assert!(profile.monthly_income.is_none());
    }

    #[test]
    fn test_notifications_default_to_wanted() {
        let profile = UserProfile::new(UserId::new());
        assert!(profile.wants_notification("budget_alerts"));
        assert!(profile.wants_notification("monthly_reports"));
    }

    #[test]
    fn test_explicit_opt_out() {
        let mut profile = UserProfile::new(UserId::new());
        profile.notification_preferences = json!({
            "budget_alerts": false,
            "goal_reminders": true,
        });
        assert!(!profile.wants_notification("budget_alerts"));
        assert!(profile.wants_notification("goal_reminders"));
        assert!(profile.wants_notification("monthly_reports"));
    }

    #[test]
    fn test_non_boolean_value_defaults_to_wanted() {
        let mut profile = UserProfile::new(UserId::new());
        profile.notification_preferences = json!({ "budget_alerts": "maybe" });
        assert!(profile.wants_notification("budget_alerts"));
    }
}
