//! MySQL user profile repository implementation.
//!
//! `notification_preferences` is a MySQL `JSON` column and maps through
//! `serde_json::Value` on both sides.

use super::parse_uuid;
use crate::traits::UserProfileRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fintrack_core::{FintrackError, FintrackResult, UserId, UserProfile};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::{FromRow, MySqlPool, types::Json};
use tracing::debug;

/// MySQL user profile repository implementation.
#[derive(Clone)]
pub struct MySqlUserProfileRepository {
    pool: MySqlPool,
}

impl MySqlUserProfileRepository {
    /// Creates a new MySQL user profile repository.
    #[must_use]
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserProfileRow {
    user_id: String,
    currency: String,
    timezone: String,
    monthly_income: Option<Decimal>,
    notification_preferences: Json<Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserProfileRow> for UserProfile {
    type Error = FintrackError;

    fn try_from(row: UserProfileRow) -> Result<Self, Self::Error> {
        Ok(UserProfile {
            user_id: UserId::from_uuid(parse_uuid(&row.user_id)?),
            currency: row.currency,
            timezone: row.timezone,
            monthly_income: row.monthly_income,
            notification_preferences: row.notification_preferences.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const PROFILE_COLUMNS: &str = "user_id, currency, timezone, monthly_income, \
                               notification_preferences, created_at, updated_at";

#[async_trait]
impl UserProfileRepository for MySqlUserProfileRepository {
    async fn find_by_user_id(&self, user_id: UserId) -> FintrackResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, UserProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE user_id = ?"
        ))
        .bind(user_id.into_inner().to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserProfile::try_from).transpose()
    }

    async fn save(&self, profile: &UserProfile) -> FintrackResult<UserProfile> {
        debug!("Saving profile for user {}", profile.user_id);

        sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id, currency, timezone, monthly_income,
                                      notification_preferences, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(profile.user_id.into_inner().to_string())
        .bind(&profile.currency)
        .bind(&profile.timezone)
        .bind(profile.monthly_income)
        .bind(Json(&profile.notification_preferences))
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        self.find_by_user_id(profile.user_id)
            .await?
            .ok_or_else(|| FintrackError::Internal("Failed to fetch inserted profile".to_string()))
    }

    async fn update(&self, profile: &UserProfile) -> FintrackResult<UserProfile> {
        debug!("Updating profile for user {}", profile.user_id);

        sqlx::query(
            r#"
            UPDATE user_profiles
            SET currency = ?, timezone = ?, monthly_income = ?,
                notification_preferences = ?, updated_at = ?
            WHERE user_id = ?
            "#,
        )
        .bind(&profile.currency)
        .bind(&profile.timezone)
        .bind(profile.monthly_income)
        .bind(Json(&profile.notification_preferences))
        .bind(profile.updated_at)
        .bind(profile.user_id.into_inner().to_string())
        .execute(&self.pool)
        .await?;

        self.find_by_user_id(profile.user_id)
            .await?
            .ok_or_else(|| FintrackError::Internal("Failed to fetch updated profile".to_string()))
    }
}

impl std::fmt::Debug for MySqlUserProfileRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlUserProfileRepository").finish_non_exhaustive()
    }
}
