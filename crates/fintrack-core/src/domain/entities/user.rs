//! User entity.

use super::super::value_objects::{Email, UserRole, UserStatus};
use crate::{Entity, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// User entity representing an account holder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct User {
    /// Unique identifier for the user.
    pub id: UserId,

    /// Unique username.
    #[validate(length(min = 3, max = 32))]
    pub username: String,

    /// User's email address.
    pub email: Email,

    /// Hashed password (never exposed via API).
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// User's first name.
    #[validate(length(max = 64))]
    pub first_name: Option<String>,

    /// User's last name.
    #[validate(length(max = 64))]
    pub last_name: Option<String>,

    /// User's role.
    pub role: UserRole,

    /// User's status.
    pub status: UserStatus,

    /// Last login timestamp.
    pub last_login_at: Option<DateTime<Utc>>,

    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new active user with the given details.
    ///
    /// Registration activates immediately; there is no verification step.
    #[must_use]
    pub fn new(
        username: String,
        email: Email,
        password_hash: String,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            username,
            email,
            password_hash,
            first_name,
            last_name,
            role: UserRole::User,
            status: UserStatus::Active,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a new admin user.
    #[must_use]
    pub fn new_admin(username: String, email: Email, password_hash: String) -> Self {
        let mut user = Self::new(username, email, password_hash, None, None);
        user.role = UserRole::Admin;
        user
    }

    /// Returns the display name (first name when present, else username).
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.first_name.as_deref().unwrap_or(&self.username)
    }

    /// Checks if the user is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Checks if the user can log in.
    #[must_use]
    pub const fn can_login(&self) -> bool {
        self.status.can_login()
    }

    /// Checks if the user is an admin.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }

    /// Checks if the user has the specified role or higher.
    #[must_use]
    pub const fn has_role(&self, required_role: UserRole) -> bool {
        self.role.has_permission(required_role)
    }

    /// Activates the user account.
    pub fn activate(&mut self) {
        self.status = UserStatus::Active;
        self.updated_at = Utc::now();
    }

    /// Suspends the user account.
    pub fn suspend(&mut self) {
        self.status = UserStatus::Suspended;
        self.updated_at = Utc::now();
    }

    /// Records a successful login.
    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }
}

impl Entity<UserId> for User {
    fn id(&self) -> &UserId {
        &self.id
    }
}
