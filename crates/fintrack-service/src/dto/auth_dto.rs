//! Authentication DTOs.

use fintrack_core::{User, UserId, UserRole};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username or email is required"))]
    pub username_or_email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(max = 64))]
    pub first_name: Option<String>,

    #[validate(length(max = 64))]
    pub last_name: Option<String>,
}

/// Token refresh request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Authentication response with a token pair.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: AuthUserInfo,
}

/// User info embedded in auth responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthUserInfo {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<&User> for AuthUserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.to_string(),
            role: user.role,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_core::Email;

    #[test]
    fn test_login_request_requires_both_fields() {
        let valid = LoginRequest {
            username_or_email: "alice".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let no_password = LoginRequest {
            username_or_email: "alice".to_string(),
            password: String::new(),
        };
        assert!(no_password.validate().is_err());
    }

    #[test]
    fn test_register_request_valid() {
        let request = RegisterRequest {
            username: "newuser".to_string(),
            email: "new@example.com".to_string(),
            password: "Password123".to_string(),
            first_name: Some("New".to_string()),
            last_name: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_short_username() {
        let request = RegisterRequest {
            username: "ab".to_string(),
            email: "new@example.com".to_string(),
            password: "Password123".to_string(),
            first_name: None,
            last_name: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let request = RegisterRequest {
            username: "newuser".to_string(),
            email: "not-an-email".to_string(),
            password: "Password123".to_string(),
            first_name: None,
            last_name: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_short_password() {
        let request = RegisterRequest {
            username: "newuser".to_string(),
            email: "new@example.com".to_string(),
            password: "short".to_string(),
            first_name: None,
            last_name: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_auth_user_info_from_user() {
        let user = User::new(
            "alice".to_string(),
            Email::new("alice@example.com").unwrap(),
            "hash".to_string(),
            Some("Alice".to_string()),
            None,
        );

        let info = AuthUserInfo::from(&user);
        assert_eq!(info.id, user.id);
        assert_eq!(info.email, "alice@example.com");
        assert_eq!(info.first_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_message_response() {
        let response = MessageResponse::new("Logged out");
        assert_eq!(response.message, "Logged out");
    }
}
