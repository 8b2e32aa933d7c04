//! Authentication service implementation.

use crate::dto::{AuthResponse, AuthUserInfo, LoginRequest, RefreshTokenRequest, RegisterRequest};
use async_trait::async_trait;
use fintrack_config::SecurityConfig;
use fintrack_core::{
    Category, Email, FintrackError, FintrackResult, Service, User, UserProfile, UserStatus,
    ValidateExt,
};
use fintrack_repository::{CategoryRepository, UserProfileRepository, UserRepository};
use fintrack_security::{validate_password_strength, Claims, PasswordHasher, TokenProvider};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Authentication service trait.
#[async_trait]
pub trait AuthService: Service {
    /// Registers a new user and provisions their account.
    async fn register(&self, request: RegisterRequest) -> FintrackResult<AuthResponse>;

    /// Logs in a user.
    async fn login(&self, request: LoginRequest) -> FintrackResult<AuthResponse>;

    /// Refreshes an access token.
    async fn refresh_token(&self, request: RefreshTokenRequest) -> FintrackResult<AuthResponse>;

    /// Validates an access token and returns claims.
    async fn validate_token(&self, token: &str) -> FintrackResult<Claims>;

    /// Gets the current user from claims.
    async fn get_current_user(&self, claims: &Claims) -> FintrackResult<AuthUserInfo>;
}

/// Authentication service implementation.
///
/// Registration provisions the user's profile and default category set
/// alongside the account itself.
pub struct AuthServiceImpl<U, C, P>
where
    U: UserRepository,
    C: CategoryRepository,
    P: UserProfileRepository,
{
    user_repository: Arc<U>,
    category_repository: Arc<C>,
    profile_repository: Arc<P>,
    password_hasher: Arc<PasswordHasher>,
    token_provider: Arc<TokenProvider>,
}

impl<U, C, P> AuthServiceImpl<U, C, P>
where
    U: UserRepository,
    C: CategoryRepository,
    P: UserProfileRepository,
{
    /// Creates a new authentication service.
    pub fn new(
        user_repository: Arc<U>,
        category_repository: Arc<C>,
        profile_repository: Arc<P>,
        password_hasher: Arc<PasswordHasher>,
        security_config: Arc<SecurityConfig>,
    ) -> Self {
        let token_provider = Arc::new(TokenProvider::new(security_config));
        Self {
            user_repository,
            category_repository,
            profile_repository,
            password_hasher,
            token_provider,
        }
    }

    /// Creates an auth response for a user.
    fn create_auth_response(&self, user: &User) -> FintrackResult<AuthResponse> {
        let tokens = self.token_provider.generate_tokens(
            user.id,
            &user.username,
            user.email.as_str(),
            user.role,
        )?;

        Ok(AuthResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.access_expires_at - chrono::Utc::now().timestamp(),
            user: AuthUserInfo::from(user),
        })
    }
}

#[async_trait]
impl<U, C, P> AuthService for AuthServiceImpl<U, C, P>
where
    U: UserRepository + 'static,
    C: CategoryRepository + 'static,
    P: UserProfileRepository + 'static,
{
    async fn register(&self, request: RegisterRequest) -> FintrackResult<AuthResponse> {
        debug!("Registering user: {}", request.username);

        request.validate_request()?;

        if let Err(errors) = validate_password_strength(&request.password) {
            return Err(FintrackError::Validation(errors.join("; ")));
        }

        if self
            .user_repository
            .exists_by_username(&request.username)
            .await?
        {
            return Err(FintrackError::Conflict(format!(
                "Username '{}' already exists",
                request.username
            )));
        }

        if self.user_repository.exists_by_email(&request.email).await? {
            return Err(FintrackError::Conflict(format!(
                "Email '{}' already exists",
                request.email
            )));
        }

        let email =
            Email::new(&request.email).map_err(|e| FintrackError::Validation(e.to_string()))?;

        let password_hash = self.password_hasher.hash(&request.password)?;

        let user = User::new(
            request.username,
            email,
            password_hash,
            request.first_name,
            request.last_name,
        );

        let saved_user = self.user_repository.save(&user).await?;

        // A fresh account gets a profile and the starter categories.
        self.profile_repository
            .save(&UserProfile::new(saved_user.id))
            .await?;
        self.category_repository
            .save_all(&Category::default_set(saved_user.id))
            .await?;

        info!("User registered: {}", saved_user.id);

        self.create_auth_response(&saved_user)
    }

    async fn login(&self, request: LoginRequest) -> FintrackResult<AuthResponse> {
        debug!("Login attempt for: {}", request.username_or_email);

        request.validate_request()?;

        let user = self
            .user_repository
            .find_by_username_or_email(&request.username_or_email)
            .await?
            .ok_or_else(|| {
                warn!(
                    "Login failed: user not found - {}",
                    request.username_or_email
                );
                FintrackError::InvalidCredentials
            })?;

        if !user.status.can_login() {
            warn!("Login failed: user status {:?} - {}", user.status, user.id);
            return Err(match user.status {
                UserStatus::Suspended => {
                    FintrackError::Forbidden("Account is suspended".to_string())
                }
                UserStatus::Locked => FintrackError::Forbidden("Account is locked".to_string()),
                UserStatus::Deleted => FintrackError::InvalidCredentials,
                _ => FintrackError::Forbidden("Account is not active".to_string()),
            });
        }

        if !self
            .password_hasher
            .verify(&request.password, &user.password_hash)?
        {
            warn!("Login failed: invalid password - {}", user.id);
            return Err(FintrackError::InvalidCredentials);
        }

        let mut updated_user = user.clone();
        updated_user.record_login();
        let _ = self.user_repository.update(&updated_user).await;

        info!("User logged in: {}", user.id);

        self.create_auth_response(&user)
    }

    async fn refresh_token(&self, request: RefreshTokenRequest) -> FintrackResult<AuthResponse> {
        debug!("Refreshing token");

        let claims = self
            .token_provider
            .validate_refresh_token(&request.refresh_token)?;

        let user_id = claims.user_id().ok_or_else(|| {
            FintrackError::InvalidToken("Invalid refresh token: missing user ID".to_string())
        })?;

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| FintrackError::InvalidToken("User no longer exists".to_string()))?;

        if !user.status.can_login() {
            return Err(FintrackError::Forbidden("Account is not active".to_string()));
        }

        info!("Token refreshed for user: {}", user.id);

        self.create_auth_response(&user)
    }

    async fn validate_token(&self, token: &str) -> FintrackResult<Claims> {
        self.token_provider.validate_access_token(token)
    }

    async fn get_current_user(&self, claims: &Claims) -> FintrackResult<AuthUserInfo> {
        let user_id = claims
            .user_id()
            .ok_or_else(|| FintrackError::InvalidToken("Invalid token: missing user ID".to_string()))?;

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| FintrackError::not_found("User", user_id))?;

        Ok(AuthUserInfo::from(&user))
    }
}

impl<U, C, P> Service for AuthServiceImpl<U, C, P>
where
    U: UserRepository + 'static,
    C: CategoryRepository + 'static,
    P: UserProfileRepository + 'static,
{
}

impl<U, C, P> std::fmt::Debug for AuthServiceImpl<U, C, P>
where
    U: UserRepository,
    C: CategoryRepository,
    P: UserProfileRepository,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServiceImpl").finish_non_exhaustive()
    }
}
