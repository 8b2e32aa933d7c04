//! User profile service implementation.

use crate::dto::{ProfileResponse, UpdateProfileRequest};
use async_trait::async_trait;
use chrono::Utc;
use fintrack_core::{
    rules, FintrackError, FintrackResult, Service, UserId, UserProfile, ValidateExt,
};
use fintrack_repository::UserProfileRepository;
use std::sync::Arc;
use tracing::{debug, info};

/// Profile service trait.
#[async_trait]
pub trait ProfileService: Service {
    /// Returns the user's profile, creating a default one on first access.
    async fn get_profile(&self, user_id: UserId) -> FintrackResult<ProfileResponse>;

    /// Applies a partial update to the user's profile.
    async fn update_profile(
        &self,
        user_id: UserId,
        request: UpdateProfileRequest,
    ) -> FintrackResult<ProfileResponse>;
}

/// Profile service implementation.
pub struct ProfileServiceImpl<P>
where
    P: UserProfileRepository,
{
    profile_repository: Arc<P>,
}

impl<P> ProfileServiceImpl<P>
where
    P: UserProfileRepository,
{
    /// Creates a new profile service.
    pub fn new(profile_repository: Arc<P>) -> Self {
        Self { profile_repository }
    }

    async fn get_or_create(&self, user_id: UserId) -> FintrackResult<UserProfile> {
        if let Some(profile) = self.profile_repository.find_by_user_id(user_id).await? {
            return Ok(profile);
        }

        let profile = UserProfile::new(user_id);
        let saved = self.profile_repository.save(&profile).await?;
        info!("Profile created for user: {}", user_id);
        Ok(saved)
    }
}

#[async_trait]
impl<P> ProfileService for ProfileServiceImpl<P>
where
    P: UserProfileRepository + 'static,
{
    async fn get_profile(&self, user_id: UserId) -> FintrackResult<ProfileResponse> {
        debug!("Fetching profile for user: {}", user_id);

        let profile = self.get_or_create(user_id).await?;
        Ok(ProfileResponse::from(profile))
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        request: UpdateProfileRequest,
    ) -> FintrackResult<ProfileResponse> {
        debug!("Updating profile for user: {}", user_id);

        request.validate_request()?;

        let mut profile = self.get_or_create(user_id).await?;

        if let Some(currency) = request.currency {
            rules::valid_currency_code(&currency).map_err(|_| {
                FintrackError::Validation(
                    "Currency must be a three-letter ISO 4217 code".to_string(),
                )
            })?;
            profile.currency = currency;
        }
        if let Some(timezone) = request.timezone {
            profile.timezone = timezone;
        }
        if let Some(monthly_income) = request.monthly_income {
            profile.monthly_income = Some(monthly_income);
        }
        if let Some(preferences) = request.notification_preferences {
            // The stored object is replaced, not merged.
            profile.notification_preferences = preferences;
        }
        profile.updated_at = Utc::now();

        let updated = self.profile_repository.update(&profile).await?;

        info!("Profile updated for user: {}", user_id);
        Ok(ProfileResponse::from(updated))
    }
}

impl<P> Service for ProfileServiceImpl<P> where P: UserProfileRepository + 'static {}

impl<P> std::fmt::Debug for ProfileServiceImpl<P>
where
    P: UserProfileRepository,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileServiceImpl").finish_non_exhaustive()
    }
}
