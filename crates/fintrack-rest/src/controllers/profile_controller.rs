//! User profile controller.

use crate::{
    extractors::{AuthenticatedUser, ValidatedJson},
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{
    extract::State,
    routing::get,
    Router,
};
use fintrack_security::ClaimsExt;
use fintrack_service::{ProfileResponse, UpdateProfileRequest};
use tracing::debug;

/// Creates the profile router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_profile).put(update_profile))
}

/// Get the user's profile, creating a default one on first access.
#[utoipa::path(
    get,
    path = "/profile",
    tag = "profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The profile", body = ProfileResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<ProfileResponse> {
    let user_id = user.require_user_id()?;

    let response = state.profile_service.get_profile(user_id).await?;
    ok(response)
}

/// Apply a partial update to the user's profile.
#[utoipa::path(
    put,
    path = "/profile",
    tag = "profile",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<ProfileResponse> {
    debug!("Profile update for: {}", user.username);

    let user_id = user.require_user_id()?;

    let response = state
        .profile_service
        .update_profile(user_id, request)
        .await?;
    ok(response)
}
