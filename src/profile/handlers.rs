use axum::{extract::State, Json};
use tracing::{info, instrument};

use crate::{
    auth::{jwt::AuthUser, repo_types::User},
    error::AuthError,
    state::AppState,
};

use super::dto::{ProfileResponse, UpdateProfileRequest};

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, AuthError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AuthError::Unauthenticated)?;

    Ok(Json(ProfileResponse::from(user)))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AuthError> {
    // The caller must still resolve to a live record
    if User::find_by_id(&state.db, user_id).await?.is_none() {
        return Err(AuthError::Unauthenticated);
    }

    let user = User::update_profile(
        &state.db,
        user_id,
        &payload.bio,
        payload.location.as_deref(),
        payload.date_of_birth,
    )
    .await?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(ProfileResponse::from(user)))
}
