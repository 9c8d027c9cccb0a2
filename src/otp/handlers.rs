use axum::{extract::State, Json};
use time::{Duration, OffsetDateTime};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, MessageResponse},
        handlers::establish_session,
        repo_types::User,
    },
    error::AuthError,
    state::AppState,
};

use super::dto::{OtpRequest, OtpVerifyRequest};
use super::service;

/// Issue a fresh challenge for the account and hand it to the
/// notifier. Re-requesting overwrites the previous pair, so only the
/// newest code verifies.
#[instrument(skip(state, payload))]
pub async fn request_otp(
    State(state): State<AppState>,
    Json(mut payload): Json<OtpRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "otp requested for unknown email");
            return Err(AuthError::AccountNotFound);
        }
    };

    let code = service::generate_code();
    User::set_otp(&state.db, user.id, &code, OffsetDateTime::now_utc()).await?;

    if let Err(e) = state.notifier.send(&user.email, &code).await {
        error!(error = %e, user_id = %user.id, "otp delivery failed");
        return Err(AuthError::DeliveryFailure);
    }

    info!(user_id = %user.id, "otp issued");
    Ok(Json(MessageResponse {
        message: "Verification code sent.",
    }))
}

/// Verify a submitted code against the stored challenge. Success
/// consumes the challenge and establishes a session, like the password
/// stage of login does.
#[instrument(skip(state, payload))]
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(mut payload): Json<OtpVerifyRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "otp verify for unknown email");
            return Err(AuthError::OtpInvalid);
        }
    };

    let (code, issued_at) = match (user.otp_code.as_deref(), user.otp_created_at) {
        (Some(code), Some(issued_at)) => (code, issued_at),
        _ => {
            warn!(user_id = %user.id, "otp verify with no challenge issued");
            return Err(AuthError::OtpInvalid);
        }
    };

    let validity = Duration::seconds(state.config.otp.validity_seconds);
    if !service::window_open(issued_at, OffsetDateTime::now_utc(), validity) {
        warn!(user_id = %user.id, "otp expired");
        return Err(AuthError::OtpExpired);
    }

    if !service::codes_match(&payload.code, code) || !user.is_active {
        warn!(user_id = %user.id, "otp mismatch");
        return Err(AuthError::OtpInvalid);
    }

    // Single use: drop the challenge before handing out the session
    User::clear_otp(&state.db, user.id).await?;

    info!(user_id = %user.id, "otp verified, user logged in");
    Ok(Json(establish_session(&state, &user)?))
}
