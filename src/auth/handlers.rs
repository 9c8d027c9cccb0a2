use axum::{
    extract::{FromRef, State},
    response::Redirect,
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, ChangePasswordRequest, LoginStep1Request, LoginStep1Response,
            LoginStep2Request, MessageResponse, PublicUser, RefreshRequest, SignupRequest,
        },
        jwt::{AuthUser, JwtKeys},
        password,
        repo_types::User,
    },
    error::AuthError,
    state::AppState,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Sign an access/refresh pair for the user. This is the only place a
/// session comes into existence.
pub(crate) fn establish_session(
    state: &AppState,
    user: &User,
) -> Result<AuthResponse, AuthError> {
    let keys = JwtKeys::from_ref(state);
    let access_token = keys.sign_access(user.id).map_err(|e| {
        error!(error = %e, "jwt sign access failed");
        AuthError::Internal
    })?;
    let refresh_token = keys.sign_refresh(user.id).map_err(|e| {
        error!(error = %e, "jwt sign refresh failed");
        AuthError::Internal
    })?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        },
    })
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(mut payload): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.password != payload.confirm_password {
        warn!("signup passwords do not match");
        return Err(AuthError::PasswordMismatch);
    }

    password::validate_password(&payload.password)?;

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AuthError::InvalidEmail);
    }

    // Username before email; the first duplicate found decides the error
    // the user sees. The INSERT below re-checks both under the real
    // constraints.
    if User::username_exists(&state.db, &payload.username).await? {
        warn!(username = %payload.username, "username already exists");
        return Err(AuthError::UsernameTaken);
    }
    if User::email_exists(&state.db, &payload.email).await? {
        warn!(email = %payload.email, "email already registered");
        return Err(AuthError::EmailTaken);
    }

    let hash = match password::hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "hash_password failed");
            return Err(AuthError::Persistence);
        }
    };

    let user = User::create(&state.db, &payload.username, &payload.email, &hash).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(establish_session(&state, &user)?))
}

/// First step of the two-step login: confirm the account exists and
/// hand back the challenge pointing at the password stage. No
/// credential is checked here.
#[instrument(skip(state, payload))]
pub async fn login_step1(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginStep1Request>,
) -> Result<Json<LoginStep1Response>, AuthError> {
    payload.email = payload.email.trim().to_lowercase();

    match User::find_by_email(&state.db, &payload.email).await? {
        Some(user) => {
            info!(user_id = %user.id, "login step 1 passed");
            Ok(Json(LoginStep1Response {
                email: payload.email,
                next: "/auth/login/password",
            }))
        }
        None => {
            warn!(email = %payload.email, "login unknown email");
            Err(AuthError::AccountNotFound)
        }
    }
}

/// Second step: verify the password for the account named in step 1.
/// A missing account, an inactive one and a wrong password all come
/// back as the same generic failure.
#[instrument(skip(state, payload))]
pub async fn login_step2(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginStep2Request>,
) -> Result<Json<AuthResponse>, AuthError> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.password.is_empty() {
        warn!("login password field missing");
        return Err(AuthError::MissingCredential);
    }

    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login step 2 for unknown email");
            return Err(AuthError::InvalidCredential);
        }
    };

    let ok = password::verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!(error = %e, "verify_password failed");
        AuthError::Internal
    })?;

    if !ok || !user.is_active {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(AuthError::InvalidCredential);
    }

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(establish_session(&state, &user)?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_refresh(&payload.refresh_token).map_err(|_| {
        warn!("invalid refresh token");
        AuthError::Unauthenticated
    })?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or(AuthError::Unauthenticated)?;

    info!(user_id = %user.id, "token pair refreshed");
    Ok(Json(establish_session(&state, &user)?))
}

/// Routed for POST only: a bare navigation must not end the session.
/// The token pair lives with the client, so termination is its discard;
/// either way the caller lands back on the home page, also when called
/// twice in a row.
#[instrument]
pub async fn logout() -> Redirect {
    info!("logout, redirecting home");
    Redirect::to("/")
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AuthError::Unauthenticated)?;

    let ok = password::verify_password(&payload.current_password, &user.password_hash).map_err(
        |e| {
            error!(error = %e, "verify_password failed");
            AuthError::Internal
        },
    )?;
    if !ok {
        warn!(user_id = %user.id, "change password with wrong current password");
        return Err(AuthError::InvalidCredential);
    }

    if payload.new_password != payload.confirm_new_password {
        return Err(AuthError::PasswordMismatch);
    }
    password::validate_password(&payload.new_password)?;

    let hash = password::hash_password(&payload.new_password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        AuthError::Internal
    })?;
    User::update_password(&state.db, user.id, &hash).await?;

    info!(user_id = %user.id, "password changed");
    Ok(Json(MessageResponse {
        message: "Password updated.",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_regex_accepts_plain_addresses() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
    }

    #[test]
    fn email_regex_rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
    }

    #[tokio::test]
    async fn logout_always_redirects_home() {
        use axum::http::{header, StatusCode};
        use axum::response::IntoResponse;

        // calling twice in a row behaves the same both times
        for _ in 0..2 {
            let res = logout().await.into_response();
            assert_eq!(res.status(), StatusCode::SEE_OTHER);
            assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/");
        }
    }
}
