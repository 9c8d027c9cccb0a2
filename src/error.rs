use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Everything the flows can fail with. Each variant is scoped to the
/// request that raised it and maps to a user-visible message plus the
/// entry point the client should return to.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Account does not exist.")]
    AccountNotFound,

    #[error("Invalid credentials")]
    InvalidCredential,

    #[error("Password field is missing.")]
    MissingCredential,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Email already exists")]
    EmailTaken,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("{0}")]
    WeakPassword(String),

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid verification code")]
    OtpInvalid,

    #[error("Verification code expired")]
    OtpExpired,

    #[error("Failed to deliver verification code")]
    DeliveryFailure,

    #[error("Error creating account")]
    Persistence,

    #[error("Internal server error")]
    Internal,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: Option<&'static str>,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::AccountNotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidCredential => StatusCode::UNAUTHORIZED,
            AuthError::MissingCredential => StatusCode::BAD_REQUEST,
            AuthError::UsernameTaken | AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::PasswordMismatch
            | AuthError::WeakPassword(_)
            | AuthError::InvalidEmail => StatusCode::BAD_REQUEST,
            AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::OtpInvalid | AuthError::OtpExpired => StatusCode::UNAUTHORIZED,
            AuthError::DeliveryFailure => StatusCode::BAD_GATEWAY,
            AuthError::Persistence | AuthError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Where the client should take the user next, mirroring the
    /// original flow's redirects between its form pages.
    pub fn redirect(&self) -> Option<&'static str> {
        match self {
            AuthError::AccountNotFound | AuthError::UsernameTaken => Some("/auth/login"),
            AuthError::Unauthenticated => Some("/auth/login"),
            AuthError::InvalidCredential => Some("/auth/login/password"),
            AuthError::MissingCredential => Some("/auth/login"),
            AuthError::EmailTaken
            | AuthError::PasswordMismatch
            | AuthError::WeakPassword(_)
            | AuthError::InvalidEmail
            | AuthError::Persistence => Some("/auth/signup"),
            _ => None,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            error!(error = %self, "server error surfaced to client");
        }
        let body = ErrorBody {
            error: self.to_string(),
            redirect: self.redirect(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(e: sqlx::Error) -> Self {
        error!(error = %e, "database error");
        AuthError::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(AuthError::AccountNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AuthError::InvalidCredential.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::MissingCredential.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::UsernameTaken.status(), StatusCode::CONFLICT);
        assert_eq!(AuthError::EmailTaken.status(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::WeakPassword("too short".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::Persistence.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn signup_errors_redirect_to_signup() {
        assert_eq!(AuthError::EmailTaken.redirect(), Some("/auth/signup"));
        assert_eq!(
            AuthError::PasswordMismatch.redirect(),
            Some("/auth/signup")
        );
        // username conflict sends the user to login, as the original flow did
        assert_eq!(AuthError::UsernameTaken.redirect(), Some("/auth/login"));
    }

    #[test]
    fn persistence_failure_is_generic() {
        assert_eq!(AuthError::Persistence.to_string(), "Error creating account");
    }
}
