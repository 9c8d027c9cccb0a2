use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for signup.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Request body for login step 1 (account lookup).
#[derive(Debug, Deserialize)]
pub struct LoginStep1Request {
    pub email: String,
}

/// Challenge returned by step 1, directing the caller to the password
/// stage. No credential has been checked at this point.
#[derive(Debug, Serialize)]
pub struct LoginStep1Response {
    pub email: String,
    pub next: &'static str,
}

/// Request body for login step 2 (password verification).
#[derive(Debug, Deserialize)]
pub struct LoginStep2Request {
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

/// Response returned after signup, login or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_serialization() {
        let user = PublicUser {
            id: Uuid::new_v4(),
            username: "tester".to_string(),
            email: "test@example.com".to_string(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("tester"));
        assert!(json.contains("id"));
    }

    #[test]
    fn step2_request_defaults_missing_password_to_empty() {
        let req: LoginStep2Request =
            serde_json::from_str(r#"{"email": "a@b.co"}"#).unwrap();
        assert!(req.password.is_empty());
    }
}
