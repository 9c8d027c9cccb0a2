use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::error::AuthError;

const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Strength policy applied at signup and password change. The first
/// failing rule is the one reported.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < 8 {
        return Err(AuthError::WeakPassword(
            "Password must be at least 8 characters long".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AuthError::WeakPassword(
            "Password must contain at least one lowercase letter".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AuthError::WeakPassword(
            "Password must contain at least one uppercase letter".into(),
        ));
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(AuthError::WeakPassword(
            "Password must contain at least one special character".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn policy_accepts_conforming_password() {
        assert!(validate_password("Abcdef1!").is_ok());
    }

    #[test]
    fn policy_rejects_short_password_first() {
        // 7 chars; length is the first rule checked
        let err = validate_password("short1!").unwrap_err();
        assert!(err.to_string().contains("at least 8 characters"));
    }

    #[test]
    fn policy_rejects_missing_lowercase() {
        let err = validate_password("ABCDEF1!").unwrap_err();
        assert!(err.to_string().contains("lowercase"));
    }

    #[test]
    fn policy_rejects_missing_uppercase() {
        let err = validate_password("abcdef1!").unwrap_err();
        assert!(err.to_string().contains("uppercase"));
    }

    #[test]
    fn policy_rejects_missing_special_char() {
        let err = validate_password("Abcdefg1").unwrap_err();
        assert!(err.to_string().contains("special character"));
    }

    #[test]
    fn policy_accepts_every_listed_special_char() {
        for c in SPECIAL_CHARS.chars() {
            let candidate = format!("Abcdefg{c}");
            assert!(
                validate_password(&candidate).is_ok(),
                "expected {candidate:?} to pass"
            );
        }
    }
}
