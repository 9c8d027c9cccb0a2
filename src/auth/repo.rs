use sqlx::PgPool;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::error::AuthError;

const USER_COLUMNS: &str = r#"
    id, username, email, password_hash, first_name, last_name,
    date_of_birth, bio, location, is_staff, is_superuser, is_active,
    otp_code, otp_created_at, created_at
"#;

impl User {
    /// Find a user by email (exact match on the normalized form).
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn username_exists(db: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(db)
            .await
    }

    pub async fn email_exists(db: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(db)
            .await
    }

    /// Create a new user with hashed password. The UNIQUE constraints are
    /// the real uniqueness guarantee; a violation raced past the
    /// existence checks and maps back onto the same taken-errors.
    pub async fn create(
        db: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AuthError> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
        .map_err(|e| match constraint_name(&e) {
            Some("users_username_key") => AuthError::UsernameTaken,
            Some("users_email_key") => AuthError::EmailTaken,
            _ => AuthError::Persistence,
        })
    }

    pub async fn update_password(
        db: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Overwrite the editable profile fields unconditionally.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        bio: &str,
        location: Option<&str>,
        date_of_birth: Option<Date>,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET bio = $2, location = $3, date_of_birth = $4
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(bio)
        .bind(location)
        .bind(date_of_birth)
        .fetch_one(db)
        .await
    }

    /// Write a fresh OTP challenge. Code and issuance timestamp go in a
    /// single UPDATE so the pair is never half-written.
    pub async fn set_otp(
        db: &PgPool,
        id: Uuid,
        code: &str,
        issued_at: OffsetDateTime,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET otp_code = $2, otp_created_at = $3 WHERE id = $1")
            .bind(id)
            .bind(code)
            .bind(issued_at)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Consume the challenge after a successful verification.
    pub async fn clear_otp(db: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET otp_code = NULL, otp_created_at = NULL WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

fn constraint_name(e: &sqlx::Error) -> Option<&str> {
    match e {
        sqlx::Error::Database(db) => db.constraint(),
        _ => None,
    }
}
