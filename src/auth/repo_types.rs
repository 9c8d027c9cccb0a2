use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// User record in the database. Email is the canonical login
/// identifier; username and email both carry UNIQUE constraints.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<Date>,
    pub bio: String,
    pub location: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub otp_code: Option<String>, // always written together with otp_created_at
    #[serde(skip_serializing)]
    pub otp_created_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}
