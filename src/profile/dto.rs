use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::auth::repo_types::User;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<Date>,
    pub bio: String,
    pub location: Option<String>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            date_of_birth: user.date_of_birth,
            bio: user.bio,
            location: user.location,
        }
    }
}

/// Full overwrite of the editable fields; there is no partial-update
/// form of this request.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub bio: String,
    pub location: Option<String>,
    pub date_of_birth: Option<Date>,
}
