//! Database row types that differ from the API models.
//! Resource tables map straight onto the dayplan-types entities; only the
//! account row needs its own type, since it carries the password hash.

use chrono::{DateTime, Utc};

use dayplan_types::UserId;
use dayplan_types::models::User;

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub phone_number: String,
    pub password: String,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub fn user_id(&self) -> UserId {
        UserId(self.id)
    }

    /// Public view of the account, without the password hash.
    pub fn to_user(&self) -> User {
        User {
            id: self.user_id(),
            username: self.username.clone(),
            phone_number: self.phone_number.clone(),
            nickname: self.nickname.clone(),
            avatar: self.avatar.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
