use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Full credential row. Never serialized; the password digest stays inside
/// the login handler.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Denormalized identity returned alongside a freshly issued token.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub role: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            full_name: user.full_name,
        }
    }
}
