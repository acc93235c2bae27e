use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub avatar: String,
    pub is_admin: bool,
    pub followers_count: i64,
    pub songs_listened: i64,
    pub total_listening_time: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
}

/// What other users may see: no email, no credentials, no login times
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub avatar: String,
    pub is_admin: bool,
    pub followers_count: i64,
    pub songs_listened: i64,
    pub total_listening_time: i64,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            avatar: user.avatar,
            is_admin: user.is_admin,
            followers_count: user.followers_count,
            songs_listened: user.songs_listened,
            total_listening_time: user.total_listening_time,
            created_at: user.created_at,
        }
    }
}

/// Insert payload; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub avatar: String,
}

/// A user together with both sides of the follow graph. The caller's own
/// profile carries the full `User`; everyone else gets a `PublicUser`.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile<U = User> {
    #[serde(flatten)]
    pub user: U,
    pub followers: Vec<Uuid>,
    pub following: Vec<Uuid>,
}

/// Follow relationship between the caller and a target user after an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FollowState {
    pub followers_count: i64,
    pub is_followed: bool,
}
