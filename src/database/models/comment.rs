use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub post_id: Option<Uuid>,
    pub song_id: Option<Uuid>,
    pub comment: String,
    pub attachment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// What a comment is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentTarget {
    Post(Uuid),
    Song(Uuid),
}

impl CommentTarget {
    pub fn post_id(&self) -> Option<Uuid> {
        match self {
            CommentTarget::Post(id) => Some(*id),
            CommentTarget::Song(_) => None,
        }
    }

    pub fn song_id(&self) -> Option<Uuid> {
        match self {
            CommentTarget::Song(id) => Some(*id),
            CommentTarget::Post(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub user_id: Uuid,
    pub target: CommentTarget,
    pub comment: String,
    pub attachment: Option<String>,
}
