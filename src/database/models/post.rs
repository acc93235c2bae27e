use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::Owned;

pub const DEFAULT_TRACK_NAME: &str = "Unknown Track";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub track_url: String,
    pub track_name: String,
    pub thumbnail_url: Option<String>,
    pub thumbnail_name: Option<String>,
    pub author: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Owned for Post {
    const KIND: &'static str = "post";

    fn owner_id(&self) -> Uuid {
        self.author
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub track_url: String,
    pub track_name: String,
    pub thumbnail_url: Option<String>,
    pub thumbnail_name: Option<String>,
    pub author: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub track_name: Option<String>,
    pub thumbnail_url: Option<String>,
    pub thumbnail_name: Option<String>,
}

impl PostChanges {
    pub fn apply(self, post: &mut Post) {
        if let Some(v) = self.title {
            post.title = v;
        }
        if let Some(v) = self.description {
            post.description = v;
        }
        if let Some(v) = self.track_name {
            post.track_name = v;
        }
        if let Some(v) = self.thumbnail_url {
            post.thumbnail_url = Some(v);
        }
        if let Some(v) = self.thumbnail_name {
            post.thumbnail_name = Some(v);
        }
    }
}
