use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::Owned;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Playlist {
    pub id: Uuid,
    pub name: String,
    pub thumbnail: String,
    pub owner: Uuid,
    pub songs: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Owned for Playlist {
    const KIND: &'static str = "playlist";

    fn owner_id(&self) -> Uuid {
        self.owner
    }
}

#[derive(Debug, Clone)]
pub struct NewPlaylist {
    pub name: String,
    pub thumbnail: String,
    pub owner: Uuid,
    pub songs: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistChanges {
    pub name: Option<String>,
    pub thumbnail: Option<String>,
    pub songs: Option<Vec<Uuid>>,
}

impl PlaylistChanges {
    pub fn apply(self, playlist: &mut Playlist) {
        if let Some(v) = self.name {
            playlist.name = v;
        }
        if let Some(v) = self.thumbnail {
            playlist.thumbnail = v;
        }
        if let Some(v) = self.songs {
            playlist.songs = dedup_preserving_order(v);
        }
    }
}

/// Playlists hold each song once, in first-seen order.
pub fn dedup_preserving_order(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
