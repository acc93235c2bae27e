use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::Owned;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Song {
    pub id: Uuid,
    pub name: String,
    pub thumbnail: String,
    pub track: String,
    pub genre: String,
    pub duration: Option<i32>,
    pub artist: Uuid,
    /// Joined from the artist's user row
    pub artist_username: String,
    pub description: Option<String>,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
}

impl Owned for Song {
    const KIND: &'static str = "song";

    fn owner_id(&self) -> Uuid {
        self.artist
    }
}

#[derive(Debug, Clone)]
pub struct NewSong {
    pub name: String,
    pub thumbnail: String,
    pub track: String,
    pub genre: String,
    pub duration: Option<i32>,
    pub description: Option<String>,
    pub artist: Uuid,
}

/// Mutable song fields; the artist cannot be changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongChanges {
    pub name: Option<String>,
    pub thumbnail: Option<String>,
    pub track: Option<String>,
    pub genre: Option<String>,
    pub duration: Option<i32>,
    pub description: Option<String>,
}

impl SongChanges {
    pub fn apply(self, song: &mut Song) {
        if let Some(v) = self.name {
            song.name = v;
        }
        if let Some(v) = self.thumbnail {
            song.thumbnail = v;
        }
        if let Some(v) = self.track {
            song.track = v;
        }
        if let Some(v) = self.genre {
            song.genre = v;
        }
        if let Some(v) = self.duration {
            song.duration = Some(v);
        }
        if let Some(v) = self.description {
            song.description = Some(v);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeState {
    pub likes: i64,
    pub liked: bool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecentPlay {
    pub song_id: Uuid,
    pub song_name: String,
    pub artist: Uuid,
    pub played_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ArtistPlayCount {
    pub artist: Uuid,
    pub username: String,
    pub plays: i64,
}
