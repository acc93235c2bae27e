use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::comments::CommentRequest;
use crate::auth::ensure_owner;
use crate::database::models::{Comment, CommentTarget, LikeState, NewSong, RecentPlay, Song, SongChanges};
use crate::database::{CommentStore, SongStore, Store, UserStore};
use crate::error::ApiError;
use crate::validation::FieldErrors;

#[derive(Debug, Default, Deserialize)]
pub struct CreateSongRequest {
    pub name: Option<String>,
    pub thumbnail: Option<String>,
    pub track: Option<String>,
    pub genre: Option<String>,
    pub duration: Option<i32>,
    pub description: Option<String>,
}

fn check_duration(duration: Option<i32>, errors: &mut FieldErrors) {
    if matches!(duration, Some(d) if d < 0) {
        errors.add("duration", "Must not be negative");
    }
}

/// Hold present fields to the same rules as creation.
fn validate_changes(changes: SongChanges) -> Result<SongChanges, ApiError> {
    let mut errors = FieldErrors::new();
    let name = errors.non_blank("name", changes.name);
    let genre = errors.non_blank("genre", changes.genre);
    let thumbnail = errors.non_blank("thumbnail", changes.thumbnail);
    let track = errors.non_blank("track", changes.track);
    for (field, value) in [("thumbnail", &thumbnail), ("track", &track)] {
        if let Some(url) = value {
            errors.http_url(field, url);
        }
    }
    check_duration(changes.duration, &mut errors);
    errors.into_result("Invalid song update")?;

    Ok(SongChanges {
        name,
        thumbnail,
        track,
        genre,
        duration: changes.duration,
        description: changes.description,
    })
}

pub struct SongService {
    store: Arc<dyn Store>,
}

impl SongService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, artist: Uuid, request: CreateSongRequest) -> Result<Song, ApiError> {
        let mut errors = FieldErrors::new();
        let name = errors.required("name", request.name);
        let thumbnail = errors.required("thumbnail", request.thumbnail);
        let track = errors.required("track", request.track);
        let genre = errors.required("genre", request.genre);

        errors.http_url("thumbnail", &thumbnail);
        errors.http_url("track", &track);
        check_duration(request.duration, &mut errors);
        errors.into_result("Missing required fields")?;

        let song = self
            .store
            .create_song(NewSong {
                name,
                thumbnail,
                track,
                genre,
                duration: request.duration,
                description: request.description,
                artist,
            })
            .await?;

        info!("User {} uploaded song {}", artist, song.id);
        Ok(song)
    }

    pub async fn get(&self, id: Uuid) -> Result<Song, ApiError> {
        self.store
            .find_song(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Song not found"))
    }

    pub async fn list(&self) -> Result<Vec<Song>, ApiError> {
        Ok(self.store.list_songs().await?)
    }

    pub async fn by_artist(&self, artist: Uuid) -> Result<Vec<Song>, ApiError> {
        if self.store.find_user(artist).await?.is_none() {
            return Err(ApiError::not_found("Artist not found"));
        }
        Ok(self.store.songs_by_artist(artist).await?)
    }

    pub async fn mine(&self, me: Uuid) -> Result<Vec<Song>, ApiError> {
        Ok(self.store.songs_by_artist(me).await?)
    }

    pub async fn search(&self, name: &str) -> Result<Vec<Song>, ApiError> {
        Ok(self.store.search_songs(name.trim()).await?)
    }

    pub async fn by_genre(&self, genre: &str) -> Result<Vec<Song>, ApiError> {
        let genre = genre.trim();
        if genre.is_empty() {
            return Err(ApiError::bad_request("Genre must not be blank"));
        }
        let songs = self.store.songs_by_genre(genre).await?;
        if songs.is_empty() {
            return Err(ApiError::not_found(format!("No songs found for genre {}", genre)));
        }
        Ok(songs)
    }

    pub async fn by_track(&self, track: &str) -> Result<Song, ApiError> {
        self.store
            .find_song_by_track(track)
            .await?
            .ok_or_else(|| ApiError::not_found("Song not found"))
    }

    pub async fn update(&self, me: Uuid, id: Uuid, changes: SongChanges) -> Result<Song, ApiError> {
        let song = self.get(id).await?;
        ensure_owner(me, &song)?;

        let changes = validate_changes(changes)?;

        self.store
            .update_song(id, me, changes)
            .await?
            .ok_or_else(|| ApiError::not_found("Song not found"))
    }

    pub async fn delete(&self, me: Uuid, id: Uuid) -> Result<Song, ApiError> {
        let song = self.get(id).await?;
        ensure_owner(me, &song)?;

        if !self.store.delete_song(id, me).await? {
            return Err(ApiError::not_found("Song not found"));
        }
        info!("User {} deleted song {}", me, id);
        Ok(song)
    }

    pub async fn like(&self, me: Uuid, id: Uuid) -> Result<LikeState, ApiError> {
        self.store
            .like_song(id, me)
            .await?
            .ok_or_else(|| ApiError::not_found("Song not found"))
    }

    pub async fn unlike(&self, me: Uuid, id: Uuid) -> Result<LikeState, ApiError> {
        self.store
            .unlike_song(id, me)
            .await?
            .ok_or_else(|| ApiError::not_found("Song not found"))
    }

    pub async fn is_liked(&self, me: Uuid, id: Uuid) -> Result<bool, ApiError> {
        self.get(id).await?;
        Ok(self.store.is_liked(id, me).await?)
    }

    pub async fn liked(&self, me: Uuid) -> Result<Vec<Song>, ApiError> {
        Ok(self.store.liked_songs(me).await?)
    }

    pub async fn play(&self, me: Uuid, id: Uuid) -> Result<RecentPlay, ApiError> {
        self.store
            .record_play(id, me)
            .await?
            .ok_or_else(|| ApiError::not_found("Song not found"))
    }

    pub async fn comments(&self, id: Uuid) -> Result<Vec<Comment>, ApiError> {
        self.get(id).await?;
        Ok(self.store.comments_for(CommentTarget::Song(id)).await?)
    }

    pub async fn add_comment(&self, me: Uuid, id: Uuid, request: CommentRequest) -> Result<Comment, ApiError> {
        self.get(id).await?;
        let comment = request.into_new_comment(me, CommentTarget::Song(id))?;
        Ok(self.store.create_comment(comment).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changes_are_trimmed_and_absent_fields_stay_absent() {
        let changes = SongChanges {
            name: Some("  Night Drive ".into()),
            ..Default::default()
        };
        let checked = validate_changes(changes).unwrap();
        assert_eq!(checked.name.as_deref(), Some("Night Drive"));
        assert!(checked.genre.is_none());
        assert!(checked.track.is_none());
    }

    #[test]
    fn invalid_changes_report_every_field() {
        let changes = SongChanges {
            name: Some(String::new()),
            genre: Some("  ".into()),
            thumbnail: Some("not a url".into()),
            duration: Some(-5),
            ..Default::default()
        };
        let body = validate_changes(changes).unwrap_err().to_json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["field_errors"]["name"], "This field is required");
        assert_eq!(body["field_errors"]["genre"], "This field is required");
        assert_eq!(body["field_errors"]["thumbnail"], "Must be an http or https URL");
        assert_eq!(body["field_errors"]["duration"], "Must not be negative");
    }
}
