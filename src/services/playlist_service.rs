use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::ensure_owner;
use crate::database::models::{NewPlaylist, Playlist, PlaylistChanges};
use crate::database::{PlaylistStore, SongStore, Store, UserStore};
use crate::error::ApiError;
use crate::validation::FieldErrors;

#[derive(Debug, Default, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: Option<String>,
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub songs: Vec<Uuid>,
}

pub struct PlaylistService {
    store: Arc<dyn Store>,
}

impl PlaylistService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Every id must name an existing song
    async fn check_songs_exist(&self, songs: &[Uuid]) -> Result<(), ApiError> {
        for id in songs {
            if self.store.find_song(*id).await?.is_none() {
                let mut errors = FieldErrors::new();
                errors.add("songs", format!("Unknown song {}", id));
                return errors.into_result("Invalid playlist songs");
            }
        }
        Ok(())
    }

    pub async fn create(&self, owner: Uuid, request: CreatePlaylistRequest) -> Result<Playlist, ApiError> {
        let mut errors = FieldErrors::new();
        let name = errors.required("name", request.name);
        errors.into_result("Missing required fields")?;
        self.check_songs_exist(&request.songs).await?;

        let playlist = self
            .store
            .create_playlist(NewPlaylist {
                name,
                thumbnail: request.thumbnail.unwrap_or_default(),
                owner,
                songs: request.songs,
            })
            .await?;

        info!("User {} created playlist {}", owner, playlist.id);
        Ok(playlist)
    }

    pub async fn get(&self, id: Uuid) -> Result<Playlist, ApiError> {
        self.store
            .find_playlist(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Playlist not found"))
    }

    pub async fn mine(&self, me: Uuid) -> Result<Vec<Playlist>, ApiError> {
        Ok(self.store.playlists_by_owner(me).await?)
    }

    pub async fn by_owner(&self, owner: Uuid) -> Result<Vec<Playlist>, ApiError> {
        if self.store.find_user(owner).await?.is_none() {
            return Err(ApiError::not_found("User not found"));
        }
        Ok(self.store.playlists_by_owner(owner).await?)
    }

    pub async fn search(&self, name: &str) -> Result<Vec<Playlist>, ApiError> {
        Ok(self.store.search_playlists(name.trim()).await?)
    }

    pub async fn update(&self, me: Uuid, id: Uuid, changes: PlaylistChanges) -> Result<Playlist, ApiError> {
        let playlist = self.get(id).await?;
        ensure_owner(me, &playlist)?;

        let mut errors = FieldErrors::new();
        let changes = PlaylistChanges {
            name: errors.non_blank("name", changes.name),
            ..changes
        };
        errors.into_result("Invalid playlist update")?;

        if let Some(ref songs) = changes.songs {
            self.check_songs_exist(songs).await?;
        }

        self.store
            .update_playlist(id, me, changes)
            .await?
            .ok_or_else(|| ApiError::not_found("Playlist not found"))
    }

    pub async fn delete(&self, me: Uuid, id: Uuid) -> Result<Playlist, ApiError> {
        let playlist = self.get(id).await?;
        ensure_owner(me, &playlist)?;

        if !self.store.delete_playlist(id, me).await? {
            return Err(ApiError::not_found("Playlist not found"));
        }
        info!("User {} deleted playlist {}", me, id);
        Ok(playlist)
    }

    pub async fn add_song(&self, me: Uuid, id: Uuid, song: Uuid) -> Result<Playlist, ApiError> {
        let playlist = self.get(id).await?;
        ensure_owner(me, &playlist)?;

        if self.store.find_song(song).await?.is_none() {
            return Err(ApiError::not_found("Song not found"));
        }

        self.store
            .add_to_playlist(id, me, song)
            .await?
            .ok_or_else(|| ApiError::not_found("Playlist not found"))
    }
}
