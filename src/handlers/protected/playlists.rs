// handlers/protected/playlists.rs - Playlist CRUD

use axum::extract::State;
use uuid::Uuid;

use crate::api::{ApiJson, ApiPath};
use crate::app::AppState;
use crate::database::models::{Playlist, PlaylistChanges};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::CreatePlaylistRequest;

/// POST /api/playlists
///
/// Expected Input:
/// ```json
/// {
///   "name": "string",        // Required
///   "thumbnail": "string",   // Optional
///   "songs": ["song_uuid"]   // Optional: existing songs, duplicates collapse
/// }
/// ```
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreatePlaylistRequest>,
) -> ApiResult<Playlist> {
    let playlist = state.playlists().create(auth.user_id, payload).await?;
    Ok(ApiResponse::created(playlist))
}

/// GET /api/playlists/mine
pub async fn mine(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Vec<Playlist>> {
    Ok(ApiResponse::success(state.playlists().mine(auth.user_id).await?))
}

/// GET /api/playlists/artist/:id - 404 when the user does not exist
pub async fn by_owner(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Vec<Playlist>> {
    Ok(ApiResponse::success(state.playlists().by_owner(id).await?))
}

/// GET /api/playlists/:id
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<Playlist> {
    Ok(ApiResponse::success(state.playlists().get(id).await?))
}

/// PUT /api/playlists/:id - Owner-only partial update
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(changes): ApiJson<PlaylistChanges>,
) -> ApiResult<Playlist> {
    Ok(ApiResponse::success(state.playlists().update(auth.user_id, id, changes).await?))
}

/// DELETE /api/playlists/:id - Owner-only
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Playlist> {
    Ok(ApiResponse::success(state.playlists().delete(auth.user_id, id).await?))
}

/// PUT /api/playlists/:id/songs/:song_id - Adding a song already present is a no-op
pub async fn add_song(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((id, song_id)): ApiPath<(Uuid, Uuid)>,
) -> ApiResult<Playlist> {
    let playlist = state.playlists().add_song(auth.user_id, id, song_id).await?;
    Ok(ApiResponse::success(playlist))
}
