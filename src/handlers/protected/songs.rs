// handlers/protected/songs.rs - Song CRUD, likes, plays and comments

use axum::extract::State;
use serde::Serialize;
use uuid::Uuid;

use crate::api::{ApiJson, ApiPath};
use crate::app::AppState;
use crate::database::models::{Comment, LikeState, RecentPlay, Song, SongChanges};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{CommentRequest, CreateSongRequest};

#[derive(Debug, Serialize)]
pub struct Liked {
    pub liked: bool,
}

/// POST /api/songs - Publish a song as the caller
///
/// Expected Input:
/// ```json
/// {
///   "name": "string",         // Required
///   "thumbnail": "string",    // Required: http(s) URL
///   "track": "string",        // Required: http(s) URL
///   "genre": "string",        // Required
///   "duration": 180,          // Optional: seconds
///   "description": "string"   // Optional
/// }
/// ```
///
/// The artist is always the authenticated caller; any `artist` in the body is ignored.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreateSongRequest>,
) -> ApiResult<Song> {
    let song = state.songs().create(auth.user_id, payload).await?;
    Ok(ApiResponse::created(song))
}

/// GET /api/songs/mine - Songs published by the caller
pub async fn mine(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Vec<Song>> {
    Ok(ApiResponse::success(state.songs().mine(auth.user_id).await?))
}

/// GET /api/songs/feed - Songs the caller has liked, most recent like first
pub async fn feed(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Vec<Song>> {
    Ok(ApiResponse::success(state.songs().liked(auth.user_id).await?))
}

/// GET /api/songs/artist/:id - 404 when the artist does not exist
pub async fn by_artist(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Vec<Song>> {
    Ok(ApiResponse::success(state.songs().by_artist(id).await?))
}

/// GET /api/songs/:id
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<Song> {
    Ok(ApiResponse::success(state.songs().get(id).await?))
}

/// PUT /api/songs/:id - Owner-only partial update
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(changes): ApiJson<SongChanges>,
) -> ApiResult<Song> {
    Ok(ApiResponse::success(state.songs().update(auth.user_id, id, changes).await?))
}

/// DELETE /api/songs/:id - Owner-only; returns the deleted song
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Song> {
    Ok(ApiResponse::success(state.songs().delete(auth.user_id, id).await?))
}

/// PUT /api/songs/:id/like - Idempotent
pub async fn like(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<LikeState> {
    Ok(ApiResponse::success(state.songs().like(auth.user_id, id).await?))
}

/// PUT /api/songs/:id/unlike - Idempotent
pub async fn unlike(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<LikeState> {
    Ok(ApiResponse::success(state.songs().unlike(auth.user_id, id).await?))
}

/// GET /api/songs/:id/like - Whether the caller likes the song
pub async fn is_liked(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Liked> {
    let liked = state.songs().is_liked(auth.user_id, id).await?;
    Ok(ApiResponse::success(Liked { liked }))
}

/// POST /api/songs/:id/play - Append to listening history
pub async fn play(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<RecentPlay> {
    Ok(ApiResponse::success(state.songs().play(auth.user_id, id).await?))
}

/// GET /api/songs/:id/comments - Newest first
pub async fn comments(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Vec<Comment>> {
    Ok(ApiResponse::success(state.songs().comments(id).await?))
}

/// POST /api/songs/:id/comments
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<CommentRequest>,
) -> ApiResult<Comment> {
    let comment = state.songs().add_comment(auth.user_id, id, payload).await?;
    Ok(ApiResponse::created(comment))
}
