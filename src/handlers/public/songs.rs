// handlers/public/songs.rs - Read-only song catalogue

use axum::extract::State;

use crate::api::ApiPath;
use crate::app::AppState;
use crate::database::models::Song;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /songs - Every song with its artist's username
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Song>> {
    Ok(ApiResponse::success(state.songs().list().await?))
}

/// GET /songs/search/:name - Case-insensitive substring match on the name
pub async fn search(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
) -> ApiResult<Vec<Song>> {
    Ok(ApiResponse::success(state.songs().search(&name).await?))
}

/// GET /songs/genre/:genre - 404 when the genre has no songs
pub async fn by_genre(
    State(state): State<AppState>,
    ApiPath(genre): ApiPath<String>,
) -> ApiResult<Vec<Song>> {
    Ok(ApiResponse::success(state.songs().by_genre(&genre).await?))
}

/// GET /songs/track/:url - Song by its percent-encoded track URL
pub async fn by_track(
    State(state): State<AppState>,
    ApiPath(url): ApiPath<String>,
) -> ApiResult<Song> {
    Ok(ApiResponse::success(state.songs().by_track(&url).await?))
}
