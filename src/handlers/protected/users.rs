// handlers/protected/users.rs - Follow graph and listening stats

use axum::extract::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{ApiPath, ApiQuery};
use crate::app::AppState;
use crate::database::models::{ArtistPlayCount, FollowState, RecentPlay};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct TopArtistsQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct IsFollowed {
    pub is_followed: bool,
}

/// GET /api/users/me/top-artists?limit= - Most played artists over recent plays
pub async fn top_artists(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<TopArtistsQuery>,
) -> ApiResult<Vec<ArtistPlayCount>> {
    let artists = state.accounts().top_artists(auth.user_id, query.limit).await?;
    Ok(ApiResponse::success(artists))
}

/// GET /api/users/me/recent - Last plays, newest first
pub async fn recent(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Vec<RecentPlay>> {
    Ok(ApiResponse::success(state.accounts().recent_plays(auth.user_id).await?))
}

/// POST /api/users/:id/follow
///
/// Following twice leaves `followers_count` unchanged; following yourself is 400.
pub async fn follow(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<FollowState> {
    Ok(ApiResponse::success(state.accounts().follow(auth.user_id, id).await?))
}

/// POST /api/users/:id/unfollow
pub async fn unfollow(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<FollowState> {
    Ok(ApiResponse::success(state.accounts().unfollow(auth.user_id, id).await?))
}

/// GET /api/users/:id/follow
pub async fn is_following(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<IsFollowed> {
    let is_followed = state.accounts().is_following(auth.user_id, id).await?;
    Ok(ApiResponse::success(IsFollowed { is_followed }))
}
