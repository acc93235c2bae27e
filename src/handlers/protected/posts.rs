// handlers/protected/posts.rs - Posts about tracks and their comments

use axum::extract::State;
use uuid::Uuid;

use crate::api::{ApiJson, ApiPath};
use crate::app::AppState;
use crate::database::models::{Comment, Post, PostChanges};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{CommentRequest, CreatePostRequest};

/// POST /api/posts
///
/// Expected Input:
/// ```json
/// {
///   "title": "string",            // Required
///   "description": "string",      // Required
///   "track_url": "string",        // Required: http(s) URL
///   "track_name": "string",       // Optional: defaults to "Unknown Track"
///   "thumbnail_url": "string",    // Optional
///   "thumbnail_name": "string"    // Optional
/// }
/// ```
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreatePostRequest>,
) -> ApiResult<Post> {
    let post = state.posts().create(auth.user_id, payload).await?;
    Ok(ApiResponse::created(post))
}

/// GET /api/posts - Newest first
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Post>> {
    Ok(ApiResponse::success(state.posts().list().await?))
}

/// GET /api/posts/track/:url - Post by its percent-encoded track URL
pub async fn by_track(State(state): State<AppState>, ApiPath(url): ApiPath<String>) -> ApiResult<Post> {
    Ok(ApiResponse::success(state.posts().by_track(&url).await?))
}

/// GET /api/posts/:id
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<Post> {
    Ok(ApiResponse::success(state.posts().get(id).await?))
}

/// PUT /api/posts/:id - Author-only partial update
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(changes): ApiJson<PostChanges>,
) -> ApiResult<Post> {
    Ok(ApiResponse::success(state.posts().update(auth.user_id, id, changes).await?))
}

/// DELETE /api/posts/:id - Author-only
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Post> {
    Ok(ApiResponse::success(state.posts().delete(auth.user_id, id).await?))
}

/// GET /api/posts/:id/comments - Newest first
pub async fn comments(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Vec<Comment>> {
    Ok(ApiResponse::success(state.posts().comments(id).await?))
}

/// POST /api/posts/:id/comments
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<CommentRequest>,
) -> ApiResult<Comment> {
    let comment = state.posts().add_comment(auth.user_id, id, payload).await?;
    Ok(ApiResponse::created(comment))
}
