// handlers/public/users.rs - Public user profiles

use axum::extract::State;
use uuid::Uuid;

use crate::api::ApiPath;
use crate::app::AppState;
use crate::database::models::{PublicUser, UserProfile};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /users - Every user, public fields only
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<PublicUser>> {
    Ok(ApiResponse::success(state.accounts().list_users().await?))
}

/// GET /users/:id - Public profile with follower and following ids
pub async fn profile(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<UserProfile<PublicUser>> {
    Ok(ApiResponse::success(state.accounts().public_profile(id).await?))
}
