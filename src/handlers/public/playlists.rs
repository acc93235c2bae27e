use axum::extract::State;

use crate::api::ApiPath;
use crate::app::AppState;
use crate::database::models::Playlist;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /playlists/search/:name
pub async fn search(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
) -> ApiResult<Vec<Playlist>> {
    Ok(ApiResponse::success(state.playlists().search(&name).await?))
}
