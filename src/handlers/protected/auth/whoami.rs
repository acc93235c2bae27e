// handlers/protected/auth/whoami.rs - GET /api/auth/whoami handler

use axum::extract::State;
use serde::Serialize;

use crate::app::AppState;
use crate::database::models::UserProfile;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub token_expires_at: i64,
}

/// GET /api/auth/whoami - The caller's own profile
///
/// A valid token whose user has since disappeared answers 404.
pub async fn whoami(State(state): State<AppState>, auth: AuthUser) -> ApiResult<WhoAmI> {
    let profile = state.accounts().profile(auth.user_id).await?;
    Ok(ApiResponse::success(WhoAmI {
        profile,
        token_expires_at: auth.expires_at,
    }))
}
