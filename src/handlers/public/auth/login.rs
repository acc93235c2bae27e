// handlers/public/auth/login.rs - POST /auth/login handler

use axum::extract::State;

use crate::api::ApiJson;
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{LoginRequest, LoginResponse};

/// POST /auth/login - Authenticate user and receive JWT token
///
/// Expected Input:
/// ```json
/// {
///   "email": "string",      // Required
///   "password": "string"    // Required
/// }
/// ```
///
/// Expected Output (Success):
/// ```json
/// {
///   "success": true,
///   "data": {
///     "token": "eyJhbGciOiJIUzI1NiI...",
///     "expires_in": 604800,
///     "user": { "id": "user_uuid", "username": "alice", ... }
///   }
/// }
/// ```
///
/// An unknown email and a wrong password both answer 401 with the same body.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let response = state.accounts().login(payload).await?;
    Ok(ApiResponse::success(response))
}
