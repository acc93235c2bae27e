// handlers/public/auth/register.rs - POST /auth/register handler

use axum::extract::State;

use crate::api::ApiJson;
use crate::app::AppState;
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::RegisterRequest;

/// POST /auth/register - Create a new account
///
/// Expected Input:
/// ```json
/// {
///   "email": "string",      // Required: valid address, unique
///   "username": "string",   // Required: at least 5 characters, unique
///   "password": "string",   // Required: 8-26 chars, lower, upper, digit, symbol
///   "avatar": "string"      // Optional: http(s) URL
/// }
/// ```
///
/// Responds 201 with the created user, 400 with `field_errors` when
/// validation fails, and 409 when the email or username is taken.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> ApiResult<User> {
    let user = state.accounts().register(payload).await?;
    Ok(ApiResponse::created(user))
}
