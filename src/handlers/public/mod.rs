// handlers/public/mod.rs - Public handlers (no authentication)
//
// Token acquisition plus read-only browsing of songs, users and playlists.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::app::AppState;
use crate::database::Store;
use crate::error::ApiError;
use crate::middleware::ApiResponse;

pub mod auth; // POST /auth/register, POST /auth/login
pub mod playlists; // GET /playlists/search/:name
pub mod songs; // GET /songs[/search|/genre|/track]
pub mod users; // GET /users[/:id]

/// GET / - Service banner
pub async fn root() -> impl IntoResponse {
    ApiResponse::success(json!({
        "name": "SoundShare API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Share songs, build playlists, follow artists",
        "endpoints": {
            "auth": "/auth/register, /auth/login (public - token acquisition)",
            "browse": "/songs, /users, /playlists/search/:name (public)",
            "api": "/api/* (protected - bearer token)",
        }
    }))
}

/// GET /health - Store connectivity
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => ApiResponse::success(json!({
            "status": "ok",
            "timestamp": now,
            "store": state.store.backend(),
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            let err = ApiError::service_unavailable("Store unavailable");
            (StatusCode::SERVICE_UNAVAILABLE, Json(err.to_json())).into_response()
        }
    }
}
