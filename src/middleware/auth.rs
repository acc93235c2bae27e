use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::{bearer_token, AuthError, Claims};
use crate::error::ApiError;

/// Identity of the caller, produced only by `jwt_auth_middleware`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = match request.headers().get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| {
            debug!("Authorization header is not valid ASCII");
            ApiError::unauthorized(AuthError::MalformedToken)
        })?),
        None => None,
    };

    let claims = bearer_token(header)
        .and_then(|token| state.keys.verify(token))
        .map_err(|err| {
            match err {
                AuthError::InvalidSignature => {
                    warn!("Rejected token with invalid signature on {}", request.uri().path())
                }
                ref other => debug!("Rejected request to {}: {}", request.uri().path(), other),
            }
            ApiError::unauthorized(err)
        })?;

    // Convert claims to AuthUser and inject into request
    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or(ApiError::unauthorized(AuthError::MissingToken))
    }
}
