use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{AuthError, IssuedToken, JwtKeys};
use crate::database::models::{ArtistPlayCount, FollowState, NewUser, PublicUser, RecentPlay, User, UserProfile};
use crate::database::{SongStore, Store, UserStore};
use crate::error::ApiError;
use crate::validation::{validate_registration, FieldErrors};

pub const RECENT_PLAYS_LIMIT: i64 = 10;
pub const DEFAULT_TOP_ARTISTS: i64 = 5;
pub const MAX_TOP_ARTISTS: i64 = 50;

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
    pub user: User,
}

/// Accounts, credentials and the follow graph
pub struct AccountService {
    store: Arc<dyn Store>,
    keys: JwtKeys,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>, keys: JwtKeys) -> Self {
        Self { store, keys }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<User, ApiError> {
        let mut errors = FieldErrors::new();
        let email = errors.required("email", request.email).to_lowercase();
        let username = errors.required("username", request.username);
        // Passwords are never trimmed
        let password = request.password.unwrap_or_default();
        if password.is_empty() {
            errors.add("password", "This field is required");
        }
        let avatar = request
            .avatar
            .map(|a| a.trim().to_string())
            .unwrap_or_default();

        validate_registration(&email, &username, &password, Some(&avatar), &mut errors);
        errors.into_result("Invalid registration details")?;

        let password_hash = hash_password(&password)?;
        let user = self
            .store
            .create_user(NewUser {
                email,
                username,
                password_hash,
                avatar,
            })
            .await?;

        info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Exchange credentials for a signed token. Reads only.
    pub async fn issue_token(&self, email: &str, password: &str) -> Result<(User, IssuedToken), ApiError> {
        let user = self
            .store
            .find_user_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or_else(|| {
                debug!("Login attempt for unknown email");
                AuthError::UserNotFound
            })?;

        if !verify_password(password, &user.password_hash)? {
            debug!("Login attempt with wrong password for {}", user.id);
            return Err(AuthError::InvalidCredentials.into());
        }

        let issued = self.keys.issue(user.id)?;
        Ok((user, issued))
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        let mut errors = FieldErrors::new();
        let email = errors.required("email", request.email);
        let password = request.password.unwrap_or_default();
        if password.is_empty() {
            errors.add("password", "This field is required");
        }
        errors.into_result("Email and password are required")?;

        let (mut user, issued) = self.issue_token(&email, &password).await?;

        let now = chrono::Utc::now();
        self.store.touch_last_login(user.id, now).await?;
        user.last_login = now;

        info!("User {} logged in", user.id);
        Ok(LoginResponse {
            expires_in: issued.expires_in(),
            token: issued.token,
            user,
        })
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, ApiError> {
        self.store
            .find_user(id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    pub async fn profile(&self, id: Uuid) -> Result<UserProfile, ApiError> {
        let user = self.get_user(id).await?;
        let followers = self.store.followers(id).await?;
        let following = self.store.following(id).await?;
        Ok(UserProfile {
            user,
            followers,
            following,
        })
    }

    /// Profile as other users see it
    pub async fn public_profile(&self, id: Uuid) -> Result<UserProfile<PublicUser>, ApiError> {
        let profile = self.profile(id).await?;
        Ok(UserProfile {
            user: profile.user.into(),
            followers: profile.followers,
            following: profile.following,
        })
    }

    pub async fn list_users(&self) -> Result<Vec<PublicUser>, ApiError> {
        let users = self.store.list_users().await?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    pub async fn follow(&self, me: Uuid, target: Uuid) -> Result<FollowState, ApiError> {
        if me == target {
            return Err(ApiError::bad_request("You cannot follow yourself"));
        }
        self.store
            .follow(me, target)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    pub async fn unfollow(&self, me: Uuid, target: Uuid) -> Result<FollowState, ApiError> {
        if me == target {
            return Err(ApiError::bad_request("You cannot unfollow yourself"));
        }
        self.store
            .unfollow(me, target)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    pub async fn is_following(&self, me: Uuid, target: Uuid) -> Result<bool, ApiError> {
        self.get_user(target).await?;
        Ok(self.store.is_following(me, target).await?)
    }

    pub async fn recent_plays(&self, me: Uuid) -> Result<Vec<RecentPlay>, ApiError> {
        Ok(self.store.recent_plays(me, RECENT_PLAYS_LIMIT).await?)
    }

    pub async fn top_artists(&self, me: Uuid, limit: Option<i64>) -> Result<Vec<ArtistPlayCount>, ApiError> {
        let limit = match limit {
            None => DEFAULT_TOP_ARTISTS,
            Some(n) if (1..=MAX_TOP_ARTISTS).contains(&n) => n,
            Some(_) => {
                return Err(ApiError::bad_request(format!(
                    "limit must be between 1 and {}",
                    MAX_TOP_ARTISTS
                )))
            }
        };
        Ok(self.store.top_artists(me, limit).await?)
    }
}
