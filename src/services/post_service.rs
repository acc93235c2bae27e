use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::comments::CommentRequest;
use crate::auth::ensure_owner;
use crate::database::models::post::DEFAULT_TRACK_NAME;
use crate::database::models::{Comment, CommentTarget, NewPost, Post, PostChanges};
use crate::database::{CommentStore, PostStore, Store};
use crate::error::ApiError;
use crate::validation::FieldErrors;

#[derive(Debug, Default, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub track_url: Option<String>,
    pub track_name: Option<String>,
    pub thumbnail_url: Option<String>,
    pub thumbnail_name: Option<String>,
}

/// Trimmed track name; absent or blank names fall back to the default
fn track_name_or_default(name: Option<String>) -> String {
    name.map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_TRACK_NAME.to_string())
}

pub struct PostService {
    store: Arc<dyn Store>,
}

impl PostService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, author: Uuid, request: CreatePostRequest) -> Result<Post, ApiError> {
        let mut errors = FieldErrors::new();
        let title = errors.required("title", request.title);
        let description = errors.required("description", request.description);
        let track_url = errors.required("track_url", request.track_url);
        errors.http_url("track_url", &track_url);
        errors.into_result("Missing required fields")?;

        let track_name = track_name_or_default(request.track_name);

        let post = self
            .store
            .create_post(NewPost {
                title,
                description,
                track_url,
                track_name,
                thumbnail_url: request.thumbnail_url,
                thumbnail_name: request.thumbnail_name,
                author,
            })
            .await?;

        info!("User {} published post {}", author, post.id);
        Ok(post)
    }

    pub async fn get(&self, id: Uuid) -> Result<Post, ApiError> {
        self.store
            .find_post(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Post not found"))
    }

    pub async fn list(&self) -> Result<Vec<Post>, ApiError> {
        Ok(self.store.list_posts().await?)
    }

    pub async fn by_track(&self, track_url: &str) -> Result<Post, ApiError> {
        self.store
            .find_post_by_track(track_url)
            .await?
            .ok_or_else(|| ApiError::not_found("Post not found"))
    }

    pub async fn update(&self, me: Uuid, id: Uuid, changes: PostChanges) -> Result<Post, ApiError> {
        let post = self.get(id).await?;
        ensure_owner(me, &post)?;

        let mut errors = FieldErrors::new();
        let changes = PostChanges {
            title: errors.non_blank("title", changes.title),
            description: errors.non_blank("description", changes.description),
            track_name: changes.track_name.map(|n| track_name_or_default(Some(n))),
            thumbnail_url: changes.thumbnail_url,
            thumbnail_name: changes.thumbnail_name,
        };
        errors.into_result("Invalid post update")?;

        self.store
            .update_post(id, me, changes)
            .await?
            .ok_or_else(|| ApiError::not_found("Post not found"))
    }

    pub async fn delete(&self, me: Uuid, id: Uuid) -> Result<Post, ApiError> {
        let post = self.get(id).await?;
        ensure_owner(me, &post)?;

        if !self.store.delete_post(id, me).await? {
            return Err(ApiError::not_found("Post not found"));
        }
        info!("User {} deleted post {}", me, id);
        Ok(post)
    }

    pub async fn comments(&self, id: Uuid) -> Result<Vec<Comment>, ApiError> {
        self.get(id).await?;
        Ok(self.store.comments_for(CommentTarget::Post(id)).await?)
    }

    pub async fn add_comment(&self, me: Uuid, id: Uuid, request: CommentRequest) -> Result<Comment, ApiError> {
        self.get(id).await?;
        let comment = request.into_new_comment(me, CommentTarget::Post(id))?;
        Ok(self.store.create_comment(comment).await?)
    }
}
