use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{CommentTarget, NewComment};
use crate::error::ApiError;
use crate::validation::{is_http_url, FieldErrors};

#[derive(Debug, Default, Deserialize)]
pub struct CommentRequest {
    pub comment: Option<String>,
    pub attachment: Option<String>,
}

impl CommentRequest {
    pub fn into_new_comment(self, user_id: Uuid, target: CommentTarget) -> Result<NewComment, ApiError> {
        let mut errors = FieldErrors::new();
        let comment = errors.required("comment", self.comment);
        let attachment = self
            .attachment
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        if let Some(ref url) = attachment {
            if !is_http_url(url) {
                errors.add("attachment", "Must be an http or https URL");
            }
        }
        errors.into_result("Invalid comment")?;

        Ok(NewComment {
            user_id,
            target,
            comment,
            attachment,
        })
    }
}
