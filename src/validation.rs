// Request payload validation shared by the registration and resource handlers
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::auth::password::password_strength_violations;
use crate::error::ApiError;

pub const MIN_USERNAME_LEN: usize = 5;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

static HTTP_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/?#]+[^\s]*$").expect("url pattern compiles"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_http_url(value: &str) -> bool {
    HTTP_URL_RE.is_match(value)
}

/// Collects per-field messages and turns them into a single 400.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: HashMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    /// Require a non-blank string; returns the trimmed value when present.
    pub fn required(&mut self, field: &str, value: Option<String>) -> String {
        match value.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => v,
            _ => {
                self.add(field, "This field is required");
                String::new()
            }
        }
    }

    /// Partial-update variant of `required`: an absent field is left alone,
    /// a present one must not be blank.
    pub fn non_blank(&mut self, field: &str, value: Option<String>) -> Option<String> {
        let value = value?;
        Some(self.required(field, Some(value)))
    }

    /// Check an already-trimmed URL field; blank values are reported by `required`.
    pub fn http_url(&mut self, field: &str, value: &str) {
        if !value.is_empty() && !is_http_url(value) {
            self.add(field, "Must be an http or https URL");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self, message: &str) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error(message, Some(self.errors)))
        }
    }
}

/// Registration rules: email shape, username length, password strength and
/// an optional http(s) avatar.
pub fn validate_registration(
    email: &str,
    username: &str,
    password: &str,
    avatar: Option<&str>,
    errors: &mut FieldErrors,
) {
    if !email.is_empty() && !is_valid_email(email) {
        errors.add("email", "Must be a valid email address");
    }

    if !username.is_empty() && username.chars().count() < MIN_USERNAME_LEN {
        errors.add(
            "username",
            format!("Must be at least {} characters long", MIN_USERNAME_LEN),
        );
    }

    if !password.is_empty() {
        let violations = password_strength_violations(password);
        if !violations.is_empty() {
            errors.add("password", format!("Password {}", violations.join(", ")));
        }
    }

    if let Some(avatar) = avatar.filter(|a| !a.is_empty()) {
        if !is_http_url(avatar) {
            errors.add("avatar", "Must be an http or https URL");
        }
    }
}
