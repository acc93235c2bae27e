#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode, Url};
use serde_json::{json, Value};
use uuid::Uuid;

use soundshare_api::app::{app, AppState};
use soundshare_api::auth::JwtKeys;
use soundshare_api::config::AppConfig;
use soundshare_api::database::MemoryStore;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "Sup3r$ecret";

/// A router with an in-memory store, served on an ephemeral port inside the
/// calling test's runtime.
pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub keys: JwtKeys,
}

pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub token: String,
}

pub async fn spawn_app() -> Result<TestApp> {
    let env: HashMap<&str, &str> = HashMap::from([
        ("APP_ENV", "development"),
        ("JWT_SECRET", TEST_SECRET),
        ("API_ENABLE_REQUEST_LOGGING", "false"),
    ]);
    let config = AppConfig::from_source(|key| env.get(key).map(|v| v.to_string()))?;
    let state = AppState::new(config, Arc::new(MemoryStore::new()));
    let keys = state.keys.clone();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind ephemeral port")?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, app(state)).await;
    });

    Ok(TestApp {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
        keys,
    })
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build `base/prefix/<segment>` with `segment` percent-encoded as one path segment
    pub fn url_with_segment(&self, prefix: &[&str], segment: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow::anyhow!("base url cannot have path segments"))?;
            segments.clear();
            segments.extend(prefix);
            segments.push(segment);
        }
        Ok(url)
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut request = self.client.request(method, self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let res = request.send().await?;
        let status = res.status();
        let body = res.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PUT, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, path, token, None).await
    }

    pub async fn register(&self, username: &str) -> Result<(StatusCode, Value)> {
        self.post(
            "/auth/register",
            None,
            json!({
                "email": format!("{}@example.com", username),
                "username": username,
                "password": PASSWORD,
            }),
        )
        .await
    }

    /// Register `username` and log in, returning the id and a fresh token
    pub async fn user(&self, username: &str) -> Result<TestUser> {
        let (status, body) = self.register(username).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register failed: {} {}", status, body);

        let email = format!("{}@example.com", username);
        let (status, body) = self
            .post("/auth/login", None, json!({ "email": email, "password": PASSWORD }))
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "login failed: {} {}", status, body);

        let token = body["data"]["token"]
            .as_str()
            .context("login response has no token")?
            .to_string();
        let id = body["data"]["user"]["id"]
            .as_str()
            .context("login response has no user id")?
            .parse()?;

        Ok(TestUser {
            id,
            username: username.to_string(),
            email,
            token,
        })
    }

    pub async fn create_song(&self, owner: &TestUser, name: &str) -> Result<Value> {
        let (status, body) = self
            .post(
                "/api/songs",
                Some(&owner.token),
                json!({
                    "name": name,
                    "thumbnail": "https://cdn.example.com/cover.png",
                    "track": format!("https://cdn.example.com/tracks/{}.mp3", name),
                    "genre": "Lofi",
                    "duration": 200,
                }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create song failed: {} {}", status, body);
        Ok(body["data"].clone())
    }
}
