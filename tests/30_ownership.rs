mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn only_the_artist_can_modify_a_song() -> Result<()> {
    let app = common::spawn_app().await?;
    let alice = app.user("alice").await?;
    let bobby = app.user("bobby").await?;

    let song = app.create_song(&alice, "sunrise").await?;
    let id = song["id"].as_str().unwrap();
    assert_eq!(song["artist"], alice.id.to_string());
    assert_eq!(song["artist_username"], "alice");

    let path = format!("/api/songs/{}", id);

    let (status, body) = app.put(&path, Some(&bobby.token), json!({"name": "stolen"})).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
    assert_eq!(body["error"], "Not authorized to modify this song");

    let (status, _) = app.delete(&path, Some(&bobby.token)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = app.get(&path, Some(&bobby.token)).await?;
    assert_eq!(body["data"]["name"], "sunrise");

    let (status, body) = app.put(&path, Some(&alice.token), json!({"name": "sunset"})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "sunset");
    assert_eq!(body["data"]["genre"], "Lofi");

    let (status, _) = app.delete(&path, Some(&alice.token)).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&path, Some(&alice.token)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&path, Some(&alice.token)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn song_artist_comes_from_the_token_not_the_body() -> Result<()> {
    let app = common::spawn_app().await?;
    let alice = app.user("alice").await?;
    let bobby = app.user("bobby").await?;

    let (status, body) = app
        .post(
            "/api/songs",
            Some(&bobby.token),
            json!({
                "name": "impostor",
                "thumbnail": "https://cdn.example.com/cover.png",
                "track": "https://cdn.example.com/impostor.mp3",
                "genre": "Pop",
                "artist": alice.id,
            }),
        )
        .await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["artist"], bobby.id.to_string());

    let id = body["data"]["id"].as_str().unwrap();
    let (status, body) = app
        .put(&format!("/api/songs/{}", id), Some(&bobby.token), json!({"artist": alice.id}))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["artist"], bobby.id.to_string());
    Ok(())
}

#[tokio::test]
async fn missing_song_fields_are_reported() -> Result<()> {
    let app = common::spawn_app().await?;
    let alice = app.user("alice").await?;

    let (status, body) = app.post("/api/songs", Some(&alice.token), json!({"name": "half"})).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    for field in ["thumbnail", "track", "genre"] {
        assert_eq!(body["field_errors"][field], "This field is required");
    }
    Ok(())
}

#[tokio::test]
async fn only_the_owner_can_modify_a_playlist() -> Result<()> {
    let app = common::spawn_app().await?;
    let alice = app.user("alice").await?;
    let bobby = app.user("bobby").await?;

    let (status, body) = app
        .post("/api/playlists", Some(&alice.token), json!({"name": "Focus"}))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let path = format!("/api/playlists/{}", body["data"]["id"].as_str().unwrap());

    let (status, _) = app.put(&path, Some(&bobby.token), json!({"name": "Mine now"})).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.delete(&path, Some(&bobby.token)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.put(&path, Some(&alice.token), json!({"name": "Deep Focus"})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Deep Focus");

    let (status, _) = app.delete(&path, Some(&alice.token)).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&path, Some(&alice.token)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn only_the_author_can_modify_a_post() -> Result<()> {
    let app = common::spawn_app().await?;
    let alice = app.user("alice").await?;
    let bobby = app.user("bobby").await?;

    let (status, body) = app
        .post(
            "/api/posts",
            Some(&alice.token),
            json!({
                "title": "New drop",
                "description": "Out now",
                "track_url": "https://cdn.example.com/drop.mp3",
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["track_name"], "Unknown Track");
    assert_eq!(body["data"]["author"], alice.id.to_string());
    let path = format!("/api/posts/{}", body["data"]["id"].as_str().unwrap());

    let (status, _) = app.put(&path, Some(&bobby.token), json!({"title": "Hijacked"})).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.delete(&path, Some(&bobby.token)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.put(&path, Some(&alice.token), json!({"title": "Fresh drop"})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Fresh drop");

    let (status, _) = app.delete(&path, Some(&alice.token)).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&path, Some(&alice.token)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn unknown_resources_are_404_and_bad_ids_are_400() -> Result<()> {
    let app = common::spawn_app().await?;
    let alice = app.user("alice").await?;
    let missing = uuid::Uuid::new_v4();

    let (status, _) = app
        .put(&format!("/api/songs/{}", missing), Some(&alice.token), json!({"name": "x"}))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&format!("/api/playlists/{}", missing), Some(&alice.token)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get("/api/songs/not-a-uuid", Some(&alice.token)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    Ok(())
}

#[tokio::test]
async fn updates_are_held_to_creation_rules() -> Result<()> {
    let app = common::spawn_app().await?;
    let alice = app.user("alice").await?;

    let song = app.create_song(&alice, "sunrise").await?;
    let song_path = format!("/api/songs/{}", song["id"].as_str().unwrap());

    let (status, body) = app
        .put(
            &song_path,
            Some(&alice.token),
            json!({"name": "", "genre": "  ", "thumbnail": "not a url", "duration": -5}),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["name"], "This field is required");
    assert_eq!(body["field_errors"]["genre"], "This field is required");
    assert_eq!(body["field_errors"]["thumbnail"], "Must be an http or https URL");
    assert_eq!(body["field_errors"]["duration"], "Must not be negative");
    assert!(body["field_errors"].get("track").is_none());

    let (_, body) = app.get(&song_path, Some(&alice.token)).await?;
    assert_eq!(body["data"]["name"], "sunrise");
    assert_eq!(body["data"]["genre"], "Lofi");

    let (status, body) = app.put(&song_path, Some(&alice.token), json!({"name": "  dusk  "})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "dusk");

    let (_, body) = app
        .post("/api/playlists", Some(&alice.token), json!({"name": "Focus"}))
        .await?;
    let playlist_path = format!("/api/playlists/{}", body["data"]["id"].as_str().unwrap());
    let (status, body) = app.put(&playlist_path, Some(&alice.token), json!({"name": " "})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field_errors"]["name"], "This field is required");

    let (_, body) = app
        .post(
            "/api/posts",
            Some(&alice.token),
            json!({
                "title": "New drop",
                "description": "Out now",
                "track_url": "https://cdn.example.com/drop.mp3",
            }),
        )
        .await?;
    let post_path = format!("/api/posts/{}", body["data"]["id"].as_str().unwrap());
    let (status, body) = app
        .put(&post_path, Some(&alice.token), json!({"title": "", "description": "still here"}))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["title"], "This field is required");

    let (status, body) = app.put(&post_path, Some(&alice.token), json!({"track_name": "   "})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["track_name"], "Unknown Track");
    Ok(())
}
