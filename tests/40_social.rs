mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn likes_are_idempotent_per_user() -> Result<()> {
    let app = common::spawn_app().await?;
    let alice = app.user("alice").await?;
    let bobby = app.user("bobby").await?;
    let song = app.create_song(&alice, "anthem").await?;
    let id = song["id"].as_str().unwrap();

    let like = format!("/api/songs/{}/like", id);
    let unlike = format!("/api/songs/{}/unlike", id);

    let (status, body) = app.put(&unlike, Some(&bobby.token), json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"likes": 0, "liked": false}));

    let (status, body) = app.put(&like, Some(&bobby.token), json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"likes": 1, "liked": true}));

    let (_, body) = app.put(&like, Some(&bobby.token), json!({})).await?;
    assert_eq!(body["data"]["likes"], 1);

    let (_, body) = app.put(&like, Some(&alice.token), json!({})).await?;
    assert_eq!(body["data"]["likes"], 2);

    let (_, body) = app.get(&like, Some(&bobby.token)).await?;
    assert_eq!(body["data"]["liked"], true);

    let (_, body) = app.get("/api/songs/feed", Some(&bobby.token)).await?;
    assert_eq!(body["data"][0]["id"], id);

    let (_, body) = app.put(&unlike, Some(&bobby.token), json!({})).await?;
    assert_eq!(body["data"], json!({"likes": 1, "liked": false}));
    let (_, body) = app.put(&unlike, Some(&bobby.token), json!({})).await?;
    assert_eq!(body["data"]["likes"], 1);

    let (_, body) = app.get(&like, Some(&bobby.token)).await?;
    assert_eq!(body["data"]["liked"], false);

    let missing = format!("/api/songs/{}/like", uuid::Uuid::new_v4());
    let (status, _) = app.put(&missing, Some(&bobby.token), json!({})).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn follow_graph_is_a_set() -> Result<()> {
    let app = common::spawn_app().await?;
    let alice = app.user("alice").await?;
    let bobby = app.user("bobby").await?;

    let follow = format!("/api/users/{}/follow", alice.id);
    let unfollow = format!("/api/users/{}/unfollow", alice.id);

    let (status, body) = app.post(&follow, Some(&bobby.token), json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["followers_count"], 1);

    let (_, body) = app.post(&follow, Some(&bobby.token), json!({})).await?;
    assert_eq!(body["data"]["followers_count"], 1);

    let (_, body) = app.get(&follow, Some(&bobby.token)).await?;
    assert_eq!(body["data"]["is_followed"], true);

    let (_, body) = app.get(&format!("/users/{}", alice.id), None).await?;
    assert_eq!(body["data"]["followers"], json!([bobby.id]));
    assert_eq!(body["data"]["followers_count"], 1);

    let (_, body) = app.post(&unfollow, Some(&bobby.token), json!({})).await?;
    assert_eq!(body["data"]["followers_count"], 0);
    let (_, body) = app.post(&unfollow, Some(&bobby.token), json!({})).await?;
    assert_eq!(body["data"]["followers_count"], 0);

    let (_, body) = app.get(&follow, Some(&bobby.token)).await?;
    assert_eq!(body["data"]["is_followed"], false);
    Ok(())
}

#[tokio::test]
async fn self_follow_and_unknown_targets_are_rejected() -> Result<()> {
    let app = common::spawn_app().await?;
    let alice = app.user("alice").await?;

    let (status, _) = app
        .post(&format!("/api/users/{}/follow", alice.id), Some(&alice.token), json!({}))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let ghost = uuid::Uuid::new_v4();
    let (status, _) = app
        .post(&format!("/api/users/{}/follow", ghost), Some(&alice.token), json!({}))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get(&format!("/api/users/{}/follow", ghost), Some(&alice.token)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn playlist_holds_each_song_once() -> Result<()> {
    let app = common::spawn_app().await?;
    let alice = app.user("alice").await?;
    let bobby = app.user("bobby").await?;
    let song = app.create_song(&alice, "loop").await?;
    let song_id = song["id"].as_str().unwrap();

    let (_, body) = app
        .post("/api/playlists", Some(&alice.token), json!({"name": "Study Mix"}))
        .await?;
    let playlist_id = body["data"]["id"].as_str().unwrap().to_string();
    let add = format!("/api/playlists/{}/songs/{}", playlist_id, song_id);

    let (status, body) = app.put(&add, Some(&alice.token), json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["songs"], json!([song_id]));

    let (_, body) = app.put(&add, Some(&alice.token), json!({})).await?;
    assert_eq!(body["data"]["songs"], json!([song_id]));

    let (status, _) = app.put(&add, Some(&bobby.token), json!({})).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let missing = format!("/api/playlists/{}/songs/{}", playlist_id, uuid::Uuid::new_v4());
    let (status, _) = app.put(&missing, Some(&alice.token), json!({})).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get("/playlists/search/study", None).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let (_, body) = app.get(&format!("/api/playlists/artist/{}", alice.id), Some(&bobby.token)).await?;
    assert_eq!(body["data"][0]["id"], playlist_id);

    app.delete(&format!("/api/songs/{}", song_id), Some(&alice.token)).await?;
    let (_, body) = app.get(&format!("/api/playlists/{}", playlist_id), Some(&alice.token)).await?;
    assert_eq!(body["data"]["songs"], json!([]));
    Ok(())
}

#[tokio::test]
async fn comments_are_listed_newest_first() -> Result<()> {
    let app = common::spawn_app().await?;
    let alice = app.user("alice").await?;
    let bobby = app.user("bobby").await?;
    let song = app.create_song(&alice, "ballad").await?;
    let path = format!("/api/songs/{}/comments", song["id"].as_str().unwrap());

    let (status, body) = app.post(&path, Some(&bobby.token), json!({"comment": "first"})).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["username"], "bobby");
    app.post(&path, Some(&alice.token), json!({"comment": "second"})).await?;

    let (_, body) = app.get(&path, Some(&bobby.token)).await?;
    assert_eq!(body["data"][0]["comment"], "second");
    assert_eq!(body["data"][1]["comment"], "first");

    let (status, body) = app.post(&path, Some(&bobby.token), json!({})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["comment"].is_string());

    let (_, post) = app
        .post(
            "/api/posts",
            Some(&alice.token),
            json!({"title": "Tour", "description": "Dates", "track_url": "https://cdn.example.com/t.mp3"}),
        )
        .await?;
    let post_comments = format!("/api/posts/{}/comments", post["data"]["id"].as_str().unwrap());
    let (status, _) = app.post(&post_comments, Some(&bobby.token), json!({"comment": "see you"})).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = app.get(&post_comments, Some(&alice.token)).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let ghost = format!("/api/posts/{}/comments", uuid::Uuid::new_v4());
    let (status, _) = app.get(&ghost, Some(&alice.token)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn plays_feed_recent_history_and_top_artists() -> Result<()> {
    let app = common::spawn_app().await?;
    let alice = app.user("alice").await?;
    let bobby = app.user("bobby").await?;
    let carol = app.user("carol").await?;
    let alice_song = app.create_song(&alice, "one").await?;
    let bobby_song = app.create_song(&bobby, "two").await?;

    let play = |song: &serde_json::Value| format!("/api/songs/{}/play", song["id"].as_str().unwrap());

    for _ in 0..3 {
        let (status, _) = app.post(&play(&alice_song), Some(&carol.token), json!({})).await?;
        assert_eq!(status, StatusCode::OK);
    }
    app.post(&play(&bobby_song), Some(&carol.token), json!({})).await?;

    let (_, body) = app.get("/api/users/me/recent", Some(&carol.token)).await?;
    let recent = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(recent.len(), 4);
    assert_eq!(recent[0]["song_id"], bobby_song["id"]);

    let (_, body) = app.get("/api/users/me/top-artists?limit=1", Some(&carol.token)).await?;
    assert_eq!(body["data"], json!([{"artist": alice.id, "username": "alice", "plays": 3}]));

    let (status, _) = app.get("/api/users/me/top-artists?limit=0", Some(&carol.token)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get("/api/auth/whoami", Some(&carol.token)).await?;
    assert_eq!(body["data"]["songs_listened"], 4);
    assert_eq!(body["data"]["total_listening_time"], 800);
    Ok(())
}

#[tokio::test]
async fn public_catalogue_search() -> Result<()> {
    let app = common::spawn_app().await?;
    let alice = app.user("alice").await?;
    let song = app.create_song(&alice, "Midnight").await?;

    let (status, body) = app.get("/songs", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["artist_username"], "alice");

    let (_, body) = app.get("/songs/search/midn", None).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let (status, body) = app.get("/songs/genre/lofi", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], song["id"]);

    let (status, body) = app.get("/songs/genre/lo", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["genre"], "Lofi");

    let (status, _) = app.get("/songs/genre/metal", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/songs/genre/%20", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let track = song["track"].as_str().unwrap();
    let url = app.url_with_segment(&["songs", "track"], track)?;
    let res = app.client.get(url).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["id"], song["id"]);

    let (_, body) = app.get(&format!("/api/songs/artist/{}", alice.id), Some(&alice.token)).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    let (status, _) = app
        .get(&format!("/api/songs/artist/{}", uuid::Uuid::new_v4()), Some(&alice.token))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get("/users", None).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert!(body["data"][0].get("password_hash").is_none());
    assert!(body["data"][0].get("email").is_none());
    assert_eq!(body["data"][0]["username"], "alice");

    let (status, body) = app.get(&format!("/users/{}", alice.id), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].get("email").is_none());
    assert!(body["data"].get("password_hash").is_none());
    assert_eq!(body["data"]["followers"], json!([]));

    let (_, body) = app.get("/api/auth/whoami", Some(&alice.token)).await?;
    assert_eq!(body["data"]["email"], "alice@example.com");
    Ok(())
}

#[tokio::test]
async fn posts_are_listed_newest_first_and_found_by_track() -> Result<()> {
    let app = common::spawn_app().await?;
    let alice = app.user("alice").await?;
    let track = "https://cdn.example.com/tracks/single.mp3";

    for title in ["older", "newer"] {
        let (status, _) = app
            .post(
                "/api/posts",
                Some(&alice.token),
                json!({"title": title, "description": "d", "track_url": track, "track_name": "Single"}),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = app.get("/api/posts", Some(&alice.token)).await?;
    assert_eq!(body["data"][0]["title"], "newer");
    assert_eq!(body["data"][1]["title"], "older");

    let url = app.url_with_segment(&["api", "posts", "track"], track)?;
    let res = app.client.get(url).bearer_auth(&alice.token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["track_name"], "Single");
    Ok(())
}
