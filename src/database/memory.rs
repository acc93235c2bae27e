use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::playlist::dedup_preserving_order;
use super::models::{
    ArtistPlayCount, Comment, CommentTarget, FollowState, LikeState, NewComment, NewPlaylist,
    NewPost, NewSong, NewUser, Playlist, PlaylistChanges, Post, PostChanges, RecentPlay, Song,
    SongChanges, User,
};
use super::store::{
    CommentStore, PlaylistStore, PostStore, SongStore, Store, StoreResult, UserStore,
    TOP_ARTIST_WINDOW,
};

#[derive(Debug, Clone)]
struct Play {
    user: Uuid,
    song: Uuid,
    played_at: DateTime<Utc>,
}

/// Rows are kept in insertion order so listings are stable.
#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    follows: Vec<(Uuid, Uuid)>,
    songs: Vec<Song>,
    song_likes: Vec<(Uuid, Uuid)>,
    plays: Vec<Play>,
    playlists: Vec<Playlist>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

impl Tables {
    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn user_mut(&mut self, id: Uuid) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    fn song(&self, id: Uuid) -> Option<&Song> {
        self.songs.iter().find(|s| s.id == id)
    }

    fn song_mut(&mut self, id: Uuid) -> Option<&mut Song> {
        self.songs.iter_mut().find(|s| s.id == id)
    }

    fn username(&self, id: Uuid) -> String {
        self.user(id).map(|u| u.username.clone()).unwrap_or_default()
    }

    fn newest_first<T: Clone>(rows: impl DoubleEndedIterator<Item = T>) -> Vec<T> {
        rows.rev().collect()
    }
}

/// Process-local store for development and tests. Each operation runs under
/// a single write lock, which makes every set mutation atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(DatabaseError::Conflict("email".to_string()));
        }
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(DatabaseError::Conflict("username".to_string()));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            username: user.username,
            password_hash: user.password_hash,
            avatar: user.avatar,
            is_admin: false,
            followers_count: 0,
            songs_listened: 0,
            total_listening_time: 0,
            created_at: now,
            updated_at: now,
            last_login: now,
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.user(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        if let Some(user) = self.tables.write().await.user_mut(id) {
            user.last_login = at;
            user.updated_at = at;
        }
        Ok(())
    }

    async fn followers(&self, id: Uuid) -> StoreResult<Vec<Uuid>> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .filter(|(_, followee)| *followee == id)
            .map(|(follower, _)| *follower)
            .collect())
    }

    async fn following(&self, id: Uuid) -> StoreResult<Vec<Uuid>> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .filter(|(follower, _)| *follower == id)
            .map(|(_, followee)| *followee)
            .collect())
    }

    async fn follow(&self, follower: Uuid, followee: Uuid) -> StoreResult<Option<FollowState>> {
        let mut tables = self.tables.write().await;
        if tables.user(followee).is_none() {
            return Ok(None);
        }

        let edge = (follower, followee);
        let added = !tables.follows.contains(&edge);
        if added {
            tables.follows.push(edge);
        }

        let Some(user) = tables.user_mut(followee) else {
            return Ok(None);
        };
        if added {
            user.followers_count += 1;
        }
        Ok(Some(FollowState {
            followers_count: user.followers_count,
            is_followed: true,
        }))
    }

    async fn unfollow(&self, follower: Uuid, followee: Uuid) -> StoreResult<Option<FollowState>> {
        let mut tables = self.tables.write().await;
        if tables.user(followee).is_none() {
            return Ok(None);
        }

        let before = tables.follows.len();
        tables.follows.retain(|edge| *edge != (follower, followee));
        let removed = (before - tables.follows.len()) as i64;

        let Some(user) = tables.user_mut(followee) else {
            return Ok(None);
        };
        user.followers_count -= removed;
        Ok(Some(FollowState {
            followers_count: user.followers_count,
            is_followed: false,
        }))
    }

    async fn is_following(&self, follower: Uuid, followee: Uuid) -> StoreResult<bool> {
        Ok(self.tables.read().await.follows.contains(&(follower, followee)))
    }
}

#[async_trait]
impl SongStore for MemoryStore {
    async fn create_song(&self, song: NewSong) -> StoreResult<Song> {
        let mut tables = self.tables.write().await;
        let created = Song {
            id: Uuid::new_v4(),
            name: song.name,
            thumbnail: song.thumbnail,
            track: song.track,
            genre: song.genre,
            duration: song.duration,
            artist: song.artist,
            artist_username: tables.username(song.artist),
            description: song.description,
            likes: 0,
            created_at: Utc::now(),
        };
        tables.songs.push(created.clone());
        Ok(created)
    }

    async fn find_song(&self, id: Uuid) -> StoreResult<Option<Song>> {
        Ok(self.tables.read().await.song(id).cloned())
    }

    async fn list_songs(&self) -> StoreResult<Vec<Song>> {
        let tables = self.tables.read().await;
        Ok(Tables::newest_first(tables.songs.iter().cloned()))
    }

    async fn songs_by_artist(&self, artist: Uuid) -> StoreResult<Vec<Song>> {
        let tables = self.tables.read().await;
        Ok(Tables::newest_first(
            tables.songs.iter().filter(|s| s.artist == artist).cloned(),
        ))
    }

    async fn search_songs(&self, name: &str) -> StoreResult<Vec<Song>> {
        let needle = name.to_lowercase();
        let tables = self.tables.read().await;
        Ok(Tables::newest_first(
            tables
                .songs
                .iter()
                .filter(|s| s.name.to_lowercase().contains(&needle))
                .cloned(),
        ))
    }

    async fn songs_by_genre(&self, genre: &str) -> StoreResult<Vec<Song>> {
        let needle = genre.to_lowercase();
        let tables = self.tables.read().await;
        Ok(Tables::newest_first(
            tables
                .songs
                .iter()
                .filter(|s| s.genre.to_lowercase().contains(&needle))
                .cloned(),
        ))
    }

    async fn find_song_by_track(&self, track: &str) -> StoreResult<Option<Song>> {
        let tables = self.tables.read().await;
        Ok(tables.songs.iter().rev().find(|s| s.track == track).cloned())
    }

    async fn update_song(&self, id: Uuid, artist: Uuid, changes: SongChanges) -> StoreResult<Option<Song>> {
        let mut tables = self.tables.write().await;
        match tables.song_mut(id) {
            Some(song) if song.artist == artist => {
                changes.apply(song);
                Ok(Some(song.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_song(&self, id: Uuid, artist: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.songs.len();
        tables.songs.retain(|s| !(s.id == id && s.artist == artist));
        if tables.songs.len() == before {
            return Ok(false);
        }

        tables.song_likes.retain(|(song, _)| *song != id);
        tables.plays.retain(|p| p.song != id);
        tables.comments.retain(|c| c.song_id != Some(id));
        for playlist in tables.playlists.iter_mut() {
            playlist.songs.retain(|s| *s != id);
        }
        Ok(true)
    }

    async fn like_song(&self, id: Uuid, user: Uuid) -> StoreResult<Option<LikeState>> {
        let mut tables = self.tables.write().await;
        if tables.song(id).is_none() {
            return Ok(None);
        }

        let link = (id, user);
        let added = !tables.song_likes.contains(&link);
        if added {
            tables.song_likes.push(link);
        }

        let Some(song) = tables.song_mut(id) else {
            return Ok(None);
        };
        if added {
            song.likes += 1;
        }
        Ok(Some(LikeState {
            likes: song.likes,
            liked: true,
        }))
    }

    async fn unlike_song(&self, id: Uuid, user: Uuid) -> StoreResult<Option<LikeState>> {
        let mut tables = self.tables.write().await;
        if tables.song(id).is_none() {
            return Ok(None);
        }

        let before = tables.song_likes.len();
        tables.song_likes.retain(|link| *link != (id, user));
        let removed = (before - tables.song_likes.len()) as i64;

        let Some(song) = tables.song_mut(id) else {
            return Ok(None);
        };
        song.likes -= removed;
        Ok(Some(LikeState {
            likes: song.likes,
            liked: false,
        }))
    }

    async fn is_liked(&self, id: Uuid, user: Uuid) -> StoreResult<bool> {
        Ok(self.tables.read().await.song_likes.contains(&(id, user)))
    }

    async fn liked_songs(&self, user: Uuid) -> StoreResult<Vec<Song>> {
        let tables = self.tables.read().await;
        Ok(tables
            .song_likes
            .iter()
            .rev()
            .filter(|(_, liker)| *liker == user)
            .filter_map(|(song, _)| tables.song(*song).cloned())
            .collect())
    }

    async fn record_play(&self, id: Uuid, user: Uuid) -> StoreResult<Option<RecentPlay>> {
        let mut tables = self.tables.write().await;
        let Some(song) = tables.song(id).cloned() else {
            return Ok(None);
        };

        let played_at = Utc::now();
        tables.plays.push(Play {
            user,
            song: id,
            played_at,
        });
        if let Some(listener) = tables.user_mut(user) {
            listener.songs_listened += 1;
            listener.total_listening_time += i64::from(song.duration.unwrap_or(0));
        }

        Ok(Some(RecentPlay {
            song_id: song.id,
            song_name: song.name,
            artist: song.artist,
            played_at,
        }))
    }

    async fn recent_plays(&self, user: Uuid, limit: i64) -> StoreResult<Vec<RecentPlay>> {
        let tables = self.tables.read().await;
        Ok(tables
            .plays
            .iter()
            .rev()
            .filter(|p| p.user == user)
            .filter_map(|p| {
                tables.song(p.song).map(|song| RecentPlay {
                    song_id: song.id,
                    song_name: song.name.clone(),
                    artist: song.artist,
                    played_at: p.played_at,
                })
            })
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn top_artists(&self, user: Uuid, limit: i64) -> StoreResult<Vec<ArtistPlayCount>> {
        let tables = self.tables.read().await;
        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for play in tables
            .plays
            .iter()
            .rev()
            .filter(|p| p.user == user)
            .take(TOP_ARTIST_WINDOW as usize)
        {
            if let Some(song) = tables.song(play.song) {
                *counts.entry(song.artist).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<ArtistPlayCount> = counts
            .into_iter()
            .map(|(artist, plays)| ArtistPlayCount {
                artist,
                username: tables.username(artist),
                plays,
            })
            .collect();
        ranked.sort_by(|a, b| b.plays.cmp(&a.plays).then_with(|| a.username.cmp(&b.username)));
        ranked.truncate(limit.max(0) as usize);
        Ok(ranked)
    }
}

#[async_trait]
impl PlaylistStore for MemoryStore {
    async fn create_playlist(&self, playlist: NewPlaylist) -> StoreResult<Playlist> {
        let created = Playlist {
            id: Uuid::new_v4(),
            name: playlist.name,
            thumbnail: playlist.thumbnail,
            owner: playlist.owner,
            songs: dedup_preserving_order(playlist.songs),
            created_at: Utc::now(),
        };
        self.tables.write().await.playlists.push(created.clone());
        Ok(created)
    }

    async fn find_playlist(&self, id: Uuid) -> StoreResult<Option<Playlist>> {
        let tables = self.tables.read().await;
        Ok(tables.playlists.iter().find(|p| p.id == id).cloned())
    }

    async fn playlists_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Playlist>> {
        let tables = self.tables.read().await;
        Ok(Tables::newest_first(
            tables.playlists.iter().filter(|p| p.owner == owner).cloned(),
        ))
    }

    async fn search_playlists(&self, name: &str) -> StoreResult<Vec<Playlist>> {
        let needle = name.to_lowercase();
        let tables = self.tables.read().await;
        Ok(Tables::newest_first(
            tables
                .playlists
                .iter()
                .filter(|p| p.name.to_lowercase().contains(&needle))
                .cloned(),
        ))
    }

    async fn update_playlist(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: PlaylistChanges,
    ) -> StoreResult<Option<Playlist>> {
        let mut tables = self.tables.write().await;
        match tables.playlists.iter_mut().find(|p| p.id == id && p.owner == owner) {
            Some(playlist) => {
                changes.apply(playlist);
                Ok(Some(playlist.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_playlist(&self, id: Uuid, owner: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.playlists.len();
        tables.playlists.retain(|p| !(p.id == id && p.owner == owner));
        Ok(tables.playlists.len() < before)
    }

    async fn add_to_playlist(&self, id: Uuid, owner: Uuid, song: Uuid) -> StoreResult<Option<Playlist>> {
        let mut tables = self.tables.write().await;
        match tables.playlists.iter_mut().find(|p| p.id == id && p.owner == owner) {
            Some(playlist) => {
                if !playlist.songs.contains(&song) {
                    playlist.songs.push(song);
                }
                Ok(Some(playlist.clone()))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create_post(&self, post: NewPost) -> StoreResult<Post> {
        let created = Post {
            id: Uuid::new_v4(),
            title: post.title,
            description: post.description,
            track_url: post.track_url,
            track_name: post.track_name,
            thumbnail_url: post.thumbnail_url,
            thumbnail_name: post.thumbnail_name,
            author: post.author,
            created_at: Utc::now(),
        };
        self.tables.write().await.posts.push(created.clone());
        Ok(created)
    }

    async fn find_post(&self, id: Uuid) -> StoreResult<Option<Post>> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn list_posts(&self) -> StoreResult<Vec<Post>> {
        let tables = self.tables.read().await;
        Ok(Tables::newest_first(tables.posts.iter().cloned()))
    }

    async fn find_post_by_track(&self, track_url: &str) -> StoreResult<Option<Post>> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().rev().find(|p| p.track_url == track_url).cloned())
    }

    async fn update_post(&self, id: Uuid, author: Uuid, changes: PostChanges) -> StoreResult<Option<Post>> {
        let mut tables = self.tables.write().await;
        match tables.posts.iter_mut().find(|p| p.id == id && p.author == author) {
            Some(post) => {
                changes.apply(post);
                Ok(Some(post.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_post(&self, id: Uuid, author: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|p| !(p.id == id && p.author == author));
        if tables.posts.len() == before {
            return Ok(false);
        }
        tables.comments.retain(|c| c.post_id != Some(id));
        Ok(true)
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn create_comment(&self, comment: NewComment) -> StoreResult<Comment> {
        let mut tables = self.tables.write().await;
        let created = Comment {
            id: Uuid::new_v4(),
            user_id: comment.user_id,
            username: tables.username(comment.user_id),
            post_id: comment.target.post_id(),
            song_id: comment.target.song_id(),
            comment: comment.comment,
            attachment: comment.attachment,
            created_at: Utc::now(),
        };
        tables.comments.push(created.clone());
        Ok(created)
    }

    async fn comments_for(&self, target: CommentTarget) -> StoreResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        Ok(Tables::newest_first(
            tables
                .comments
                .iter()
                .filter(|c| match target {
                    CommentTarget::Post(id) => c.post_id == Some(id),
                    CommentTarget::Song(id) => c.song_id == Some(id),
                })
                .cloned(),
        ))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    async fn user(store: &MemoryStore, name: &str) -> User {
        store
            .create_user(NewUser {
                email: format!("{}@example.com", name),
                username: name.to_string(),
                password_hash: "hash".to_string(),
                avatar: String::new(),
            })
            .await
            .unwrap()
    }

    async fn song(store: &MemoryStore, artist: Uuid, name: &str) -> Song {
        store
            .create_song(NewSong {
                name: name.to_string(),
                thumbnail: "https://cdn.example.com/t.png".to_string(),
                track: format!("https://cdn.example.com/{}.mp3", name),
                genre: "Lofi".to_string(),
                duration: Some(180),
                description: None,
                artist,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn duplicate_email_and_username_conflict() {
        let store = MemoryStore::new();
        user(&store, "alice").await;

        let err = store
            .create_user(NewUser {
                email: "alice@example.com".into(),
                username: "other".into(),
                password_hash: "h".into(),
                avatar: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(ref f) if f == "email"));

        let err = store
            .create_user(NewUser {
                email: "new@example.com".into(),
                username: "alice".into(),
                password_hash: "h".into(),
                avatar: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(ref f) if f == "username"));
    }

    #[tokio::test]
    async fn likes_are_idempotent() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bobby").await;
        let s = song(&store, alice.id, "intro").await;

        assert_eq!(store.like_song(s.id, bob.id).await.unwrap().unwrap().likes, 1);
        assert_eq!(store.like_song(s.id, bob.id).await.unwrap().unwrap().likes, 1);
        assert_eq!(store.like_song(s.id, alice.id).await.unwrap().unwrap().likes, 2);

        let state = store.unlike_song(s.id, bob.id).await.unwrap().unwrap();
        assert_eq!(state, LikeState { likes: 1, liked: false });
        assert_eq!(store.unlike_song(s.id, bob.id).await.unwrap().unwrap().likes, 1);

        assert!(store.like_song(Uuid::new_v4(), bob.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn genre_lookup_matches_substrings_in_any_case() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        song(&store, alice.id, "intro").await;

        assert_eq!(store.songs_by_genre("LOF").await.unwrap().len(), 1);
        assert_eq!(store.songs_by_genre("ofi").await.unwrap().len(), 1);
        assert!(store.songs_by_genre("jazz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_likes_count_each_user_once() {
        let store = Arc::new(MemoryStore::new());
        let artist = user(&store, "artist").await;
        let song_id = song(&store, artist.id, "anthem").await.id;
        let fans: Vec<Uuid> = (0..20).map(|_| Uuid::new_v4()).collect();

        let mut handles = Vec::new();
        for fan in fans.iter().chain(fans.iter()) {
            let store = store.clone();
            let fan = *fan;
            handles.push(tokio::spawn(async move { store.like_song(song_id, fan).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = store.find_song(song_id).await.unwrap().unwrap();
        assert_eq!(stored.likes, 20);
    }

    #[tokio::test]
    async fn follow_count_tracks_distinct_followers() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bobby").await;

        let state = store.follow(bob.id, alice.id).await.unwrap().unwrap();
        assert_eq!(state.followers_count, 1);
        let state = store.follow(bob.id, alice.id).await.unwrap().unwrap();
        assert_eq!(state.followers_count, 1);
        assert_eq!(store.followers(alice.id).await.unwrap(), vec![bob.id]);
        assert_eq!(store.following(bob.id).await.unwrap(), vec![alice.id]);

        assert_eq!(store.unfollow(bob.id, alice.id).await.unwrap().unwrap().followers_count, 0);
        assert_eq!(store.unfollow(bob.id, alice.id).await.unwrap().unwrap().followers_count, 0);
        assert!(store.follow(bob.id, Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn owner_conditioned_writes_ignore_other_users() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bobby").await;
        let s = song(&store, alice.id, "mine").await;

        let changes = SongChanges {
            name: Some("stolen".into()),
            ..Default::default()
        };
        assert!(store.update_song(s.id, bob.id, changes).await.unwrap().is_none());
        assert!(!store.delete_song(s.id, bob.id).await.unwrap());
        assert_eq!(store.find_song(s.id).await.unwrap().unwrap().name, "mine");
    }

    #[tokio::test]
    async fn playlist_songs_behave_as_a_set() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let s = song(&store, alice.id, "loop").await;
        let playlist = store
            .create_playlist(NewPlaylist {
                name: "Focus".into(),
                thumbnail: String::new(),
                owner: alice.id,
                songs: vec![],
            })
            .await
            .unwrap();

        store.add_to_playlist(playlist.id, alice.id, s.id).await.unwrap();
        let updated = store.add_to_playlist(playlist.id, alice.id, s.id).await.unwrap().unwrap();
        assert_eq!(updated.songs, vec![s.id]);

        assert!(store.delete_song(s.id, alice.id).await.unwrap());
        let after = store.find_playlist(playlist.id).await.unwrap().unwrap();
        assert!(after.songs.is_empty());
    }

    #[tokio::test]
    async fn top_artists_only_counts_recent_window() {
        let store = MemoryStore::new();
        let listener = user(&store, "listener").await;
        let old_artist = user(&store, "oldies").await;
        let new_artist = user(&store, "newbie").await;
        let old_song = song(&store, old_artist.id, "classic").await;
        let new_song = song(&store, new_artist.id, "fresh").await;

        for _ in 0..5 {
            store.record_play(old_song.id, listener.id).await.unwrap();
        }
        for _ in 0..TOP_ARTIST_WINDOW {
            store.record_play(new_song.id, listener.id).await.unwrap();
        }

        let top = store.top_artists(listener.id, 5).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].artist, new_artist.id);
        assert_eq!(top[0].plays, TOP_ARTIST_WINDOW);

        let stats = store.find_user(listener.id).await.unwrap().unwrap();
        assert_eq!(stats.songs_listened, 5 + TOP_ARTIST_WINDOW);
        assert_eq!(stats.total_listening_time, 180 * (5 + TOP_ARTIST_WINDOW));

        let recent = store.recent_plays(listener.id, 3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert!(recent.iter().all(|p| p.song_id == new_song.id));
    }
}
