use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{
    ArtistPlayCount, Comment, CommentTarget, FollowState, LikeState, NewComment, NewPlaylist,
    NewPost, NewSong, NewUser, Playlist, PlaylistChanges, Post, PostChanges, RecentPlay, Song,
    SongChanges, User,
};

pub type StoreResult<T> = Result<T, DatabaseError>;

/// Plays considered when ranking a listener's top artists
pub const TOP_ARTIST_WINDOW: i64 = 10;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Duplicate email or username is `DatabaseError::Conflict`.
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn list_users(&self) -> StoreResult<Vec<User>>;

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()>;

    /// Ids of users following `id`
    async fn followers(&self, id: Uuid) -> StoreResult<Vec<Uuid>>;

    /// Ids of users `id` follows
    async fn following(&self, id: Uuid) -> StoreResult<Vec<Uuid>>;

    /// Add the edge `follower -> followee` if absent. `None` when the followee
    /// does not exist. Repeating the call leaves the count unchanged.
    async fn follow(&self, follower: Uuid, followee: Uuid) -> StoreResult<Option<FollowState>>;

    async fn unfollow(&self, follower: Uuid, followee: Uuid) -> StoreResult<Option<FollowState>>;

    async fn is_following(&self, follower: Uuid, followee: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait SongStore: Send + Sync {
    async fn create_song(&self, song: NewSong) -> StoreResult<Song>;

    async fn find_song(&self, id: Uuid) -> StoreResult<Option<Song>>;

    async fn list_songs(&self) -> StoreResult<Vec<Song>>;

    async fn songs_by_artist(&self, artist: Uuid) -> StoreResult<Vec<Song>>;

    /// Case-insensitive substring match on the song name
    async fn search_songs(&self, name: &str) -> StoreResult<Vec<Song>>;

    /// Case-insensitive substring match on the genre
    async fn songs_by_genre(&self, genre: &str) -> StoreResult<Vec<Song>>;

    async fn find_song_by_track(&self, track: &str) -> StoreResult<Option<Song>>;

    /// Apply `changes` only if `artist` still owns the song. `None` otherwise.
    async fn update_song(&self, id: Uuid, artist: Uuid, changes: SongChanges) -> StoreResult<Option<Song>>;

    /// Delete only if `artist` owns the song; the song also leaves every playlist.
    async fn delete_song(&self, id: Uuid, artist: Uuid) -> StoreResult<bool>;

    /// Record that `user` likes the song. `None` when the song does not exist.
    async fn like_song(&self, id: Uuid, user: Uuid) -> StoreResult<Option<LikeState>>;

    async fn unlike_song(&self, id: Uuid, user: Uuid) -> StoreResult<Option<LikeState>>;

    async fn is_liked(&self, id: Uuid, user: Uuid) -> StoreResult<bool>;

    /// Songs `user` has liked, most recently liked first
    async fn liked_songs(&self, user: Uuid) -> StoreResult<Vec<Song>>;

    /// Append a listening event and bump the listener's counters.
    /// `None` when the song does not exist.
    async fn record_play(&self, id: Uuid, user: Uuid) -> StoreResult<Option<RecentPlay>>;

    async fn recent_plays(&self, user: Uuid, limit: i64) -> StoreResult<Vec<RecentPlay>>;

    /// Artists ranked by play count over the listener's last `TOP_ARTIST_WINDOW` plays
    async fn top_artists(&self, user: Uuid, limit: i64) -> StoreResult<Vec<ArtistPlayCount>>;
}

#[async_trait]
pub trait PlaylistStore: Send + Sync {
    async fn create_playlist(&self, playlist: NewPlaylist) -> StoreResult<Playlist>;

    async fn find_playlist(&self, id: Uuid) -> StoreResult<Option<Playlist>>;

    async fn playlists_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Playlist>>;

    async fn search_playlists(&self, name: &str) -> StoreResult<Vec<Playlist>>;

    async fn update_playlist(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: PlaylistChanges,
    ) -> StoreResult<Option<Playlist>>;

    async fn delete_playlist(&self, id: Uuid, owner: Uuid) -> StoreResult<bool>;

    /// Add `song` if not already present. Adding twice is a no-op.
    async fn add_to_playlist(&self, id: Uuid, owner: Uuid, song: Uuid) -> StoreResult<Option<Playlist>>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create_post(&self, post: NewPost) -> StoreResult<Post>;

    async fn find_post(&self, id: Uuid) -> StoreResult<Option<Post>>;

    /// Every post, newest first
    async fn list_posts(&self) -> StoreResult<Vec<Post>>;

    /// Most recent post about `track_url`
    async fn find_post_by_track(&self, track_url: &str) -> StoreResult<Option<Post>>;

    async fn update_post(&self, id: Uuid, author: Uuid, changes: PostChanges) -> StoreResult<Option<Post>>;

    async fn delete_post(&self, id: Uuid, author: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn create_comment(&self, comment: NewComment) -> StoreResult<Comment>;

    /// Comments on a post or song, newest first
    async fn comments_for(&self, target: CommentTarget) -> StoreResult<Vec<Comment>>;
}

/// Everything the HTTP layer needs from persistence
#[async_trait]
pub trait Store: UserStore + SongStore + PlaylistStore + PostStore + CommentStore {
    async fn health_check(&self) -> StoreResult<()>;

    fn backend(&self) -> &'static str;
}
