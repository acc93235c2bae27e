use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::manager::{DatabaseError, DatabaseManager};
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

/// Columns of a song joined with its artist's username; expects the song
/// relation aliased `s` and the users relation aliased `u`.
const SONG_COLUMNS: &str = "s.id, s.name, s.thumbnail, s.track, s.genre, s.duration, s.artist, \
     u.username AS artist_username, s.description, s.likes, s.created_at";

const COMMENT_COLUMNS: &str = "c.id, c.user_id, u.username, c.post_id, c.song_id, c.comment, \
     c.attachment, c.created_at";

/// Postgres-backed store. Every counter or set mutation is a single statement.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn songs_where(&self, clause: &str, arg: impl AsRef<str>) -> StoreResult<Vec<Song>> {
        let sql = format!(
            "SELECT {} FROM songs s JOIN users u ON u.id = s.artist WHERE {} ORDER BY s.created_at DESC",
            SONG_COLUMNS, clause
        );
        let songs = sqlx::query_as::<_, Song>(&sql)
            .bind(arg.as_ref().to_string())
            .fetch_all(&self.pool)
            .await?;
        Ok(songs)
    }
}

/// `ILIKE` pattern matching `term` anywhere, with wildcards in `term` escaped
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, username, password_hash, avatar) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.avatar)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        sqlx::query("UPDATE users SET last_login = $2, updated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn followers(&self, id: Uuid) -> StoreResult<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT follower_id FROM follows WHERE followee_id = $1 ORDER BY created_at",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn following(&self, id: Uuid) -> StoreResult<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT followee_id FROM follows WHERE follower_id = $1 ORDER BY created_at",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn follow(&self, follower: Uuid, followee: Uuid) -> StoreResult<Option<FollowState>> {
        let count = sqlx::query_scalar::<_, i64>(
            "WITH target AS (SELECT id FROM users WHERE id = $2), \
             ins AS ( \
                 INSERT INTO follows (follower_id, followee_id) \
                 SELECT $1, id FROM target \
                 ON CONFLICT DO NOTHING \
                 RETURNING followee_id \
             ) \
             UPDATE users SET followers_count = followers_count + (SELECT count(*) FROM ins) \
             WHERE id = $2 \
             RETURNING followers_count",
        )
        .bind(follower)
        .bind(followee)
        .fetch_optional(&self.pool)
        .await?;

        Ok(count.map(|followers_count| FollowState {
            followers_count,
            is_followed: true,
        }))
    }

    async fn unfollow(&self, follower: Uuid, followee: Uuid) -> StoreResult<Option<FollowState>> {
        let count = sqlx::query_scalar::<_, i64>(
            "WITH del AS ( \
                 DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2 \
                 RETURNING followee_id \
             ) \
             UPDATE users SET followers_count = followers_count - (SELECT count(*) FROM del) \
             WHERE id = $2 \
             RETURNING followers_count",
        )
        .bind(follower)
        .bind(followee)
        .fetch_optional(&self.pool)
        .await?;

        Ok(count.map(|followers_count| FollowState {
            followers_count,
            is_followed: false,
        }))
    }

    async fn is_following(&self, follower: Uuid, followee: Uuid) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM follows WHERE follower_id = $1 AND followee_id = $2)",
        )
        .bind(follower)
        .bind(followee)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}

#[async_trait]
impl SongStore for PgStore {
    async fn create_song(&self, song: NewSong) -> StoreResult<Song> {
        let sql = format!(
            "WITH s AS ( \
                 INSERT INTO songs (id, name, thumbnail, track, genre, duration, description, artist) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING * \
             ) \
             SELECT {} FROM s JOIN users u ON u.id = s.artist",
            SONG_COLUMNS
        );
        let created = sqlx::query_as::<_, Song>(&sql)
            .bind(Uuid::new_v4())
            .bind(&song.name)
            .bind(&song.thumbnail)
            .bind(&song.track)
            .bind(&song.genre)
            .bind(song.duration)
            .bind(&song.description)
            .bind(song.artist)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_song(&self, id: Uuid) -> StoreResult<Option<Song>> {
        let sql = format!(
            "SELECT {} FROM songs s JOIN users u ON u.id = s.artist WHERE s.id = $1",
            SONG_COLUMNS
        );
        let song = sqlx::query_as::<_, Song>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(song)
    }

    async fn list_songs(&self) -> StoreResult<Vec<Song>> {
        let sql = format!(
            "SELECT {} FROM songs s JOIN users u ON u.id = s.artist ORDER BY s.created_at DESC",
            SONG_COLUMNS
        );
        let songs = sqlx::query_as::<_, Song>(&sql).fetch_all(&self.pool).await?;
        Ok(songs)
    }

    async fn songs_by_artist(&self, artist: Uuid) -> StoreResult<Vec<Song>> {
        let sql = format!(
            "SELECT {} FROM songs s JOIN users u ON u.id = s.artist \
             WHERE s.artist = $1 ORDER BY s.created_at DESC",
            SONG_COLUMNS
        );
        let songs = sqlx::query_as::<_, Song>(&sql)
            .bind(artist)
            .fetch_all(&self.pool)
            .await?;
        Ok(songs)
    }

    async fn search_songs(&self, name: &str) -> StoreResult<Vec<Song>> {
        self.songs_where("s.name ILIKE $1", contains_pattern(name)).await
    }

    async fn songs_by_genre(&self, genre: &str) -> StoreResult<Vec<Song>> {
        self.songs_where("s.genre ILIKE $1", contains_pattern(genre)).await
    }

    async fn find_song_by_track(&self, track: &str) -> StoreResult<Option<Song>> {
        let sql = format!(
            "SELECT {} FROM songs s JOIN users u ON u.id = s.artist \
             WHERE s.track = $1 ORDER BY s.created_at DESC LIMIT 1",
            SONG_COLUMNS
        );
        let song = sqlx::query_as::<_, Song>(&sql)
            .bind(track)
            .fetch_optional(&self.pool)
            .await?;
        Ok(song)
    }

    async fn update_song(&self, id: Uuid, artist: Uuid, changes: SongChanges) -> StoreResult<Option<Song>> {
        let sql = format!(
            "WITH s AS ( \
                 UPDATE songs SET \
                     name = COALESCE($3, name), \
                     thumbnail = COALESCE($4, thumbnail), \
                     track = COALESCE($5, track), \
                     genre = COALESCE($6, genre), \
                     duration = COALESCE($7, duration), \
                     description = COALESCE($8, description) \
                 WHERE id = $1 AND artist = $2 \
                 RETURNING * \
             ) \
             SELECT {} FROM s JOIN users u ON u.id = s.artist",
            SONG_COLUMNS
        );
        let song = sqlx::query_as::<_, Song>(&sql)
            .bind(id)
            .bind(artist)
            .bind(changes.name)
            .bind(changes.thumbnail)
            .bind(changes.track)
            .bind(changes.genre)
            .bind(changes.duration)
            .bind(changes.description)
            .fetch_optional(&self.pool)
            .await?;
        Ok(song)
    }

    async fn delete_song(&self, id: Uuid, artist: Uuid) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM songs WHERE id = $1 AND artist = $2")
            .bind(id)
            .bind(artist)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE playlists SET songs = array_remove(songs, $1) WHERE $1 = ANY(songs)")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn like_song(&self, id: Uuid, user: Uuid) -> StoreResult<Option<LikeState>> {
        let likes = sqlx::query_scalar::<_, i64>(
            "WITH target AS (SELECT id FROM songs WHERE id = $1), \
             ins AS ( \
                 INSERT INTO song_likes (song_id, user_id) \
                 SELECT id, $2 FROM target \
                 ON CONFLICT DO NOTHING \
                 RETURNING song_id \
             ) \
             UPDATE songs SET likes = likes + (SELECT count(*) FROM ins) \
             WHERE id = $1 \
             RETURNING likes",
        )
        .bind(id)
        .bind(user)
        .fetch_optional(&self.pool)
        .await?;

        Ok(likes.map(|likes| LikeState { likes, liked: true }))
    }

    async fn unlike_song(&self, id: Uuid, user: Uuid) -> StoreResult<Option<LikeState>> {
        let likes = sqlx::query_scalar::<_, i64>(
            "WITH del AS ( \
                 DELETE FROM song_likes WHERE song_id = $1 AND user_id = $2 \
                 RETURNING song_id \
             ) \
             UPDATE songs SET likes = likes - (SELECT count(*) FROM del) \
             WHERE id = $1 \
             RETURNING likes",
        )
        .bind(id)
        .bind(user)
        .fetch_optional(&self.pool)
        .await?;

        Ok(likes.map(|likes| LikeState { likes, liked: false }))
    }

    async fn is_liked(&self, id: Uuid, user: Uuid) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM song_likes WHERE song_id = $1 AND user_id = $2)",
        )
        .bind(id)
        .bind(user)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn liked_songs(&self, user: Uuid) -> StoreResult<Vec<Song>> {
        let sql = format!(
            "SELECT {} FROM song_likes l \
             JOIN songs s ON s.id = l.song_id \
             JOIN users u ON u.id = s.artist \
             WHERE l.user_id = $1 ORDER BY l.created_at DESC",
            SONG_COLUMNS
        );
        let songs = sqlx::query_as::<_, Song>(&sql)
            .bind(user)
            .fetch_all(&self.pool)
            .await?;
        Ok(songs)
    }

    async fn record_play(&self, id: Uuid, user: Uuid) -> StoreResult<Option<RecentPlay>> {
        let play = sqlx::query_as::<_, RecentPlay>(
            "WITH song AS (SELECT id, name, artist, duration FROM songs WHERE id = $1), \
             ins AS ( \
                 INSERT INTO song_plays (user_id, song_id) \
                 SELECT $2, id FROM song \
                 RETURNING song_id, played_at \
             ), \
             stats AS ( \
                 UPDATE users SET \
                     songs_listened = songs_listened + 1, \
                     total_listening_time = total_listening_time + COALESCE((SELECT duration FROM song), 0) \
                 WHERE id = $2 AND EXISTS (SELECT 1 FROM ins) \
             ) \
             SELECT song.id AS song_id, song.name AS song_name, song.artist, ins.played_at \
             FROM ins JOIN song ON song.id = ins.song_id",
        )
        .bind(id)
        .bind(user)
        .fetch_optional(&self.pool)
        .await?;
        Ok(play)
    }

    async fn recent_plays(&self, user: Uuid, limit: i64) -> StoreResult<Vec<RecentPlay>> {
        let plays = sqlx::query_as::<_, RecentPlay>(
            "SELECT p.song_id, s.name AS song_name, s.artist, p.played_at \
             FROM song_plays p JOIN songs s ON s.id = p.song_id \
             WHERE p.user_id = $1 \
             ORDER BY p.played_at DESC, p.id DESC \
             LIMIT $2",
        )
        .bind(user)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(plays)
    }

    async fn top_artists(&self, user: Uuid, limit: i64) -> StoreResult<Vec<ArtistPlayCount>> {
        let artists = sqlx::query_as::<_, ArtistPlayCount>(
            "WITH recent AS ( \
                 SELECT song_id FROM song_plays WHERE user_id = $1 \
                 ORDER BY played_at DESC, id DESC LIMIT $2 \
             ) \
             SELECT s.artist, u.username, count(*) AS plays \
             FROM recent r \
             JOIN songs s ON s.id = r.song_id \
             JOIN users u ON u.id = s.artist \
             GROUP BY s.artist, u.username \
             ORDER BY plays DESC, u.username \
             LIMIT $3",
        )
        .bind(user)
        .bind(TOP_ARTIST_WINDOW)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(artists)
    }
}

#[async_trait]
impl PlaylistStore for PgStore {
    async fn create_playlist(&self, playlist: NewPlaylist) -> StoreResult<Playlist> {
        let created = sqlx::query_as::<_, Playlist>(
            "INSERT INTO playlists (id, name, thumbnail, owner, songs) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&playlist.name)
        .bind(&playlist.thumbnail)
        .bind(playlist.owner)
        .bind(dedup_preserving_order(playlist.songs))
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_playlist(&self, id: Uuid) -> StoreResult<Option<Playlist>> {
        let playlist = sqlx::query_as::<_, Playlist>("SELECT * FROM playlists WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(playlist)
    }

    async fn playlists_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Playlist>> {
        let playlists = sqlx::query_as::<_, Playlist>(
            "SELECT * FROM playlists WHERE owner = $1 ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(playlists)
    }

    async fn search_playlists(&self, name: &str) -> StoreResult<Vec<Playlist>> {
        let playlists = sqlx::query_as::<_, Playlist>(
            "SELECT * FROM playlists WHERE name ILIKE $1 ORDER BY created_at DESC",
        )
        .bind(contains_pattern(name))
        .fetch_all(&self.pool)
        .await?;
        Ok(playlists)
    }

    async fn update_playlist(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: PlaylistChanges,
    ) -> StoreResult<Option<Playlist>> {
        let playlist = sqlx::query_as::<_, Playlist>(
            "UPDATE playlists SET \
                 name = COALESCE($3, name), \
                 thumbnail = COALESCE($4, thumbnail), \
                 songs = COALESCE($5, songs) \
             WHERE id = $1 AND owner = $2 \
             RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(changes.name)
        .bind(changes.thumbnail)
        .bind(changes.songs.map(dedup_preserving_order))
        .fetch_optional(&self.pool)
        .await?;
        Ok(playlist)
    }

    async fn delete_playlist(&self, id: Uuid, owner: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM playlists WHERE id = $1 AND owner = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_to_playlist(&self, id: Uuid, owner: Uuid, song: Uuid) -> StoreResult<Option<Playlist>> {
        let playlist = sqlx::query_as::<_, Playlist>(
            "UPDATE playlists SET songs = CASE \
                 WHEN NOT ($3 = ANY(songs)) THEN array_append(songs, $3) \
                 ELSE songs \
             END \
             WHERE id = $1 AND owner = $2 \
             RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(song)
        .fetch_optional(&self.pool)
        .await?;
        Ok(playlist)
    }
}

#[async_trait]
impl PostStore for PgStore {
    async fn create_post(&self, post: NewPost) -> StoreResult<Post> {
        let created = sqlx::query_as::<_, Post>(
            "INSERT INTO posts (id, title, description, track_url, track_name, thumbnail_url, thumbnail_name, author) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.track_url)
        .bind(&post.track_name)
        .bind(&post.thumbnail_url)
        .bind(&post.thumbnail_name)
        .bind(post.author)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_post(&self, id: Uuid) -> StoreResult<Option<Post>> {
        let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn list_posts(&self) -> StoreResult<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>("SELECT * FROM posts ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    async fn find_post_by_track(&self, track_url: &str) -> StoreResult<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT * FROM posts WHERE track_url = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(track_url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(post)
    }

    async fn update_post(&self, id: Uuid, author: Uuid, changes: PostChanges) -> StoreResult<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            "UPDATE posts SET \
                 title = COALESCE($3, title), \
                 description = COALESCE($4, description), \
                 track_name = COALESCE($5, track_name), \
                 thumbnail_url = COALESCE($6, thumbnail_url), \
                 thumbnail_name = COALESCE($7, thumbnail_name) \
             WHERE id = $1 AND author = $2 \
             RETURNING *",
        )
        .bind(id)
        .bind(author)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.track_name)
        .bind(changes.thumbnail_url)
        .bind(changes.thumbnail_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(post)
    }

    async fn delete_post(&self, id: Uuid, author: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND author = $2")
            .bind(id)
            .bind(author)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CommentStore for PgStore {
    async fn create_comment(&self, comment: NewComment) -> StoreResult<Comment> {
        let sql = format!(
            "WITH c AS ( \
                 INSERT INTO comments (id, user_id, post_id, song_id, comment, attachment) \
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING * \
             ) \
             SELECT {} FROM c JOIN users u ON u.id = c.user_id",
            COMMENT_COLUMNS
        );
        let created = sqlx::query_as::<_, Comment>(&sql)
            .bind(Uuid::new_v4())
            .bind(comment.user_id)
            .bind(comment.target.post_id())
            .bind(comment.target.song_id())
            .bind(&comment.comment)
            .bind(&comment.attachment)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn comments_for(&self, target: CommentTarget) -> StoreResult<Vec<Comment>> {
        let (column, id) = match target {
            CommentTarget::Post(id) => ("post_id", id),
            CommentTarget::Song(id) => ("song_id", id),
        };
        let sql = format!(
            "SELECT {} FROM comments c JOIN users u ON u.id = c.user_id \
             WHERE c.{} = $1 ORDER BY c.created_at DESC",
            COMMENT_COLUMNS, column
        );
        let comments = sqlx::query_as::<_, Comment>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        Ok(comments)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
