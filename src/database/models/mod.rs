pub mod comment;
pub mod playlist;
pub mod post;
pub mod song;
pub mod user;

pub use comment::{Comment, CommentTarget, NewComment};
pub use playlist::{NewPlaylist, Playlist, PlaylistChanges};
pub use post::{NewPost, Post, PostChanges};
pub use song::{ArtistPlayCount, LikeState, NewSong, RecentPlay, Song, SongChanges};
pub use user::{FollowState, NewUser, PublicUser, User, UserProfile};
