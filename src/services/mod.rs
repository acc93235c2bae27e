pub mod account_service;
pub mod comments;
pub mod playlist_service;
pub mod post_service;
pub mod song_service;

pub use account_service::{AccountService, LoginRequest, LoginResponse, RegisterRequest};
pub use comments::CommentRequest;
pub use playlist_service::{CreatePlaylistRequest, PlaylistService};
pub use post_service::{CreatePostRequest, PostService};
pub use song_service::{CreateSongRequest, SongService};
