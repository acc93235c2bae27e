// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Route Prefix: /api/*
// Middleware: jwt_auth_middleware verifies the token and inserts AuthUser.
// Mutations of owned resources run fetch → ensure_owner → owner-conditioned write.

pub mod auth; // whoami
pub mod playlists; // owned by `owner`
pub mod posts; // owned by `author`
pub mod songs; // owned by `artist`; likes, plays, comments
pub mod users; // follow graph and listening stats
