use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::auth::JwtKeys;
use crate::config::AppConfig;
use crate::database::Store;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::{AccountService, PlaylistService, PostService, SongService};

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Self {
        let keys = JwtKeys::from_config(&config);
        Self {
            config: Arc::new(config),
            keys,
            store,
        }
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(self.store.clone(), self.keys.clone())
    }

    pub fn songs(&self) -> SongService {
        SongService::new(self.store.clone())
    }

    pub fn playlists(&self) -> PlaylistService {
        PlaylistService::new(self.store.clone())
    }

    pub fn posts(&self) -> PostService {
        PostService::new(self.store.clone())
    }
}

/// The complete HTTP surface: public routes, `/api/*` behind the token
/// verifier, and the global layers.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
                .layer(TimeoutLayer::new(config.request_timeout()))
                .layer(cors_layer(&config.security.cors_origin)),
        );

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Token acquisition
        .route("/auth/register", post(public::auth::register))
        .route("/auth/login", post(public::auth::login))
        // Read-only catalogue
        .route("/songs", get(public::songs::list))
        .route("/songs/search/:name", get(public::songs::search))
        .route("/songs/genre/:genre", get(public::songs::by_genre))
        .route("/songs/track/:url", get(public::songs::by_track))
        .route("/users", get(public::users::list))
        .route("/users/:id", get(public::users::profile))
        .route("/playlists/search/:name", get(public::playlists::search))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{auth, playlists, posts, songs, users};

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        // Listening stats and the follow graph
        .route("/api/users/me/top-artists", get(users::top_artists))
        .route("/api/users/me/recent", get(users::recent))
        .route("/api/users/:id/follow", post(users::follow).get(users::is_following))
        .route("/api/users/:id/unfollow", post(users::unfollow))
        // Songs
        .route("/api/songs", post(songs::create))
        .route("/api/songs/mine", get(songs::mine))
        .route("/api/songs/feed", get(songs::feed))
        .route("/api/songs/artist/:id", get(songs::by_artist))
        .route(
            "/api/songs/:id",
            get(songs::get).put(songs::update).delete(songs::delete),
        )
        .route("/api/songs/:id/like", put(songs::like).get(songs::is_liked))
        .route("/api/songs/:id/unlike", put(songs::unlike))
        .route("/api/songs/:id/play", post(songs::play))
        .route(
            "/api/songs/:id/comments",
            get(songs::comments).post(songs::add_comment),
        )
        // Playlists
        .route("/api/playlists", post(playlists::create))
        .route("/api/playlists/mine", get(playlists::mine))
        .route("/api/playlists/artist/:id", get(playlists::by_owner))
        .route(
            "/api/playlists/:id",
            get(playlists::get)
                .put(playlists::update)
                .delete(playlists::delete),
        )
        .route("/api/playlists/:id/songs/:song_id", put(playlists::add_song))
        // Posts
        .route("/api/posts", post(posts::create).get(posts::list))
        .route("/api/posts/track/:url", get(posts::by_track))
        .route(
            "/api/posts/:id",
            get(posts::get).put(posts::update).delete(posts::delete),
        )
        .route(
            "/api/posts/:id/comments",
            get(posts::comments).post(posts::add_comment),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origin == "*" {
        return layer.allow_origin(Any);
    }

    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(AllowOrigin::exact(value)),
        Err(_) => {
            warn!("Ignoring unusable CORS origin {:?}; cross-origin requests will be refused", origin);
            layer
        }
    }
}
