use std::sync::Arc;

pub mod api;
pub mod config;
pub mod store;

mod error;
pub use error::AppError;

mod usersession;
pub use usersession::{UserSession, UserSessionData};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<store::GameStore>,
    admin_token: Arc<str>,
}

impl AppState {
    pub fn new<T>(game: store::Game, admin_token: T) -> Self
    where
        T: Into<Arc<str>>,
    {
        Self {
            store: Arc::new(store::GameStore::new(game)),
            admin_token: admin_token.into(),
        }
    }

    pub fn is_admin_token(&self, token: &str) -> bool {
        !token.is_empty() && token == &*self.admin_token
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

/// The full application: the api with its sessions, and the frontend bundle
/// for everything else.
pub fn app<P>(state: AppState, dist: P) -> axum::Router
where
    P: AsRef<std::path::Path>,
{
    let dist = dist.as_ref();
    // client side routes like /game are answered with the app itself
    let frontend = tower_http::services::ServeDir::new(dist)
        .fallback(tower_http::services::ServeFile::new(dist.join("index.html")));

    let session_layer = tower_sessions::SessionManagerLayer::new(tower_sessions::MemoryStore::default())
        .with_secure(false)
        .with_expiry(tower_sessions::Expiry::OnInactivity(
            time::Duration::hours(48),
        ));

    axum::Router::new()
        .nest("/api", api::router(state))
        .layer(session_layer)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .fallback_service(frontend)
}
