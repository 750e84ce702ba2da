pub mod admin;
pub mod game;

pub fn router(state: crate::AppState) -> axum::Router {
    axum::Router::new()
        .nest("/admin", admin::router(state.clone()))
        .nest("/game", game::router(state))
}
