pub mod api;
pub mod camera;
pub mod scanner;
pub mod toast;

mod admin;
pub use admin::{badges::BadgesPage, players::PlayersPage, RosterPage};

mod game;
pub use game::GamePage;

mod join;
pub use join::JoinPage;

/// QR payloads starting with this belong to the game.
pub const SITE_URL_PREFIX: &str = match option_env!("QR_SITE_URL_PREFIX") {
    Some(prefix) => prefix,
    None => common::DEFAULT_SITE_URL_PREFIX,
};

/// Leaves the app for `url`, used for redirects sent by the server.
pub fn navigate(url: &str) {
    if let Err(e) = leptos::window().location().assign(url) {
        gloo::console::error!("navigating", e);
    }
}

pub fn reload() {
    if let Err(e) = leptos::window().location().reload() {
        gloo::console::error!("reloading", e);
    }
}
