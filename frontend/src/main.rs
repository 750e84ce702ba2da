use leptos::*;
use leptos_router::*;

use frontend::{BadgesPage, GamePage, JoinPage, PlayersPage, RosterPage};

fn main() {
    mount_to_body(move || {
        view! {
            <Router>
                <main>
                    <Routes>
                        <Route path="/" view=JoinPage />
                        <Route path="/game" view=GamePage />
                        <Route path="/admin" view=RosterPage />
                        <Route path="/admin/players" view=PlayersPage />
                        <Route path="/admin/badges" view=BadgesPage />
                    </Routes>
                </main>
            </Router>
        }
    })
}
