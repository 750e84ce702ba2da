use common::{Metal, PlayerOverview};
use leptos::*;

use super::{AdminLogin, AdminNav};

#[derive(Debug, Clone)]
enum Loaded {
    Players(Vec<PlayerOverview>),
    NeedsLogin,
    Failed(String),
}

async fn load() -> Loaded {
    match crate::api::load_players().await {
        Ok(players) => Loaded::Players(players),
        Err(e) if e.is_unauthorized() => Loaded::NeedsLogin,
        Err(e) => Loaded::Failed(format!("Error: {e}")),
    }
}

/// Everyone who joined, furthest along first, with an editor for their state.
#[leptos::component]
pub fn players_page() -> impl leptos::IntoView {
    let style = stylers::style! {
        "PlayersPage",
        .page {
            padding: 1vh 2vw;
        }
        .players {
            border-collapse: collapse;
        }
        .players td, .players th {
            padding: 4px 12px;
            text-align: left;
            border-bottom: 1px solid #dddddd;
        }
        .editor {
            width: 100%;
            min-height: "10em";
            font-family: monospace;
        }
    };

    let refresh = RwSignal::new(0u32);
    let editing = RwSignal::new(None::<String>);
    let edit_text = RwSignal::new(String::new());
    let saved = RwSignal::new(String::new());

    let players = create_local_resource(move || refresh.get(), |_| load());

    let edit = move |player: &PlayerOverview| {
        editing.set(Some(player.username.clone()));
        edit_text.set(serde_json::to_string_pretty(&player.state).unwrap_or_default());
        saved.set(String::new());
    };

    let save = create_action(move |(username, state): &(String, String)| {
        let (username, state) = (username.clone(), state.clone());
        async move {
            match crate::api::update_player(&username, &state).await {
                Ok(body) => {
                    saved.set(format!("OK: {body}"));
                    refresh.update(|r| *r += 1);
                }
                Err(e) => saved.set(format!("Error: {e}")),
            }
        }
    });

    let rows = move |players: Vec<PlayerOverview>| {
        players
            .into_iter()
            .map(|player| {
                let metals = Metal::ALL
                    .into_iter()
                    .filter(|m| player.state.has(*m))
                    .map(|m| m.symbol())
                    .collect::<Vec<_>>()
                    .join(" ");
                let on_edit = {
                    let player = player.clone();
                    move |_| edit(&player)
                };

                view! {
                    class = style,
                    <tr>
                        <td>{ player.display_name }</td>
                        <td>{ player.username }</td>
                        <td>{ player.state.user_level }</td>
                        <td>{ player.state.life }</td>
                        <td>{ metals }</td>
                        <td><button on:click=on_edit>"Edit"</button></td>
                    </tr>
                }
            })
            .collect::<Vec<_>>()
    };

    let table = move || match players.get() {
        None => view! { <p>"Loading..."</p> }.into_view(),
        Some(Loaded::NeedsLogin) => view! { <AdminLogin /> }.into_view(),
        Some(Loaded::Failed(e)) => view! { <p>{ e }</p> }.into_view(),
        Some(Loaded::Players(players)) => view! {
            class = style,
            <table class="players">
                <tr>
                    <th>"Name"</th>
                    <th>"Username"</th>
                    <th>"Level"</th>
                    <th>"Life"</th>
                    <th>"Metals"</th>
                    <th></th>
                </tr>
                { rows(players) }
            </table>
        }
        .into_view(),
    };

    let editor = move || {
        editing.get().map(|username| {
            let on_save = {
                let username = username.clone();
                move |_| save.dispatch((username.clone(), edit_text.get_untracked()))
            };

            view! {
                class = style,
                <div>
                    <h3>{ format!("Edit {username}") }</h3>
                    <textarea class="editor" prop:value=move || edit_text.get() on:input=move |ev| edit_text.set(event_target_value(&ev))></textarea>
                    <button on:click=on_save>"Save"</button>
                    <button on:click=move |_| editing.set(None)>"Close"</button>
                    <p>{ move || saved.get() }</p>
                </div>
            }
        })
    };

    view! {class = style,
        <AdminNav />
        <div class="page">
            <h2>"Players"</h2>
            { table }
            { editor }
        </div>
    }
}
