use common::roster::{self, EditorUpdate, RosterTable};
use leptos::*;
use leptos_router::A;

pub mod badges;
pub mod players;

#[leptos::component]
pub fn admin_nav() -> impl leptos::IntoView {
    let style = stylers::style! {
        "AdminNav",
        .nav {
            display: flex;
            gap: 2ch;
            padding: 1vh 2vw;
            border-bottom: 1px solid #cccccc;
        }
    };

    view! {class = style,
        <nav class="nav">
            <A href="/admin">"Roster"</A>
            <A href="/admin/players">"Players"</A>
            <A href="/admin/badges">"Print badges"</A>
        </nav>
    }
}

/// Asks for the admin token and reloads the page once it was accepted.
#[leptos::component]
pub fn admin_login() -> impl leptos::IntoView {
    let style = stylers::style! {
        "AdminLogin",
        .login {
            padding: 1vh 2vw;
        }
        .error {
            color: #cc0000;
        }
    };

    let token = RwSignal::new(String::new());
    let error = RwSignal::new(String::new());

    let submit = create_action(move |token: &String| {
        let token = token.clone();
        async move {
            match crate::api::admin_login(&token).await {
                Ok(()) => crate::reload(),
                Err(e) => error.set(format!("Error: {e}")),
            }
        }
    });

    view! {class = style,
        <div class="login">
            <p>"Enter the admin token to manage the game."</p>
            <input type="password" prop:value=move || token.get() on:input=move |ev| token.set(event_target_value(&ev)) />
            <button on:click=move |_| submit.dispatch(token.get_untracked())>"Log in"</button>
            <p class="error">{ move || error.get() }</p>
        </div>
    }
}

/// The roster editor: a spreadsheet pasted as TSV, checked on every change.
#[leptos::component]
pub fn roster_page() -> impl leptos::IntoView {
    let style = stylers::style! {
        "RosterPage",
        .page {
            padding: 1vh 2vw;
        }
        .editor {
            width: 100%;
            min-height: 40vh;
            font-family: monospace;
            white-space: pre;
        }
        .validation {
            font-weight: bold;
        }
        .players {
            display: grid;
            grid-template-columns: auto auto auto auto;
            gap: 12px;
        }
        .player {
            text-align: center;
        }
        .player img {
            width: 60px;
        }
    };

    let text = RwSignal::new(String::new());
    let status = RwSignal::new(String::new());
    let saved = RwSignal::new(String::new());
    let needs_login = RwSignal::new(false);

    let apply = move |update: EditorUpdate| {
        status.set(update.status);
        if let Some(updated) = update.text {
            text.set(updated);
        }
    };

    wasm_bindgen_futures::spawn_local(async move {
        match crate::api::load_roster().await {
            Ok(current) => {
                text.set(current.clone());
                apply(roster::apply_edit(&current));
            }
            Err(e) if e.is_unauthorized() => needs_login.set(true),
            Err(e) => saved.set(format!("Error: {e}")),
        }
    });

    let on_change = move |ev| {
        let value = event_target_value(&ev);
        text.set(value.clone());
        apply(roster::apply_edit(&value));
    };

    let on_generate = move |_| {
        let update = roster::apply_generate(&text.get_untracked(), crate::SITE_URL_PREFIX, &mut rand::thread_rng());
        apply(update);
    };

    let on_save = move |_| {
        let update = roster::prepare_save(&text.get_untracked(), crate::SITE_URL_PREFIX, &mut rand::thread_rng());
        let payload = update.payload.clone();
        apply(update);

        let users = match payload.map(|p| p.to_form_value()) {
            Some(Ok(users)) => users,
            Some(Err(e)) => {
                saved.set(format!("Error: {e}"));
                return;
            }
            None => return,
        };

        wasm_bindgen_futures::spawn_local(async move {
            match crate::api::save_roster(&users).await {
                Ok(body) => saved.set(format!("OK: {body}")),
                Err(e) => saved.set(format!("Error: {e}")),
            }
        });
    };

    let players = move || {
        RosterTable::parse(&text.get())
            .consolidate()
            .map(|set| set.qr_mappings)
            .unwrap_or_default()
            .into_iter()
            .map(|player| {
                view! {
                    class = style,
                    <div class="player">
                        <img src=crate::api::card_image_url(player.card_suit, player.card_rank) alt=format!("{} {}", player.card_rank.label(), player.card_suit.name()) />
                        <p>{ player.display_name }</p>
                        <p>{ player.username }</p>
                    </div>
                }
            })
            .collect::<Vec<_>>()
    };

    let editor = view! {class = style,
        <div class="page">
            <h2>"Manage Players"</h2>
            <p>"Paste the roster from a spreadsheet. A Name and a Username column are required, everything else can be generated."</p>

            <textarea class="editor" prop:value=move || text.get() on:change=on_change></textarea>
            <p class="validation">{ move || status.get() }</p>

            <button on:click=on_generate>"Generate missing values"</button>
            <button on:click=on_save>"Save"</button>
            <p>{ move || saved.get() }</p>

            <div class="players">{ players }</div>
        </div>
    };

    view! {
        <AdminNav />
        <Show when=move || !needs_login.get() fallback=|| view! { <AdminLogin /> }>
            { editor.clone() }
        </Show>
    }
}
