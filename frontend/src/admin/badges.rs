use common::roster::RosterTable;
use common::QrMapping;
use leptos::*;

use super::{AdminLogin, AdminNav};

#[derive(Debug, Clone)]
enum Loaded {
    Badges(Vec<QrMapping>),
    NeedsLogin,
    Failed(String),
}

async fn load() -> Loaded {
    let tsv = match crate::api::load_roster().await {
        Ok(tsv) => tsv,
        Err(e) if e.is_unauthorized() => return Loaded::NeedsLogin,
        Err(e) => return Loaded::Failed(format!("Error: {e}")),
    };

    match RosterTable::parse(&tsv).consolidate() {
        Ok(set) => Loaded::Badges(set.qr_mappings),
        Err(e) => Loaded::Failed(format!("Error: {e}")),
    }
}

/// One printable badge per player on the roster.
#[leptos::component]
pub fn badges_page() -> impl leptos::IntoView {
    let style = stylers::style! {
        "BadgesPage",
        .page {
            padding: 1vh 2vw;
        }
        .badges {
            display: flex;
            flex-wrap: wrap;
            gap: 8mm;
        }
        .badge {
            width: 85mm;
            padding: 4mm;
            border: 1px dashed #999999;
            text-align: center;
            break-inside: avoid;
        }
        .name {
            font-size: 22px;
            font-weight: bold;
        }
        .qr {
            width: 60mm;
        }
        .card {
            width: 15mm;
        }
    };

    let badges = create_local_resource(|| (), |_| load());

    let print = move |_| {
        if let Err(e) = leptos::window().print() {
            gloo::console::error!("printing", e);
        }
    };

    let content = move || match badges.get() {
        None => view! { <p>"Loading..."</p> }.into_view(),
        Some(Loaded::NeedsLogin) => view! { <AdminLogin /> }.into_view(),
        Some(Loaded::Failed(e)) => view! { <p>{ e }</p> }.into_view(),
        Some(Loaded::Badges(players)) => players
            .into_iter()
            .map(|player| {
                view! {
                    class = style,
                    <div class="badge">
                        <p class="name">{ player.display_name }</p>
                        <img class="qr" src=crate::api::qr_image_url(&player.qrcode) alt=player.qrcode.clone() />
                        <p>
                            <img class="card" src=crate::api::card_image_url(player.card_suit, player.card_rank) />
                            { player.username }
                        </p>
                    </div>
                }
            })
            .collect::<Vec<_>>()
            .into_view(),
    };

    view! {class = style,
        <AdminNav />
        <div class="page">
            <button on:click=print>"Print"</button>
            <div class="badges">{ content }</div>
        </div>
    }
}
