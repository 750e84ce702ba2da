use common::scan::ResponseEffect;
use common::{GameState, Metal};
use gloo::timers::future::TimeoutFuture;
use leptos::*;

use crate::scanner::{ScanView, Scanner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Clue,
    Scan,
}

#[leptos::component]
pub fn game_page() -> impl leptos::IntoView {
    let style = stylers::style! {
        "GamePage",
        .page {
            padding: 1vh 2vw;
        }
        .status {
            display: flex;
            justify-content: space-between;
            font-size: 24px;
        }
        .heart-active {
            color: #e0245e;
        }
        .heart-dead {
            color: #cccccc;
        }
        .metal {
            display: inline-block;
            margin-left: 4px;
            padding: 2px 6px;
            border-radius: 4px;
            background-color: #b08d57;
            color: #ffffff;
            font-size: 16px;
        }
        .tabs button {
            width: 50%;
            padding: 8px;
        }
        .current {
            font-weight: bold;
        }
        .error {
            color: #cc0000;
        }
    };

    let state = RwSignal::new(GameState::default());
    let clue = RwSignal::new(String::new());
    let error = RwSignal::new(String::new());
    let tab = RwSignal::new(Tab::Clue);

    let on_effect = move |effect: ResponseEffect| match effect {
        ResponseEffect::Navigate(url) => crate::navigate(&url),
        ResponseEffect::ReplaceClue(html) => clue.set(html),
        ResponseEffect::ReportError(msg) => error.set(msg),
        ResponseEffect::ShowClueTab { after } => {
            wasm_bindgen_futures::spawn_local(async move {
                TimeoutFuture::new(after.as_millis() as u32).await;
                tab.set(Tab::Clue);
            });
        }
        ResponseEffect::RenderState(s) => state.set(s),
        ResponseEffect::Toast(_) | ResponseEffect::ResumeScanning => {}
    };

    wasm_bindgen_futures::spawn_local(async move {
        match crate::api::load_state().await {
            Ok(response) => response.effects().into_iter().for_each(on_effect),
            Err(e) if e.is_unauthorized() => crate::navigate("/"),
            Err(e) => error.set(format!("Error: {e}")),
        }
    });

    let scanner = match Scanner::new(crate::api::MOVE_ENDPOINT, on_effect) {
        Ok(s) => s,
        Err(e) => {
            gloo::console::error!("setting up scanner", e);
            return view! { <p>"Could not set up the camera."</p> }.into_view();
        }
    };

    // the camera only runs while the scan tab is open
    {
        let scanner = scanner.clone();
        create_effect(move |_| match tab.get() {
            Tab::Scan => scanner.start(),
            Tab::Clue => scanner.stop(),
        });
    }
    {
        let scanner = scanner.clone();
        on_cleanup(move || scanner.stop());
    }

    let hearts = move || {
        state
            .get()
            .hearts()
            .into_iter()
            .map(|alive| {
                view! { class = style, <span class:heart-active=alive class:heart-dead=!alive>"♥"</span> }
            })
            .collect::<Vec<_>>()
    };
    let metals = move || {
        let current = state.get();
        Metal::ALL
            .into_iter()
            .filter(|m| current.has(*m))
            .map(|m| view! { class = style, <span class="metal">{ m.symbol() }</span> })
            .collect::<Vec<_>>()
    };

    let logout = move |_| {
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = crate::api::logout().await {
                gloo::console::warn!(format!("logging out: {e}"));
            }
            crate::navigate("/");
        });
    };

    view! {class = style,
        <div class="page">
            <div class="status">
                <div>{ hearts }</div>
                <div>{ metals }</div>
            </div>

            <div class="tabs">
                <button class:current=move || tab.get() == Tab::Clue on:click=move |_| tab.set(Tab::Clue)>"Clue"</button>
                <button class:current=move || tab.get() == Tab::Scan on:click=move |_| tab.set(Tab::Scan)>"Scan"</button>
            </div>

            <div hidden=move || tab.get() != Tab::Clue inner_html=move || clue.get()></div>
            <div hidden=move || tab.get() != Tab::Scan>
                <ScanView scanner />
            </div>

            <p class="error">{ move || error.get() }</p>
            <button on:click=logout>"Log out"</button>
        </div>
    }
    .into_view()
}
