use common::scan::ResponseEffect;
use leptos::*;

use crate::scanner::{ScanView, Scanner};

/// Players scan their own badge here before they can play.
#[leptos::component]
pub fn join_page() -> impl leptos::IntoView {
    let style = stylers::style! {
        "JoinPage",
        .page {
            padding: 1vh 2vw;
        }
        .error {
            color: #cc0000;
        }
    };

    let message = RwSignal::new(String::new());
    let error = RwSignal::new(String::new());

    // already joined from this browser
    wasm_bindgen_futures::spawn_local(async move {
        if crate::api::load_state().await.is_ok() {
            crate::navigate("/game");
        }
    });

    let scanner = Scanner::new(crate::api::BADGE_ENDPOINT, move |effect| match effect {
        ResponseEffect::Navigate(url) => crate::navigate(&url),
        ResponseEffect::ReplaceClue(html) => message.set(html),
        ResponseEffect::ReportError(msg) => error.set(msg),
        _ => {}
    });
    let scanner = match scanner {
        Ok(s) => s,
        Err(e) => {
            gloo::console::error!("setting up scanner", e);
            return view! { <p>"Could not set up the camera."</p> }.into_view();
        }
    };

    scanner.start();
    {
        let scanner = scanner.clone();
        on_cleanup(move || scanner.stop());
    }

    view! {class = style,
        <div class="page">
            <h2>"Join the game"</h2>
            <p>"Scan the QR code on your badge to start."</p>
            <ScanView scanner />
            <p inner_html=move || message.get()></p>
            <p class="error">{ move || error.get() }</p>
        </div>
    }
    .into_view()
}
