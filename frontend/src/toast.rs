use common::scan::TOAST_DURATION;
use gloo::timers::future::TimeoutFuture;
use leptos::*;

/// A message that hides itself again after [`TOAST_DURATION`].
#[derive(Debug, Clone, Copy)]
pub struct Toast {
    message: RwSignal<Option<String>>,
    shown: RwSignal<u32>,
}

impl Toast {
    pub fn new() -> Self {
        Self {
            message: RwSignal::new(None),
            shown: RwSignal::new(0),
        }
    }

    pub fn flash<S>(&self, message: S)
    where
        S: Into<String>,
    {
        self.message.set(Some(message.into()));

        let id = self.shown.get_untracked().wrapping_add(1);
        self.shown.set(id);

        let (message, shown) = (self.message, self.shown);
        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(TOAST_DURATION.as_millis() as u32).await;
            // a newer message keeps its own timer
            if shown.get_untracked() == id {
                message.set(None);
            }
        });
    }

    pub fn message(&self) -> Option<String> {
        self.message.get()
    }
}

impl Default for Toast {
    fn default() -> Self {
        Self::new()
    }
}

#[leptos::component]
pub fn toast_message(toast: Toast) -> impl leptos::IntoView {
    let style = stylers::style! {
        "ToastMessage",
        .toast {
            display: block;
            min-height: "1.5em";
            font-weight: bold;
            text-align: center;
        }
    };

    view! {class = style,
        <span class="toast">{ move || toast.message().unwrap_or_default() }</span>
    }
}
