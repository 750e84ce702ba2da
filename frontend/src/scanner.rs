//! The frame loop that turns camera frames into submitted answers.

use std::cell::RefCell;
use std::rc::Rc;

use common::scan::{FrameOutcome, InversionAttempts, QrDecoder, ResponseEffect, ScanSession};
use gloo::render::{request_animation_frame, AnimationFrame};
use leptos::*;

use crate::camera::{self, Camera, JsQrDecoder};
use crate::toast::{Toast, ToastMessage};

/// What the scan view shows next to the canvas.
#[derive(Debug, Clone, Copy)]
pub struct ScannerUi {
    pub video_ready: RwSignal<bool>,
    /// The payload of the last decoded code, `None` while no code is visible.
    pub code: RwSignal<Option<String>>,
    pub can_resume: RwSignal<bool>,
    pub toast: Toast,
}

pub struct Scanner {
    endpoint: &'static str,
    session: RefCell<ScanSession>,
    camera: Camera,
    decoder: JsQrDecoder,
    canvas: NodeRef<html::Canvas>,
    frame: RefCell<Option<AnimationFrame>>,
    on_effect: Box<dyn Fn(ResponseEffect)>,
    ui: ScannerUi,
}

impl Scanner {
    /// `on_effect` receives everything of a response except resuming, which
    /// the scanner does itself.
    pub fn new<F>(endpoint: &'static str, on_effect: F) -> Result<Rc<Self>, wasm_bindgen::JsValue>
    where
        F: Fn(ResponseEffect) + 'static,
    {
        Ok(Rc::new(Self {
            endpoint,
            session: RefCell::new(ScanSession::new(crate::SITE_URL_PREFIX)),
            camera: Camera::new()?,
            decoder: JsQrDecoder,
            canvas: create_node_ref(),
            frame: RefCell::new(None),
            on_effect: Box::new(on_effect),
            ui: ScannerUi {
                video_ready: RwSignal::new(false),
                code: RwSignal::new(None),
                can_resume: RwSignal::new(false),
                toast: Toast::new(),
            },
        }))
    }

    pub fn ui(&self) -> ScannerUi {
        self.ui
    }

    pub fn start(self: &Rc<Self>) {
        self.session.borrow_mut().start();
        self.ui.can_resume.set(false);
        self.ui.video_ready.set(false);

        let scanner = Rc::clone(self);
        wasm_bindgen_futures::spawn_local(async move {
            match scanner.camera.start().await {
                Ok(()) => scanner.schedule(),
                Err(e) => {
                    gloo::console::error!("starting camera", e);
                    (scanner.on_effect)(ResponseEffect::ReportError("Error: could not start the camera".to_owned()));
                    scanner.stop();
                }
            }
        });
    }

    pub fn stop(&self) {
        self.session.borrow_mut().stop();
        self.frame.borrow_mut().take();
        self.camera.stop();
        self.ui.can_resume.set(true);
    }

    pub fn resume(self: &Rc<Self>) {
        self.stop();
        self.start();
    }

    fn schedule(self: &Rc<Self>) {
        let scanner = Rc::clone(self);
        let handle = request_animation_frame(move |_| {
            scanner.frame.borrow_mut().take();
            scanner.tick();
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    fn tick(self: &Rc<Self>) {
        if !self.session.borrow().is_ticking() {
            return;
        }

        let canvas = match self.canvas.get_untracked() {
            Some(c) => c,
            None => {
                self.schedule();
                return;
            }
        };

        let image = match self.camera.capture(&canvas) {
            Ok(Some(image)) => image,
            Ok(None) => {
                self.schedule();
                return;
            }
            Err(e) => {
                gloo::console::warn!("capturing frame", e);
                self.schedule();
                return;
            }
        };
        self.ui.video_ready.set(true);

        let code = self.decoder.decode(
            &image.data(),
            image.width(),
            image.height(),
            InversionAttempts::DontInvert,
        );
        if let Some(code) = code.as_ref() {
            if let Err(e) = camera::draw_quad(&canvas, &code.location) {
                gloo::console::warn!("drawing code outline", e);
            }
        }

        let outcome = self.session.borrow_mut().on_frame(code.as_ref());
        match outcome {
            FrameOutcome::Halted => return,
            FrameOutcome::NoCode => self.ui.code.set(None),
            FrameOutcome::Foreign(data) => {
                self.ui.code.set(Some(data));
                self.ui.toast.flash("Foreign QR Code!");
            }
            FrameOutcome::StillForeign(data) => self.ui.code.set(Some(data)),
            FrameOutcome::Submit(data) => {
                self.ui.code.set(Some(data.clone()));
                self.camera.stop();
                self.ui.can_resume.set(true);
                self.submit(data);
                return;
            }
        }

        self.schedule();
    }

    fn submit(self: &Rc<Self>, answer: String) {
        self.ui.toast.flash("Scanned!");

        let scanner = Rc::clone(self);
        wasm_bindgen_futures::spawn_local(async move {
            let response = match crate::api::submit_answer(scanner.endpoint, &answer).await {
                Ok(r) => r,
                Err(e) => {
                    (scanner.on_effect)(ResponseEffect::ReportError(format!("Error: {e}")));
                    return;
                }
            };

            for effect in response.effects() {
                match effect {
                    ResponseEffect::ResumeScanning => {
                        if scanner.session.borrow().awaits_response() {
                            scanner.resume();
                        }
                    }
                    ResponseEffect::Toast(action) => scanner.ui.toast.flash(action),
                    other => (scanner.on_effect)(other),
                }
            }
        });
    }
}

#[leptos::component]
pub fn scan_view(scanner: Rc<Scanner>) -> impl leptos::IntoView {
    let style = stylers::style! {
        "ScanView",
        .canvas {
            width: 100%;
            max-width: 640px;
        }
        .hint {
            color: #777777;
        }
    };

    let ui = scanner.ui();
    let canvas = scanner.canvas;
    let resume = move |_| scanner.resume();

    view! {class = style,
        <div>
            <ToastMessage toast=ui.toast />
            <p class="hint" hidden=move || ui.video_ready.get()>"⌛ Loading video..."</p>
            <canvas class="canvas" node_ref=canvas hidden=move || !ui.video_ready.get()></canvas>
            <p class="hint">
                { move || match ui.code.get() {
                    Some(data) => format!("Data: {data}"),
                    None => "No QR code detected.".to_owned(),
                } }
            </p>
            <button hidden=move || !ui.can_resume.get() on:click=resume>"Resume Scanning"</button>
        </div>
    }
}
