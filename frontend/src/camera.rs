//! The device camera and the QR decoder running on its frames.

use std::cell::{Cell, RefCell};

use common::scan::{DecodedCode, InversionAttempts, Quad, QrDecoder};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

const QUAD_COLOR: &str = "#FF3B58";

#[wasm_bindgen]
extern "C" {
    /// Provided by the jsQR script included in `index.html`.
    #[wasm_bindgen(js_name = jsQR, catch)]
    fn js_qr(
        data: &js_sys::Uint8ClampedArray,
        width: u32,
        height: u32,
        options: &JsValue,
    ) -> Result<JsValue, JsValue>;
}

pub struct JsQrDecoder;

impl QrDecoder for JsQrDecoder {
    fn decode(&self, rgba: &[u8], width: u32, height: u32, inversion: InversionAttempts) -> Option<DecodedCode> {
        let data = js_sys::Uint8ClampedArray::from(rgba);

        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"inversionAttempts".into(), &inversion.as_str().into()).ok()?;

        let result = match js_qr(&data, width, height, &options) {
            Ok(r) => r,
            Err(e) => {
                gloo::console::warn!("jsQR failed", e);
                return None;
            }
        };
        if result.is_null() || result.is_undefined() {
            return None;
        }

        let json: String = js_sys::JSON::stringify(&result).ok()?.into();
        match serde_json::from_str(&json) {
            Ok(code) => Some(code),
            Err(e) => {
                gloo::console::warn!(format!("unexpected jsQR result: {e}"));
                None
            }
        }
    }
}

/// Owns the one camera stream of the page.
///
/// Every [`Camera::start`] stops the previous stream first. A start that is
/// overtaken by a [`Camera::stop`] while waiting for the user to grant access
/// releases its stream right away, so there is never more than one live
/// stream.
pub struct Camera {
    video: web_sys::HtmlVideoElement,
    stream: RefCell<Option<web_sys::MediaStream>>,
    generation: Cell<u64>,
}

impl Camera {
    pub fn new() -> Result<Self, JsValue> {
        let document = gloo::utils::document();
        let video: web_sys::HtmlVideoElement = document.create_element("video")?.dyn_into()?;
        // keeps iOS safari from going fullscreen
        video.set_attribute("playsinline", "true")?;

        Ok(Self {
            video,
            stream: RefCell::new(None),
            generation: Cell::new(0),
        })
    }

    pub async fn start(&self) -> Result<(), JsValue> {
        self.stop();
        let generation = self.generation.get();

        let devices = gloo::utils::window().navigator().media_devices()?;

        let video = js_sys::Object::new();
        js_sys::Reflect::set(&video, &"facingMode".into(), &"environment".into())?;
        js_sys::Reflect::set(&video, &"width".into(), &640.into())?;
        js_sys::Reflect::set(&video, &"height".into(), &640.into())?;

        let constraints = web_sys::MediaStreamConstraints::new();
        constraints.set_video(&video);

        let stream: web_sys::MediaStream = JsFuture::from(devices.get_user_media_with_constraints(&constraints)?)
            .await?
            .dyn_into()?;

        if generation != self.generation.get() {
            stop_tracks(&stream);
            return Ok(());
        }

        self.video.set_src_object(Some(&stream));
        *self.stream.borrow_mut() = Some(stream);
        JsFuture::from(self.video.play()?).await?;

        Ok(())
    }

    pub fn stop(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));

        if let Some(stream) = self.stream.borrow_mut().take() {
            stop_tracks(&stream);
        }
        self.video.set_src_object(None);
    }

    /// Draws the current frame onto the canvas and returns its pixels, or
    /// `None` while the video has no frame to show yet.
    pub fn capture(&self, canvas: &web_sys::HtmlCanvasElement) -> Result<Option<web_sys::ImageData>, JsValue> {
        if self.video.ready_state() != web_sys::HtmlMediaElement::HAVE_ENOUGH_DATA {
            return Ok(None);
        }

        let (width, height) = (self.video.video_width(), self.video.video_height());
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx = context_2d(canvas)?;
        ctx.draw_image_with_html_video_element_and_dw_and_dh(&self.video, 0.0, 0.0, width as f64, height as f64)?;

        ctx.get_image_data(0.0, 0.0, width as f64, height as f64).map(Some)
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        self.stop();
    }
}

fn stop_tracks(stream: &web_sys::MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<web_sys::MediaStreamTrack>() {
            track.stop();
        }
    }
}

fn context_2d(canvas: &web_sys::HtmlCanvasElement) -> Result<web_sys::CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
        .dyn_into()
        .map_err(JsValue::from)
}

/// Outlines a found code on the canvas.
pub fn draw_quad(canvas: &web_sys::HtmlCanvasElement, quad: &Quad) -> Result<(), JsValue> {
    let ctx = context_2d(canvas)?;
    ctx.set_line_width(4.0);
    ctx.set_stroke_style_str(QUAD_COLOR);

    for (begin, end) in quad.edges() {
        ctx.begin_path();
        ctx.move_to(begin.x, begin.y);
        ctx.line_to(end.x, end.y);
        ctx.stroke();
    }

    Ok(())
}
