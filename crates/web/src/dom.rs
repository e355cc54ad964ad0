//! Browser implementations of [`Page`] and [`Timer`]

use std::time::Duration;

use answer_chart_core::{Error, Notice, Page, Result, Timer};
use gloo_timers::future::TimeoutFuture;
use js_sys::Promise;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement};

pub struct BrowserPage {
    document: Document,
}

impl BrowserPage {
    pub fn new() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }
}

impl Page for BrowserPage {
    type Wrapper = Element;
    type Canvas = HtmlCanvasElement;

    fn find_canvas(&self, canvas_id: &str) -> Option<HtmlCanvasElement> {
        let element = self.document.get_element_by_id(canvas_id)?;
        match element.dyn_into::<HtmlCanvasElement>() {
            Ok(canvas) => Some(canvas),
            Err(_) => {
                tracing::warn!(canvas_id, "element is not a canvas");
                None
            }
        }
    }

    fn append_notice(&self, wrapper: &Element, notice: &Notice) {
        let Ok(div) = self.document.create_element("div") else {
            return;
        };
        if let Some(ref id) = notice.id {
            div.set_id(id);
        }
        div.set_class_name(notice.class);
        div.set_text_content(Some(&notice.text));
        wrapper.append_child(&div).ok();
    }

    fn remove_element(&self, element_id: &str) {
        if let Some(element) = self.document.get_element_by_id(element_id) {
            element.remove();
        }
    }

    fn set_debug_log(&self, element_id: &str, text: &str) {
        if let Some(element) = self.document.get_element_by_id(element_id) {
            element.set_text_content(Some(text));
        }
    }

    fn has_root_class(&self, class: &str) -> bool {
        self.document
            .document_element()
            .map(|root| root.class_list().contains(class))
            .unwrap_or(false)
    }

    fn size_canvas(&self, canvas: &HtmlCanvasElement, height_px: u32) {
        let style = canvas.style();
        style.set_property("width", "100%").ok();
        style.set_property("height", &format!("{}px", height_px)).ok();
    }
}

pub struct BrowserTimer;

impl Timer for BrowserTimer {
    async fn sleep(&self, duration: Duration) {
        TimeoutFuture::new(duration.as_millis() as u32).await;
    }

    async fn next_frame(&self) {
        let promise = Promise::new(&mut |resolve, _reject| {
            let scheduled = web_sys::window()
                .map(|window| window.request_animation_frame(&resolve).is_ok())
                .unwrap_or(false);
            if !scheduled {
                resolve.call0(&JsValue::NULL).ok();
            }
        });
        JsFuture::from(promise).await.ok();
    }
}

pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(|e| Error::Render(describe_js_error(&e)))?
        .ok_or_else(|| Error::Render("no 2d context".to_string()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| Error::Render("no 2d context".to_string()))
}

/// Message of a thrown JS value
pub fn describe_js_error(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
