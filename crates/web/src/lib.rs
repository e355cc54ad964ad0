//! answer-chart-web - Browser side of answer-chart
//!
//! Compiles to WebAssembly and exports `fetchAndRenderAnswerData`, which
//! fetches `/api/answer-data/{answerId}` and draws the series on a canvas.
//! Errors are shown inside the wrapper element and never thrown.
//!
//! ```js
//! import init, { fetchAndRenderAnswerData } from './answer_chart_web.js';
//! await init();
//! window.fetchAndRenderAnswerData = fetchAndRenderAnswerData;
//! await fetchAndRenderAnswerData('3', 'chart-3', wrapper, { yLabel: 'Score' });
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use answer_chart_core::{ChartLoader, ChartOptions, LoaderConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

mod backend;
mod canvas;
mod chartjs;
mod dom;
mod http;

use backend::WebBackend;
use dom::{BrowserPage, BrowserTimer};
use http::GlooSource;

type WebLoader = ChartLoader<GlooSource, BrowserPage, BrowserTimer, WebBackend>;

thread_local! {
    // one loader per page so charts can be replaced across calls
    static LOADER: RefCell<Option<Rc<WebLoader>>> = const { RefCell::new(None) };
}

fn loader() -> Option<Rc<WebLoader>> {
    LOADER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            let page = BrowserPage::new()?;
            let config = LoaderConfig::default();
            let backend = WebBackend::new(config.renderer);
            *slot = Some(Rc::new(ChartLoader::new(
                GlooSource,
                page,
                BrowserTimer,
                backend,
                config,
            )));
        }
        slot.clone()
    })
}

#[wasm_bindgen(start)]
pub fn start() {
    tracing_wasm::set_as_global_default();
}

/// Stringify a JS object and hand it to serde.
fn js_json(value: &JsValue) -> Option<String> {
    if value.is_undefined() || value.is_null() {
        return None;
    }
    js_sys::JSON::stringify(value).ok().map(String::from)
}

/// `String(value)`, as a template literal would interpolate the answer id.
fn answer_id_text(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("String"))
        .ok()
        .and_then(|ctor| ctor.dyn_into::<js_sys::Function>().ok())
        .and_then(|ctor| ctor.call1(&JsValue::UNDEFINED, value).ok())
        .and_then(|text| text.as_string())
        .unwrap_or_default()
}

/// Fetch the series for `answer_id` and draw it on `canvas_id`.
///
/// `options` may carry `xLabel` / `yLabel`. Never throws: failures end up as
/// a message inside `wrapper`.
#[wasm_bindgen(js_name = fetchAndRenderAnswerData)]
pub async fn fetch_and_render_answer_data(
    answer_id: JsValue,
    canvas_id: String,
    wrapper: Element,
    options: JsValue,
) {
    let Some(loader) = loader() else {
        tracing::error!("fetchAndRenderAnswerData called without a document");
        return;
    };

    let options = match js_json(&options) {
        Some(json) => ChartOptions::from_json(&json).unwrap_or_else(|e| {
            tracing::warn!("ignoring chart options: {}", e);
            ChartOptions::default()
        }),
        None => ChartOptions::default(),
    };

    let answer_id = answer_id_text(&answer_id);
    // already shown in the wrapper
    let _ = loader
        .fetch_and_render(&answer_id, &canvas_id, &wrapper, &options)
        .await;
}

/// Override loader settings, e.g. `{ endpoint: '/data/{answer_id}', renderer: 'canvas' }`.
#[wasm_bindgen(js_name = configureChartLoader)]
pub fn configure_chart_loader(config: JsValue) -> Result<(), JsValue> {
    let json = js_json(&config).unwrap_or_else(|| "{}".to_string());
    let config = LoaderConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let loader = loader().ok_or_else(|| JsValue::from_str("no document"))?;
    loader.backend().set_renderer(config.renderer);
    loader.reconfigure(config);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn answer_id_matches_js_string_conversion() {
        assert_eq!(answer_id_text(&JsValue::from_str("12")), "12");
        assert_eq!(answer_id_text(&JsValue::from_f64(3.0)), "3");
        assert_eq!(answer_id_text(&JsValue::from_f64(1e21)), "1e+21");
        assert_eq!(answer_id_text(&JsValue::UNDEFINED), "undefined");
        assert_eq!(answer_id_text(&JsValue::NULL), "null");
        assert_eq!(answer_id_text(&JsValue::TRUE), "true");
    }
}
