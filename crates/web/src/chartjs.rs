//! Chart.js, looked up on the global object at render time

use answer_chart_core::{Error, LineChartSpec, Result};
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlCanvasElement;

use crate::dom::{context_2d, describe_js_error};

const CHART_GLOBAL: &str = "Chart";
pub const LIBRARY_NAME: &str = "Chart.js";

fn constructor() -> Option<Function> {
    Reflect::get(&js_sys::global(), &JsValue::from_str(CHART_GLOBAL))
        .ok()
        .and_then(|value| value.dyn_into::<Function>().ok())
}

fn js_error(value: JsValue) -> Error {
    Error::Render(describe_js_error(&value))
}

pub fn is_available() -> bool {
    constructor().is_some()
}

/// `new Chart(ctx, config)` with the gradient fill attached.
pub fn render(canvas: &HtmlCanvasElement, spec: &LineChartSpec) -> Result<JsValue> {
    let ctor = constructor().ok_or_else(|| Error::LibraryUnavailable {
        library: LIBRARY_NAME.to_string(),
    })?;
    let ctx = context_2d(canvas)?;

    let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, spec.fill.height);
    for (offset, color) in &spec.fill.stops {
        gradient
            .add_color_stop(*offset as f32, color)
            .map_err(js_error)?;
    }

    let config = js_sys::JSON::parse(&spec.to_chartjs_config().to_string()).map_err(js_error)?;
    let datasets = Reflect::get(&config, &"data".into())
        .and_then(|data| Reflect::get(&data, &"datasets".into()))
        .map_err(js_error)?;
    let dataset = Reflect::get(&datasets, &JsValue::from(0)).map_err(js_error)?;
    Reflect::set(&dataset, &"backgroundColor".into(), &gradient).map_err(js_error)?;

    Reflect::construct(&ctor, &Array::of2(&ctx, &config)).map_err(js_error)
}

/// Call `chart.destroy()`.
pub fn destroy(chart: &JsValue) -> Result<()> {
    let destroy = Reflect::get(chart, &"destroy".into())
        .map_err(js_error)?
        .dyn_into::<Function>()
        .map_err(|_| Error::Render("chart has no destroy()".to_string()))?;
    destroy.call0(chart).map_err(js_error)?;
    Ok(())
}
