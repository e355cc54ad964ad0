//! The [`ChartBackend`] used in the browser: Chart.js or the built-in renderer

use std::cell::Cell;

use answer_chart_core::{ChartBackend, LineChartSpec, Renderer, Result};
use wasm_bindgen::JsValue;
use web_sys::HtmlCanvasElement;

use crate::canvas::{self, CanvasChart};
use crate::chartjs;

pub enum WebChart {
    ChartJs(JsValue),
    Canvas(CanvasChart),
}

pub struct WebBackend {
    renderer: Cell<Renderer>,
}

impl WebBackend {
    pub fn new(renderer: Renderer) -> Self {
        Self {
            renderer: Cell::new(renderer),
        }
    }

    /// Charts already drawn keep their own backend until replaced.
    pub fn set_renderer(&self, renderer: Renderer) {
        self.renderer.set(renderer);
    }
}

impl ChartBackend<HtmlCanvasElement> for WebBackend {
    type Handle = WebChart;

    fn library(&self) -> &str {
        match self.renderer.get() {
            Renderer::ChartJs => chartjs::LIBRARY_NAME,
            Renderer::Canvas => "canvas 2d",
        }
    }

    fn is_available(&self) -> bool {
        match self.renderer.get() {
            Renderer::ChartJs => chartjs::is_available(),
            Renderer::Canvas => true,
        }
    }

    fn render(&self, canvas: &HtmlCanvasElement, spec: &LineChartSpec) -> Result<WebChart> {
        match self.renderer.get() {
            Renderer::ChartJs => chartjs::render(canvas, spec).map(WebChart::ChartJs),
            Renderer::Canvas => canvas::render(canvas, spec).map(WebChart::Canvas),
        }
    }

    fn destroy(&self, handle: WebChart) -> Result<()> {
        match handle {
            WebChart::ChartJs(chart) => chartjs::destroy(&chart),
            WebChart::Canvas(chart) => chart.clear(),
        }
    }
}
