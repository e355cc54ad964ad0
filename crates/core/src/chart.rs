//! Typed description of the answer line chart
//!
//! [`LineChartSpec`] is backend-neutral: it serializes into a Chart.js
//! configuration object and is drawn directly by the built-in canvas renderer.

use serde_json::{json, Value};

use crate::config::ChartOptions;
use crate::messages::DATASET_LABEL;
use crate::payload::SeriesPayload;
use crate::theme::{Theme, GRADIENT_STOPS, LINE_COLOR, X_GRID_COLOR, Y_GRID_COLOR};

pub const LINE_TENSION: f64 = 0.35;
pub const POINT_RADIUS: f64 = 4.0;
pub const AXIS_TITLE_FONT_SIZE: u32 = 13;
pub const AXIS_TITLE_FONT_WEIGHT: &str = "600";

/// Vertical gradient from y = 0 to y = `height`
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub height: f64,
    pub stops: Vec<(f64, String)>,
}

impl Gradient {
    pub fn vertical(height: f64) -> Self {
        Self {
            height,
            stops: GRADIENT_STOPS
                .iter()
                .map(|(offset, color)| (*offset, color.to_string()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub title: String,
    pub color: &'static str,
    pub grid_color: &'static str,
    /// Space between the title and the tick labels
    pub title_padding: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChartSpec {
    pub labels: Vec<String>,
    pub values: Vec<Option<f64>>,
    pub dataset_label: String,
    pub line_color: &'static str,
    pub tension: f64,
    pub point_radius: f64,
    pub fill: Gradient,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub theme: Theme,
}

impl LineChartSpec {
    pub fn build(
        payload: &SeriesPayload,
        options: &ChartOptions,
        theme: Theme,
        display_height: u32,
    ) -> Self {
        let axis_color = theme.axis_color();

        Self {
            labels: payload.labels(),
            values: payload.y.clone(),
            dataset_label: DATASET_LABEL.to_string(),
            line_color: LINE_COLOR,
            tension: LINE_TENSION,
            point_radius: POINT_RADIUS,
            fill: Gradient::vertical(display_height as f64),
            x_axis: AxisSpec {
                title: options.x_title().to_string(),
                color: axis_color,
                grid_color: X_GRID_COLOR,
                title_padding: 10.0,
            },
            y_axis: AxisSpec {
                title: options.y_title().to_string(),
                color: axis_color,
                grid_color: Y_GRID_COLOR,
                title_padding: 8.0,
            },
            theme,
        }
    }

    /// Chart.js configuration for `new Chart(ctx, config)`.
    ///
    /// `backgroundColor` of the dataset is left `null`: a canvas gradient is
    /// not JSON and has to be set by the caller from [`LineChartSpec::fill`].
    pub fn to_chartjs_config(&self) -> Value {
        json!({
            "type": "line",
            "data": {
                "labels": self.labels,
                "datasets": [{
                    "label": self.dataset_label,
                    "data": self.values,
                    "borderColor": self.line_color,
                    "backgroundColor": Value::Null,
                    "fill": true,
                    "tension": self.tension,
                    "pointRadius": self.point_radius,
                    "pointBackgroundColor": self.line_color,
                }]
            },
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "plugins": {
                    "legend": { "display": false },
                    "tooltip": { "mode": "index", "intersect": false }
                },
                "scales": {
                    "x": axis_json(&self.x_axis, "top"),
                    "y": axis_json(&self.y_axis, "bottom"),
                }
            }
        })
    }
}

fn axis_json(axis: &AxisSpec, padding_side: &str) -> Value {
    json!({
        "ticks": { "color": axis.color },
        "grid": { "color": axis.grid_color },
        "title": {
            "display": true,
            "text": axis.title,
            "color": axis.color,
            "font": { "size": AXIS_TITLE_FONT_SIZE, "weight": AXIS_TITLE_FONT_WEIGHT },
            "padding": { padding_side: axis.title_padding }
        }
    })
}
