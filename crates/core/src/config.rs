//! Loader configuration and per-call chart options

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::messages::{DEFAULT_X_LABEL, DEFAULT_Y_LABEL};
use crate::payload::label_text;

/// Placeholder replaced by the answer id in [`LoaderConfig::endpoint`]
pub const ANSWER_ID_PLACEHOLDER: &str = "{answer_id}";

/// Which backend draws the chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Renderer {
    /// The global Chart.js constructor
    #[default]
    ChartJs,
    /// The built-in 2D canvas renderer
    Canvas,
}

/// Settings shared by every call of a loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// URL pattern with an `{answer_id}` placeholder
    pub endpoint: String,
    /// Retries after the first canvas lookup
    pub poll_attempts: u32,
    pub poll_interval_ms: u64,
    /// Display height of the canvas in CSS pixels
    pub canvas_height: u32,
    /// Appended to the canvas id to form the started marker id
    pub started_suffix: String,
    pub debug_log_id: String,
    /// Class on the root element that turns on the dark theme
    pub dark_class: String,
    pub renderer: Renderer,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            endpoint: format!("/api/answer-data/{}", ANSWER_ID_PLACEHOLDER),
            poll_attempts: 10,
            poll_interval_ms: 40,
            canvas_height: 260,
            started_suffix: "-started".to_string(),
            debug_log_id: "debug-log".to_string(),
            dark_class: "dark".to_string(),
            renderer: Renderer::ChartJs,
        }
    }
}

impl LoaderConfig {
    /// Parse a JSON config object, filling in defaults for absent fields.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.endpoint.contains(ANSWER_ID_PLACEHOLDER) {
            return Err(Error::Config(format!(
                "endpoint must contain {}",
                ANSWER_ID_PLACEHOLDER
            )));
        }
        if self.canvas_height == 0 {
            return Err(Error::Config("canvas_height must be positive".to_string()));
        }
        Ok(())
    }

    pub fn url_for(&self, answer_id: &str) -> String {
        self.endpoint.replace(ANSWER_ID_PLACEHOLDER, answer_id)
    }

    pub fn started_marker_id(&self, canvas_id: &str) -> String {
        format!("{}{}", canvas_id, self.started_suffix)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Per-call options, as passed from JS (`{xLabel, yLabel}`).
///
/// Numbers and booleans are shown as text; any other value counts as absent
/// for that field only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    #[serde(default, deserialize_with = "scalar_label")]
    pub x_label: Option<String>,
    #[serde(default, deserialize_with = "scalar_label")]
    pub y_label: Option<String>,
}

fn scalar_label<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        value @ (Value::Number(_) | Value::Bool(_)) => Some(label_text(&value)),
        _ => None,
    })
}

impl ChartOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// x axis title; empty strings fall back to the default
    pub fn x_title(&self) -> &str {
        non_empty(self.x_label.as_deref()).unwrap_or(DEFAULT_X_LABEL)
    }

    pub fn y_title(&self) -> &str {
        non_empty(self.y_label.as_deref()).unwrap_or(DEFAULT_Y_LABEL)
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
