//! answer-chart-core - Chart loading logic shared by the browser and native tools
//!
//! This crate contains WASM-compatible code: the answer data payload, chart
//! description, layout math, and the [`ChartLoader`] that ties a data source,
//! a page, a timer and a charting backend together.
//!
//! # Features
//!
//! - Parse `/api/answer-data/{answer_id}` payloads
//! - Build a backend-neutral line chart description (Chart.js config included)
//! - Orchestrate fetch, canvas polling and chart replacement with inline error notices

pub mod chart;
pub mod config;
pub mod error;
pub mod layout;
pub mod loader;
pub mod messages;
pub mod payload;
pub mod registry;
pub mod theme;

pub use chart::LineChartSpec;
pub use config::{ChartOptions, LoaderConfig, Renderer};
pub use error::{Error, Result};
pub use loader::{ChartBackend, ChartLoader, DataSource, FetchResponse, Page, Timer};
pub use messages::Notice;
pub use payload::SeriesPayload;
pub use registry::ChartRegistry;
pub use theme::Theme;
