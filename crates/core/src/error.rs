//! Error types for answer-chart-core (WASM-compatible)

use thiserror::Error;

/// Result type alias for answer-chart-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Every way a chart load can fail.
///
/// None of these reach the JS caller as an exception: the loader turns each
/// one into an inline notice (see [`Error::notice`]) before reporting it.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {status}")]
    HttpStatus { status: u16, body: String },

    #[error("Failed to parse answer data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Canvas not found: {canvas_id}")]
    CanvasNotFound { canvas_id: String },

    #[error("{library} is not loaded")]
    LibraryUnavailable { library: String },

    #[error("Chart render error: {0}")]
    Render(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// The message shown to the user inside the wrapper element.
    pub fn notice(&self) -> crate::messages::Notice {
        use crate::messages::{self, Notice};

        match self {
            Error::HttpStatus { status, body } => Notice::error(messages::http_failure(*status, body)),
            Error::Network(detail) => Notice::error(messages::load_failure(detail)),
            Error::Parse(e) => Notice::error(messages::load_failure(&e.to_string())),
            Error::CanvasNotFound { .. } => Notice::error(messages::CANVAS_NOT_FOUND.to_string()),
            Error::LibraryUnavailable { library } => {
                Notice::error(messages::library_unavailable(library))
            }
            Error::Render(detail) => Notice::render_error(messages::render_failure(detail)),
            Error::Config(detail) => Notice::error(messages::load_failure(detail)),
        }
    }
}
