//! Error types for the slides widget

use thiserror::Error;

/// Result type alias for widget operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or driving the widget
///
/// None of these are fatal to a mounted widget: an invalid URL degrades to the
/// placeholder view and a rejected fullscreen request degrades to simulated
/// fullscreen. They are surfaced as values so hosts can log or report them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input is not a recognized Google Slides presentation URL
    #[error("Invalid Google Slides URL: {0}")]
    InvalidUrl(String),

    /// The platform refused to enter fullscreen
    #[error("Fullscreen request rejected: {0}")]
    FullscreenRejected(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Failed to produce or attach the widget markup
    #[error("Rendering failed: {0}")]
    RenderError(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}
