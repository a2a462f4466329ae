//! Error types for the word-cloud engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the word-cloud engine
#[derive(Error, Debug)]
pub enum Error {
    /// Input text or topic was blank after trimming
    #[error("Input is empty")]
    EmptyInput,

    /// The keyword suggestion call failed; the prior word list is preserved
    #[error("Keyword generation failed: {0}")]
    Generation(String),

    /// No word-cloud backend is installed
    #[error("Word-cloud renderer is not available")]
    RendererUnavailable,

    /// Failed to draw onto the surface
    #[error("Rendering failed: {0}")]
    Render(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Failed to export the surface as an image
    #[error("Export failed: {0}")]
    Export(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
