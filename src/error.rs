//! Error types for the agreement export surface

use thiserror::Error;

/// Result type alias for agreement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering or exporting an agreement
#[derive(Error, Debug)]
pub enum Error {
    /// A required capability (rasterizer or PDF assembler) is not ready
    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// Failed to rasterize the rendered document
    #[error("Rasterization failed: {0}")]
    RasterError(String),

    /// Failed to assemble or save the PDF
    #[error("PDF assembly failed: {0}")]
    AssemblyError(String),

    /// An export is already running; the in-progress guard rejected the call
    #[error("An export is already in progress")]
    ExportInProgress,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Underlying I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
