//! Error types for document capture.

use thiserror::Error;

/// Result type for capture operations.
pub type Result<T> = std::result::Result<T, CaptureError>;

/// Errors that can occur while rasterizing the document background.
///
/// Every variant is recovered locally by the scheduler: nothing is published
/// and the previous texture, if any, stays current.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The capture backend rejected the request.
    #[error("capture failed: {0}")]
    Failed(String),

    /// The document contains content the backend cannot rasterize.
    #[error("unsupported content: {0}")]
    Unsupported(String),

    /// The backend returned bytes that are not a decodable image.
    #[error("failed to decode captured image: {0}")]
    Decode(String),

    /// Invalid state for operation.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// No async runtime to run captures on.
    #[error("no tokio runtime available to run captures")]
    NoRuntime,
}
