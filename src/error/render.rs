//! Rendering surface errors.

use thiserror::Error;

/// Errors raised while acquiring or exporting a workstation surface.
///
/// Acquisition failures are fatal for the workstation that asked for the
/// surface; nothing retries them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    /// The requested surface dimensions cannot back a drawing context.
    #[error("Failed to get 2D context: invalid surface size {width}x{height}")]
    InvalidSurfaceSize { width: u32, height: u32 },

    /// The pixel buffer could not be allocated.
    #[error("Failed to get 2D context: could not allocate {width}x{height} surface")]
    AllocationFailed { width: u32, height: u32 },

    /// PNG export failed.
    #[error("Failed to encode surface: {0}")]
    Encode(String),

    /// The encoded PNG could not be written.
    #[error("Failed to write '{path}': {message}")]
    Write { path: String, message: String },
}

impl RenderError {
    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            RenderError::InvalidSurfaceSize { .. } | RenderError::AllocationFailed { .. } => {
                "The workstation screen could not be created.".to_string()
            }
            RenderError::Encode(_) | RenderError::Write { .. } => {
                "The workstation screen could not be exported.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            RenderError::InvalidSurfaceSize { .. } => "E_RENDER_SIZE",
            RenderError::AllocationFailed { .. } => "E_RENDER_ALLOC",
            RenderError::Encode(_) => "E_RENDER_ENCODE",
            RenderError::Write { .. } => "E_RENDER_WRITE",
        }
    }
}

impl From<image::ImageError> for RenderError {
    fn from(err: image::ImageError) -> Self {
        RenderError::Encode(err.to_string())
    }
}
