//! Error types for cover preparation.

use thiserror::Error;

/// Errors that can occur while preparing a cover image for storage.
#[derive(Debug, Error)]
pub enum CoverError {
    /// No bytes were supplied.
    #[error("cover image is empty")]
    Empty,

    /// The bytes could not be decoded or re-encoded as an image.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Convenience alias for cover results.
pub type CoverResult<T> = std::result::Result<T, CoverError>;
