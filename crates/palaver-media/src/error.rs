use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading candidate files from disk.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),
}

/// Errors raised while rendering a thumbnail.
///
/// None of these are fatal: the attachment is kept without a preview.
#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error("Not an image: {0}")]
    NotAnImage(String),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Thumbnail task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
