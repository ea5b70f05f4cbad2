//! Image thumbnails, rendered off the async runtime and returned as a
//! `data:` URL.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use image::ImageFormat;
use tracing::debug;

use crate::error::ThumbnailError;
use crate::intake::{CandidateFile, FileSource};

/// Render a thumbnail that fits inside `max_dim` x `max_dim`.
///
/// Images already within the bounds are re-encoded at their own size.
pub async fn generate_thumbnail(file: &CandidateFile, max_dim: u32) -> Result<String, ThumbnailError> {
    if !file.is_image() {
        return Err(ThumbnailError::NotAnImage(file.mime_type.clone()));
    }

    let data = match &file.source {
        FileSource::Path(path) => Bytes::from(tokio::fs::read(path).await?),
        FileSource::Bytes(bytes) => bytes.clone(),
    };

    let png = tokio::task::spawn_blocking(move || render_png(&data, max_dim)).await??;
    debug!(file = %file.name, bytes = png.len(), "Thumbnail rendered");

    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

fn render_png(data: &[u8], max_dim: u32) -> Result<Vec<u8>, ThumbnailError> {
    let img = image::load_from_memory(data)?;
    let img = if img.width() > max_dim || img.height() > max_dim {
        img.thumbnail(max_dim, max_dim)
    } else {
        img
    };

    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, RgbImage};

    use super::*;

    fn png_bytes(width: u32, height: u32) -> Bytes {
        let img = DynamicImage::ImageRgb8(RgbImage::new(width, height));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        Bytes::from(out.into_inner())
    }

    fn decode(data_url: &str) -> DynamicImage {
        let encoded = data_url.strip_prefix("data:image/png;base64,").unwrap();
        let raw = STANDARD.decode(encoded).unwrap();
        image::load_from_memory(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_large_image_is_bounded() {
        let file = CandidateFile::from_bytes("wide.png", None, png_bytes(800, 200));
        let url = generate_thumbnail(&file, 400).await.unwrap();
        let thumb = decode(&url);
        assert_eq!(thumb.width(), 400);
        assert_eq!(thumb.height(), 100);
    }

    #[tokio::test]
    async fn test_small_image_kept_at_size() {
        let file = CandidateFile::from_bytes("tiny.png", None, png_bytes(16, 8));
        let thumb = decode(&generate_thumbnail(&file, 400).await.unwrap());
        assert_eq!((thumb.width(), thumb.height()), (16, 8));
    }

    #[tokio::test]
    async fn test_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        tokio::fs::write(&path, png_bytes(10, 10)).await.unwrap();

        let file = CandidateFile::from_path(&path).await.unwrap();
        assert!(generate_thumbnail(&file, 4).await.is_ok());
    }

    #[tokio::test]
    async fn test_corrupt_image_fails() {
        let file = CandidateFile::from_bytes("broken.jpg", None, Bytes::from_static(b"not a jpeg"));
        let err = generate_thumbnail(&file, 400).await.unwrap_err();
        assert!(matches!(err, ThumbnailError::Image(_)));
    }

    #[tokio::test]
    async fn test_non_image_rejected() {
        let file = CandidateFile::from_bytes("doc.pdf", None, Bytes::from_static(b"%PDF"));
        let err = generate_thumbnail(&file, 400).await.unwrap_err();
        assert!(matches!(err, ThumbnailError::NotAnImage(m) if m == "application/pdf"));
    }
}
