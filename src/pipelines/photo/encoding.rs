// SPDX-License-Identifier: GPL-3.0-only

//! Async JPEG encoding
//!
//! Captured photos and exported strips are both JPEG; only the quality
//! differs. Encoding is CPU-bound and runs on the blocking pool.

use super::processing::ProcessedImage;
use image::{RgbImage, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Encoded image data, immutable once produced
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "EncodedImage({}x{}, {} bytes)",
            self.width,
            self.height,
            self.data.len()
        )
    }
}

impl EncodedImage {
    /// Decode back to pixels, e.g. for composing a strip or a thumbnail
    pub fn decode(&self) -> Result<RgbaImage, String> {
        image::load_from_memory_with_format(&self.data, image::ImageFormat::Jpeg)
            .map(|img| img.to_rgba8())
            .map_err(|e| format!("JPEG decoding failed: {}", e))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// JPEG encoder with a fixed quality
#[derive(Debug, Clone, Copy)]
pub struct PhotoEncoder {
    quality: u8,
}

impl PhotoEncoder {
    /// Create an encoder; quality is clamped to 1-100
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode a processed image asynchronously
    pub async fn encode(&self, processed: ProcessedImage) -> Result<EncodedImage, String> {
        info!(
            width = processed.width,
            height = processed.height,
            quality = self.quality,
            "Starting encoding"
        );

        let quality = self.quality;
        tokio::task::spawn_blocking(move || {
            let data = encode_jpeg(&processed.image, quality)?;
            debug!(size = data.len(), "Encoding complete");
            Ok(EncodedImage {
                data,
                width: processed.width,
                height: processed.height,
            })
        })
        .await
        .map_err(|e| format!("Encoding task error: {}", e))?
    }

    /// Save encoded image data under `output_dir/file_name`
    ///
    /// The directory is created if missing. An existing file with the same
    /// name is replaced.
    pub async fn save(
        encoded: &EncodedImage,
        output_dir: &Path,
        file_name: &str,
    ) -> Result<PathBuf, String> {
        let filepath = output_dir.join(file_name);
        info!(path = %filepath.display(), "Saving image");

        let data = encoded.data.clone();
        let dir = output_dir.to_path_buf();
        let target = filepath.clone();
        tokio::task::spawn_blocking(move || {
            std::fs::create_dir_all(&dir)
                .map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;
            std::fs::write(&target, &data).map_err(|e| format!("Failed to save image: {}", e))
        })
        .await
        .map_err(|e| format!("Save task error: {}", e))??;

        info!(path = %filepath.display(), "Image saved successfully");
        Ok(filepath)
    }
}

/// Encode an RGB image as JPEG
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, String> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);

    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality);
    encoder
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| format!("JPEG encoding failed: {}", e))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn processed(width: u32, height: u32) -> ProcessedImage {
        ProcessedImage {
            image: RgbImage::from_pixel(width, height, Rgb([200, 100, 50])),
            width,
            height,
        }
    }

    #[test]
    fn test_quality_is_clamped() {
        assert_eq!(PhotoEncoder::new(0).quality(), 1);
        assert_eq!(PhotoEncoder::new(250).quality(), 100);
    }

    #[tokio::test]
    async fn test_encode_produces_jpeg() {
        let encoded = PhotoEncoder::new(85).encode(processed(16, 8)).await.unwrap();
        assert_eq!(&encoded.data[..2], &[0xFF, 0xD8]);
        assert_eq!((encoded.width, encoded.height), (16, 8));

        let decoded = encoded.decode().unwrap();
        assert_eq!(decoded.dimensions(), (16, 8));
    }

    #[tokio::test]
    async fn test_save_creates_directory() {
        let dir = std::env::temp_dir().join(format!("photobooth-encoding-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let encoded = PhotoEncoder::new(80).encode(processed(4, 4)).await.unwrap();
        let path = PhotoEncoder::save(&encoded, &dir.join("out"), "test.jpg")
            .await
            .unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), encoded.data);
    }
}
