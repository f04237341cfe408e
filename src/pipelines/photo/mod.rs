// SPDX-License-Identifier: MPL-2.0

//! Async photo capture pipeline
//!
//! ```text
//! CameraFrame → Post-Processing (render + filter) → JPEG Encoding
//!       ↓
//! Preview continues uninterrupted
//! ```
//!
//! The result is an encoded image paired with the filter that was baked in.

pub mod encoding;
pub mod processing;

pub use encoding::{EncodedImage, PhotoEncoder};
pub use processing::{PostProcessor, ProcessedImage};

use crate::backends::camera::types::CameraFrame;
use crate::constants::CAPTURE_JPEG_QUALITY;
use crate::filters::FilterType;
use std::sync::Arc;
use tracing::info;

/// Output of a single capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPhoto {
    pub image: EncodedImage,
    /// Filter baked into `image`
    pub filter: FilterType,
}

/// Capture → process → encode, for one filter
pub struct PhotoPipeline {
    post_processor: PostProcessor,
    encoder: PhotoEncoder,
}

impl PhotoPipeline {
    /// Pipeline for `filter` at the capture JPEG quality
    pub fn new(filter: FilterType) -> Self {
        Self {
            post_processor: PostProcessor::new(filter),
            encoder: PhotoEncoder::new(CAPTURE_JPEG_QUALITY),
        }
    }

    /// Process and encode a frame
    pub async fn capture(&self, frame: Arc<CameraFrame>) -> Result<CapturedPhoto, String> {
        let processed = self.post_processor.process(frame).await?;
        let image = self.encoder.encode(processed).await?;
        info!(
            width = image.width,
            height = image.height,
            bytes = image.len(),
            filter = %self.post_processor.filter(),
            "Photo captured"
        );
        Ok(CapturedPhoto {
            image,
            filter: self.post_processor.filter(),
        })
    }
}
