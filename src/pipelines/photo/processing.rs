// SPDX-License-Identifier: MPL-2.0

//! Async post-processing for captured frames
//!
//! Rendering happens in two passes so the filter always sees the full frame:
//!
//! 1. Render the frame unfiltered at its native resolution
//! 2. Apply the selected filter's effect chain on top (skipped for Normal)
//!
//! The alpha channel is dropped afterwards since JPEG has none.

use crate::backends::camera::types::CameraFrame;
use crate::filters::FilterType;
use image::{RgbImage, RgbaImage};
use std::sync::Arc;
use tracing::{debug, info};

/// Processed image data
pub struct ProcessedImage {
    pub image: RgbImage,
    pub width: u32,
    pub height: u32,
}

/// Post-processor for captured frames
#[derive(Debug, Clone, Copy, Default)]
pub struct PostProcessor {
    filter: FilterType,
}

impl PostProcessor {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> FilterType {
        self.filter
    }

    /// Process a captured frame asynchronously
    ///
    /// The pixel passes run on the blocking pool.
    pub async fn process(&self, frame: Arc<CameraFrame>) -> Result<ProcessedImage, String> {
        info!(
            width = frame.width,
            height = frame.height,
            filter = %self.filter,
            "Starting post-processing"
        );

        let filter = self.filter;
        tokio::task::spawn_blocking(move || Self::process_sync(&frame, filter))
            .await
            .map_err(|e| format!("Post-processing task error: {}", e))?
    }

    /// Blocking variant of [`process`](Self::process)
    pub fn process_sync(frame: &CameraFrame, filter: FilterType) -> Result<ProcessedImage, String> {
        // Pass 1: unfiltered render at native resolution
        let mut canvas = Self::render_frame(frame)?;

        // Pass 2: filter on top of the rendered canvas
        if !filter.is_identity() {
            filter.apply(&mut canvas);
            debug!(filter = %filter.css(), "Filter applied");
        }

        let (width, height) = canvas.dimensions();
        let image = image::DynamicImage::ImageRgba8(canvas).to_rgb8();
        debug!("Post-processing complete");

        Ok(ProcessedImage {
            image,
            width,
            height,
        })
    }

    fn render_frame(frame: &CameraFrame) -> Result<RgbaImage, String> {
        let expected_size = (frame.width as usize) * (frame.height as usize) * 4;
        if frame.width == 0 || frame.height == 0 {
            return Err("Frame has no pixels".to_string());
        }
        if frame.data.len() < expected_size {
            return Err(format!(
                "RGBA data too small: expected {}, got {}",
                expected_size,
                frame.data.len()
            ));
        }
        RgbaImage::from_raw(
            frame.width,
            frame.height,
            frame.data[..expected_size].to_vec(),
        )
        .ok_or_else(|| "Frame buffer does not match its dimensions".to_string())
    }
}
