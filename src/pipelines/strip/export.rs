// SPDX-License-Identifier: GPL-3.0-only

//! Strip export and share
//!
//! Both paths render the same raster: decode every photo, compose the strip,
//! encode it as JPEG. Export writes the file into the export directory; share
//! hands it to the host share target and falls back to export when sharing
//! is unavailable, cancelled, or fails.

use super::compose::compose_strip;
use crate::backends::share::{SharePayload, ShareTarget};
use crate::constants::strip::EXPORT_SCALE;
use crate::constants::{
    EXPORT_FILE_NAME, EXPORT_JPEG_QUALITY, EXPORT_MIME_TYPE, SHARE_TEXT, SHARE_TITLE,
};
use crate::errors::{ExportError, ShareError};
use crate::pipelines::photo::encoding::{EncodedImage, PhotoEncoder, encode_jpeg};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How a share request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The share target accepted the strip
    Shared,
    /// Sharing did not happen; the strip was exported instead
    Exported { path: PathBuf, reason: ShareError },
}

/// Renders strips and delivers them to disk or the share target
#[derive(Clone)]
pub struct StripExporter {
    export_dir: PathBuf,
    share_target: Arc<dyn ShareTarget>,
}

impl std::fmt::Debug for StripExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripExporter")
            .field("export_dir", &self.export_dir)
            .field("share_available", &self.share_target.is_available())
            .finish()
    }
}

impl StripExporter {
    pub fn new(export_dir: PathBuf, share_target: Arc<dyn ShareTarget>) -> Self {
        Self {
            export_dir,
            share_target,
        }
    }

    /// Render the strip and save it as `photo-strip.jpg`
    pub async fn export(&self, photos: Vec<Arc<EncodedImage>>) -> Result<PathBuf, ExportError> {
        let strip = render_strip(photos).await?;
        self.save(&strip).await
    }

    /// Render the strip and share it, exporting instead when sharing fails
    pub async fn share(&self, photos: Vec<Arc<EncodedImage>>) -> Result<ShareOutcome, ExportError> {
        let strip = render_strip(photos).await?;

        let result = if self.share_target.is_available() {
            let payload = SharePayload {
                file_name: EXPORT_FILE_NAME.to_string(),
                mime_type: EXPORT_MIME_TYPE.to_string(),
                data: Arc::new(strip.data.clone()),
                title: SHARE_TITLE.to_string(),
                text: SHARE_TEXT.to_string(),
            };
            self.share_target.share(payload).await
        } else {
            Err(ShareError::Unavailable)
        };

        match result {
            Ok(()) => {
                info!("Strip shared");
                Ok(ShareOutcome::Shared)
            }
            Err(reason) => {
                warn!(error = %reason, "Sharing failed, exporting instead");
                let path = self.save(&strip).await?;
                Ok(ShareOutcome::Exported { path, reason })
            }
        }
    }

    async fn save(&self, strip: &EncodedImage) -> Result<PathBuf, ExportError> {
        PhotoEncoder::save(strip, &self.export_dir, EXPORT_FILE_NAME)
            .await
            .map_err(ExportError::SaveFailed)
    }
}

/// Decode, compose and encode the strip on the blocking pool
pub async fn render_strip(photos: Vec<Arc<EncodedImage>>) -> Result<EncodedImage, ExportError> {
    if photos.is_empty() {
        debug!("Nothing to render");
        return Err(ExportError::EmptyStrip);
    }

    tokio::task::spawn_blocking(move || {
        let decoded = photos
            .iter()
            .enumerate()
            .map(|(index, photo)| {
                photo.decode().map_err(|e| {
                    ExportError::CompositionFailed(format!("photo {}: {}", index + 1, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let canvas = compose_strip(&decoded, EXPORT_SCALE)?;
        let (width, height) = canvas.dimensions();
        let rgb = image::DynamicImage::ImageRgba8(canvas).to_rgb8();
        let data = encode_jpeg(&rgb, EXPORT_JPEG_QUALITY).map_err(ExportError::EncodingFailed)?;

        info!(photos = decoded.len(), width, height, bytes = data.len(), "Strip rendered");
        Ok(EncodedImage {
            data,
            width,
            height,
        })
    })
    .await
    .map_err(|e| ExportError::CompositionFailed(format!("Render task error: {}", e)))?
}
