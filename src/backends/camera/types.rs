// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for camera backends

use crate::errors::CameraError;
use std::sync::Arc;
use std::time::Instant;

/// Constraints handed to a backend when opening a stream
///
/// Sizes are ideals, not requirements: backends pick the closest mode the
/// device offers and crop to the requested aspect ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRequest {
    /// Width / height; 1.0 for a square booth frame
    pub aspect_ratio: f32,
    pub ideal_width: u32,
    pub ideal_height: u32,
    /// Device index (`/dev/videoN`)
    pub device_index: usize,
}

impl CameraRequest {
    /// Square, front-facing request at the given ideal size
    pub fn square(device_index: usize, ideal_width: u32, ideal_height: u32) -> Self {
        Self {
            aspect_ratio: 1.0,
            ideal_width,
            ideal_height,
            device_index,
        }
    }
}

/// A camera the backend can open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    /// Human-readable name (V4L2 card)
    pub name: String,
    /// Device path, e.g. `/dev/video0`
    pub path: String,
    /// Kernel driver name
    pub driver: String,
    /// Index usable in [`CameraRequest::device_index`]
    pub index: usize,
}

/// Negotiated stream format, after cropping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraFormat {
    pub width: u32,
    pub height: u32,
    /// Frames per second, when known
    pub framerate: Option<u32>,
}

impl std::fmt::Display for CameraFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.framerate {
            Some(fps) => write!(f, "{}x{} @ {}fps", self.width, self.height, fps),
            None => write!(f, "{}x{}", self.width, self.height),
        }
    }
}

/// A single decoded camera frame (tightly packed RGBA)
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    pub data: Arc<[u8]>,
    /// Monotonic frame counter of the stream
    pub sequence: u64,
    /// When the frame was captured (for latency diagnostics)
    pub captured_at: Instant,
}

/// Camera backend errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Backend is not available on this system
    NotAvailable(String),
    /// Camera device not found
    DeviceNotFound(String),
    /// Failed to open or configure the device
    InitializationFailed(String),
    /// Format not supported
    FormatNotSupported(String),
    /// General I/O error
    IoError(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::FormatNotSupported(msg) => write!(f, "Format not supported: {}", msg),
            BackendError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::IoError(err.to_string())
    }
}

impl From<BackendError> for CameraError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::DeviceNotFound(_) => CameraError::NoCameraFound,
            other => CameraError::InitializationFailed(other.to_string()),
        }
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_maps_to_camera_error() {
        let err: CameraError = BackendError::DeviceNotFound("/dev/video9".into()).into();
        assert_eq!(err, CameraError::NoCameraFound);

        let err: CameraError = BackendError::IoError("busy".into()).into();
        assert!(matches!(err, CameraError::InitializationFailed(msg) if msg.contains("busy")));
    }
}
