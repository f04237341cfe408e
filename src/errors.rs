// SPDX-License-Identifier: MPL-2.0

//! Error types for the photo booth

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Photo capture errors
    Photo(PhotoError),
    /// Strip export errors
    Export(ExportError),
    /// Native share errors
    Share(ShareError),
    /// Shutter sound playback errors
    Audio(String),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Camera-specific errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// No camera devices found
    NoCameraFound,
    /// Camera could not be opened or configured
    InitializationFailed(String),
    /// Camera disconnected during operation
    Disconnected,
}

/// Photo capture errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoError {
    /// No frame available for capture
    NoFrameAvailable,
    /// Filter or raster pass failed
    ProcessingFailed(String),
    /// Encoding failed
    EncodingFailed(String),
}

/// Strip export errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// Nothing to render
    EmptyStrip,
    /// A photo could not be decoded or placed on the strip
    CompositionFailed(String),
    /// JPEG encoding failed
    EncodingFailed(String),
    /// Writing the file failed
    SaveFailed(String),
}

/// Native share errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    /// Host has no share capability
    Unavailable,
    /// User dismissed the share sheet
    Cancelled,
    /// Share capability reported an error
    Failed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Photo(e) => write!(f, "Photo error: {}", e),
            AppError::Export(e) => write!(f, "Export error: {}", e),
            AppError::Share(e) => write!(f, "Share error: {}", e),
            AppError::Audio(msg) => write!(f, "Audio error: {}", msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoCameraFound => write!(f, "No camera devices found"),
            CameraError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            CameraError::Disconnected => write!(f, "Camera disconnected"),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::NoFrameAvailable => write!(f, "No frame available for capture"),
            PhotoError::ProcessingFailed(msg) => write!(f, "Processing failed: {}", msg),
            PhotoError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::EmptyStrip => write!(f, "Strip has no photos"),
            ExportError::CompositionFailed(msg) => write!(f, "Composition failed: {}", msg),
            ExportError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            ExportError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl fmt::Display for ShareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShareError::Unavailable => write!(f, "Sharing is not supported"),
            ShareError::Cancelled => write!(f, "Share cancelled"),
            ShareError::Failed(msg) => write!(f, "Share failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for PhotoError {}
impl std::error::Error for ExportError {}
impl std::error::Error for ShareError {}

// Conversions from sub-errors to AppError
impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<PhotoError> for AppError {
    fn from(err: PhotoError) -> Self {
        AppError::Photo(err)
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        AppError::Export(err)
    }
}

impl From<ShareError> for AppError {
    fn from(err: ShareError) -> Self {
        AppError::Share(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

// Conversions for I/O errors
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::SaveFailed(err.to_string())
    }
}

impl From<image::ImageError> for PhotoError {
    fn from(err: image::ImageError) -> Self {
        PhotoError::EncodingFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_display() {
        let err = AppError::from(CameraError::InitializationFailed("busy".into()));
        assert_eq!(err.to_string(), "Camera error: Initialization failed: busy");

        let err = AppError::from(ShareError::Cancelled);
        assert_eq!(err.to_string(), "Share error: Share cancelled");
    }

    #[test]
    fn test_io_error_becomes_save_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ExportError = io.into();
        assert!(matches!(err, ExportError::SaveFailed(msg) if msg.contains("denied")));
    }
}
