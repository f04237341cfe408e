// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! ```text
//! ┌─────────────────────┐
//! │   AppModel          │
//! └──────────┬──────────┘
//!            │ owns while the capture view is active
//!            ▼
//! ┌─────────────────────┐
//! │     CameraFeed      │  ← Scoped guard, stops the stream on drop
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  FrameStream Trait  │  ← Opened by a CameraBackend
//! └──────────┬──────────┘
//!            │
//!       ┌────┴──────┐
//!       ▼           ▼
//!    ┌────┐   ┌─────────┐
//!    │V4L2│   │Synthetic│
//!    └────┘   └─────────┘
//! ```

pub mod synthetic;
pub mod types;
pub mod v4l2;

pub use types::*;

use crate::errors::CameraError;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Sender half used by capture threads
pub type FrameSender = futures::channel::mpsc::Sender<CameraFrame>;

/// Receiver half drained by [`FrameStream::try_next_frame`]
pub type FrameReceiver = futures::channel::mpsc::Receiver<CameraFrame>;

/// Frames buffered between a capture thread and the UI before dropping
pub const FRAME_CHANNEL_CAPACITY: usize = 4;

/// Camera backend
///
/// A backend knows how to enumerate devices and open a stream for a request.
/// Streams are owned by the caller; the backend itself holds no device.
pub trait CameraBackend: Send {
    /// Short name for logs and the CLI
    fn name(&self) -> &'static str;

    /// Enumerate available cameras
    fn enumerate_cameras(&self) -> Vec<CameraDevice>;

    /// Open a stream matching `request` as closely as the device allows
    fn open(&self, request: &CameraRequest) -> BackendResult<Box<dyn FrameStream>>;
}

/// A running camera stream
pub trait FrameStream: Send {
    /// Negotiated output format
    fn format(&self) -> CameraFormat;

    /// Next queued frame, without blocking
    fn try_next_frame(&mut self) -> Option<CameraFrame>;

    /// Stop streaming and release the device; idempotent
    fn stop(&mut self);

    /// Whether the stream is still delivering frames
    fn is_running(&self) -> bool;
}

/// Scoped ownership of an open camera stream
///
/// The stream is stopped when the feed is dropped, so every exit path of the
/// capture view releases the device.
pub struct CameraFeed {
    stream: Box<dyn FrameStream>,
    latest: Option<Arc<CameraFrame>>,
    frames_seen: u64,
}

impl CameraFeed {
    /// Open a stream on `backend`
    pub fn open(backend: &dyn CameraBackend, request: &CameraRequest) -> Result<Self, CameraError> {
        let stream = backend.open(request).map_err(|e| {
            warn!(backend = backend.name(), error = %e, "Failed to open camera");
            CameraError::from(e)
        })?;
        info!(
            backend = backend.name(),
            format = %stream.format(),
            "Camera stream opened"
        );
        Ok(Self {
            stream,
            latest: None,
            frames_seen: 0,
        })
    }

    pub fn format(&self) -> CameraFormat {
        self.stream.format()
    }

    /// Drain queued frames, keeping only the newest
    ///
    /// Returns `true` when at least one new frame arrived.
    pub fn poll(&mut self) -> bool {
        let mut newest = None;
        while let Some(frame) = self.stream.try_next_frame() {
            newest = Some(frame);
        }
        match newest {
            Some(frame) => {
                if self.frames_seen == 0 {
                    debug!(width = frame.width, height = frame.height, "First camera frame");
                }
                self.frames_seen += 1;
                self.latest = Some(Arc::new(frame));
                true
            }
            None => false,
        }
    }

    /// Most recent frame, if any arrived yet
    pub fn latest_frame(&self) -> Option<&Arc<CameraFrame>> {
        self.latest.as_ref()
    }

    /// Ready once the first frame has arrived
    pub fn is_ready(&self) -> bool {
        self.latest.is_some()
    }

    /// Whether the underlying stream is still alive
    pub fn is_streaming(&self) -> bool {
        self.stream.is_running()
    }
}

impl Drop for CameraFeed {
    fn drop(&mut self) {
        debug!(frames = self.frames_seen, "Releasing camera feed");
        self.stream.stop();
    }
}

impl std::fmt::Debug for CameraFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraFeed")
            .field("format", &self.stream.format())
            .field("ready", &self.is_ready())
            .field("frames_seen", &self.frames_seen)
            .finish()
    }
}

/// Pick the backend for this run
pub fn get_backend(synthetic: bool) -> Box<dyn CameraBackend> {
    if synthetic {
        Box::new(synthetic::SyntheticBackend::new())
    } else {
        Box::new(v4l2::V4l2Backend::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_ready_after_first_frame() {
        let backend = synthetic::SyntheticBackend::new();
        let mut feed = CameraFeed::open(&backend, &CameraRequest::square(0, 16, 16)).unwrap();
        assert!(!feed.is_ready());
        assert!(feed.poll());
        assert!(feed.is_ready());
        let frame = feed.latest_frame().unwrap();
        assert_eq!((frame.width, frame.height), (16, 16));
    }

    #[test]
    fn test_drop_stops_stream() {
        let backend = synthetic::SyntheticBackend::new();
        let handle = backend.active_streams();
        {
            let _feed = CameraFeed::open(&backend, &CameraRequest::square(0, 8, 8)).unwrap();
            assert_eq!(handle.load(std::sync::atomic::Ordering::SeqCst), 1);
        }
        assert_eq!(handle.load(std::sync::atomic::Ordering::SeqCst), 0);
    }
}
