// SPDX-License-Identifier: GPL-3.0-only

//! Synthetic camera producing a test card
//!
//! Used by `--synthetic` on machines without a webcam and by the test suite.
//! Frames are generated on demand when the consumer polls, paced to the
//! configured frame interval.

use super::types::*;
use super::{CameraBackend, FrameStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

/// Test card patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestPattern {
    /// Eight vertical bars with a moving sweep line
    ColorBars,
    /// Horizontal gradient from dark to light
    Gradient,
    /// Single flat color
    Solid([u8; 3]),
}

/// Backend handing out synthetic streams
#[derive(Debug, Clone)]
pub struct SyntheticBackend {
    pattern: TestPattern,
    frame_interval: Duration,
    warmup_polls: u32,
    failure: Option<BackendError>,
    active: Arc<AtomicUsize>,
}

impl Default for SyntheticBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticBackend {
    /// Color bars at ~30fps, ready on the first poll
    pub fn new() -> Self {
        Self {
            pattern: TestPattern::ColorBars,
            frame_interval: Duration::from_millis(33),
            warmup_polls: 0,
            failure: None,
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: TestPattern) -> Self {
        self.pattern = pattern;
        self
    }

    #[must_use]
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Number of polls that return nothing before the first frame
    #[must_use]
    pub fn with_warmup(mut self, polls: u32) -> Self {
        self.warmup_polls = polls;
        self
    }

    /// Make every `open` fail, as a denied or missing camera would
    #[must_use]
    pub fn failing(mut self, error: BackendError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Counter of streams currently open on this backend
    pub fn active_streams(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.active)
    }
}

impl CameraBackend for SyntheticBackend {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        vec![CameraDevice {
            name: "Synthetic Test Card".to_string(),
            path: "synthetic:0".to_string(),
            driver: "synthetic".to_string(),
            index: 0,
        }]
    }

    fn open(&self, request: &CameraRequest) -> BackendResult<Box<dyn FrameStream>> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let (width, height) = cropped_size(request);
        self.active.fetch_add(1, Ordering::SeqCst);
        debug!(width, height, pattern = ?self.pattern, "Synthetic stream opened");

        Ok(Box::new(SyntheticStream {
            format: CameraFormat {
                width,
                height,
                framerate: (self.frame_interval.as_millis() > 0)
                    .then(|| (1000 / self.frame_interval.as_millis()) as u32),
            },
            pattern: self.pattern,
            frame_interval: self.frame_interval,
            warmup_polls: self.warmup_polls,
            last_frame_at: None,
            sequence: 0,
            active: Some(Arc::clone(&self.active)),
        }))
    }
}

/// Size the request resolves to once cropped to its aspect ratio
fn cropped_size(request: &CameraRequest) -> (u32, u32) {
    let width = request.ideal_width.max(1);
    let height = request.ideal_height.max(1);
    if request.aspect_ratio <= 0.0 {
        return (width, height);
    }
    let target_width = (height as f32 * request.aspect_ratio).round() as u32;
    if target_width <= width {
        (target_width.max(1), height)
    } else {
        (width, ((width as f32 / request.aspect_ratio).round() as u32).max(1))
    }
}

struct SyntheticStream {
    format: CameraFormat,
    pattern: TestPattern,
    frame_interval: Duration,
    warmup_polls: u32,
    last_frame_at: Option<Instant>,
    sequence: u64,
    /// Taken on stop so the counter is decremented exactly once
    active: Option<Arc<AtomicUsize>>,
}

impl FrameStream for SyntheticStream {
    fn format(&self) -> CameraFormat {
        self.format
    }

    fn try_next_frame(&mut self) -> Option<CameraFrame> {
        if self.active.is_none() {
            return None;
        }
        if self.warmup_polls > 0 {
            self.warmup_polls -= 1;
            return None;
        }

        let now = Instant::now();
        if let Some(last) = self.last_frame_at
            && now.duration_since(last) < self.frame_interval
        {
            return None;
        }
        self.last_frame_at = Some(now);

        let data = render_pattern(
            self.pattern,
            self.format.width,
            self.format.height,
            self.sequence,
        );
        let frame = CameraFrame {
            width: self.format.width,
            height: self.format.height,
            data: Arc::from(data),
            sequence: self.sequence,
            captured_at: now,
        };
        self.sequence += 1;
        Some(frame)
    }

    fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            active.fetch_sub(1, Ordering::SeqCst);
            debug!(frames = self.sequence, "Synthetic stream stopped");
        }
    }

    fn is_running(&self) -> bool {
        self.active.is_some()
    }
}

impl Drop for SyntheticStream {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Render one RGBA test card frame
pub fn render_pattern(pattern: TestPattern, width: u32, height: u32, sequence: u64) -> Vec<u8> {
    let mut data = vec![0u8; (width * height * 4) as usize];

    match pattern {
        TestPattern::ColorBars => {
            // White, Yellow, Cyan, Green, Magenta, Red, Blue, Black
            const BARS: [[u8; 3]; 8] = [
                [235, 235, 235],
                [235, 235, 16],
                [16, 235, 235],
                [16, 235, 16],
                [235, 16, 235],
                [235, 16, 16],
                [16, 16, 235],
                [16, 16, 16],
            ];
            let bar_width = (width / 8).max(1);
            let sweep_row = (sequence % height.max(1) as u64) as u32;

            for y in 0..height {
                for x in 0..width {
                    let rgb = if y == sweep_row {
                        [255, 255, 255]
                    } else {
                        BARS[(x / bar_width).min(7) as usize]
                    };
                    let offset = ((y * width + x) * 4) as usize;
                    data[offset..offset + 3].copy_from_slice(&rgb);
                    data[offset + 3] = 255;
                }
            }
        }
        TestPattern::Gradient => {
            for y in 0..height {
                for x in 0..width {
                    let v = ((x * 255) / width.max(1)) as u8;
                    let offset = ((y * width + x) * 4) as usize;
                    data[offset..offset + 4].copy_from_slice(&[v, v, v, 255]);
                }
            }
        }
        TestPattern::Solid(rgb) => {
            for pixel in data.chunks_exact_mut(4) {
                pixel[..3].copy_from_slice(&rgb);
                pixel[3] = 255;
            }
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_crop_size() {
        let mut request = CameraRequest::square(0, 1920, 1080);
        assert_eq!(cropped_size(&request), (1080, 1080));

        request.aspect_ratio = 2.0;
        request.ideal_width = 100;
        request.ideal_height = 100;
        assert_eq!(cropped_size(&request), (100, 50));
    }

    #[test]
    fn test_warmup_delays_first_frame() {
        let backend = SyntheticBackend::new().with_warmup(2);
        let mut stream = backend.open(&CameraRequest::square(0, 4, 4)).unwrap();
        assert!(stream.try_next_frame().is_none());
        assert!(stream.try_next_frame().is_none());
        assert!(stream.try_next_frame().is_some());
    }

    #[test]
    fn test_stopped_stream_yields_nothing() {
        let backend = SyntheticBackend::new().with_frame_interval(Duration::ZERO);
        let mut stream = backend.open(&CameraRequest::square(0, 4, 4)).unwrap();
        assert!(stream.try_next_frame().is_some());
        stream.stop();
        stream.stop();
        assert!(!stream.is_running());
        assert!(stream.try_next_frame().is_none());
        assert_eq!(backend.active_streams().load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failing_backend() {
        let backend =
            SyntheticBackend::new().failing(BackendError::NotAvailable("denied".into()));
        assert!(backend.open(&CameraRequest::square(0, 4, 4)).is_err());
        assert_eq!(backend.active_streams().load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_solid_pattern() {
        let data = render_pattern(TestPattern::Solid([1, 2, 3]), 2, 1, 0);
        assert_eq!(data, vec![1, 2, 3, 255, 1, 2, 3, 255]);
    }
}
