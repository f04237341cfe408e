// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Number of photos that make up a complete strip
pub const TARGET_PHOTO_COUNT: usize = 3;

/// Minimum interval between two accepted capture triggers
pub const CAPTURE_DEBOUNCE: Duration = Duration::from_millis(1000);

/// How long the white flash overlay stays up after a capture
pub const FLASH_DURATION: Duration = Duration::from_millis(150);

/// Minimum time the "Processing..." indicator is shown
pub const PROCESSING_MIN_DURATION: Duration = Duration::from_millis(300);

/// Interval between countdown ticks
pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// Countdown length used by the timer toggle
pub const DEFAULT_TIMER_SECONDS: u32 = 3;

/// Duration of the swipe-out animation before a photo is removed
pub const SWIPE_OUT_DURATION: Duration = Duration::from_millis(250);

/// JPEG quality for captured photos (0-100)
pub const CAPTURE_JPEG_QUALITY: u8 = 85;

/// JPEG quality for exported strips (0-100)
pub const EXPORT_JPEG_QUALITY: u8 = 80;

/// File name of exported strips
pub const EXPORT_FILE_NAME: &str = "photo-strip.jpg";

/// MIME type of exported strips
pub const EXPORT_MIME_TYPE: &str = "image/jpeg";

/// Title handed to the share target
pub const SHARE_TITLE: &str = "Photo Strip";

/// Caption handed to the share target
pub const SHARE_TEXT: &str = "Check out my photo strip!";

/// Ideal capture resolution requested from the camera
pub const IDEAL_CAPTURE_SIZE: (u32, u32) = (1080, 1080);

/// Film strip geometry, in layout pixels (before export scaling)
pub mod strip {
    /// Height of a single photo frame
    pub const FRAME_HEIGHT: u32 = 180;
    /// Width of a single photo frame
    pub const FRAME_WIDTH: u32 = 220;
    /// Vertical gap between frames
    pub const FRAME_GAP: u32 = 20;
    /// Width of the perforated border on each side
    pub const BORDER_WIDTH: u32 = 40;
    /// Padding above the first and below the last frame
    pub const VERTICAL_PADDING: u32 = 30;
    /// Perforation holes per side
    pub const PERFORATIONS: u32 = 8;
    /// Exposure marks along the right edge
    pub const EXPOSURE_MARKS: u32 = 8;
    /// Drag distance that swaps a frame with its neighbour
    pub const SWAP_THRESHOLD: f32 = FRAME_HEIGHT as f32 / 2.0;
    /// Pixel density multiplier applied when rasterizing for export
    pub const EXPORT_SCALE: u32 = 2;
}

/// Haptic feedback patterns in milliseconds (on, off, on, ...)
pub mod haptics {
    /// Filter change, toggle, countdown tick
    pub const TAP: &[u32] = &[50];
    /// Shutter
    pub const CAPTURE: &[u32] = &[100];
    /// Saved or shared strip
    pub const CONFIRM: &[u32] = &[100, 50, 100];
}
