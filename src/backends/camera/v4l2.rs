// SPDX-License-Identifier: GPL-3.0-only

//! Direct V4L2 webcam capture
//!
//! Frames are read on a dedicated thread through a memory-mapped stream,
//! converted to RGBA, center-cropped to the requested aspect ratio and sent
//! to the UI over a bounded channel. When the channel is full the frame is
//! dropped; the UI only ever shows the newest frame anyway.

use super::types::*;
use super::{CameraBackend, FRAME_CHANNEL_CAPACITY, FrameReceiver, FrameSender, FrameStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use v4l::buffer::Type;
use v4l::capability::Flags;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::{Format, FourCC};

/// Pixel formats we know how to convert, in order of preference
const PREFERRED_FOURCCS: [&[u8; 4]; 3] = [b"YUYV", b"MJPG", b"RGB3"];

/// Source pixel layout delivered by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Packed YUV 4:2:2, Y0 U Y1 V
    Yuyv,
    /// Motion JPEG, one JPEG per frame
    Mjpeg,
    /// Packed 24-bit RGB
    Rgb24,
}

impl SourceFormat {
    fn from_fourcc(fourcc: FourCC) -> Option<Self> {
        match &fourcc.repr {
            b"YUYV" => Some(SourceFormat::Yuyv),
            b"MJPG" => Some(SourceFormat::Mjpeg),
            b"RGB3" => Some(SourceFormat::Rgb24),
            _ => None,
        }
    }
}

/// V4L2 camera backend
#[derive(Debug, Default)]
pub struct V4l2Backend;

impl V4l2Backend {
    pub fn new() -> Self {
        Self
    }
}

impl CameraBackend for V4l2Backend {
    fn name(&self) -> &'static str {
        "v4l2"
    }

    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        let mut cameras = Vec::new();
        for node in v4l::context::enum_devices() {
            let index = node.index();
            let device = match Device::new(index) {
                Ok(device) => device,
                Err(e) => {
                    debug!(index, error = %e, "Skipping V4L2 node");
                    continue;
                }
            };
            let caps = match device.query_caps() {
                Ok(caps) => caps,
                Err(e) => {
                    debug!(index, error = %e, "Failed to query capabilities");
                    continue;
                }
            };
            // Metadata nodes share the card name but cannot capture video
            if !caps.capabilities.contains(Flags::VIDEO_CAPTURE) {
                continue;
            }
            cameras.push(CameraDevice {
                name: node.name().unwrap_or_else(|| caps.card.clone()),
                path: node.path().display().to_string(),
                driver: caps.driver,
                index,
            });
        }
        cameras.sort_by_key(|camera| camera.index);
        cameras
    }

    fn open(&self, request: &CameraRequest) -> BackendResult<Box<dyn FrameStream>> {
        let path = format!("/dev/video{}", request.device_index);

        let device = Device::new(request.device_index)
            .map_err(|e| BackendError::DeviceNotFound(format!("{}: {}", path, e)))?;
        let (format, source) = negotiate_format(&device, request)?;

        let (out_width, out_height) = crop_size(format.width, format.height, request.aspect_ratio);
        info!(
            device_path = %path,
            width = format.width,
            height = format.height,
            fourcc = %format.fourcc,
            out_width,
            out_height,
            "Negotiated V4L2 format"
        );

        let (sender, receiver) = futures::channel::mpsc::channel(FRAME_CHANNEL_CAPACITY);
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        let aspect_ratio = request.aspect_ratio;
        let width = format.width;
        let height = format.height;

        let thread_handle = std::thread::Builder::new()
            .name("v4l2-capture".into())
            .spawn(move || {
                if let Err(e) = capture_loop(
                    device,
                    CaptureGeometry {
                        width,
                        height,
                        source,
                        aspect_ratio,
                    },
                    sender,
                    running_clone.clone(),
                ) {
                    error!(error = %e, "Capture loop failed");
                }
                running_clone.store(false, Ordering::SeqCst);
            })?;

        Ok(Box::new(V4l2Stream {
            format: CameraFormat {
                width: out_width,
                height: out_height,
                framerate: None,
            },
            receiver,
            running,
            thread_handle: Some(thread_handle),
        }))
    }
}

/// Try the preferred formats at the ideal size until the driver accepts one
fn negotiate_format(
    device: &Device,
    request: &CameraRequest,
) -> BackendResult<(Format, SourceFormat)> {
    for fourcc in PREFERRED_FOURCCS {
        let wanted = Format::new(request.ideal_width, request.ideal_height, FourCC::new(fourcc));
        match device.set_format(&wanted) {
            Ok(actual) => {
                if let Some(source) = SourceFormat::from_fourcc(actual.fourcc) {
                    return Ok((actual, source));
                }
                debug!(wanted = %wanted.fourcc, got = %actual.fourcc, "Driver substituted format");
            }
            Err(e) => {
                debug!(fourcc = %wanted.fourcc, error = %e, "Format rejected");
            }
        }
    }

    // Some drivers refuse S_FMT while keeping a usable current format
    let current = device
        .format()
        .map_err(|e| BackendError::InitializationFailed(format!("query format: {}", e)))?;
    SourceFormat::from_fourcc(current.fourcc)
        .map(|source| (current.clone(), source))
        .ok_or_else(|| BackendError::FormatNotSupported(current.fourcc.to_string()))
}

struct CaptureGeometry {
    width: u32,
    height: u32,
    source: SourceFormat,
    aspect_ratio: f32,
}

/// Main capture loop running in a separate thread
fn capture_loop(
    mut device: Device,
    geometry: CaptureGeometry,
    mut frame_sender: FrameSender,
    running: Arc<AtomicBool>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    static FRAME_COUNTER: AtomicU64 = AtomicU64::new(0);

    let mut stream = MmapStream::with_buffers(&mut device, Type::VideoCapture, 4)
        .map_err(|e| format!("Failed to create buffer stream: {}", e))?;
    info!("V4L2 capture stream started");

    let mut consecutive_errors = 0u32;
    while running.load(Ordering::SeqCst) {
        let frame_start = Instant::now();

        let (buf, meta) = match stream.next() {
            Ok(next) => {
                consecutive_errors = 0;
                next
            }
            Err(e) => {
                consecutive_errors += 1;
                warn!(error = %e, consecutive_errors, "Failed to capture frame");
                if consecutive_errors >= 30 {
                    return Err(format!("Camera stopped responding: {}", e).into());
                }
                std::thread::sleep(std::time::Duration::from_millis(10));
                continue;
            }
        };
        let frame_num = FRAME_COUNTER.fetch_add(1, Ordering::Relaxed);
        let used = (meta.bytesused as usize).min(buf.len());
        let payload = if used > 0 { &buf[..used] } else { buf };

        let rgba = match to_rgba(payload, geometry.width, geometry.height, geometry.source) {
            Some(rgba) => rgba,
            None => {
                if frame_num % 30 == 0 {
                    warn!(frame = frame_num, size = payload.len(), "Undecodable frame");
                }
                continue;
            }
        };
        let (data, width, height) =
            crop_center(&rgba, geometry.width, geometry.height, geometry.aspect_ratio);

        let frame = CameraFrame {
            width,
            height,
            data: Arc::from(data),
            sequence: u64::from(meta.sequence),
            captured_at: frame_start,
        };

        // Send frame (non-blocking)
        match frame_sender.try_send(frame) {
            Ok(_) => {
                if frame_num % 60 == 0 {
                    debug!(
                        frame = frame_num,
                        sequence = meta.sequence,
                        elapsed_us = frame_start.elapsed().as_micros(),
                        "Frame captured"
                    );
                }
            }
            Err(e) if e.is_disconnected() => {
                debug!("Frame receiver dropped, ending capture");
                break;
            }
            Err(_) => {
                if frame_num % 30 == 0 {
                    debug!(frame = frame_num, "Frame dropped (channel full)");
                }
            }
        }
    }

    info!("V4L2 capture loop ended");
    Ok(())
}

/// Convert one driver buffer to tightly packed RGBA
pub fn to_rgba(data: &[u8], width: u32, height: u32, source: SourceFormat) -> Option<Vec<u8>> {
    let pixel_count = (width * height) as usize;
    match source {
        SourceFormat::Yuyv => {
            if data.len() < pixel_count * 2 {
                return None;
            }
            Some(yuyv_to_rgba(&data[..pixel_count * 2]))
        }
        SourceFormat::Rgb24 => {
            if data.len() < pixel_count * 3 {
                return None;
            }
            let mut rgba = Vec::with_capacity(pixel_count * 4);
            for px in data[..pixel_count * 3].chunks_exact(3) {
                rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
            Some(rgba)
        }
        SourceFormat::Mjpeg => {
            let decoded =
                image::load_from_memory_with_format(data, image::ImageFormat::Jpeg).ok()?;
            let rgba = decoded.to_rgba8();
            if rgba.width() != width || rgba.height() != height {
                return None;
            }
            Some(rgba.into_raw())
        }
    }
}

/// Convert YUYV (YUV 4:2:2) to RGBA
///
/// YUYV format: Y0 U0 Y1 V0, each 4-byte group encodes 2 pixels.
/// Uses BT.601 coefficients.
pub fn yuyv_to_rgba(data: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(data.len() * 2);

    for chunk in data.chunks_exact(4) {
        let y0 = chunk[0] as f32;
        let u = chunk[1] as f32 - 128.0;
        let y1 = chunk[2] as f32;
        let v = chunk[3] as f32 - 128.0;

        for y in [y0, y1] {
            let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
            let g = (y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8;
            let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;
            rgba.extend_from_slice(&[r, g, b, 255]);
        }
    }

    rgba
}

/// Largest centered region of `width`x`height` with the given aspect ratio
pub fn crop_size(width: u32, height: u32, aspect_ratio: f32) -> (u32, u32) {
    if aspect_ratio <= 0.0 || width == 0 || height == 0 {
        return (width, height);
    }
    let target_width = (height as f32 * aspect_ratio).round() as u32;
    if target_width <= width {
        (target_width.max(1), height)
    } else {
        (width, ((width as f32 / aspect_ratio).round() as u32).clamp(1, height))
    }
}

/// Center-crop an RGBA buffer to the given aspect ratio
pub fn crop_center(rgba: &[u8], width: u32, height: u32, aspect_ratio: f32) -> (Vec<u8>, u32, u32) {
    let (out_w, out_h) = crop_size(width, height, aspect_ratio);
    if (out_w, out_h) == (width, height) {
        return (rgba.to_vec(), width, height);
    }

    let x0 = ((width - out_w) / 2) as usize;
    let y0 = ((height - out_h) / 2) as usize;
    let src_stride = width as usize * 4;
    let row_bytes = out_w as usize * 4;

    let mut out = Vec::with_capacity(row_bytes * out_h as usize);
    for row in y0..y0 + out_h as usize {
        let start = row * src_stride + x0 * 4;
        out.extend_from_slice(&rgba[start..start + row_bytes]);
    }
    (out, out_w, out_h)
}

/// Stream handle owning the capture thread
struct V4l2Stream {
    format: CameraFormat,
    receiver: FrameReceiver,
    running: Arc<AtomicBool>,
    thread_handle: Option<std::thread::JoinHandle<()>>,
}

impl FrameStream for V4l2Stream {
    fn format(&self) -> CameraFormat {
        self.format
    }

    fn try_next_frame(&mut self) -> Option<CameraFrame> {
        // Non-blocking receive
        self.receiver.try_recv().ok()
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.receiver.close();

        if let Some(handle) = self.thread_handle.take() {
            info!("Stopping V4L2 capture");
            match handle.join() {
                Ok(_) => debug!("Capture thread stopped"),
                Err(_) => warn!("Capture thread panicked"),
            }
        }
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for V4l2Stream {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yuyv_gray() {
        // Y=128 with neutral chroma is mid gray
        let rgba = yuyv_to_rgba(&[128, 128, 128, 128]);
        assert_eq!(rgba, vec![128, 128, 128, 255, 128, 128, 128, 255]);
    }

    #[test]
    fn test_crop_size_square() {
        assert_eq!(crop_size(1920, 1080, 1.0), (1080, 1080));
        assert_eq!(crop_size(480, 640, 1.0), (480, 480));
        assert_eq!(crop_size(640, 480, 0.0), (640, 480));
    }

    #[test]
    fn test_crop_center_takes_middle_columns() {
        // 4x2 image, columns tagged by their x coordinate
        let mut rgba = Vec::new();
        for _y in 0..2 {
            for x in 0..4u8 {
                rgba.extend_from_slice(&[x, x, x, 255]);
            }
        }
        let (out, w, h) = crop_center(&rgba, 4, 2, 1.0);
        assert_eq!((w, h), (2, 2));
        assert_eq!(out[0], 1);
        assert_eq!(out[4], 2);
    }

    #[test]
    fn test_short_buffers_are_rejected() {
        assert!(to_rgba(&[0; 10], 4, 4, SourceFormat::Yuyv).is_none());
        assert!(to_rgba(&[0; 47], 4, 4, SourceFormat::Rgb24).is_none());
        assert!(to_rgba(&[0; 16], 4, 4, SourceFormat::Mjpeg).is_none());
    }
}
