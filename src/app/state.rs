// SPDX-License-Identifier: GPL-3.0-only

//! Application state and message types

use super::film_strip::FilmStrip;
use super::session::{PhotoId, Session, View};
use crate::backends::audio::{ShutterSound, TerminalBell};
use crate::backends::camera::{
    CameraBackend, CameraFeed, CameraFrame, CameraRequest, get_backend,
};
use crate::backends::feedback::{Haptics, NoHaptics};
use crate::backends::share::{DesktopOpenShare, ShareTarget};
use crate::config::Config;
use crate::constants::TARGET_PHOTO_COUNT;
use crate::errors::{CameraError, ExportError};
use crate::filters::{FilterPicker, FilterType, SwipeDirection};
use crate::pipelines::photo::CapturedPhoto;
use crate::pipelines::strip::{ShareOutcome, StripExporter};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Capture pipeline stage
///
/// `Idle → Counting → Idle` for the countdown and `Idle → Processing → Idle`
/// for a capture. The flash is tracked separately since it overlaps
/// processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureStage {
    #[default]
    Idle,
    /// Countdown running; remaining seconds live in the session
    Counting {
        /// Ticks carrying another generation are stale
        generation: u64,
    },
    /// Processing indicator shown
    Processing {
        /// Minimum display time has passed
        min_elapsed: bool,
        /// Pipeline result has been handled
        result_ready: bool,
    },
}

impl CaptureStage {
    pub fn is_counting(&self) -> bool {
        matches!(self, CaptureStage::Counting { .. })
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, CaptureStage::Processing { .. })
    }
}

/// Camera feed status
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CameraStatus {
    /// No feed held (review view)
    #[default]
    Stopped,
    /// Stream opened, waiting for the first frame
    Starting,
    /// Frames are arriving; capture is possible
    Ready,
    /// Opening or streaming failed
    Unavailable(String),
}

impl CameraStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, CameraStatus::Ready)
    }
}

/// Host capabilities the model talks to
pub struct Backends {
    pub camera: Box<dyn CameraBackend>,
    pub haptics: Arc<dyn Haptics>,
    pub shutter: Arc<dyn ShutterSound>,
    pub share: Arc<dyn ShareTarget>,
}

impl Backends {
    /// Desktop defaults: V4L2 (or the test card), terminal bell, desktop opener
    pub fn desktop(synthetic_camera: bool) -> Self {
        Self {
            camera: get_backend(synthetic_camera),
            haptics: Arc::new(NoHaptics),
            shutter: Arc::new(TerminalBell),
            share: Arc::new(DesktopOpenShare::new()),
        }
    }
}

/// The application model
pub struct AppModel {
    pub config: Config,
    pub session: Session,
    pub filter_picker: FilterPicker,
    /// Swipe hint stays up until the first filter change
    pub swipe_hint_visible: bool,
    pub capture_stage: CaptureStage,
    /// White flash overlay after a capture
    pub flash_active: bool,
    pub camera_status: CameraStatus,
    /// Latest preview frame
    pub current_frame: Option<Arc<CameraFrame>>,
    pub film_strip: FilmStrip,
    /// Advisory guard: reorder/delete gestures are ignored while set
    pub export_in_progress: bool,
    pub status_message: Option<String>,
    pub last_export: Option<PathBuf>,
    /// Accepted capture trigger, for the debounce window
    pub(crate) last_capture_at: Option<tokio::time::Instant>,
    pub(crate) countdown_generation: u64,
    pub(crate) camera: Option<CameraFeed>,
    pub(crate) backends: Backends,
    pub(crate) exporter: StripExporter,
}

/// Messages handled by [`AppModel::update`]
#[derive(Debug, Clone)]
pub enum Message {
    // ===== Capture =====
    /// Swipe on the preview
    SwipeFilter(SwipeDirection),
    /// Start a countdown of the given seconds (0 disables the timer)
    SetTimer(u32),
    /// Timer button
    ToggleTimer,
    /// Flash button
    ToggleFlash,
    /// Shutter button
    Capture,
    /// One second of the countdown elapsed
    CountdownTick { generation: u64 },
    /// Photo pipeline finished
    PhotoProcessed(Result<CapturedPhoto, String>),
    /// Flash overlay timeout
    ClearFlash,
    /// Processing indicator minimum time elapsed
    ProcessingElapsed,

    // ===== Navigation =====
    Navigate(View),

    // ===== Film strip =====
    DragStart { index: usize, y: f32 },
    DragMove { y: f32 },
    DragEnd,
    /// Left swipe on a photo
    SwipeDelete { index: usize },
    /// Swipe-out animation of a photo finished
    SwipeOutComplete(PhotoId),
    /// Save button
    Export,
    /// Share button
    Share,
    StripExported(Result<PathBuf, ExportError>),
    StripShared(Result<ShareOutcome, ExportError>),
    /// New strip button
    NewStrip,
}

impl AppModel {
    /// Create the model on the capture view and open the camera
    pub fn new(config: Config, backends: Backends) -> Self {
        let exporter = StripExporter::new(config.export_dir.clone(), Arc::clone(&backends.share));
        let mut model = Self {
            config,
            session: Session::new(TARGET_PHOTO_COUNT),
            filter_picker: FilterPicker::new(),
            swipe_hint_visible: true,
            capture_stage: CaptureStage::Idle,
            flash_active: false,
            camera_status: CameraStatus::Stopped,
            current_frame: None,
            film_strip: FilmStrip::new(),
            export_in_progress: false,
            status_message: None,
            last_export: None,
            last_capture_at: None,
            countdown_generation: 0,
            camera: None,
            backends,
            exporter,
        };
        model.sync_camera_with_view();
        model
    }

    pub fn view(&self) -> View {
        self.session.view()
    }

    pub fn selected_filter(&self) -> FilterType {
        self.filter_picker.selected()
    }

    pub fn camera_ready(&self) -> bool {
        self.camera_status.is_ready()
    }

    /// Whether the model currently holds the camera
    pub fn holds_camera(&self) -> bool {
        self.camera.is_some()
    }

    /// Header text, e.g. `2/3 Photos`
    pub fn progress_label(&self) -> String {
        self.session.progress_label()
    }

    pub(crate) fn camera_request(&self) -> CameraRequest {
        CameraRequest::square(
            self.config.camera_index,
            self.config.capture_width,
            self.config.capture_height,
        )
    }

    /// Drain the camera and keep the newest frame
    ///
    /// The first frame flips the camera to ready.
    pub fn pump_camera(&mut self) {
        let Some(feed) = self.camera.as_mut() else {
            return;
        };

        if feed.poll() {
            self.current_frame = feed.latest_frame().cloned();
            if self.camera_status == CameraStatus::Starting {
                info!(format = %feed.format(), "Camera ready");
                self.camera_status = CameraStatus::Ready;
            }
        } else if !feed.is_streaming() && self.camera_status.is_ready() {
            warn!("Camera stream ended");
            self.camera_status = CameraStatus::Unavailable(CameraError::Disconnected.to_string());
        }
    }

    /// Hold the camera exactly while the capture view is active
    pub(crate) fn sync_camera_with_view(&mut self) {
        match self.session.view() {
            View::Capture => {
                if self.camera.is_some() {
                    return;
                }
                let request = self.camera_request();
                match CameraFeed::open(self.backends.camera.as_ref(), &request) {
                    Ok(feed) => {
                        self.camera = Some(feed);
                        self.camera_status = CameraStatus::Starting;
                    }
                    Err(e) => {
                        warn!(error = %e, "Camera unavailable, capture disabled");
                        self.camera_status = CameraStatus::Unavailable(e.to_string());
                    }
                }
            }
            View::Review => {
                // Leaving the capture view cancels the countdown
                self.cancel_countdown();
                if self.camera.take().is_some() {
                    info!("Camera released");
                }
                self.current_frame = None;
                self.camera_status = CameraStatus::Stopped;
            }
        }
    }

    /// Invalidate pending ticks and return to idle if counting
    pub(crate) fn cancel_countdown(&mut self) {
        self.countdown_generation += 1;
        self.session.cancel_countdown();
        if self.capture_stage.is_counting() {
            self.capture_stage = CaptureStage::Idle;
        }
    }
}
