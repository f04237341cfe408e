// SPDX-License-Identifier: GPL-3.0-only

//! Capture handlers
//!
//! Filter swipes, the countdown, the capture trigger and everything that
//! follows a capture (flash, processing indicator, adding the photo).

use crate::app::session::View;
use crate::app::state::{AppModel, CaptureStage, Message};
use crate::app::task::Task;
use crate::constants::{
    CAPTURE_DEBOUNCE, COUNTDOWN_TICK, FLASH_DURATION, PROCESSING_MIN_DURATION, haptics,
};
use crate::errors::PhotoError;
use crate::filters::SwipeDirection;
use crate::pipelines::photo::{CapturedPhoto, PhotoPipeline};
use std::sync::Arc;
use tracing::{debug, info, warn};

impl AppModel {
    pub(crate) fn handle_swipe_filter(&mut self, direction: SwipeDirection) -> Task {
        if !self.filter_picker.swipe(direction) {
            debug!(?direction, "Already at the end of the filter list");
            return Task::none();
        }
        self.swipe_hint_visible = false;
        self.backends.haptics.vibrate(haptics::TAP);
        info!(
            index = self.filter_picker.index(),
            filter = %self.selected_filter(),
            "Filter selected"
        );
        Task::none()
    }

    pub(crate) fn handle_toggle_timer(&mut self) -> Task {
        self.backends.haptics.vibrate(haptics::TAP);
        let seconds = if self.session.timer_enabled() {
            0
        } else {
            self.config.timer_seconds
        };
        self.handle_set_timer(seconds)
    }

    pub(crate) fn handle_toggle_flash(&mut self) -> Task {
        self.backends.haptics.vibrate(haptics::TAP);
        let enabled = !self.session.flash_enabled();
        self.session.set_flash(enabled);
        info!(enabled, "Flash toggled");
        Task::none()
    }

    /// Enable the timer and start a countdown of `seconds`; 0 disables it
    pub(crate) fn handle_set_timer(&mut self, seconds: u32) -> Task {
        // Any running countdown is superseded
        self.cancel_countdown();
        self.session.set_timer(seconds);
        info!(seconds, "Timer set");

        if seconds == 0 {
            return Task::none();
        }
        if self.capture_stage.is_processing() {
            // The countdown would otherwise race the running capture
            debug!("Capture in progress, countdown not started");
            self.session.cancel_countdown();
            return Task::none();
        }
        self.start_countdown(seconds)
    }

    fn start_countdown(&mut self, seconds: u32) -> Task {
        self.session.start_countdown(seconds);
        let generation = self.countdown_generation;
        self.capture_stage = CaptureStage::Counting { generation };
        debug!(seconds, generation, "Countdown started");
        Task::delay(COUNTDOWN_TICK, Message::CountdownTick { generation })
    }

    pub(crate) fn handle_countdown_tick(&mut self, generation: u64) -> Task {
        let CaptureStage::Counting {
            generation: current,
        } = self.capture_stage
        else {
            debug!(generation, "Countdown tick without countdown");
            return Task::none();
        };
        if generation != current {
            debug!(generation, current, "Stale countdown tick");
            return Task::none();
        }

        let remaining = self.session.tick_countdown();
        self.backends.haptics.vibrate(haptics::TAP);
        debug!(remaining, "Countdown tick");

        if remaining > 0 {
            return Task::delay(COUNTDOWN_TICK, Message::CountdownTick { generation });
        }

        // Zero re-enables the shutter
        self.capture_stage = CaptureStage::Idle;
        info!("Countdown finished");
        Task::none()
    }

    /// Capture trigger
    ///
    /// Ignored when the strip is full, the camera is not ready, a countdown
    /// runs, or the last accepted trigger is inside the debounce window.
    /// The timer toggle does not delay the capture itself.
    pub(crate) fn handle_capture(&mut self) -> Task {
        if self.session.is_full() {
            debug!("Strip full, capture ignored");
            return Task::none();
        }
        if self.view() != View::Capture || !self.camera_ready() {
            debug!(status = ?self.camera_status, "Camera not ready, capture ignored");
            return Task::none();
        }
        match self.capture_stage {
            CaptureStage::Counting { .. } => {
                debug!("Countdown running, capture ignored");
                return Task::none();
            }
            CaptureStage::Processing { .. } | CaptureStage::Idle => {}
        }

        self.capture_now()
    }

    fn within_debounce(&self) -> bool {
        self.last_capture_at
            .is_some_and(|at| at.elapsed() < CAPTURE_DEBOUNCE)
    }

    /// Grab the current frame and run it through the photo pipeline
    fn capture_now(&mut self) -> Task {
        if self.within_debounce() {
            debug!("Capture debounced");
            return Task::none();
        }
        if self.capture_stage.is_processing() {
            debug!("Previous capture still processing");
            return Task::none();
        }
        let Some(frame) = self.current_frame.as_ref().map(Arc::clone) else {
            let error = PhotoError::NoFrameAvailable;
            warn!(%error, "Capture skipped");
            self.status_message = Some(error.to_string());
            return Task::none();
        };

        self.last_capture_at = Some(tokio::time::Instant::now());
        self.flash_active = true;
        self.capture_stage = CaptureStage::Processing {
            min_elapsed: false,
            result_ready: false,
        };
        self.backends.haptics.vibrate(haptics::CAPTURE);
        if let Err(e) = self.backends.shutter.play() {
            warn!(error = %e, "Shutter sound failed");
        }

        let filter = self.selected_filter();
        info!(filter = %filter, sequence = frame.sequence, "Capturing photo...");

        let capture_task = Task::perform(
            async move { PhotoPipeline::new(filter).capture(frame).await },
            Message::PhotoProcessed,
        );
        Task::batch([
            capture_task,
            Task::delay(FLASH_DURATION, Message::ClearFlash),
            Task::delay(PROCESSING_MIN_DURATION, Message::ProcessingElapsed),
        ])
    }

    pub(crate) fn handle_photo_processed(&mut self, result: Result<CapturedPhoto, String>) -> Task {
        match result {
            Ok(captured) => {
                let photo = self.session.new_photo(captured);
                if self.session.add_photo(photo) {
                    info!("Strip complete, switching to review");
                    self.film_strip.clear();
                    self.sync_camera_with_view();
                }
                self.status_message = None;
            }
            Err(e) => {
                let error = PhotoError::ProcessingFailed(e);
                warn!(%error, "Photo capture failed");
                self.status_message = Some(error.to_string());
            }
        }

        if let CaptureStage::Processing { min_elapsed, .. } = self.capture_stage {
            self.capture_stage = if min_elapsed {
                CaptureStage::Idle
            } else {
                CaptureStage::Processing {
                    min_elapsed,
                    result_ready: true,
                }
            };
        }
        Task::none()
    }

    pub(crate) fn handle_clear_flash(&mut self) -> Task {
        self.flash_active = false;
        Task::none()
    }

    pub(crate) fn handle_processing_elapsed(&mut self) -> Task {
        if let CaptureStage::Processing { result_ready, .. } = self.capture_stage {
            self.capture_stage = if result_ready {
                CaptureStage::Idle
            } else {
                CaptureStage::Processing {
                    min_elapsed: true,
                    result_ready,
                }
            };
        }
        Task::none()
    }
}
