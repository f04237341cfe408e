// SPDX-License-Identifier: GPL-3.0-only

//! Film strip handlers
//!
//! Reorder by drag, delete by swipe, export, share and starting over.

use crate::app::session::PhotoId;
use crate::app::state::{AppModel, Message};
use crate::app::task::Task;
use crate::constants::{SWIPE_OUT_DURATION, haptics};
use crate::errors::ExportError;
use crate::pipelines::strip::ShareOutcome;
use std::path::PathBuf;
use tracing::{debug, info, warn};

impl AppModel {
    /// Gestures that change the photo list wait for a running export
    fn strip_locked(&self) -> bool {
        if self.export_in_progress {
            debug!("Export in progress, gesture ignored");
        }
        self.export_in_progress
    }

    pub(crate) fn handle_drag_start(&mut self, index: usize, y: f32) -> Task {
        if self.strip_locked() {
            return Task::none();
        }
        self.film_strip.drag_start(index, y, self.session.len());
        Task::none()
    }

    pub(crate) fn handle_drag_move(&mut self, y: f32) -> Task {
        if self.strip_locked() {
            return Task::none();
        }
        if let Some((from, to)) = self.film_strip.drag_move(y, self.session.len()) {
            self.session.swap(from, to);
            info!(from, to, "Photo moved");
        }
        Task::none()
    }

    pub(crate) fn handle_drag_end(&mut self) -> Task {
        self.film_strip.drag_end();
        Task::none()
    }

    pub(crate) fn handle_swipe_delete(&mut self, index: usize) -> Task {
        if self.strip_locked() {
            return Task::none();
        }
        let Some(id) = self.session.photos().get(index).map(|photo| photo.id) else {
            debug!(index, "Swipe on a missing photo");
            return Task::none();
        };
        if !self.film_strip.begin_removal(id) {
            debug!(%id, "Photo already leaving");
            return Task::none();
        }
        debug!(%id, index, "Swipe-out started");
        Task::delay(SWIPE_OUT_DURATION, Message::SwipeOutComplete(id))
    }

    pub(crate) fn handle_swipe_out_complete(&mut self, id: PhotoId) -> Task {
        if !self.film_strip.complete_removal(id) {
            debug!(%id, "Swipe-out no longer pending");
            return Task::none();
        }
        // Indices may have shifted since the swipe started
        if let Some(index) = self.session.position(id) {
            self.session.remove(index);
            self.film_strip.photo_removed(index);
        }
        Task::none()
    }

    pub(crate) fn handle_export(&mut self) -> Task {
        if self.export_in_progress {
            debug!("Export already running");
            return Task::none();
        }
        if self.session.is_empty() {
            debug!("Nothing to export");
            return Task::none();
        }

        self.export_in_progress = true;
        self.status_message = Some("Saving strip...".to_string());
        let exporter = self.exporter.clone();
        let photos = self.session.images();
        info!(photos = photos.len(), "Exporting strip");

        Task::perform(
            async move { exporter.export(photos).await },
            Message::StripExported,
        )
    }

    pub(crate) fn handle_share(&mut self) -> Task {
        if self.export_in_progress {
            debug!("Export already running");
            return Task::none();
        }
        if self.session.is_empty() {
            debug!("Nothing to share");
            return Task::none();
        }

        self.export_in_progress = true;
        self.status_message = Some("Sharing strip...".to_string());
        let exporter = self.exporter.clone();
        let photos = self.session.images();
        info!(photos = photos.len(), "Sharing strip");

        Task::perform(
            async move { exporter.share(photos).await },
            Message::StripShared,
        )
    }

    pub(crate) fn handle_strip_exported(&mut self, result: Result<PathBuf, ExportError>) -> Task {
        self.export_in_progress = false;
        match result {
            Ok(path) => self.export_succeeded(path),
            Err(ExportError::EmptyStrip) => {
                debug!("Export aborted, strip empty");
                self.status_message = None;
            }
            Err(e) => {
                warn!(error = %e, "Export failed");
                self.status_message = Some(format!("Export failed: {}", e));
            }
        }
        Task::none()
    }

    pub(crate) fn handle_strip_shared(
        &mut self,
        result: Result<ShareOutcome, ExportError>,
    ) -> Task {
        self.export_in_progress = false;
        match result {
            Ok(ShareOutcome::Shared) => {
                self.backends.haptics.vibrate(haptics::CONFIRM);
                self.status_message = Some("Strip shared".to_string());
            }
            Ok(ShareOutcome::Exported { path, reason }) => {
                debug!(%reason, "Share fell back to export");
                self.export_succeeded(path);
            }
            Err(ExportError::EmptyStrip) => {
                debug!("Share aborted, strip empty");
                self.status_message = None;
            }
            Err(e) => {
                warn!(error = %e, "Share failed");
                self.status_message = Some(format!("Share failed: {}", e));
            }
        }
        Task::none()
    }

    fn export_succeeded(&mut self, path: PathBuf) {
        self.backends.haptics.vibrate(haptics::CONFIRM);
        info!(path = %path.display(), "Strip saved");
        self.status_message = Some(format!("Saved {}", path.display()));
        self.last_export = Some(path);
    }

    pub(crate) fn handle_new_strip(&mut self) -> Task {
        self.cancel_countdown();
        self.session.reset();
        self.film_strip.clear();
        self.status_message = None;
        self.sync_camera_with_view();
        Task::none()
    }
}
