// SPDX-License-Identifier: GPL-3.0-only

//! Navigation handlers

use crate::app::session::View;
use crate::app::state::AppModel;
use crate::app::task::Task;
use tracing::info;

impl AppModel {
    /// Switch views from the bottom navigation
    ///
    /// The camera follows the view: opened on capture, released on review.
    pub(crate) fn handle_navigate(&mut self, view: View) -> Task {
        if self.session.view() == view {
            return Task::none();
        }
        info!(view = view.label(), "Navigating");
        self.session.set_view(view);
        self.film_strip.drag_end();
        self.sync_camera_with_view();
        Task::none()
    }
}
