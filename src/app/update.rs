// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! This module handles all application messages by routing them to focused handler methods.
//! The main `update()` function acts as a dispatcher, while specific handlers are implemented
//! in the `handlers` submodules organized by functional domain.
//!
//! # Handler Modules
//!
//! - `handlers::capture`: Filter swipes, timer, flash, countdown, capture
//! - `handlers::navigation`: View switching
//! - `handlers::strip`: Reorder, delete, export, share, new strip

use crate::app::state::{AppModel, Message};
use crate::app::task::Task;
use tracing::trace;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task {
        trace!(?message, "Update");
        match message {
            // ===== Capture =====
            Message::SwipeFilter(direction) => self.handle_swipe_filter(direction),
            Message::SetTimer(seconds) => self.handle_set_timer(seconds),
            Message::ToggleTimer => self.handle_toggle_timer(),
            Message::ToggleFlash => self.handle_toggle_flash(),
            Message::Capture => self.handle_capture(),
            Message::CountdownTick { generation } => self.handle_countdown_tick(generation),
            Message::PhotoProcessed(result) => self.handle_photo_processed(result),
            Message::ClearFlash => self.handle_clear_flash(),
            Message::ProcessingElapsed => self.handle_processing_elapsed(),

            // ===== Navigation =====
            Message::Navigate(view) => self.handle_navigate(view),

            // ===== Film strip =====
            Message::DragStart { index, y } => self.handle_drag_start(index, y),
            Message::DragMove { y } => self.handle_drag_move(y),
            Message::DragEnd => self.handle_drag_end(),
            Message::SwipeDelete { index } => self.handle_swipe_delete(index),
            Message::SwipeOutComplete(id) => self.handle_swipe_out_complete(id),
            Message::Export => self.handle_export(),
            Message::Share => self.handle_share(),
            Message::StripExported(result) => self.handle_strip_exported(result),
            Message::StripShared(result) => self.handle_strip_shared(result),
            Message::NewStrip => self.handle_new_strip(),
        }
    }
}
