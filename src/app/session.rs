// SPDX-License-Identifier: GPL-3.0-only

//! Session state
//!
//! The ordered list of captured photos plus the booth toggles. The list never
//! grows past the target count, and reaching the target switches the session
//! to the review view.

use crate::filters::FilterType;
use crate::pipelines::photo::{CapturedPhoto, EncodedImage};
use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Identifier of a photo, unique and increasing in capture order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhotoId(u64);

impl std::fmt::Display for PhotoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A captured photo
///
/// Immutable once created; only its position in the session changes.
#[derive(Debug, Clone)]
pub struct Photo {
    pub id: PhotoId,
    pub image: Arc<EncodedImage>,
    /// Filter baked into `image`
    pub filter: FilterType,
    pub captured_at: DateTime<Local>,
}

/// Which screen is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Live preview and capture controls
    #[default]
    Capture,
    /// Film strip review, reorder, delete, export
    Review,
}

impl View {
    pub fn label(self) -> &'static str {
        match self {
            View::Capture => "Camera",
            View::Review => "Strip",
        }
    }
}

/// The photo session
#[derive(Debug)]
pub struct Session {
    photos: Vec<Photo>,
    target_count: usize,
    view: View,
    countdown: u32,
    flash_enabled: bool,
    timer_enabled: bool,
    next_id: u64,
}

impl Session {
    /// Empty session on the capture view
    pub fn new(target_count: usize) -> Self {
        Self {
            photos: Vec::with_capacity(target_count),
            target_count: target_count.max(1),
            view: View::Capture,
            countdown: 0,
            flash_enabled: false,
            timer_enabled: false,
            next_id: 1,
        }
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn target_count(&self) -> usize {
        self.target_count
    }

    pub fn is_full(&self) -> bool {
        self.photos.len() >= self.target_count
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn set_view(&mut self, view: View) {
        if self.view != view {
            debug!(from = ?self.view, to = ?view, "View changed");
            self.view = view;
        }
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn flash_enabled(&self) -> bool {
        self.flash_enabled
    }

    pub fn timer_enabled(&self) -> bool {
        self.timer_enabled
    }

    /// Enable the timer with a countdown of `seconds`, or disable it with 0
    pub fn set_timer(&mut self, seconds: u32) {
        self.timer_enabled = seconds > 0;
        self.countdown = seconds;
    }

    pub fn set_flash(&mut self, enabled: bool) {
        self.flash_enabled = enabled;
    }

    /// Start a countdown without touching the timer toggle
    pub fn start_countdown(&mut self, seconds: u32) {
        self.countdown = seconds;
    }

    /// Decrement the countdown by one second; returns the remaining seconds
    pub fn tick_countdown(&mut self) -> u32 {
        self.countdown = self.countdown.saturating_sub(1);
        self.countdown
    }

    pub fn cancel_countdown(&mut self) {
        self.countdown = 0;
    }

    /// Wrap a capture result into a photo with a fresh id
    pub fn new_photo(&mut self, captured: CapturedPhoto) -> Photo {
        let id = PhotoId(self.next_id);
        self.next_id += 1;
        Photo {
            id,
            image: Arc::new(captured.image),
            filter: captured.filter,
            captured_at: Local::now(),
        }
    }

    /// Append a photo
    ///
    /// Dropped when the session is already full. Returns `true` when this
    /// photo completed the strip and the view switched to review.
    pub fn add_photo(&mut self, photo: Photo) -> bool {
        if self.is_full() {
            warn!(id = %photo.id, "Session full, dropping photo");
            return false;
        }

        info!(
            id = %photo.id,
            filter = %photo.filter,
            count = self.photos.len() + 1,
            target = self.target_count,
            "Photo added"
        );
        self.photos.push(photo);

        if self.is_full() {
            self.set_view(View::Review);
            true
        } else {
            false
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<Photo> {
        if index >= self.photos.len() {
            return None;
        }
        let photo = self.photos.remove(index);
        info!(id = %photo.id, index, remaining = self.photos.len(), "Photo removed");
        Some(photo)
    }

    /// Swap two photos; returns `false` when either index is out of range
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if a >= self.photos.len() || b >= self.photos.len() {
            return false;
        }
        self.photos.swap(a, b);
        debug!(a, b, "Photos swapped");
        true
    }

    pub fn position(&self, id: PhotoId) -> Option<usize> {
        self.photos.iter().position(|photo| photo.id == id)
    }

    /// Encoded images in strip order, for export
    pub fn images(&self) -> Vec<Arc<EncodedImage>> {
        self.photos.iter().map(|photo| Arc::clone(&photo.image)).collect()
    }

    /// Filters in strip order
    pub fn filters(&self) -> Vec<FilterType> {
        self.photos.iter().map(|photo| photo.filter).collect()
    }

    /// Back to an empty session on the capture view
    ///
    /// The timer and flash toggles are kept. Ids keep increasing so photos
    /// from different strips never collide.
    pub fn reset(&mut self) {
        info!(discarded = self.photos.len(), "Session reset");
        self.photos.clear();
        self.view = View::Capture;
        self.countdown = 0;
    }

    /// `"{count}/{target} Photos"`
    pub fn progress_label(&self) -> String {
        format!("{}/{} Photos", self.photos.len(), self.target_count)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(crate::constants::TARGET_PHOTO_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured(filter: FilterType) -> CapturedPhoto {
        CapturedPhoto {
            image: EncodedImage {
                data: vec![0xFF, 0xD8, 0xFF, 0xD9],
                width: 1,
                height: 1,
            },
            filter,
        }
    }

    fn add(session: &mut Session, filter: FilterType) -> bool {
        let photo = session.new_photo(captured(filter));
        session.add_photo(photo)
    }

    #[test]
    fn test_third_photo_switches_to_review() {
        let mut session = Session::new(3);
        assert!(!add(&mut session, FilterType::Normal));
        assert!(!add(&mut session, FilterType::Mono));
        assert_eq!(session.view(), View::Capture);
        assert!(add(&mut session, FilterType::Sepia));
        assert_eq!(session.view(), View::Review);
        assert_eq!(
            session.filters(),
            vec![FilterType::Normal, FilterType::Mono, FilterType::Sepia]
        );
    }

    #[test]
    fn test_full_session_drops_extra_photo() {
        let mut session = Session::new(2);
        add(&mut session, FilterType::Normal);
        add(&mut session, FilterType::Normal);
        assert!(!add(&mut session, FilterType::Cool));
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let mut session = Session::new(3);
        let a = session.new_photo(captured(FilterType::Normal));
        let b = session.new_photo(captured(FilterType::Normal));
        assert!(a.id < b.id);

        session.reset();
        let c = session.new_photo(captured(FilterType::Normal));
        assert!(b.id < c.id);
    }

    #[test]
    fn test_remove_swap_position() {
        let mut session = Session::new(3);
        add(&mut session, FilterType::Normal);
        add(&mut session, FilterType::Mono);
        add(&mut session, FilterType::Sepia);

        let mono_id = session.photos()[1].id;
        assert!(session.swap(0, 1));
        assert_eq!(session.position(mono_id), Some(0));
        assert!(!session.swap(0, 3));

        let removed = session.remove(0).unwrap();
        assert_eq!(removed.id, mono_id);
        assert_eq!(session.filters(), vec![FilterType::Normal, FilterType::Sepia]);
        assert!(session.remove(5).is_none());
    }

    #[test]
    fn test_reset_keeps_toggles() {
        let mut session = Session::new(1);
        session.set_flash(true);
        session.set_timer(3);
        add(&mut session, FilterType::Normal);
        assert_eq!(session.view(), View::Review);

        session.reset();
        assert!(session.is_empty());
        assert_eq!(session.view(), View::Capture);
        assert_eq!(session.countdown(), 0);
        assert!(session.flash_enabled());
        assert!(session.timer_enabled());
    }

    #[test]
    fn test_countdown_ticks_to_zero() {
        let mut session = Session::new(3);
        session.set_timer(2);
        assert_eq!(session.tick_countdown(), 1);
        assert_eq!(session.tick_countdown(), 0);
        assert_eq!(session.tick_countdown(), 0);
    }

    #[test]
    fn test_progress_label() {
        let mut session = Session::new(3);
        assert_eq!(session.progress_label(), "0/3 Photos");
        add(&mut session, FilterType::Normal);
        assert_eq!(session.progress_label(), "1/3 Photos");
    }
}
