// SPDX-License-Identifier: GPL-3.0-only

//! Film strip gesture state
//!
//! Tracks an in-progress reorder drag and the photos currently sliding out
//! after a delete swipe. The photo list itself lives in the session.

use super::session::PhotoId;
use crate::constants::strip::SWAP_THRESHOLD;
use tracing::debug;

/// Reorder drag
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Current position of the dragged photo
        index: usize,
        /// Anchor; reset after every swap
        start_y: f32,
        current_y: f32,
    },
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    /// Index of the dragged photo, if any
    pub fn index(&self) -> Option<usize> {
        match self {
            DragState::Idle => None,
            DragState::Dragging { index, .. } => Some(*index),
        }
    }

    /// Vertical offset of the dragged photo from its anchor
    pub fn offset(&self) -> f32 {
        match self {
            DragState::Idle => 0.0,
            DragState::Dragging {
                start_y, current_y, ..
            } => current_y - start_y,
        }
    }
}

/// Gesture state of the review screen
#[derive(Debug, Default)]
pub struct FilmStrip {
    drag: DragState,
    /// Photos in their swipe-out animation, oldest first
    pending_removals: Vec<PhotoId>,
}

impl FilmStrip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    /// Begin dragging photo `index`
    pub fn drag_start(&mut self, index: usize, y: f32, photo_count: usize) {
        if index >= photo_count {
            debug!(index, photo_count, "Drag start outside the strip");
            return;
        }
        self.drag = DragState::Dragging {
            index,
            start_y: y,
            current_y: y,
        };
    }

    /// Move the drag to `y`
    ///
    /// Past half a frame height the dragged photo trades places with its
    /// neighbour in the direction of travel and the anchor resets to `y`.
    /// Returns the pair of indices to swap.
    pub fn drag_move(&mut self, y: f32, photo_count: usize) -> Option<(usize, usize)> {
        let DragState::Dragging {
            index,
            start_y,
            current_y,
        } = &mut self.drag
        else {
            return None;
        };
        *current_y = y;

        let distance = y - *start_y;
        if distance.abs() <= SWAP_THRESHOLD {
            return None;
        }

        let from = *index;
        let to = if distance > 0.0 {
            from.checked_add(1).filter(|&to| to < photo_count)
        } else {
            from.checked_sub(1)
        }?;

        *index = to;
        *start_y = y;
        Some((from, to))
    }

    pub fn drag_end(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Keep the drag on its photo after the photo at `index` left the strip
    pub fn photo_removed(&mut self, index: usize) {
        let DragState::Dragging { index: dragged, .. } = &mut self.drag else {
            return;
        };
        if *dragged == index {
            self.drag = DragState::Idle;
        } else if index < *dragged {
            *dragged -= 1;
        }
    }

    /// Start the swipe-out of `id`; returns `false` if it is already leaving
    pub fn begin_removal(&mut self, id: PhotoId) -> bool {
        if self.pending_removals.contains(&id) {
            return false;
        }
        self.pending_removals.push(id);
        true
    }

    /// Finish the swipe-out of `id`; returns `false` if it was not pending
    pub fn complete_removal(&mut self, id: PhotoId) -> bool {
        match self.pending_removals.iter().position(|pending| *pending == id) {
            Some(pos) => {
                self.pending_removals.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn is_removing(&self, id: PhotoId) -> bool {
        self.pending_removals.contains(&id)
    }

    pub fn pending_removals(&self) -> &[PhotoId] {
        &self.pending_removals
    }

    /// Forget all gesture state
    pub fn clear(&mut self) {
        self.drag = DragState::Idle;
        self.pending_removals.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_moves_do_not_swap() {
        let mut strip = FilmStrip::new();
        strip.drag_start(0, 100.0, 3);
        assert_eq!(strip.drag_move(150.0, 3), None);
        assert_eq!(strip.drag_move(190.0, 3), None); // exactly half a frame
        assert_eq!(strip.drag().offset(), 90.0);
    }

    #[test]
    fn test_swap_down_then_anchor_resets() {
        let mut strip = FilmStrip::new();
        strip.drag_start(0, 0.0, 3);
        assert_eq!(strip.drag_move(91.0, 3), Some((0, 1)));
        assert_eq!(strip.drag().index(), Some(1));
        assert_eq!(strip.drag().offset(), 0.0);

        // Next swap needs another half frame from the new anchor
        assert_eq!(strip.drag_move(150.0, 3), None);
        assert_eq!(strip.drag_move(182.0, 3), Some((1, 2)));
    }

    #[test]
    fn test_no_neighbour_no_swap() {
        let mut strip = FilmStrip::new();
        strip.drag_start(2, 0.0, 3);
        assert_eq!(strip.drag_move(200.0, 3), None);
        assert_eq!(strip.drag().index(), Some(2));

        strip.drag_start(0, 0.0, 3);
        assert_eq!(strip.drag_move(-200.0, 3), None);
        assert_eq!(strip.drag_move(-10.0, 3), None);
    }

    #[test]
    fn test_swap_up() {
        let mut strip = FilmStrip::new();
        strip.drag_start(1, 300.0, 3);
        assert_eq!(strip.drag_move(200.0, 3), Some((1, 0)));
    }

    #[test]
    fn test_release_clears_drag() {
        let mut strip = FilmStrip::new();
        strip.drag_start(1, 0.0, 3);
        strip.drag_end();
        assert!(!strip.drag().is_dragging());
        assert_eq!(strip.drag_move(500.0, 3), None);
    }

    #[test]
    fn test_out_of_range_drag_is_ignored() {
        let mut strip = FilmStrip::new();
        strip.drag_start(3, 0.0, 3);
        assert!(!strip.drag().is_dragging());
    }

    #[test]
    fn test_removal_above_drag_shifts_index() {
        let mut strip = FilmStrip::new();
        strip.drag_start(2, 0.0, 3);
        strip.photo_removed(0);
        assert_eq!(strip.drag().index(), Some(1));

        // Removing below the dragged photo leaves it in place
        strip.photo_removed(2);
        assert_eq!(strip.drag().index(), Some(1));

        strip.photo_removed(1);
        assert!(!strip.drag().is_dragging());
    }

    #[test]
    fn test_swapping_twice_restores_order() {
        let mut strip = FilmStrip::new();
        let mut order = vec!['a', 'b', 'c'];

        strip.drag_start(0, 100.0, 3);
        let (from, to) = strip.drag_move(195.0, 3).expect("swap down");
        order.swap(from, to);
        strip.drag_end();

        strip.drag_start(1, 195.0, 3);
        let (from, to) = strip.drag_move(100.0, 3).expect("swap up");
        order.swap(from, to);
        strip.drag_end();

        assert_eq!(order, vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_overlapping_removals_all_tracked() {
        let mut session = crate::app::session::Session::new(3);
        let ids: Vec<PhotoId> = (0..2)
            .map(|_| {
                session
                    .new_photo(crate::pipelines::photo::CapturedPhoto {
                        image: crate::pipelines::photo::EncodedImage {
                            data: Vec::new(),
                            width: 1,
                            height: 1,
                        },
                        filter: crate::filters::FilterType::Normal,
                    })
                    .id
            })
            .collect();

        let mut strip = FilmStrip::new();
        assert!(strip.begin_removal(ids[0]));
        assert!(strip.begin_removal(ids[1]));
        assert!(!strip.begin_removal(ids[0]));
        assert_eq!(strip.pending_removals().len(), 2);

        assert!(strip.complete_removal(ids[0]));
        assert!(!strip.complete_removal(ids[0]));
        assert!(strip.is_removing(ids[1]));
    }
}
