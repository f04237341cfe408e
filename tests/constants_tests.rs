// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use photobooth::constants::{
    CAPTURE_DEBOUNCE, FLASH_DURATION, PROCESSING_MIN_DURATION, TARGET_PHOTO_COUNT, haptics, strip,
};
use photobooth::pipelines::strip::StripLayout;

#[test]
fn test_strip_holds_three_photos() {
    assert_eq!(TARGET_PHOTO_COUNT, 3);
}

#[test]
fn test_flash_shorter_than_processing_indicator() {
    // The flash is gone before the processing indicator may clear
    assert!(FLASH_DURATION < PROCESSING_MIN_DURATION);
    assert!(PROCESSING_MIN_DURATION < CAPTURE_DEBOUNCE);
}

#[test]
fn test_swap_threshold_is_half_a_frame() {
    assert_eq!(strip::SWAP_THRESHOLD, strip::FRAME_HEIGHT as f32 / 2.0);
}

#[test]
fn test_strip_layout_matches_frame_constants() {
    let layout = StripLayout::new(TARGET_PHOTO_COUNT, 1);
    assert_eq!(layout.width(), 2 * strip::BORDER_WIDTH + strip::FRAME_WIDTH);
    assert_eq!(
        layout.height(),
        2 * strip::VERTICAL_PADDING + 3 * strip::FRAME_HEIGHT + 2 * strip::FRAME_GAP
    );
}

#[test]
fn test_haptic_patterns() {
    assert_eq!(haptics::TAP, &[50]);
    assert_eq!(haptics::CAPTURE, &[100]);
    assert_eq!(haptics::CONFIRM, &[100, 50, 100]);
}
