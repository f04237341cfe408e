// SPDX-License-Identifier: GPL-3.0-only

//! Haptic feedback
//!
//! Desktops have no vibration motor, so the default implementation only
//! traces the pattern. The seam exists so touch hardware can be plugged in.

use std::sync::Mutex;
use tracing::trace;

/// Vibration capability of the host
pub trait Haptics: Send + Sync {
    /// Vibrate with an on/off pattern in milliseconds; no-op when unsupported
    fn vibrate(&self, pattern: &[u32]);

    fn is_supported(&self) -> bool {
        false
    }
}

/// Host without vibration hardware
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn vibrate(&self, pattern: &[u32]) {
        trace!(?pattern, "Haptic feedback unsupported");
    }
}

/// Keeps every requested pattern, for headless runs and tests
#[derive(Debug, Default)]
pub struct RecordingHaptics {
    patterns: Mutex<Vec<Vec<u32>>>,
}

impl RecordingHaptics {
    pub fn new() -> Self {
        Self::default()
    }

    /// All patterns requested so far, oldest first
    pub fn patterns(&self) -> Vec<Vec<u32>> {
        self.patterns
            .lock()
            .map(|patterns| patterns.clone())
            .unwrap_or_default()
    }

    /// Number of times `pattern` was requested
    pub fn count(&self, pattern: &[u32]) -> usize {
        self.patterns().iter().filter(|p| p.as_slice() == pattern).count()
    }
}

impl Haptics for RecordingHaptics {
    fn vibrate(&self, pattern: &[u32]) {
        if let Ok(mut patterns) = self.patterns.lock() {
            patterns.push(pattern.to_vec());
        }
    }

    fn is_supported(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::haptics;

    #[test]
    fn test_recording_counts_patterns() {
        let recorder = RecordingHaptics::new();
        recorder.vibrate(haptics::TAP);
        recorder.vibrate(haptics::CONFIRM);
        recorder.vibrate(haptics::TAP);

        assert_eq!(recorder.count(haptics::TAP), 2);
        assert_eq!(recorder.count(haptics::CONFIRM), 1);
        assert_eq!(recorder.patterns()[1], vec![100, 50, 100]);
    }
}
