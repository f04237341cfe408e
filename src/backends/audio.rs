// SPDX-License-Identifier: MPL-2.0

//! Shutter sound playback

use crate::errors::{AppError, AppResult};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Audible cue played on every capture
pub trait ShutterSound: Send + Sync {
    /// Play the cue; failures are reported, never fatal
    fn play(&self) -> AppResult<()>;
}

/// Rings the terminal bell
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl ShutterSound for TerminalBell {
    fn play(&self) -> AppResult<()> {
        let mut stdout = std::io::stdout();
        stdout
            .write_all(b"\x07")
            .and_then(|_| stdout.flush())
            .map_err(|e| AppError::Audio(e.to_string()))
    }
}

/// No sound at all
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl ShutterSound for Silent {
    fn play(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Counts plays, optionally failing each one
#[derive(Debug, Default)]
pub struct CountingShutter {
    plays: AtomicUsize,
    fail_with: Option<String>,
}

impl CountingShutter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every play is counted and then fails with `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            plays: AtomicUsize::new(0),
            fail_with: Some(reason.into()),
        }
    }

    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }
}

impl ShutterSound for CountingShutter {
    fn play(&self) -> AppResult<()> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(reason) => Err(AppError::Audio(reason.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failing_shutter_still_counts() {
        let shutter = CountingShutter::failing("no output device");
        assert!(matches!(shutter.play(), Err(AppError::Audio(_))));
        assert_eq!(shutter.plays(), 1);
    }
}
