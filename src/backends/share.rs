// SPDX-License-Identifier: GPL-3.0-only

//! Native share capability
//!
//! The desktop has no share sheet; the closest equivalent is handing the file
//! to the user's default application through the desktop opener.

use crate::config::APP_DIR_NAME;
use crate::errors::ShareError;
use futures::future::BoxFuture;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// A single file plus caption handed to the share target
#[derive(Debug, Clone)]
pub struct SharePayload {
    pub file_name: String,
    pub mime_type: String,
    pub data: Arc<Vec<u8>>,
    pub title: String,
    pub text: String,
}

/// Host share capability
pub trait ShareTarget: Send + Sync {
    /// Whether sharing is possible at all on this host
    fn is_available(&self) -> bool;

    /// Share the payload; resolves once the user finished or dismissed it
    fn share(&self, payload: SharePayload) -> BoxFuture<'static, Result<(), ShareError>>;
}

/// Host without any share capability
#[derive(Debug, Default, Clone, Copy)]
pub struct NoShare;

impl ShareTarget for NoShare {
    fn is_available(&self) -> bool {
        false
    }

    fn share(&self, _payload: SharePayload) -> BoxFuture<'static, Result<(), ShareError>> {
        Box::pin(async { Err(ShareError::Unavailable) })
    }
}

/// Writes the payload to a scratch file and opens it with the default app
#[derive(Debug, Clone)]
pub struct DesktopOpenShare {
    scratch_dir: PathBuf,
}

impl Default for DesktopOpenShare {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir().join(APP_DIR_NAME),
        }
    }
}

impl DesktopOpenShare {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShareTarget for DesktopOpenShare {
    fn is_available(&self) -> bool {
        true
    }

    fn share(&self, payload: SharePayload) -> BoxFuture<'static, Result<(), ShareError>> {
        let scratch_dir = self.scratch_dir.clone();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || {
                std::fs::create_dir_all(&scratch_dir)
                    .map_err(|e| ShareError::Failed(e.to_string()))?;
                let path = scratch_dir.join(&payload.file_name);
                std::fs::write(&path, payload.data.as_slice())
                    .map_err(|e| ShareError::Failed(e.to_string()))?;
                debug!(path = %path.display(), title = %payload.title, "Opening strip for sharing");

                open::that_detached(&path).map_err(|e| ShareError::Failed(e.to_string()))?;
                info!(path = %path.display(), "Handed strip to desktop opener");
                Ok(())
            })
            .await
            .map_err(|e| ShareError::Failed(format!("Share task failed: {}", e)))?
        })
    }
}

/// Share target returning a fixed outcome and recording payloads
#[derive(Debug)]
pub struct ScriptedShare {
    outcome: Result<(), ShareError>,
    shared: Mutex<Vec<SharePayload>>,
}

impl ScriptedShare {
    /// Every share attempt resolves to `outcome`
    pub fn new(outcome: Result<(), ShareError>) -> Self {
        Self {
            outcome,
            shared: Mutex::new(Vec::new()),
        }
    }

    /// Payloads received so far
    pub fn payloads(&self) -> Vec<SharePayload> {
        self.shared
            .lock()
            .map(|shared| shared.clone())
            .unwrap_or_default()
    }
}

impl ShareTarget for ScriptedShare {
    fn is_available(&self) -> bool {
        self.outcome != Err(ShareError::Unavailable)
    }

    fn share(&self, payload: SharePayload) -> BoxFuture<'static, Result<(), ShareError>> {
        if let Ok(mut shared) = self.shared.lock() {
            shared.push(payload);
        }
        let outcome = self.outcome.clone();
        Box::pin(async move { outcome })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> SharePayload {
        SharePayload {
            file_name: "photo-strip.jpg".into(),
            mime_type: "image/jpeg".into(),
            data: Arc::new(vec![0xFF, 0xD8]),
            title: "Photo Strip".into(),
            text: "Check out my photo strip!".into(),
        }
    }

    #[tokio::test]
    async fn test_no_share_is_unavailable() {
        assert!(!NoShare.is_available());
        assert_eq!(NoShare.share(payload()).await, Err(ShareError::Unavailable));
    }

    #[tokio::test]
    async fn test_scripted_share_records_payload() {
        let target = ScriptedShare::new(Err(ShareError::Cancelled));
        assert!(target.is_available());
        assert_eq!(target.share(payload()).await, Err(ShareError::Cancelled));
        assert_eq!(target.payloads().len(), 1);
        assert_eq!(target.payloads()[0].title, "Photo Strip");
    }
}
