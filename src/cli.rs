// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for the photo booth
//!
//! This module provides command-line functionality for:
//! - Running the interactive terminal booth
//! - Listing cameras and filters
//! - Capturing a strip headlessly

use photobooth::app::{AppModel, Backends, CameraStatus, Executor, Message, Task};
use photobooth::backends::audio::Silent;
use photobooth::backends::camera::get_backend;
use photobooth::backends::feedback::NoHaptics;
use photobooth::backends::share::{DesktopOpenShare, NoShare, ShareTarget};
use photobooth::config::Config;
use photobooth::constants::TARGET_PHOTO_COUNT;
use photobooth::filters::FilterType;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// How long to wait for the camera to deliver its first frame
const CAMERA_TIMEOUT: Duration = Duration::from_secs(5);
/// Poll interval while waiting on the camera or the debounce window
const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Run the interactive booth
pub fn run_terminal(config: Config, synthetic: bool) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    let model = AppModel::new(config, Backends::desktop(synthetic));
    photobooth::terminal::run(model)
}

/// List all available cameras
pub fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    let backend = get_backend(false);
    let cameras = backend.enumerate_cameras();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for camera in &cameras {
        println!("  [{}] {}", camera.index, camera.name);
        println!("      Device: {} ({})", camera.path, camera.driver);
    }
    println!();

    Ok(())
}

/// List the filter catalog
pub fn list_filters() -> Result<(), Box<dyn std::error::Error>> {
    for (index, filter) in FilterType::ALL.iter().enumerate() {
        println!("  [{}] {:<8} {}", index, filter.display_name(), filter.css());
    }
    Ok(())
}

/// Print the effective configuration, optionally writing it out
pub fn show_config(config: &Config, init: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = Config::default_path().ok_or("No config directory available")?;

    if init {
        config.save_to(&path)?;
        println!("Config written: {}", path.display());
    } else {
        println!("Config file: {}", path.display());
    }
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

/// Capture one photo per filter and export (or share) the strip
pub fn capture_strip(
    config: Config,
    filters: Vec<FilterType>,
    synthetic: bool,
    share: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if filters.is_empty() || filters.len() > TARGET_PHOTO_COUNT {
        return Err(format!("Expected 1 to {} filters", TARGET_PHOTO_COUNT).into());
    }

    let share_target: Arc<dyn ShareTarget> = if share {
        Arc::new(DesktopOpenShare::new())
    } else {
        Arc::new(NoShare)
    };
    let backends = Backends {
        camera: get_backend(synthetic),
        haptics: Arc::new(NoHaptics),
        shutter: Arc::new(Silent),
        share: share_target,
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let mut booth = HeadlessBooth::new(AppModel::new(config, backends));
        booth.wait_for_camera().await?;

        for (index, filter) in filters.iter().enumerate() {
            booth.capture(*filter).await?;
            println!(
                "Captured {}/{}: {}",
                index + 1,
                TARGET_PHOTO_COUNT,
                filter.display_name()
            );
        }

        let message = if share { Message::Share } else { Message::Export };
        booth.dispatch(message);
        booth.settle().await;

        match booth.model.last_export.as_ref() {
            Some(path) => println!("Strip saved: {}", path.display()),
            None if share && booth.model.status_message.as_deref() == Some("Strip shared") => {
                println!("Strip shared")
            }
            None => {
                let reason = booth
                    .model
                    .status_message
                    .clone()
                    .unwrap_or_else(|| "Export failed".to_string());
                return Err(reason.into());
            }
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

/// Drives the model without a UI, the way the terminal loop does
struct HeadlessBooth {
    model: AppModel,
    executor: Executor,
    pending: usize,
}

impl HeadlessBooth {
    fn new(model: AppModel) -> Self {
        Self {
            model,
            executor: Executor::new(),
            pending: 0,
        }
    }

    fn dispatch(&mut self, message: Message) -> bool {
        let task = self.model.update(message);
        self.spawn(task)
    }

    fn spawn(&mut self, task: Task) -> bool {
        let accepted = !task.is_empty();
        self.pending += task.len();
        self.executor.spawn(task);
        accepted
    }

    /// Feed completed work back into the model until nothing is scheduled
    async fn settle(&mut self) {
        while self.pending > 0 {
            let Some(message) = self.executor.next().await else {
                break;
            };
            self.pending -= 1;
            let task = self.model.update(message);
            self.spawn(task);
        }
    }

    async fn wait_for_camera(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let deadline = Instant::now() + CAMERA_TIMEOUT;
        loop {
            self.model.pump_camera();
            match &self.model.camera_status {
                CameraStatus::Ready => return Ok(()),
                CameraStatus::Unavailable(reason) => {
                    return Err(format!("Camera unavailable: {}", reason).into());
                }
                CameraStatus::Starting | CameraStatus::Stopped => {}
            }
            if Instant::now() >= deadline {
                return Err("Timed out waiting for the camera".into());
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Select `filter` and press the shutter until the trigger is accepted
    async fn capture(&mut self, filter: FilterType) -> Result<(), Box<dyn std::error::Error>> {
        self.model.filter_picker.select(filter);
        let before = self.model.session.len();

        // The debounce window rejects presses that come too quickly
        let deadline = Instant::now() + CAMERA_TIMEOUT;
        loop {
            self.model.pump_camera();
            if self.dispatch(Message::Capture) {
                break;
            }
            if Instant::now() >= deadline {
                return Err("Capture was not accepted".into());
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
        self.settle().await;

        if self.model.session.len() == before {
            let reason = self
                .model
                .status_message
                .clone()
                .unwrap_or_else(|| "Capture failed".to_string());
            return Err(reason.into());
        }
        Ok(())
    }
}
