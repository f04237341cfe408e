// SPDX-License-Identifier: MPL-2.0

//! End-to-end booth session driven through messages

use photobooth::app::{AppModel, Backends, Executor, Message, View};
use photobooth::backends::audio::CountingShutter;
use photobooth::backends::camera::synthetic::{SyntheticBackend, TestPattern};
use photobooth::backends::feedback::RecordingHaptics;
use photobooth::backends::share::ScriptedShare;
use photobooth::constants::haptics;
use photobooth::errors::ShareError;
use photobooth::filters::{FilterType, SwipeDirection};
use photobooth::Config;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

struct Booth {
    model: AppModel,
    executor: Executor,
    pending: usize,
}

impl Booth {
    fn send(&mut self, message: Message) {
        let task = self.model.update(message);
        self.pending += task.len();
        self.executor.spawn(task);
    }

    async fn settle(&mut self) {
        while self.pending > 0 {
            let message = self.executor.next().await.expect("executor closed");
            self.pending -= 1;
            self.send(message);
        }
    }
}

fn export_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "photobooth-scenario-{}-{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn booth(
    camera: SyntheticBackend,
    share: ScriptedShare,
    export_dir: PathBuf,
) -> (Booth, Arc<RecordingHaptics>, Arc<CountingShutter>) {
    let haptics = Arc::new(RecordingHaptics::new());
    let shutter = Arc::new(CountingShutter::new());
    let config = Config {
        export_dir,
        capture_width: 64,
        capture_height: 64,
        ..Config::default()
    };
    let backends = Backends {
        camera: Box::new(camera),
        haptics: haptics.clone(),
        shutter: shutter.clone(),
        share: Arc::new(share),
    };
    let mut model = AppModel::new(config, backends);
    model.pump_camera();
    (
        Booth {
            model,
            executor: Executor::new(),
            pending: 0,
        },
        haptics,
        shutter,
    )
}

#[tokio::test(start_paused = true)]
async fn test_three_filtered_shots_then_delete_and_export() {
    let dir = export_dir("full");
    let camera = SyntheticBackend::new().with_pattern(TestPattern::Solid([200, 40, 40]));
    let streams = camera.active_streams();
    let (mut booth, haptics, shutter) = booth(camera, ScriptedShare::new(Ok(())), dir.clone());
    assert!(booth.model.camera_ready());
    assert_eq!(booth.model.progress_label(), "0/3 Photos");

    // Normal
    booth.send(Message::Capture);
    booth.settle().await;

    // Mono
    tokio::time::advance(Duration::from_secs(1)).await;
    booth.send(Message::SwipeFilter(SwipeDirection::Left));
    booth.send(Message::Capture);
    booth.settle().await;

    // Sepia
    tokio::time::advance(Duration::from_secs(1)).await;
    booth.send(Message::SwipeFilter(SwipeDirection::Left));
    booth.send(Message::Capture);
    booth.settle().await;

    assert_eq!(shutter.plays(), 3);
    assert_eq!(haptics.count(haptics::CAPTURE), 3);
    assert_eq!(booth.model.view(), View::Review);
    assert_eq!(booth.model.progress_label(), "3/3 Photos");
    assert_eq!(streams.load(Ordering::SeqCst), 0, "camera released on review");
    assert_eq!(
        booth.model.session.filters(),
        vec![FilterType::Normal, FilterType::Mono, FilterType::Sepia]
    );

    // The Mono photo was baked gray
    let mono = booth.model.session.photos()[1].image.decode().unwrap();
    let [r, g, b, _] = mono.get_pixel(32, 32).0;
    assert!(r.abs_diff(g) <= 3 && g.abs_diff(b) <= 3);

    booth.send(Message::SwipeDelete { index: 1 });
    booth.settle().await;
    assert_eq!(
        booth.model.session.filters(),
        vec![FilterType::Normal, FilterType::Sepia]
    );

    booth.send(Message::Export);
    assert!(booth.model.export_in_progress);
    booth.settle().await;
    assert!(!booth.model.export_in_progress);

    let path = booth.model.last_export.clone().expect("strip exported");
    assert_eq!(path, dir.join("photo-strip.jpg"));
    let strip = image::open(&path).unwrap();
    // Two frames: (30*2 + 2*180 + 20) * 2
    assert_eq!((strip.width(), strip.height()), (600, 880));
    assert_eq!(haptics.count(haptics::CONFIRM), 1);
}

#[tokio::test(start_paused = true)]
async fn test_share_failure_saves_instead() {
    let dir = export_dir("share");
    let (mut booth, haptics, _) = booth(
        SyntheticBackend::new(),
        ScriptedShare::new(Err(ShareError::Failed("no share sheet".into()))),
        dir.clone(),
    );

    booth.send(Message::Capture);
    booth.settle().await;
    booth.send(Message::Navigate(View::Review));
    booth.send(Message::Share);
    booth.settle().await;

    assert!(dir.join("photo-strip.jpg").exists());
    assert_eq!(booth.model.last_export, Some(dir.join("photo-strip.jpg")));
    assert_eq!(haptics.count(haptics::CONFIRM), 1);
}

#[tokio::test(start_paused = true)]
async fn test_new_strip_starts_over() {
    let (mut booth, _, _) = booth(
        SyntheticBackend::new(),
        ScriptedShare::new(Ok(())),
        export_dir("restart"),
    );

    booth.send(Message::Capture);
    booth.settle().await;
    booth.send(Message::Navigate(View::Review));
    assert!(!booth.model.holds_camera());

    booth.send(Message::NewStrip);
    assert_eq!(booth.model.view(), View::Capture);
    assert!(booth.model.session.is_empty());
    assert!(booth.model.holds_camera());

    booth.model.pump_camera();
    tokio::time::advance(Duration::from_secs(1)).await;
    booth.send(Message::Capture);
    booth.settle().await;
    assert_eq!(booth.model.session.len(), 1);
}
