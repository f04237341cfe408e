// SPDX-License-Identifier: MPL-2.0

//! Integration tests for strip rendering, export and sharing

use image::{Rgb, RgbImage};
use photobooth::backends::share::ScriptedShare;
use photobooth::errors::{ExportError, ShareError};
use photobooth::pipelines::photo::EncodedImage;
use photobooth::pipelines::photo::encoding::encode_jpeg;
use photobooth::pipelines::strip::{ShareOutcome, StripExporter, render_strip};
use std::path::PathBuf;
use std::sync::Arc;

fn photo(color: [u8; 3]) -> Arc<EncodedImage> {
    let image = RgbImage::from_pixel(120, 120, Rgb(color));
    Arc::new(EncodedImage {
        data: encode_jpeg(&image, 85).unwrap(),
        width: 120,
        height: 120,
    })
}

fn strip() -> Vec<Arc<EncodedImage>> {
    vec![photo([220, 30, 30]), photo([30, 220, 30]), photo([30, 30, 220])]
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "photobooth-export-it-{}-{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[tokio::test]
async fn test_render_full_strip_at_export_scale() {
    let rendered = render_strip(strip()).await.unwrap();
    assert_eq!((rendered.width, rendered.height), (600, 1280));

    let decoded = rendered.decode().unwrap();
    assert_eq!(decoded.dimensions(), (600, 1280));
}

#[tokio::test]
async fn test_render_empty_strip_fails() {
    assert_eq!(
        render_strip(Vec::new()).await.unwrap_err(),
        ExportError::EmptyStrip
    );
}

#[tokio::test]
async fn test_photos_keep_their_order() {
    let rendered = render_strip(strip()).await.unwrap().decode().unwrap();

    // Frame centers at scale 2: x = 40*2 + 110*2, y = (30 + i*200 + 90) * 2
    let red = rendered.get_pixel(300, 240).0;
    let green = rendered.get_pixel(300, 640).0;
    let blue = rendered.get_pixel(300, 1040).0;
    assert!(red[0] > 150 && red[1] < 100);
    assert!(green[1] > 150 && green[0] < 100);
    assert!(blue[2] > 150 && blue[1] < 100);
}

#[tokio::test]
async fn test_export_writes_strip_file() {
    let dir = scratch_dir("export");
    let share = Arc::new(ScriptedShare::new(Ok(())));
    let exporter = StripExporter::new(dir.clone(), share.clone());

    let path = exporter.export(strip()).await.unwrap();
    assert_eq!(path, dir.join("photo-strip.jpg"));
    assert!(path.exists());
    assert!(share.payloads().is_empty());
}

#[tokio::test]
async fn test_share_hands_over_jpeg() {
    let dir = scratch_dir("shared");
    let share = Arc::new(ScriptedShare::new(Ok(())));
    let exporter = StripExporter::new(dir.clone(), share.clone());

    let outcome = exporter.share(strip()).await.unwrap();
    assert_eq!(outcome, ShareOutcome::Shared);
    assert!(!dir.join("photo-strip.jpg").exists());

    let payloads = share.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].file_name, "photo-strip.jpg");
    assert_eq!(payloads[0].mime_type, "image/jpeg");
    assert_eq!(&payloads[0].data[..2], &[0xFF, 0xD8]);
}

#[tokio::test]
async fn test_share_failure_falls_back_to_file() {
    let dir = scratch_dir("fallback");
    let share = Arc::new(ScriptedShare::new(Err(ShareError::Cancelled)));
    let exporter = StripExporter::new(dir.clone(), share);

    match exporter.share(strip()).await.unwrap() {
        ShareOutcome::Exported { path, reason } => {
            assert_eq!(path, dir.join("photo-strip.jpg"));
            assert!(path.exists());
            assert_eq!(reason, ShareError::Cancelled);
        }
        other => panic!("expected fallback export, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unavailable_share_skips_target() {
    let dir = scratch_dir("unavailable");
    let share = Arc::new(ScriptedShare::new(Err(ShareError::Unavailable)));
    let exporter = StripExporter::new(dir.clone(), share.clone());

    let outcome = exporter.share(strip()).await.unwrap();
    assert!(matches!(outcome, ShareOutcome::Exported { .. }));
    assert!(share.payloads().is_empty());
}
