// SPDX-License-Identifier: GPL-3.0-only

//! Terminal photo booth
//!
//! Renders the live preview and the film strip to the terminal using Unicode
//! half-block characters for improved vertical resolution. Input is mapped
//! onto the same [`Message`]s a touch front-end would send.

use crate::app::{AppModel, CaptureStage, CameraStatus, Executor, Message, PhotoId, View};
use crate::backends::camera::types::CameraFrame;
use crate::constants::strip::SWAP_THRESHOLD;
use crate::filters::{FilterType, SwipeDirection};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use image::RgbaImage;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use std::collections::HashMap;
use std::io::{self, stdout};
use std::time::Duration;
use tracing::{info, warn};

/// Thumbnail edge length for the review view, in pixels
const THUMBNAIL_SIZE: u32 = 96;

/// Run the terminal photo booth until the user quits
///
/// Must be called inside a tokio runtime; deferred work of the model is
/// spawned on it.
pub fn run(model: AppModel) -> Result<(), Box<dyn std::error::Error>> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, model);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// UI-only state that the model does not care about
struct Ui {
    /// Highlighted photo in the review view
    selected: usize,
    thumbnails: ThumbnailCache,
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut model: AppModel,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut executor = Executor::new();
    let mut ui = Ui {
        selected: 0,
        thumbnails: ThumbnailCache::default(),
    };

    loop {
        // Drain camera frames and finished tasks
        model.pump_camera();
        while let Some(message) = executor.try_next() {
            executor.spawn(model.update(message));
        }

        ui.selected = ui.selected.min(model.session.len().saturating_sub(1));
        ui.thumbnails.sync(&model);

        // Draw
        terminal.draw(|f| {
            let area = f.area();
            let header_area = Rect {
                height: 1.min(area.height),
                ..area
            };
            let body_area = Rect {
                x: area.x,
                y: area.y + 1,
                width: area.width,
                height: area.height.saturating_sub(2),
            };
            let status_area = Rect {
                x: area.x,
                y: area.height.saturating_sub(1),
                width: area.width,
                height: 1,
            };

            f.render_widget(Header { model: &model }, header_area);
            match model.view() {
                View::Capture => f.render_widget(CaptureView { model: &model }, body_area),
                View::Review => f.render_widget(
                    ReviewView {
                        model: &model,
                        selected: ui.selected,
                        thumbnails: &ui.thumbnails,
                    },
                    body_area,
                ),
            }

            let message = status_message(&model);
            f.render_widget(StatusBar { message: &message }, status_area);
        })?;

        // Handle input with timeout for frame updates
        if event::poll(Duration::from_millis(16))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            // Ctrl+C or 'q' to quit
            if (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
                || key.code == KeyCode::Char('q')
            {
                info!("Quit requested");
                break;
            }

            for message in key_messages(&model, &mut ui, key) {
                executor.spawn(model.update(message));
            }
        }
    }

    Ok(())
}

/// Translate a key press into messages for the current view
fn key_messages(model: &AppModel, ui: &mut Ui, key: KeyEvent) -> Vec<Message> {
    if key.code == KeyCode::Tab {
        let target = match model.view() {
            View::Capture => View::Review,
            View::Review => View::Capture,
        };
        return vec![Message::Navigate(target)];
    }

    match model.view() {
        View::Capture => match key.code {
            // Arrow keys follow the finger: moving it left shows the next filter
            KeyCode::Right | KeyCode::Char('l') => {
                vec![Message::SwipeFilter(SwipeDirection::Left)]
            }
            KeyCode::Left | KeyCode::Char('h') => {
                vec![Message::SwipeFilter(SwipeDirection::Right)]
            }
            KeyCode::Char(' ') | KeyCode::Enter => vec![Message::Capture],
            KeyCode::Char('t') => vec![Message::ToggleTimer],
            KeyCode::Char('f') => vec![Message::ToggleFlash],
            _ => Vec::new(),
        },
        View::Review => {
            let count = model.session.len();
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    ui.selected = ui.selected.saturating_sub(1);
                    Vec::new()
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    ui.selected = (ui.selected + 1).min(count.saturating_sub(1));
                    Vec::new()
                }
                KeyCode::Char('K') => move_selected(ui, count, -1),
                KeyCode::Char('J') => move_selected(ui, count, 1),
                KeyCode::Char('d') | KeyCode::Delete | KeyCode::Backspace => {
                    vec![Message::SwipeDelete { index: ui.selected }]
                }
                KeyCode::Char('s') => vec![Message::Export],
                KeyCode::Char('S') => vec![Message::Share],
                KeyCode::Char('n') => {
                    ui.selected = 0;
                    vec![Message::NewStrip]
                }
                _ => Vec::new(),
            }
        }
    }
}

/// Keyboard reorder, expressed as a drag just past the swap threshold
fn move_selected(ui: &mut Ui, count: usize, step: i32) -> Vec<Message> {
    let target = ui.selected as i64 + step as i64;
    if count < 2 || target < 0 || target >= count as i64 {
        return Vec::new();
    }
    let index = ui.selected;
    ui.selected = target as usize;
    vec![
        Message::DragStart { index, y: 0.0 },
        Message::DragMove {
            y: step as f32 * (SWAP_THRESHOLD + 1.0),
        },
        Message::DragEnd,
    ]
}

fn status_message(model: &AppModel) -> String {
    if let Some(message) = &model.status_message {
        return message.clone();
    }
    match model.view() {
        View::Capture => {
            let timer = if model.session.timer_enabled() {
                "on"
            } else {
                "off"
            };
            let flash = if model.session.flash_enabled() {
                "on"
            } else {
                "off"
            };
            format!(
                "←/→ filter | space capture | 't' timer [{}] | 'f' flash [{}] | tab strip | 'q' quit",
                timer, flash
            )
        }
        View::Review => "↑/↓ select | J/K move | 'd' delete | 's' save | 'S' share | 'n' new strip | tab camera | 'q' quit".to_string(),
    }
}

/// Decoded thumbnails keyed by photo
///
/// Photos are immutable, so each one is decoded exactly once.
#[derive(Default)]
struct ThumbnailCache {
    entries: HashMap<PhotoId, RgbaImage>,
}

impl ThumbnailCache {
    fn sync(&mut self, model: &AppModel) {
        let photos = model.session.photos();
        self.entries
            .retain(|id, _| photos.iter().any(|photo| photo.id == *id));

        for photo in photos {
            if self.entries.contains_key(&photo.id) {
                continue;
            }
            match photo.image.decode() {
                Ok(image) => {
                    let thumbnail = image::imageops::thumbnail(&image, THUMBNAIL_SIZE, THUMBNAIL_SIZE);
                    self.entries.insert(photo.id, thumbnail);
                }
                Err(e) => {
                    warn!(id = %photo.id, error = %e, "Failed to decode thumbnail");
                    self.entries
                        .insert(photo.id, RgbaImage::new(1, 1));
                }
            }
        }
    }

    fn get(&self, id: PhotoId) -> Option<&RgbaImage> {
        self.entries.get(&id)
    }
}

/// Title line with progress and view tabs
struct Header<'a> {
    model: &'a AppModel,
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(Color::White).bg(Color::Black);
        fill(buf, area, style);

        buf.set_string(area.x + 1, area.y, "PHOTO BOOTH", style.add_modifier(Modifier::BOLD));

        let progress = self.model.progress_label();
        let center = area.x + area.width.saturating_sub(progress.len() as u16) / 2;
        buf.set_string(center, area.y, &progress, style.fg(Color::Yellow));

        let mut x = area.x + area.width.saturating_sub(16);
        for view in [View::Capture, View::Review] {
            let tab_style = if self.model.view() == view {
                style.add_modifier(Modifier::REVERSED)
            } else {
                style.fg(Color::Gray)
            };
            let label = format!(" {} ", view.label());
            buf.set_string(x, area.y, &label, tab_style);
            x += label.len() as u16 + 1;
        }
    }
}

/// Live preview with capture overlays
struct CaptureView<'a> {
    model: &'a AppModel,
}

impl Widget for CaptureView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width < 4 {
            return;
        }
        let model = self.model;
        let preview_area = Rect {
            height: area.height - 1,
            ..area
        };

        match (&model.camera_status, &model.current_frame) {
            (CameraStatus::Unavailable(reason), _) => {
                centered(buf, preview_area, "Camera unavailable", Style::default().fg(Color::Red));
                let below = Rect {
                    y: preview_area.y + 1,
                    ..preview_area
                };
                centered(buf, below, reason, Style::default().fg(Color::Gray));
            }
            (_, Some(frame)) => {
                let (width, height) = fit(frame.width, frame.height, preview_area);
                let preview = preview_image(
                    frame,
                    width as u32,
                    height as u32 * 2,
                    model.config.mirror_preview,
                    model.selected_filter(),
                );
                HalfBlockImage { image: &preview }.render(preview_area, buf);
            }
            (_, None) => {
                centered(buf, preview_area, "Waiting for camera...", Style::default());
            }
        }

        if model.flash_active {
            fill(buf, preview_area, Style::default().bg(Color::White).fg(Color::White));
        }

        if let CaptureStage::Counting { .. } = model.capture_stage {
            let text = format!("  {}  ", model.session.countdown());
            centered(
                buf,
                preview_area,
                &text,
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        }

        if model.capture_stage.is_processing() {
            let top = Rect {
                height: 1,
                ..preview_area
            };
            centered(buf, top, " Processing... ", Style::default().fg(Color::Black).bg(Color::Gray));
        }

        if model.swipe_hint_visible && model.camera_ready() {
            let bottom = Rect {
                y: preview_area.y + preview_area.height.saturating_sub(1),
                height: 1,
                ..preview_area
            };
            centered(buf, bottom, "← swipe for filters →", Style::default().fg(Color::White));
        }

        // Filter carousel under the preview
        let carousel = Rect {
            y: area.y + area.height - 1,
            height: 1,
            ..area
        };
        let labels: Vec<String> = FilterType::ALL
            .iter()
            .map(|filter| format!(" {} ", filter.display_name()))
            .collect();
        let total: usize = labels.iter().map(|label| label.chars().count() + 1).sum();
        let mut x = carousel.x + carousel.width.saturating_sub(total as u16) / 2;
        for (filter, label) in FilterType::ALL.iter().zip(&labels) {
            let style = if *filter == model.selected_filter() {
                Style::default().fg(Color::Black).bg(Color::White)
            } else {
                Style::default().fg(Color::Gray)
            };
            buf.set_string(x, carousel.y, label, style);
            x += label.chars().count() as u16 + 1;
        }
    }
}

/// Film strip review: thumbnails stacked vertically
struct ReviewView<'a> {
    model: &'a AppModel,
    selected: usize,
    thumbnails: &'a ThumbnailCache,
}

impl Widget for ReviewView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let photos = self.model.session.photos();
        if photos.is_empty() {
            centered(buf, area, "No photos yet. Press tab to start.", Style::default());
            return;
        }

        let slot_height = (area.height / photos.len() as u16).max(3);
        let thumb_width = (slot_height.saturating_sub(1) * 2).min(area.width.saturating_sub(20));
        let x = area.x + area.width.saturating_sub(thumb_width) / 2;

        for (index, photo) in photos.iter().enumerate() {
            let y = area.y + index as u16 * slot_height;
            if y + slot_height > area.y + area.height {
                break;
            }
            let slot = Rect {
                x,
                y,
                width: thumb_width,
                height: slot_height - 1,
            };

            if let Some(thumbnail) = self.thumbnails.get(photo.id) {
                HalfBlockImage { image: thumbnail }.render(slot, buf);
            }

            let removing = self.model.film_strip.is_removing(photo.id);
            let marker_style = if removing {
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
            } else if index == self.selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let marker = if index == self.selected { "▶" } else { " " };
            let label = format!("{} {} {}", marker, index + 1, photo.filter.display_name());
            buf.set_string(
                x.saturating_sub(label.chars().count() as u16 + 1),
                y + slot.height / 2,
                &label,
                marker_style,
            );
            buf.set_string(
                x + thumb_width + 1,
                y + slot.height / 2,
                photo.captured_at.format("%H:%M:%S").to_string(),
                Style::default().fg(Color::DarkGray),
            );
        }

        if self.model.export_in_progress {
            let top = Rect { height: 1, ..area };
            centered(buf, top, " Working... ", Style::default().fg(Color::Black).bg(Color::Gray));
        }
    }
}

/// Build the preview at the display size: sample, mirror, then filter
fn preview_image(
    frame: &CameraFrame,
    width: u32,
    height: u32,
    mirror: bool,
    filter: FilterType,
) -> RgbaImage {
    let width = width.max(1);
    let height = height.max(1);
    let x_scale = frame.width as f64 / width as f64;
    let y_scale = frame.height as f64 / height as f64;

    let mut image = RgbaImage::from_fn(width, height, |x, y| {
        let src_x = if mirror { width - 1 - x } else { x };
        let (r, g, b) = sample_pixel_rgb(
            frame,
            (src_x as f64 * x_scale) as u32,
            (y as f64 * y_scale) as u32,
        );
        image::Rgba([r, g, b, 255])
    });
    filter.apply(&mut image);
    image
}

fn sample_pixel_rgb(frame: &CameraFrame, x: u32, y: u32) -> (u8, u8, u8) {
    let x = x.min(frame.width.saturating_sub(1));
    let y = y.min(frame.height.saturating_sub(1));
    let idx = ((y * frame.width + x) * 4) as usize;
    match frame.data.get(idx..idx + 3) {
        Some(rgb) => (rgb[0], rgb[1], rgb[2]),
        None => (0, 0, 0),
    }
}

/// Display size in cells that keeps the aspect ratio inside `area`
///
/// Each terminal cell displays 2 vertical pixels using half-block characters.
fn fit(width: u32, height: u32, area: Rect) -> (u16, u16) {
    if width == 0 || height == 0 {
        return (0, 0);
    }
    let aspect = width as f64 / height as f64;
    let term_width = area.width as f64;
    let term_height = (area.height * 2) as f64; // *2 because half-blocks

    if term_width / term_height > aspect {
        // Terminal is wider - fit to height
        let w = term_height * aspect;
        (w as u16, (term_height / 2.0) as u16)
    } else {
        // Terminal is taller - fit to width
        let h = term_width / aspect;
        (term_width as u16, (h / 2.0) as u16)
    }
}

/// Widget that renders an image using half-block characters
struct HalfBlockImage<'a> {
    image: &'a RgbaImage,
}

impl Widget for HalfBlockImage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (display_width, display_height) = fit(self.image.width(), self.image.height(), area);
        if display_width == 0 || display_height == 0 {
            return;
        }

        // Center the image
        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        let x_scale = self.image.width() as f64 / display_width as f64;
        let y_scale = self.image.height() as f64 / (display_height * 2) as f64;

        // Upper half (▀) colored with fg, lower half with bg
        for ty in 0..display_height {
            for tx in 0..display_width {
                let term_x = x_offset + tx;
                let term_y = y_offset + ty;

                if term_x >= area.x + area.width || term_y >= area.y + area.height {
                    continue;
                }

                let src_x = (tx as f64 * x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                if let Some(cell) = buf.cell_mut((term_x, term_y)) {
                    cell.set_char('▀');
                    cell.set_fg(pixel_color(self.image, src_x, src_y_top));
                    cell.set_bg(pixel_color(self.image, src_x, src_y_bottom));
                }
            }
        }
    }
}

fn pixel_color(image: &RgbaImage, x: u32, y: u32) -> Color {
    let x = x.min(image.width().saturating_sub(1));
    let y = y.min(image.height().saturating_sub(1));
    let [r, g, b, _] = image.get_pixel(x, y).0;
    Color::Rgb(r, g, b)
}

fn fill(buf: &mut Buffer, area: Rect, style: Style) {
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char(' ');
                cell.set_style(style);
            }
        }
    }
}

/// Write `text` centered on the middle row of `area`
fn centered(buf: &mut Buffer, area: Rect, text: &str, style: Style) {
    if area.height == 0 {
        return;
    }
    let len = text.chars().count() as u16;
    let x = area.x + area.width.saturating_sub(len) / 2;
    let y = area.y + area.height / 2;
    buf.set_string(x, y, text, style);
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(Color::White).bg(Color::DarkGray);
        fill(buf, area, style);

        let text: String = self.message.chars().take(area.width as usize).collect();
        buf.set_string(area.x, area.y, text, style);
    }
}
