// SPDX-License-Identifier: GPL-3.0-only

//! Film strip rasterization
//!
//! Lays the photos out top to bottom on a dark film plate with sprocket
//! perforations along both edges and exposure marks on the right border.
//! Layout is computed in layout pixels and multiplied by `scale` when
//! rasterizing, so the export is sharp on high density screens.

use crate::constants::strip::{
    BORDER_WIDTH, EXPOSURE_MARKS, FRAME_GAP, FRAME_HEIGHT, FRAME_WIDTH, PERFORATIONS,
    VERTICAL_PADDING,
};
use crate::errors::ExportError;
use image::{Rgba, RgbaImage, imageops};

const PLATE_COLOR: [u8; 3] = [26, 26, 26];
const PERFORATION_COLOR: [u8; 3] = [236, 236, 230];
const EXPOSURE_MARK_COLOR: [u8; 3] = [255, 165, 0];
const CORNER_MARK_COLOR: [u8; 3] = [255, 255, 255];
/// Peak amplitude of the film grain noise
const GRAIN_AMPLITUDE: i16 = 6;

/// Axis-aligned rectangle in output pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Geometry of a strip holding `photo_count` frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripLayout {
    pub photo_count: u32,
    pub scale: u32,
}

impl StripLayout {
    pub fn new(photo_count: usize, scale: u32) -> Self {
        Self {
            photo_count: photo_count as u32,
            scale: scale.max(1),
        }
    }

    pub fn width(&self) -> u32 {
        (BORDER_WIDTH * 2 + FRAME_WIDTH) * self.scale
    }

    pub fn height(&self) -> u32 {
        let frames = self.photo_count * FRAME_HEIGHT;
        let gaps = self.photo_count.saturating_sub(1) * FRAME_GAP;
        (VERTICAL_PADDING * 2 + frames + gaps) * self.scale
    }

    /// Where photo `index` is placed
    pub fn frame_rect(&self, index: u32) -> Rect {
        let s = self.scale;
        Rect {
            x: BORDER_WIDTH * s,
            y: (VERTICAL_PADDING + index * (FRAME_HEIGHT + FRAME_GAP)) * s,
            width: FRAME_WIDTH * s,
            height: FRAME_HEIGHT * s,
        }
    }

    /// Sprocket holes, evenly spaced down both borders
    pub fn perforations(&self) -> Vec<Rect> {
        let s = self.scale;
        let hole_w = BORDER_WIDTH * s * 2 / 5;
        let hole_h = (hole_w * 3 / 4).max(1);
        let pitch = self.height() / PERFORATIONS;
        let left_x = (BORDER_WIDTH * s - hole_w) / 2;
        let right_x = self.width() - BORDER_WIDTH * s + left_x;

        (0..PERFORATIONS)
            .flat_map(|i| {
                let y = i * pitch + (pitch.saturating_sub(hole_h)) / 2;
                [left_x, right_x].map(|x| Rect {
                    x,
                    y,
                    width: hole_w,
                    height: hole_h,
                })
            })
            .collect()
    }

    /// Exposure marks at 12% steps down the right border
    pub fn exposure_marks(&self) -> Vec<Rect> {
        let s = self.scale;
        let mark_w = (BORDER_WIDTH * s / 5).max(1);
        let mark_h = (2 * s).max(1);
        // Between the frame edge and the perforations
        let x = self.width() - BORDER_WIDTH * s + s;

        (1..=EXPOSURE_MARKS)
            .map(|i| Rect {
                x,
                y: self.height() * i * 12 / 100,
                width: mark_w,
                height: mark_h,
            })
            .filter(|rect| rect.y + rect.height <= self.height())
            .collect()
    }
}

/// Compose the strip from decoded photos, in order
pub fn compose_strip(photos: &[RgbaImage], scale: u32) -> Result<RgbaImage, ExportError> {
    if photos.is_empty() {
        return Err(ExportError::EmptyStrip);
    }

    let layout = StripLayout::new(photos.len(), scale);
    let mut canvas = RgbaImage::new(layout.width(), layout.height());
    paint_plate(&mut canvas);

    for hole in layout.perforations() {
        fill_rect(&mut canvas, hole, PERFORATION_COLOR);
    }
    for mark in layout.exposure_marks() {
        fill_rect(&mut canvas, mark, EXPOSURE_MARK_COLOR);
    }

    for (index, photo) in photos.iter().enumerate() {
        if photo.width() == 0 || photo.height() == 0 {
            return Err(ExportError::CompositionFailed(format!(
                "photo {} has no pixels",
                index + 1
            )));
        }
        let rect = layout.frame_rect(index as u32);
        let fitted = cover_fit(photo, rect.width, rect.height);
        imageops::replace(&mut canvas, &fitted, rect.x as i64, rect.y as i64);
        paint_corner_marks(&mut canvas, rect, layout.scale);
    }

    Ok(canvas)
}

/// Scale to cover `width`x`height` and crop the overflow evenly
pub fn cover_fit(photo: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (src_w, src_h) = photo.dimensions();
    let scale = f64::max(
        width as f64 / src_w as f64,
        height as f64 / src_h as f64,
    );
    let crop_w = ((width as f64 / scale).round() as u32).clamp(1, src_w);
    let crop_h = ((height as f64 / scale).round() as u32).clamp(1, src_h);
    let x = (src_w - crop_w) / 2;
    let y = (src_h - crop_h) / 2;

    let cropped = imageops::crop_imm(photo, x, y, crop_w, crop_h).to_image();
    imageops::resize(&cropped, width, height, imageops::FilterType::Triangle)
}

fn paint_plate(canvas: &mut RgbaImage) {
    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        let noise = grain(x, y);
        let [r, g, b] = PLATE_COLOR.map(|c| (c as i16 + noise).clamp(0, 255) as u8);
        *pixel = Rgba([r, g, b, 255]);
    }
}

/// Deterministic per-pixel grain in `-GRAIN_AMPLITUDE..=GRAIN_AMPLITUDE`
fn grain(x: u32, y: u32) -> i16 {
    let mut h = x.wrapping_mul(0x9E37_79B1) ^ y.wrapping_mul(0x85EB_CA77);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    (h % (GRAIN_AMPLITUDE as u32 * 2 + 1)) as i16 - GRAIN_AMPLITUDE
}

fn fill_rect(canvas: &mut RgbaImage, rect: Rect, rgb: [u8; 3]) {
    let x_end = (rect.x + rect.width).min(canvas.width());
    let y_end = (rect.y + rect.height).min(canvas.height());
    for y in rect.y..y_end {
        for x in rect.x..x_end {
            canvas.put_pixel(x, y, Rgba([rgb[0], rgb[1], rgb[2], 255]));
        }
    }
}

/// Small L-shaped marks in each corner of a frame
fn paint_corner_marks(canvas: &mut RgbaImage, frame: Rect, scale: u32) {
    let len = 8 * scale;
    let thick = scale;
    let inset = 4 * scale;
    let left = frame.x + inset;
    let top = frame.y + inset;
    let right = frame.x + frame.width - inset;
    let bottom = frame.y + frame.height - inset;

    let segments = [
        // top-left
        Rect { x: left, y: top, width: len, height: thick },
        Rect { x: left, y: top, width: thick, height: len },
        // top-right
        Rect { x: right - len, y: top, width: len, height: thick },
        Rect { x: right - thick, y: top, width: thick, height: len },
        // bottom-left
        Rect { x: left, y: bottom - thick, width: len, height: thick },
        Rect { x: left, y: bottom - len, width: thick, height: len },
        // bottom-right
        Rect { x: right - len, y: bottom - thick, width: len, height: thick },
        Rect { x: right - thick, y: bottom - len, width: thick, height: len },
    ];
    for segment in segments {
        fill_rect(canvas, segment, CORNER_MARK_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_dimensions() {
        let layout = StripLayout::new(3, 1);
        assert_eq!(layout.width(), 300);
        assert_eq!(layout.height(), 30 + 180 * 3 + 20 * 2 + 30);

        let scaled = StripLayout::new(3, 2);
        assert_eq!(scaled.width(), 600);
        assert_eq!(scaled.height(), layout.height() * 2);
        assert_eq!(scaled.frame_rect(1).y, (30 + 200) * 2);
    }

    #[test]
    fn test_decoration_counts() {
        let layout = StripLayout::new(3, 2);
        assert_eq!(layout.perforations().len(), 16);
        assert_eq!(layout.exposure_marks().len(), 8);
        for hole in layout.perforations() {
            assert!(hole.x + hole.width <= layout.width());
            assert!(hole.y + hole.height <= layout.height());
        }
    }

    #[test]
    fn test_empty_strip_is_an_error() {
        assert!(matches!(compose_strip(&[], 2), Err(ExportError::EmptyStrip)));
    }

    #[test]
    fn test_photos_land_in_order() {
        let red = RgbaImage::from_pixel(40, 40, Rgba([250, 0, 0, 255]));
        let blue = RgbaImage::from_pixel(40, 40, Rgba([0, 0, 250, 255]));
        let strip = compose_strip(&[red, blue], 1).unwrap();

        let layout = StripLayout::new(2, 1);
        let first = layout.frame_rect(0);
        let second = layout.frame_rect(1);
        let center = |r: Rect| strip.get_pixel(r.x + r.width / 2, r.y + r.height / 2).0;
        assert_eq!(center(first), [250, 0, 0, 255]);
        assert_eq!(center(second), [0, 0, 250, 255]);
    }

    #[test]
    fn test_cover_fit_fills_target() {
        let wide = RgbaImage::from_pixel(400, 100, Rgba([1, 2, 3, 255]));
        let fitted = cover_fit(&wide, 220, 180);
        assert_eq!(fitted.dimensions(), (220, 180));
    }

    #[test]
    fn test_grain_is_bounded() {
        for (x, y) in [(0, 0), (17, 3), (599, 1279), (u32::MAX, 5)] {
            assert!(grain(x, y).abs() <= GRAIN_AMPLITUDE);
        }
    }
}
