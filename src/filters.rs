// SPDX-License-Identifier: GPL-3.0-only

//! Filter catalog
//!
//! A fixed, ordered list of looks. Each look is a chain of CSS filter
//! functions (`grayscale()`, `sepia()`, `contrast()`, ...) evaluated on sRGB
//! values with the matrices from the W3C Filter Effects specification, so a
//! photo filtered here matches what a browser renders for the same CSS value.
//!
//! The filter is baked into the pixels once, at capture time.

use image::RgbaImage;

/// One CSS filter function
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOp {
    /// `grayscale(amount)`, 0.0..=1.0
    Grayscale(f32),
    /// `sepia(amount)`, 0.0..=1.0
    Sepia(f32),
    /// `contrast(amount)`, 1.0 = unchanged
    Contrast(f32),
    /// `brightness(amount)`, 1.0 = unchanged
    Brightness(f32),
    /// `saturate(amount)`, 1.0 = unchanged
    Saturate(f32),
    /// `hue-rotate(degrees)`
    HueRotate(f32),
}

/// Per-pixel transform a [`FilterOp`] compiles down to
#[derive(Debug, Clone, Copy)]
enum ColorTransform {
    Matrix([[f32; 3]; 3]),
    /// `c * slope + intercept` on every channel
    Linear { slope: f32, intercept: f32 },
}

impl FilterOp {
    fn transform(self) -> ColorTransform {
        match self {
            FilterOp::Grayscale(amount) => {
                let s = 1.0 - amount.clamp(0.0, 1.0);
                ColorTransform::Matrix([
                    [0.2126 + 0.7874 * s, 0.7152 - 0.7152 * s, 0.0722 - 0.0722 * s],
                    [0.2126 - 0.2126 * s, 0.7152 + 0.2848 * s, 0.0722 - 0.0722 * s],
                    [0.2126 - 0.2126 * s, 0.7152 - 0.7152 * s, 0.0722 + 0.9278 * s],
                ])
            }
            FilterOp::Sepia(amount) => {
                let s = 1.0 - amount.clamp(0.0, 1.0);
                ColorTransform::Matrix([
                    [0.393 + 0.607 * s, 0.769 - 0.769 * s, 0.189 - 0.189 * s],
                    [0.349 - 0.349 * s, 0.686 + 0.314 * s, 0.168 - 0.168 * s],
                    [0.272 - 0.272 * s, 0.534 - 0.534 * s, 0.131 + 0.869 * s],
                ])
            }
            FilterOp::Saturate(s) => {
                let s = s.max(0.0);
                ColorTransform::Matrix([
                    [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
                    [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
                    [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
                ])
            }
            FilterOp::HueRotate(degrees) => {
                let (sin, cos) = degrees.to_radians().sin_cos();
                ColorTransform::Matrix([
                    [
                        0.213 + cos * 0.787 - sin * 0.213,
                        0.715 - cos * 0.715 - sin * 0.715,
                        0.072 - cos * 0.072 + sin * 0.928,
                    ],
                    [
                        0.213 - cos * 0.213 + sin * 0.143,
                        0.715 + cos * 0.285 + sin * 0.140,
                        0.072 - cos * 0.072 - sin * 0.283,
                    ],
                    [
                        0.213 - cos * 0.213 - sin * 0.787,
                        0.715 - cos * 0.715 + sin * 0.715,
                        0.072 + cos * 0.928 + sin * 0.072,
                    ],
                ])
            }
            FilterOp::Brightness(amount) => ColorTransform::Linear {
                slope: amount.max(0.0),
                intercept: 0.0,
            },
            FilterOp::Contrast(amount) => {
                let amount = amount.max(0.0);
                ColorTransform::Linear {
                    slope: amount,
                    intercept: 0.5 - 0.5 * amount,
                }
            }
        }
    }

    /// CSS text of this function, e.g. `sepia(0.8)`
    pub fn css(&self) -> String {
        match self {
            FilterOp::Grayscale(a) => format!("grayscale({})", a),
            FilterOp::Sepia(a) => format!("sepia({})", a),
            FilterOp::Contrast(a) => format!("contrast({})", a),
            FilterOp::Brightness(a) => format!("brightness({})", a),
            FilterOp::Saturate(a) => format!("saturate({})", a),
            FilterOp::HueRotate(deg) => format!("hue-rotate({}deg)", deg),
        }
    }
}

impl ColorTransform {
    #[inline]
    fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let out = match self {
            ColorTransform::Matrix(m) => [
                m[0][0] * rgb[0] + m[0][1] * rgb[1] + m[0][2] * rgb[2],
                m[1][0] * rgb[0] + m[1][1] * rgb[1] + m[1][2] * rgb[2],
                m[2][0] * rgb[0] + m[2][1] * rgb[1] + m[2][2] * rgb[2],
            ],
            ColorTransform::Linear { slope, intercept } => [
                rgb[0] * slope + intercept,
                rgb[1] * slope + intercept,
                rgb[2] * slope + intercept,
            ],
        };
        // Every filter primitive clamps its result
        [
            out[0].clamp(0.0, 1.0),
            out[1].clamp(0.0, 1.0),
            out[2].clamp(0.0, 1.0),
        ]
    }
}

/// The looks offered by the booth, in swipe order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum FilterType {
    /// No filter applied
    #[default]
    Normal,
    /// Black & white
    Mono,
    /// Warm brownish tint
    Sepia,
    /// Slight contrast and brightness lift with a hint of sepia
    Vintage,
    /// Saturated with a cool hue shift
    Cool,
}

impl FilterType {
    /// Catalog order
    pub const ALL: [FilterType; 5] = [
        FilterType::Normal,
        FilterType::Mono,
        FilterType::Sepia,
        FilterType::Vintage,
        FilterType::Cool,
    ];

    /// Filter at catalog position `index`
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Catalog position of this filter
    pub fn index(self) -> usize {
        match self {
            FilterType::Normal => 0,
            FilterType::Mono => 1,
            FilterType::Sepia => 2,
            FilterType::Vintage => 3,
            FilterType::Cool => 4,
        }
    }

    /// Label shown under the preview
    pub fn display_name(self) -> &'static str {
        match self {
            FilterType::Normal => "Normal",
            FilterType::Mono => "B&W",
            FilterType::Sepia => "Sepia",
            FilterType::Vintage => "Vintage",
            FilterType::Cool => "Cool",
        }
    }

    /// Effect descriptor: the chain of filter functions, applied in order
    pub fn effect(self) -> &'static [FilterOp] {
        match self {
            FilterType::Normal => &[],
            FilterType::Mono => &[FilterOp::Grayscale(1.0)],
            FilterType::Sepia => &[FilterOp::Sepia(0.8)],
            FilterType::Vintage => &[
                FilterOp::Contrast(1.1),
                FilterOp::Brightness(1.1),
                FilterOp::Sepia(0.3),
            ],
            FilterType::Cool => &[FilterOp::Saturate(1.2), FilterOp::HueRotate(20.0)],
        }
    }

    /// CSS `filter` value, used as the filter identifier stored with each photo
    pub fn css(self) -> String {
        let effect = self.effect();
        if effect.is_empty() {
            return "none".to_string();
        }
        effect
            .iter()
            .map(FilterOp::css)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether applying this filter changes any pixel
    pub fn is_identity(self) -> bool {
        self.effect().is_empty()
    }

    /// Apply the effect chain to an RGBA image in place; alpha is preserved
    pub fn apply(self, image: &mut RgbaImage) {
        if self.is_identity() {
            return;
        }
        let transforms: Vec<ColorTransform> =
            self.effect().iter().map(|op| op.transform()).collect();

        for pixel in image.pixels_mut() {
            let mut rgb = [
                pixel[0] as f32 / 255.0,
                pixel[1] as f32 / 255.0,
                pixel[2] as f32 / 255.0,
            ];
            for transform in &transforms {
                rgb = transform.apply(rgb);
            }
            pixel[0] = (rgb[0] * 255.0).round() as u8;
            pixel[1] = (rgb[1] * 255.0).round() as u8;
            pixel[2] = (rgb[2] * 255.0).round() as u8;
        }
    }
}

impl std::fmt::Display for FilterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Swipe direction on the live preview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger moves left: next filter
    Left,
    /// Finger moves right: previous filter
    Right,
}

/// Current position in the filter catalog
///
/// Swiping past either end is a no-op; the index never wraps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterPicker {
    index: usize,
}

impl FilterPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn selected(&self) -> FilterType {
        FilterType::from_index(self.index).unwrap_or_default()
    }

    /// Move the selection one step; returns `false` when already at the end
    pub fn swipe(&mut self, direction: SwipeDirection) -> bool {
        let next = match direction {
            SwipeDirection::Left if self.index + 1 < FilterType::ALL.len() => self.index + 1,
            SwipeDirection::Right if self.index > 0 => self.index - 1,
            _ => return false,
        };
        self.index = next;
        true
    }

    /// Jump to a specific filter
    pub fn select(&mut self, filter: FilterType) {
        self.index = filter.index();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(r: u8, g: u8, b: u8) -> RgbaImage {
        RgbaImage::from_pixel(4, 4, Rgba([r, g, b, 200]))
    }

    #[test]
    fn test_catalog_order_and_indices() {
        for (i, filter) in FilterType::ALL.iter().enumerate() {
            assert_eq!(filter.index(), i);
            assert_eq!(FilterType::from_index(i), Some(*filter));
        }
        assert_eq!(FilterType::from_index(FilterType::ALL.len()), None);
    }

    #[test]
    fn test_css_identifiers() {
        assert_eq!(FilterType::Normal.css(), "none");
        assert_eq!(FilterType::Mono.css(), "grayscale(1)");
        assert_eq!(FilterType::Sepia.css(), "sepia(0.8)");
        assert_eq!(
            FilterType::Vintage.css(),
            "contrast(1.1) brightness(1.1) sepia(0.3)"
        );
        assert_eq!(FilterType::Cool.css(), "saturate(1.2) hue-rotate(20deg)");
    }

    #[test]
    fn test_normal_is_identity() {
        let mut image = solid(12, 140, 250);
        FilterType::Normal.apply(&mut image);
        assert_eq!(image.get_pixel(0, 0), &Rgba([12, 140, 250, 200]));
    }

    #[test]
    fn test_mono_equalizes_channels() {
        let mut image = solid(255, 0, 0);
        FilterType::Mono.apply(&mut image);
        let p = image.get_pixel(1, 1);
        assert_eq!(p[0], p[1]);
        assert_eq!(p[1], p[2]);
        assert_eq!(p[0], 54); // 0.2126 * 255
        assert_eq!(p[3], 200);
    }

    #[test]
    fn test_sepia_on_white() {
        let mut image = solid(255, 255, 255);
        FilterType::Sepia.apply(&mut image);
        assert_eq!(image.get_pixel(0, 0), &Rgba([255, 255, 242, 200]));
    }

    #[test]
    fn test_contrast_and_brightness_are_linear() {
        let mid = FilterOp::Contrast(1.1).transform().apply([0.5, 0.5, 0.5]);
        assert!((mid[0] - 0.5).abs() < 1e-6);

        let bright = FilterOp::Brightness(1.1).transform().apply([0.5, 0.2, 1.0]);
        assert!((bright[0] - 0.55).abs() < 1e-6);
        assert!((bright[1] - 0.22).abs() < 1e-6);
        assert_eq!(bright[2], 1.0);
    }

    #[test]
    fn test_zero_hue_rotation_is_identity() {
        let out = FilterOp::HueRotate(0.0).transform().apply([0.3, 0.6, 0.9]);
        assert!((out[0] - 0.3).abs() < 1e-3);
        assert!((out[1] - 0.6).abs() < 1e-3);
        assert!((out[2] - 0.9).abs() < 1e-3);
    }

    #[test]
    fn test_picker_clamps_at_both_ends() {
        let mut picker = FilterPicker::new();
        assert!(!picker.swipe(SwipeDirection::Right));
        assert_eq!(picker.index(), 0);

        for _ in 0..20 {
            picker.swipe(SwipeDirection::Left);
        }
        assert_eq!(picker.index(), FilterType::ALL.len() - 1);
        assert_eq!(picker.selected(), FilterType::Cool);
        assert!(!picker.swipe(SwipeDirection::Left));

        assert!(picker.swipe(SwipeDirection::Right));
        assert_eq!(picker.selected(), FilterType::Vintage);
    }

    #[test]
    fn test_picker_stays_in_bounds_for_mixed_swipes() {
        let mut picker = FilterPicker::new();
        let pattern = [
            SwipeDirection::Left,
            SwipeDirection::Left,
            SwipeDirection::Right,
            SwipeDirection::Right,
            SwipeDirection::Right,
            SwipeDirection::Left,
        ];
        for direction in pattern.iter().cycle().take(100) {
            picker.swipe(*direction);
            assert!(picker.index() < FilterType::ALL.len());
        }
    }
}
