//! Pure image transforms applied to the cropped region before OCR.
//!
//! Every variant maps the same input to the same output; nothing here keeps
//! state between calls.

use imageproc::contrast::{equalize_histogram, otsu_level, threshold, ThresholdType};

use crate::{Color, OwnedImage};

/// Mean-channel cutoff for [`Preprocess::Threshold`] that works well on
/// televised text.
pub const DEFAULT_THRESHOLD_CUTOFF: u8 = 100;

/// Default contrast boost for [`Preprocess::Contrast`] (percent, as `image::imageops::contrast`).
pub const DEFAULT_CONTRAST: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Deserialize, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Preprocess {
    /// Keep the crop as captured.
    None,
    /// Grayscale plus a contrast boost (continuous tone).
    Contrast { amount: f32 },
    /// Grayscale plus histogram equalization.
    Equalize,
    /// Mean of RGB against a fixed cutoff. Bright pixels become black, the rest white,
    /// which turns light on-screen lettering into dark text on a light page.
    Threshold { cutoff: u8 },
    /// Global Otsu threshold, normalized to dark text on a light background.
    #[default]
    Otsu,
}

impl Preprocess {
    pub const fn threshold() -> Self {
        Self::Threshold {
            cutoff: DEFAULT_THRESHOLD_CUTOFF,
        }
    }

    pub const fn contrast() -> Self {
        Self::Contrast {
            amount: DEFAULT_CONTRAST,
        }
    }

    pub fn apply(self, mut image: OwnedImage) -> OwnedImage {
        match self {
            Self::None => image,
            Self::Contrast { amount } => {
                let gray = image.to_gray_image();
                OwnedImage::from_gray_as_rgb(&image::imageops::contrast(&gray, amount))
            }
            Self::Equalize => OwnedImage::from_gray_as_rgb(&equalize_histogram(&image.to_gray_image())),
            Self::Threshold { cutoff } => {
                image.map_pixels(|v| {
                    *v = if v.mean_above(cutoff) { Color::BLACK } else { Color::WHITE };
                });
                image
            }
            Self::Otsu => {
                let gray = image.to_gray_image();
                let level = otsu_level(&gray);
                let bin = threshold(&gray, level, ThresholdType::Binary);
                OwnedImage::from_gray_as_rgb(&ensure_dark_text_on_light(bin))
            }
        }
    }
}

fn ensure_dark_text_on_light(mut bin: image::GrayImage) -> image::GrayImage {
    // If the image is mostly black, invert it so background becomes light.
    let white = bin.pixels().filter(|p| p.0[0] > 0).count();
    let black = bin.pixels().len() - white;
    if black > white {
        for p in bin.pixels_mut() {
            p.0[0] = 255u8.saturating_sub(p.0[0]);
        }
    }
    bin
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striped() -> OwnedImage {
        let mut bytes = Vec::new();
        for i in 0..16u8 {
            let v = i * 16;
            bytes.extend_from_slice(&[v, v / 2, 255 - v]);
        }
        OwnedImage::from_rgb(4, 4, &bytes).unwrap()
    }

    #[test]
    fn threshold_is_binary_and_inverting() {
        let mut bytes = vec![];
        bytes.extend_from_slice(&[200, 200, 200]);
        bytes.extend_from_slice(&[100, 100, 100]);
        bytes.extend_from_slice(&[101, 100, 100]);
        bytes.extend_from_slice(&[0, 0, 0]);
        let img = OwnedImage::from_rgb(4, 1, &bytes).unwrap();

        let out = Preprocess::threshold().apply(img);
        assert_eq!(out.pixel(0, 0), Color::BLACK);
        assert_eq!(out.pixel(1, 0), Color::WHITE);
        assert_eq!(out.pixel(2, 0), Color::BLACK);
        assert_eq!(out.pixel(3, 0), Color::WHITE);
    }

    #[test]
    fn transforms_are_deterministic() {
        for p in [
            Preprocess::None,
            Preprocess::contrast(),
            Preprocess::Equalize,
            Preprocess::threshold(),
            Preprocess::Otsu,
        ] {
            assert_eq!(p.apply(striped()), p.apply(striped()), "{p:?}");
        }
    }

    #[test]
    fn grayscale_modes_keep_dimensions() {
        let out = Preprocess::contrast().apply(striped());
        assert_eq!((out.width(), out.height()), (4, 4));
        assert!(out.pixels().iter().all(|c| c.r == c.g && c.g == c.b));
    }

    #[test]
    fn otsu_prefers_light_background() {
        let mut bytes = OwnedImage::filled(10, 10, Color::BLACK).as_image().get_bytes();
        // A small bright glyph on a dark background.
        for i in 0..6 {
            bytes[i] = 250;
        }
        let img = OwnedImage::from_rgb(10, 10, &bytes).unwrap();
        let out = Preprocess::Otsu.apply(img);
        let white = out.pixels().iter().filter(|c| **c == Color::WHITE).count();
        assert!(white > 50);
    }
}
