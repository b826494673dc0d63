//! Image primitives and utilities.
//!
//! Video frames are stored as a lightweight owned RGB image (`OwnedImage`).
//! Cropping to the alignment guide borrows a view (`Image<'a>`) instead of
//! copying pixels, and only the final region of interest is copied out into
//! a new buffer for preprocessing and OCR.

use anyhow::{Context, Result};

/// Owned RGB image (no alpha).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    width: u32,
    height: u32,
    data: Vec<Color>,
}

impl OwnedImage {
    /// A solid image, mostly useful for placeholders and tests.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            data: vec![color; (width * height) as usize],
        }
    }

    /// Build an `OwnedImage` from RGBA bytes (alpha is discarded).
    ///
    /// The buffer is expected to be tightly packed: `width * height * 4` bytes.
    pub fn from_rgba(width: usize, bytes: &[u8]) -> Self {
        let height = if width == 0 { 0 } else { bytes.len() / width / 4 };
        let data = bytes
            .chunks_exact(4)
            .take(width * height)
            .map(|v| Color::new(v[0], v[1], v[2]))
            .collect::<Vec<_>>();

        Self {
            width: width as u32,
            height: height as u32,
            data,
        }
    }

    /// Build an `OwnedImage` from tightly packed RGB bytes.
    pub fn from_rgb(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != (width * height * 3) as usize {
            return None;
        }
        let data = bytes
            .chunks_exact(3)
            .map(|v| Color::new(v[0], v[1], v[2]))
            .collect();
        Some(Self { width, height, data })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        self.data[(x + y * self.width) as usize]
    }

    pub fn pixels(&self) -> &[Color] {
        &self.data
    }

    /// Resize this image to the given height (preserving aspect ratio).
    ///
    /// Uses `fast_image_resize` (SIMD-optimized) and keeps output in `Vec<Color>`.
    pub fn resize_h(&mut self, height: u32) -> Result<()> {
        if self.height == height || self.width == 0 || self.height == 0 {
            return Ok(());
        }

        let height = height.max(1);
        let width = ((self.width as u64 * height as u64 / self.height as u64) as u32).max(1);

        // SAFETY: `Color` is `#[repr(C)]` with 3 x `u8`, so it is layout-compatible
        // with `fast_image_resize::pixels::U8x3` (alignment 1).
        let src_pixels = unsafe {
            std::slice::from_raw_parts(
                self.data.as_ptr() as *const fast_image_resize::pixels::U8x3,
                self.data.len(),
            )
        };

        let src = fast_image_resize::images::ImageRef::from_pixels(self.width, self.height, src_pixels)
            .context("fast_image_resize: ImageRef::from_pixels")?;

        let mut dst = fast_image_resize::images::Image::new(width, height, fast_image_resize::PixelType::U8x3);

        let mut resizer = fast_image_resize::Resizer::new();
        let options = fast_image_resize::ResizeOptions::new().resize_alg(
            fast_image_resize::ResizeAlg::Interpolation(fast_image_resize::FilterType::CatmullRom),
        );

        resizer
            .resize(&src, &mut dst, &Some(options))
            .context("fast_image_resize: resize")?;

        let bytes: Vec<u8> = dst.into_vec();
        self.data = bytes
            .chunks_exact(3)
            .map(|px| Color::new(px[0], px[1], px[2]))
            .collect();
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn map_pixels(&mut self, f: impl Fn(&mut Color)) {
        for v in &mut self.data {
            f(v);
        }
    }

    /// Create a borrowed view of this entire image.
    pub fn as_image(&self) -> Image<'_> {
        Image {
            x1: 0,
            y1: 0,
            x2: self.width,
            y2: self.height,
            true_width: self.width,
            data: &self.data,
        }
    }

    /// Convert to a grayscale `GrayImage` (luma).
    pub fn to_gray_image(&self) -> image::GrayImage {
        image::GrayImage::from_fn(self.width, self.height, |x, y| image::Luma([self.pixel(x, y).luma()]))
    }

    /// Create an RGB `OwnedImage` from a grayscale image (each pixel repeated into RGB).
    pub fn from_gray_as_rgb(gray: &image::GrayImage) -> Self {
        let (width, height) = gray.dimensions();
        let data = gray
            .pixels()
            .map(|p| {
                let v = p.0[0];
                Color::new(v, v, v)
            })
            .collect();
        Self { width, height, data }
    }

    /// Convert to an `image::DynamicImage` for engines that consume the `image` crate types.
    pub fn to_dynamic_image(&self) -> Result<image::DynamicImage> {
        let img = image::RgbImage::from_raw(self.width, self.height, self.as_image().get_bytes())
            .context("RgbImage::from_raw failed")?;
        Ok(image::DynamicImage::ImageRgb8(img))
    }
}

// ----------

/// Borrowed image view into an `OwnedImage`.
#[derive(Clone, Copy)]
pub struct Image<'a> {
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
    true_width: u32,
    data: &'a [Color],
}

impl<'a> Image<'a> {
    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    #[inline(always)]
    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    #[inline(always)]
    fn pixel(&self, x: u32, y: u32) -> &Color {
        &self.data[(x + y * self.true_width) as usize]
    }

    pub fn to_owned_image(self) -> OwnedImage {
        let mut data = Vec::with_capacity((self.width() * self.height()) as usize);
        for y in self.y1..self.y2 {
            for x in self.x1..self.x2 {
                data.push(*self.pixel(x, y));
            }
        }

        OwnedImage {
            width: self.width(),
            height: self.height(),
            data,
        }
    }

    pub fn get_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width() * self.height() * 3) as usize);
        for y in self.y1..self.y2 {
            for x in self.x1..self.x2 {
                let clr = self.pixel(x, y);
                bytes.extend_from_slice(&[clr.r, clr.g, clr.b]);
            }
        }
        bytes
    }

    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let img = image::RgbImage::from_raw(self.width(), self.height(), self.get_bytes())
            .context("RgbImage::from_raw failed")?;
        img.save_with_format(path, image::ImageFormat::Png)
            .context("save png")?;
        Ok(())
    }

    /// Create an arbitrary subimage (relative coordinates), clamped to this view.
    pub fn sub_image(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        let x = x.min(self.width());
        let y = y.min(self.height());
        let width = width.min(self.width() - x);
        let height = height.min(self.height() - y);

        Self {
            x1: self.x1 + x,
            y1: self.y1 + y,
            x2: self.x1 + x + width,
            y2: self.y1 + y + height,
            true_width: self.true_width,
            data: self.data,
        }
    }

    pub fn average_color(&self) -> Color {
        let count = self.width() * self.height();
        if count == 0 {
            return Color::BLACK;
        }

        let mut r = 0u32;
        let mut g = 0u32;
        let mut b = 0u32;
        for y in self.y1..self.y2 {
            for x in self.x1..self.x2 {
                let clr = self.pixel(x, y);
                r += clr.r as u32;
                g += clr.g as u32;
                b += clr.b as u32;
            }
        }

        Color {
            r: (r / count) as u8,
            g: (g / count) as u8,
            b: (b / count) as u8,
        }
    }
}

// ----------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v)
    }

    /// Compute luma (grayscale intensity).
    pub fn luma(&self) -> u8 {
        let r = self.r as u32;
        let g = self.g as u32;
        let b = self.b as u32;
        ((299 * r + 587 * g + 114 * b) / 1000) as u8
    }

    /// Whether the plain channel mean is strictly above `cutoff`.
    #[inline]
    pub fn mean_above(&self, cutoff: u8) -> bool {
        self.r as u16 + self.g as u16 + self.b as u16 > cutoff as u16 * 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_drops_alpha() {
        let bytes = [10, 20, 30, 255, 40, 50, 60, 0];
        let img = OwnedImage::from_rgba(2, &bytes);
        assert_eq!((img.width(), img.height()), (2, 1));
        assert_eq!(img.pixel(1, 0), Color::new(40, 50, 60));
    }

    #[test]
    fn sub_image_is_clamped() {
        let img = OwnedImage::filled(10, 5, Color::WHITE);
        let view = img.as_image().sub_image(8, 3, 10, 10);
        assert_eq!((view.width(), view.height()), (2, 2));
    }

    #[test]
    fn resize_keeps_aspect() {
        let mut img = OwnedImage::filled(40, 10, Color::gray(128));
        img.resize_h(80).unwrap();
        assert_eq!((img.width(), img.height()), (320, 80));
        assert!(img.pixel(100, 40).r.abs_diff(128) <= 1);
    }
}
