//! Region-of-interest geometry.
//!
//! The alignment guide lives in *displayed* coordinates (the preview widget),
//! while frames arrive at the feed's *native* resolution. The preview is
//! almost never shown at native size, so the guide is scaled per axis before
//! cropping.

use crate::{Image, OwnedImage, Preprocess};

#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Deserialize, serde::Serialize)]
pub struct Size {
	pub width: f32,
	pub height: f32,
}

impl Size {
	pub const fn new(width: f32, height: f32) -> Self {
		Self { width, height }
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		!(self.width > 0.0 && self.height > 0.0)
	}
}

/// Axis-aligned rectangle in displayed (logical) coordinates, relative to the preview.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
	pub x: f32,
	pub y: f32,
	pub width: f32,
	pub height: f32,
}

/// Axis-aligned rectangle in native frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
	pub x: u32,
	pub y: u32,
	pub w: u32,
	pub h: u32,
}

/// Centered alignment guide covering `width_ratio` × `height_ratio` of the preview.
pub fn guide_rect(displayed: Size, width_ratio: f32, height_ratio: f32) -> Rect {
	let width = displayed.width * width_ratio.clamp(0.0, 1.0);
	let height = displayed.height * height_ratio.clamp(0.0, 1.0);
	Rect {
		x: (displayed.width - width) / 2.0,
		y: (displayed.height - height) / 2.0,
		width,
		height,
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionGeometry {
	/// Guide rectangle, relative to the top-left of the displayed preview.
	pub guide: Rect,
	/// Size the preview is drawn at.
	pub displayed: Size,
	/// Resolution of the frames the feed produces.
	pub native: Size,
}

impl RegionGeometry {
	/// `native / displayed` per axis; `None` until both sizes are known.
	pub fn scale(&self) -> Option<(f32, f32)> {
		if self.native.is_empty() || self.displayed.is_empty() {
			return None;
		}
		Some((
			self.native.width / self.displayed.width,
			self.native.height / self.displayed.height,
		))
	}

	/// Guide rectangle mapped into native pixels and clamped to the frame.
	pub fn native_rect(&self) -> Option<PixelRect> {
		let (sx, sy) = self.scale()?;
		let max_w = self.native.width.round() as u32;
		let max_h = self.native.height.round() as u32;

		let x = ((self.guide.x * sx).round().max(0.0) as u32).min(max_w);
		let y = ((self.guide.y * sy).round().max(0.0) as u32).min(max_h);
		let w = ((self.guide.width * sx).round().max(0.0) as u32).min(max_w - x);
		let h = ((self.guide.height * sy).round().max(0.0) as u32).min(max_h - y);

		Some(PixelRect { x, y, w, h })
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AcquireError {
	#[error("the video feed has not produced a frame yet")]
	NoFrame,
	#[error("the alignment guide does not cover any pixels")]
	EmptyRegion,
}

/// Crop the guide region out of `frame` into a new buffer and preprocess it.
///
/// The frame is only borrowed; nothing is retained after the call.
pub fn acquire(frame: Option<Image>, geometry: &RegionGeometry, preprocess: Preprocess) -> Result<OwnedImage, AcquireError> {
	let frame = frame
		.filter(|f| f.width() > 0 && f.height() > 0)
		.ok_or(AcquireError::NoFrame)?;
	let rect = geometry.native_rect().ok_or(AcquireError::NoFrame)?;
	if rect.w == 0 || rect.h == 0 {
		return Err(AcquireError::EmptyRegion);
	}

	let crop = frame.sub_image(rect.x, rect.y, rect.w, rect.h).to_owned_image();
	if crop.width() == 0 || crop.height() == 0 {
		return Err(AcquireError::EmptyRegion);
	}
	Ok(preprocess.apply(crop))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Color;

	fn geometry(displayed: Size, native: Size) -> RegionGeometry {
		RegionGeometry {
			guide: guide_rect(displayed, 0.8, 0.15),
			displayed,
			native,
		}
	}

	#[test]
	fn guide_is_centered() {
		let r = guide_rect(Size::new(400.0, 300.0), 0.8, 0.15);
		assert_eq!(r, Rect { x: 40.0, y: 127.5, width: 320.0, height: 45.0 });
	}

	#[test]
	fn crop_is_scaled_to_native() {
		let frame = OwnedImage::filled(1920, 1080, Color::gray(40));
		let geo = geometry(Size::new(400.0, 300.0), Size::new(1920.0, 1080.0));
		assert_eq!(geo.scale(), Some((4.8, 3.6)));

		let crop = acquire(Some(frame.as_image()), &geo, Preprocess::None).unwrap();
		assert_eq!((crop.width(), crop.height()), (1536, 162));
		assert_eq!(geo.native_rect().unwrap().x, 192);
	}

	#[test]
	fn crop_follows_each_axis_independently() {
		let frame = OwnedImage::filled(640, 480, Color::WHITE);
		let geo = RegionGeometry {
			guide: Rect { x: 10.0, y: 10.0, width: 100.0, height: 20.0 },
			displayed: Size::new(1280.0, 240.0),
			native: Size::new(640.0, 480.0),
		};
		let crop = acquire(Some(frame.as_image()), &geo, Preprocess::None).unwrap();
		assert_eq!((crop.width(), crop.height()), (50, 40));
	}

	#[test]
	fn crop_copies_the_guided_pixels() {
		let mut bytes = Vec::new();
		for y in 0..8u8 {
			for x in 0..8u8 {
				bytes.extend_from_slice(&[x, y, 0]);
			}
		}
		let frame = OwnedImage::from_rgb(8, 8, &bytes).unwrap();
		let geo = RegionGeometry {
			guide: Rect { x: 1.0, y: 2.0, width: 2.0, height: 1.0 },
			displayed: Size::new(4.0, 4.0),
			native: Size::new(8.0, 8.0),
		};
		let crop = acquire(Some(frame.as_image()), &geo, Preprocess::None).unwrap();
		assert_eq!((crop.width(), crop.height()), (4, 2));
		assert_eq!(crop.pixel(0, 0), Color::new(2, 4, 0));
		assert_eq!(crop.pixel(3, 1), Color::new(5, 5, 0));
	}

	#[test]
	fn no_frame_before_video_starts() {
		let geo = geometry(Size::new(400.0, 300.0), Size::new(0.0, 0.0));
		assert_eq!(acquire(None, &geo, Preprocess::None), Err(AcquireError::NoFrame));

		let frame = OwnedImage::filled(0, 0, Color::BLACK);
		assert_eq!(acquire(Some(frame.as_image()), &geo, Preprocess::None), Err(AcquireError::NoFrame));
	}

	#[test]
	fn zero_sized_guide_is_rejected() {
		let frame = OwnedImage::filled(100, 100, Color::BLACK);
		let geo = geometry(Size::new(100.0, 100.0), Size::new(100.0, 100.0));
		let geo = RegionGeometry { guide: Rect { width: 0.0, ..geo.guide }, ..geo };
		assert_eq!(acquire(Some(frame.as_image()), &geo, Preprocess::None), Err(AcquireError::EmptyRegion));
	}

	#[test]
	fn threshold_applies_after_crop() {
		let frame = OwnedImage::filled(200, 100, Color::gray(220));
		let geo = geometry(Size::new(100.0, 50.0), Size::new(200.0, 100.0));
		let crop = acquire(Some(frame.as_image()), &geo, Preprocess::threshold()).unwrap();
		assert!(crop.pixels().iter().all(|c| *c == Color::BLACK));
	}
}
