//! Video feed and the Frame Capturer built on top of it.

use xcap::image::EncodableLayout;

use crate::scan::ScanError;

/// A live source of frames that must be released explicitly.
pub trait VideoFeed {
	/// Pull the latest frame from the source.
	fn refresh(&mut self) -> Result<(), ScanError>;

	/// Most recent frame, if any has been produced yet.
	fn frame(&self) -> Option<&ie::OwnedImage>;

	/// Release the underlying capture resource. Idempotent.
	fn stop(&mut self);

	fn is_running(&self) -> bool;

	/// Native resolution of the frames; zero until the first frame arrives.
	fn native_size(&self) -> ie::Size {
		self.frame()
			.map(|f| ie::Size::new(f.width() as f32, f.height() as f32))
			.unwrap_or_default()
	}
}

/// Application names of every capturable window.
pub fn list_windows() -> Vec<String> {
	match xcap::Window::all() {
		Ok(windows) => windows.into_iter().filter_map(|w| w.app_name().ok()).collect(),
		Err(err) => {
			log::warn!("failed to enumerate windows: {err}");
			vec![]
		}
	}
}

fn find_window(app_name: &str) -> Result<xcap::Window, ScanError> {
	let windows = xcap::Window::all().map_err(|err| ScanError::CameraUnavailable(err.to_string()))?;
	windows
		.into_iter()
		.find(|window| window.app_name().ok().as_deref() == Some(app_name))
		.ok_or_else(|| ScanError::CameraUnavailable(format!("no window named {app_name:?}")))
}

/// Feed that captures an application window (capture-card viewer, TV stream, emulator).
pub struct WindowFeed {
	app_name: String,
	window: Option<xcap::Window>,
	latest: Option<ie::OwnedImage>,
}

impl WindowFeed {
	pub fn open(app_name: &str) -> Result<Self, ScanError> {
		if app_name.is_empty() {
			return Err(ScanError::CameraUnavailable("no feed window configured".to_string()));
		}
		let window = find_window(app_name)?;
		log::info!("video feed opened on {app_name:?}");
		Ok(Self {
			app_name: app_name.to_string(),
			window: Some(window),
			latest: None,
		})
	}
}

impl VideoFeed for WindowFeed {
	fn refresh(&mut self) -> Result<(), ScanError> {
		let window = self
			.window
			.as_ref()
			.ok_or_else(|| ScanError::CameraUnavailable("feed stopped".to_string()))?;
		let img = window
			.capture_image()
			.map_err(|err| ScanError::CameraUnavailable(err.to_string()))?;
		self.latest = Some(ie::OwnedImage::from_rgba(img.width() as usize, img.as_bytes()));
		Ok(())
	}

	fn frame(&self) -> Option<&ie::OwnedImage> {
		self.latest.as_ref()
	}

	fn stop(&mut self) {
		if self.window.take().is_some() {
			log::info!("video feed on {:?} stopped", self.app_name);
		}
		self.latest = None;
	}

	fn is_running(&self) -> bool {
		self.window.is_some()
	}
}

impl Drop for WindowFeed {
	fn drop(&mut self) {
		self.stop();
	}
}

// ----------

/// Crops the alignment guide out of the feed's latest frame.
pub struct FrameCapturer {
	feed: Box<dyn VideoFeed>,
	guide_width_ratio: f32,
	guide_height_ratio: f32,
}

impl FrameCapturer {
	pub fn new(feed: Box<dyn VideoFeed>, guide_width_ratio: f32, guide_height_ratio: f32) -> Self {
		Self {
			feed,
			guide_width_ratio,
			guide_height_ratio,
		}
	}

	pub fn feed(&self) -> &dyn VideoFeed {
		self.feed.as_ref()
	}

	pub fn refresh(&mut self) -> Result<(), ScanError> {
		self.feed.refresh()
	}

	/// Guide rectangle for a preview drawn at `displayed` size.
	pub fn guide(&self, displayed: ie::Size) -> ie::Rect {
		ie::guide_rect(displayed, self.guide_width_ratio, self.guide_height_ratio)
	}

	pub fn geometry(&self, displayed: ie::Size) -> ie::RegionGeometry {
		ie::RegionGeometry {
			guide: self.guide(displayed),
			displayed,
			native: self.feed.native_size(),
		}
	}

	/// Crop and preprocess the guided region of the current frame.
	pub fn acquire(&self, displayed: ie::Size, preprocess: ie::Preprocess) -> Result<ie::OwnedImage, ie::AcquireError> {
		let geometry = self.geometry(displayed);
		ie::acquire(self.feed.frame().map(|f| f.as_image()), &geometry, preprocess)
	}

	pub fn stop(&mut self) {
		self.feed.stop();
	}
}

impl Drop for FrameCapturer {
	fn drop(&mut self) {
		self.feed.stop();
	}
}
