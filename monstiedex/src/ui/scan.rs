//! Scan window: live preview, alignment guide and the scan trigger.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use data::{Record, Resolver, ScanResult, ScanStatus};

use crate::capture::{FrameCapturer, WindowFeed};
use crate::config::Config;
use crate::scan::{ScanError, ScanSession};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub enum ScanOutcome {
	Continue,
	Found(Record),
}

pub struct ScanPanel {
	capturer: Option<FrameCapturer>,
	session: ScanSession,

	/// Set when the feed could not be opened or was lost. Stays until the panel is reopened.
	camera_error: Option<String>,
	result: Option<ScanResult>,

	preview: Option<egui::TextureHandle>,
	ocr_sees: Option<egui::TextureHandle>,
	last_refresh: Option<Instant>,
}

impl ScanPanel {
	pub fn open(config: &Config, ie: Arc<Mutex<ie::Ie>>, resolver: Resolver) -> Self {
		let session = ScanSession::new(ie, resolver, config.ocr_timeout());

		let (capturer, camera_error) = match WindowFeed::open(&config.app_name) {
			Ok(feed) => (
				Some(FrameCapturer::new(Box::new(feed), config.guide_width_ratio, config.guide_height_ratio)),
				None,
			),
			Err(err) => {
				log::warn!("{err}");
				(None, Some(err.to_string()))
			}
		};

		Self {
			capturer,
			session,
			camera_error,
			result: None,
			preview: None,
			ocr_sees: None,
			last_refresh: None,
		}
	}

	/// Stop the feed and drop whatever scan is in flight.
	pub fn close(&mut self) {
		self.session.cancel();
		if let Some(mut capturer) = self.capturer.take() {
			capturer.stop();
		}
	}

	fn lose_camera(&mut self, err: ScanError) {
		log::warn!("video feed lost: {err}");
		self.close();
		self.camera_error = Some(err.to_string());
	}

	fn refresh_preview(&mut self, ctx: &egui::Context, interval: Duration) {
		let now = Instant::now();
		if self.last_refresh.is_some_and(|last| now.duration_since(last) < interval) {
			return;
		}
		self.last_refresh = Some(now);

		let Some(capturer) = &mut self.capturer else {
			return;
		};
		if let Err(err) = capturer.refresh() {
			self.lose_camera(err);
			return;
		}
		if let Some(frame) = capturer.feed().frame() {
			let image = color_image(frame);
			match &mut self.preview {
				Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
				None => self.preview = Some(ctx.load_texture("scan-preview", image, egui::TextureOptions::LINEAR)),
			}
		}
	}

	fn trigger(&mut self, ctx: &egui::Context, displayed: ie::Size, preprocess: ie::Preprocess) {
		let Some(capturer) = &self.capturer else {
			return;
		};
		let crop = match capturer.acquire(displayed, preprocess) {
			Ok(crop) => crop,
			Err(err) => {
				self.result = Some(self.session.fail(err.into()));
				return;
			}
		};

		self.ocr_sees = Some(ctx.load_texture("ocr-sees", color_image(&crop), egui::TextureOptions::NEAREST));
		if let Err(err) = self.session.start(crop, Instant::now()) {
			self.result = Some(self.session.fail(err));
		} else {
			self.result = None;
		}
	}

	pub fn ui(&mut self, ui: &mut egui::Ui, config: &Config) -> ScanOutcome {
		let ctx = ui.ctx().clone();

		if let Some(result) = self.session.poll(Instant::now()) {
			if result.status == ScanStatus::Found
				&& let Some(record) = &result.matched
			{
				log::info!("scan found {}", record.name);
				return ScanOutcome::Found(record.clone());
			}
			self.result = Some(result);
		}

		if let Some(err) = &self.camera_error {
			ui.label(egui::RichText::new(format!("Camera unavailable: {err}")).color(egui::Color32::RED));
			ui.small("Pick the feed window in Settings, then reopen the scanner.");
			return ScanOutcome::Continue;
		}

		self.refresh_preview(&ctx, config.preview_interval());

		let native = self
			.capturer
			.as_ref()
			.map(|c| c.feed().native_size())
			.unwrap_or_default();
		let (Some(texture), false) = (&self.preview, native.is_empty()) else {
			ui.spinner();
			ui.label("Waiting for the feed...");
			ctx.request_repaint_after(config.preview_interval());
			return ScanOutcome::Continue;
		};

		let displayed = fit(native, ui.available_width(), ui.available_height() * 0.7);
		let response = ui.add(egui::Image::new(texture).fit_to_exact_size(egui::vec2(displayed.width, displayed.height)));

		if let Some(capturer) = &self.capturer {
			let guide = capturer.guide(displayed);
			let rect = egui::Rect::from_min_size(
				response.rect.min + egui::vec2(guide.x, guide.y),
				egui::vec2(guide.width, guide.height),
			);
			ui.painter()
				.rect_stroke(rect, 8.0, egui::Stroke::new(2.0, egui::Color32::GREEN), egui::StrokeKind::Outside);
		}

		let scanning = self.session.is_scanning();
		let engine_busy = !scanning && self.session.engine_busy();
		ui.horizontal(|ui| {
			let label = if scanning { "Scanning..." } else { "Scan" };
			if ui.add_enabled(!scanning && !engine_busy, egui::Button::new(label)).clicked() {
				self.trigger(&ctx, displayed, config.preprocess);
			}
			if scanning {
				ui.spinner();
			} else if engine_busy {
				ui.weak("OCR engine is still finishing an earlier scan...");
			}
		});

		match &self.result {
			Some(result) => {
				let text = egui::RichText::new(result.message());
				ui.label(match result.status {
					ScanStatus::CameraOrOcrError => text.color(egui::Color32::RED),
					ScanStatus::Unsure | ScanStatus::NoMatch | ScanStatus::TextUnclear => text.color(egui::Color32::YELLOW),
					ScanStatus::Found => text,
				});
			}
			None if !scanning => {
				ui.weak("Line the name up inside the green box, then press Scan.");
			}
			None => {}
		}

		if let Some(texture) = &self.ocr_sees {
			ui.collapsing("OCR sees", |ui| {
				ui.add(egui::Image::new(texture).max_width(ui.available_width()));
			});
		}

		ctx.request_repaint_after(if self.session.is_scanning() || self.session.engine_busy() {
			POLL_INTERVAL
		} else {
			config.preview_interval()
		});
		ScanOutcome::Continue
	}
}

impl Drop for ScanPanel {
	fn drop(&mut self) {
		self.close();
	}
}

fn color_image(image: &ie::OwnedImage) -> egui::ColorImage {
	egui::ColorImage::from_rgb(
		[image.width() as usize, image.height() as usize],
		&image.as_image().get_bytes(),
	)
}

/// Largest size with the frame's aspect ratio that fits `max_w` × `max_h`.
fn fit(native: ie::Size, max_w: f32, max_h: f32) -> ie::Size {
	let scale = (max_w / native.width).min(max_h / native.height);
	ie::Size::new(native.width * scale, native.height * scale)
}
