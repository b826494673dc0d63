use crate::config::Config;

#[derive(Default)]
pub struct Settings {
	windows: Option<Vec<String>>,
	status: Option<String>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Changed {
	pub resolver: bool,
}

impl Settings {
	pub fn ui(&mut self, ui: &mut egui::Ui, config: &mut Config) -> Changed {
		let mut changed = Changed::default();

		ui.heading("Video feed");
		ui.horizontal(|ui| {
			let windows = self.windows.get_or_insert_with(crate::capture::list_windows);
			let selected = if config.app_name.is_empty() { "(none)" } else { config.app_name.as_str() };
			egui::ComboBox::from_label("Feed window")
				.selected_text(selected.to_string())
				.show_ui(ui, |ui| {
					for name in windows.iter() {
						ui.selectable_value(&mut config.app_name, name.clone(), name);
					}
				});
			if ui.small_button("⟳").on_hover_text("Refresh window list").clicked() {
				self.windows = None;
			}
		});
		ui.add(egui::Slider::new(&mut config.preview_interval_ms, 16..=1000).text("Preview refresh (ms)"));
		ui.add(egui::Slider::new(&mut config.guide_width_ratio, 0.2..=1.0).text("Guide width"));
		ui.add(egui::Slider::new(&mut config.guide_height_ratio, 0.05..=0.5).text("Guide height"));

		ui.separator();
		ui.heading("Recognition");
		egui::ComboBox::from_label("Preprocessing")
			.selected_text(preprocess_name(config.preprocess))
			.show_ui(ui, |ui| {
				for option in [
					ie::Preprocess::None,
					ie::Preprocess::contrast(),
					ie::Preprocess::Equalize,
					ie::Preprocess::threshold(),
					ie::Preprocess::Otsu,
				] {
					ui.selectable_value(&mut config.preprocess, option, preprocess_name(option));
				}
			});
		match &mut config.preprocess {
			ie::Preprocess::Contrast { amount } => {
				ui.add(egui::Slider::new(amount, 0.0..=200.0).text("Contrast"));
			}
			ie::Preprocess::Threshold { cutoff } => {
				ui.add(egui::Slider::new(cutoff, 0..=255).text("Cutoff"));
			}
			_ => {}
		}

		ui.horizontal(|ui| {
			ui.label("OCR engine");
			ui.selectable_value(&mut config.ocr_backend, ie::OcrBackend::Paddle, "PaddleOCR");
			ui.selectable_value(&mut config.ocr_backend, ie::OcrBackend::Tesseract, "Tesseract");
		});
		ui.small("Engine changes apply after a restart.");

		let mut timeout = config.ocr_timeout_s.is_some();
		ui.horizontal(|ui| {
			ui.checkbox(&mut timeout, "OCR timeout");
			if let Some(seconds) = &mut config.ocr_timeout_s {
				ui.add(egui::DragValue::new(seconds).range(1.0..=120.0).suffix(" s"));
			}
		});
		if timeout != config.ocr_timeout_s.is_some() {
			config.ocr_timeout_s = timeout.then_some(20.0);
		}

		ui.separator();
		ui.heading("Matching");
		let resolver = &mut config.resolver;
		changed.resolver |= ui
			.add(egui::Slider::new(&mut resolver.acceptance_threshold, 0.0..=1.0).text("Accept scans scoring up to"))
			.changed();
		changed.resolver |= ui
			.add(egui::Slider::new(&mut resolver.search_threshold, 0.0..=1.0).text("Search tolerance"))
			.changed();
		changed.resolver |= ui
			.checkbox(&mut resolver.allow_hyphen, "Keep hyphens in scanned names")
			.changed();

		ui.separator();
		ui.add(egui::Slider::new(&mut config.ui_zoom_factor, 0.5..=2.0).text("UI zoom"));

		ui.add_space(8.0);
		if ui.button("Save").clicked() {
			self.status = Some(match config.save() {
				Ok(()) => "Saved.".to_string(),
				Err(err) => {
					log::warn!("failed to save config: {err:#}");
					format!("Save failed: {err:#}")
				}
			});
		}
		if let Some(status) = &self.status {
			ui.small(status);
		}

		changed
	}
}

fn preprocess_name(preprocess: ie::Preprocess) -> &'static str {
	match preprocess {
		ie::Preprocess::None => "None",
		ie::Preprocess::Contrast { .. } => "Contrast",
		ie::Preprocess::Equalize => "Equalize",
		ie::Preprocess::Threshold { .. } => "Threshold",
		ie::Preprocess::Otsu => "Otsu",
	}
}
