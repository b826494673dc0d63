use std::sync::{Arc, Mutex};

use data::{Dataset, Record, RecordId, Resolver};

mod detail;
mod scan;
mod settings;

use self::scan::{ScanOutcome, ScanPanel};
use crate::config::Config;

pub struct MonstieDex {
	config: Config,
	dataset: Arc<Dataset>,
	resolver: Resolver,

	/// `Err` keeps the reason OCR is unavailable; search still works without it.
	ie: Result<Arc<Mutex<ie::Ie>>, String>,

	tab: Tab,
	query: String,
	selected: Option<RecordId>,
	variant: Option<String>,

	scan: Option<ScanPanel>,
	settings: settings::Settings,
}

impl MonstieDex {
	pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
		cc.egui_ctx.set_zoom_factor(config.ui_zoom_factor);

		let dataset = Arc::new(load_dataset(&config));
		log::info!("dataset loaded with {} records", dataset.len());
		let resolver = Resolver::new(dataset.clone(), config.resolver.clone());

		let ie = crate::assets::build_ie(&config)
			.map(|ie| Arc::new(Mutex::new(ie)))
			.map_err(|err| {
				log::warn!("OCR unavailable: {err:#}");
				format!("{err:#}")
			});

		Self {
			config,
			dataset,
			resolver,
			ie,
			tab: Tab::Home,
			query: String::new(),
			selected: None,
			variant: None,
			scan: None,
			settings: settings::Settings::default(),
		}
	}

	fn select(&mut self, record: &Record) {
		log::debug!("selected {}", record.name);
		self.selected = Some(record.id);
		self.variant = None;
	}

	fn open_scan(&mut self) {
		match &self.ie {
			Ok(ie) => self.scan = Some(ScanPanel::open(&self.config, ie.clone(), self.resolver.clone())),
			Err(err) => log::warn!("scan requested without OCR: {err}"),
		}
	}

	fn close_scan(&mut self) {
		if let Some(mut panel) = self.scan.take() {
			panel.close();
		}
	}

	fn ui_home(&mut self, ui: &mut egui::Ui) {
		ui.horizontal(|ui| {
			ui.add(egui::TextEdit::singleline(&mut self.query).hint_text("Search monsters"));
			let can_scan = self.ie.is_ok() && self.scan.is_none();
			if ui.add_enabled(can_scan, egui::Button::new("📷 Scan name")).clicked() {
				self.open_scan();
			}
		});

		if let Err(err) = &self.ie {
			ui.group(|ui| {
				ui.label(egui::RichText::new("OCR is unavailable, scanning is disabled.").strong());
				ui.add_space(4.0);
				ui.small(err);
			});
		}

		let mut picked = None;
		let hits = self.resolver.search(&self.query);
		if !hits.is_empty() {
			ui.separator();
			for hit in hits.iter().take(8) {
				let selected = self.selected == Some(hit.record.id);
				if ui.selectable_label(selected, &hit.record.name).clicked() {
					picked = Some(hit.record.clone());
				}
			}
		} else if !self.query.trim().is_empty() {
			ui.weak("No monsters match.");
		}
		drop(hits);
		if let Some(record) = picked {
			self.select(&record);
		}

		ui.separator();
		match self.selected.and_then(|id| self.dataset.get(id)) {
			Some(record) => {
				egui::ScrollArea::vertical().show(ui, |ui| detail::ui(ui, record, &mut self.variant));
			}
			None => {
				ui.weak("Search for a monster or scan its name.");
			}
		}
	}

	fn ui_settings(&mut self, ui: &mut egui::Ui) {
		let changed = self.settings.ui(ui, &mut self.config);
		if changed.resolver {
			self.resolver = Resolver::new(self.dataset.clone(), self.config.resolver.clone());
		}
	}
}

impl eframe::App for MonstieDex {
	fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
		let zoom = self.config.ui_zoom_factor;
		if (ctx.zoom_factor() - zoom).abs() > f32::EPSILON {
			ctx.set_zoom_factor(zoom);
		}

		egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
			ui.horizontal(|ui| {
				ui.selectable_value(&mut self.tab, Tab::Home, "Monsters");
				ui.selectable_value(&mut self.tab, Tab::Settings, "Settings");
			});
		});

		egui::CentralPanel::default().show(ctx, |ui| match self.tab {
			Tab::Home => self.ui_home(ui),
			Tab::Settings => self.ui_settings(ui),
		});

		let mut open = self.scan.is_some();
		let mut outcome = ScanOutcome::Continue;
		if let Some(panel) = &mut self.scan {
			egui::Window::new("Scan")
				.open(&mut open)
				.default_size([640.0, 520.0])
				.show(ctx, |ui| outcome = panel.ui(ui, &self.config));
		}

		match outcome {
			ScanOutcome::Found(record) => {
				self.select(&record);
				self.close_scan();
			}
			ScanOutcome::Continue if !open => self.close_scan(),
			ScanOutcome::Continue => {}
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Tab {
	Home,
	Settings,
}

fn load_dataset(config: &Config) -> Dataset {
	if let Some(path) = &config.dataset_path {
		match Dataset::load(path) {
			Ok(dataset) => return dataset,
			Err(err) => log::warn!("failed to load dataset from {}; using the built-in one: {err}", path.display()),
		}
	}
	match Dataset::builtin() {
		Ok(dataset) => dataset,
		Err(err) => {
			log::error!("built-in dataset is invalid: {err}");
			Dataset::default()
		}
	}
}
