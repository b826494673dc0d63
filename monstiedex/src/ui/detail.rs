use std::borrow::Cow;

use data::{Record, Resistance};

pub fn ui(ui: &mut egui::Ui, base: &Record, variant: &mut Option<String>) {
	ui.heading(&base.name);
	if let Some(genus) = &base.genus {
		ui.weak(genus);
	}

	if !base.variants.is_empty() {
		ui.horizontal(|ui| {
			ui.selectable_value(variant, None, "Normal");
			for v in &base.variants {
				ui.selectable_value(variant, Some(v.name.clone()), &v.name);
			}
		});
	}

	let record = match variant.as_deref().and_then(|name| base.variant(name)) {
		Some(merged) => Cow::Owned(merged),
		None => Cow::Borrowed(base),
	};

	ui.horizontal(|ui| {
		ui.label(format!("Attack type: {}", record.kind.name()));
		if let Some(element) = record.element {
			ui.separator();
			ui.label(format!("Element: {}", element.name()));
		}
	});
	match &record.weakness {
		Some(weakness) => {
			ui.label(format!("Weak to: {weakness}"));
		}
		None => {
			let weak = record.elements.weaknesses();
			if !weak.is_empty() {
				let names = weak.iter().map(|e| e.name()).collect::<Vec<_>>().join(", ");
				ui.label(format!("Weak to: {names}"));
			}
		}
	}

	ui.add_space(6.0);
	ui.columns(2, |cols| {
		cols[0].strong("Elements");
		egui::Grid::new("elements").striped(true).show(&mut cols[0], |ui| {
			for (element, level) in record.elements.iter() {
				ui.label(element.name());
				resistance(ui, level);
				ui.end_row();
			}
		});

		cols[1].strong("Ailments");
		egui::Grid::new("ailments").striped(true).show(&mut cols[1], |ui| {
			for (ailment, level) in record.ailments.iter() {
				ui.label(ailment.name());
				resistance(ui, level);
				ui.end_row();
			}
		});
	});

	if !record.parts.is_empty() {
		ui.add_space(6.0);
		ui.strong("Parts");
		egui::Grid::new("parts").striped(true).show(ui, |ui| {
			ui.label("");
			ui.label("Slash");
			ui.label("Pierce");
			ui.label("Blunt");
			ui.end_row();
			for part in &record.parts {
				ui.label(&part.name);
				for effective in [part.slash, part.pierce, part.blunt] {
					ui.label(if effective { "✔" } else { "✖" });
				}
				ui.end_row();
			}
		});
	}

	if let Some(enraged) = &record.enraged {
		ui.add_space(6.0);
		ui.strong("Enraged");
		ui.label(format!("{} → switches to {}", enraged.trigger, enraged.kind.name()));
	}

	if let Some(tips) = &record.tips {
		ui.add_space(6.0);
		ui.strong("Tips");
		ui.label(tips);
	}
}

fn resistance(ui: &mut egui::Ui, level: Resistance) {
	let color = match level {
		Resistance::VeryWeak | Resistance::Weak => egui::Color32::LIGHT_GREEN,
		Resistance::Neutral => ui.visuals().text_color(),
		Resistance::Resistant | Resistance::VeryResistant => egui::Color32::LIGHT_RED,
	};
	ui.label(egui::RichText::new(format!("{} {}", level.symbol(), level.title())).color(color))
		.on_hover_text(level.level().to_string());
}
