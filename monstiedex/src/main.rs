//! Monstie Dex: scan a monster's on-screen name and look up its weaknesses.

mod assets;
mod capture;
mod config;
mod scan;
mod ui;

fn main() -> eframe::Result {
	// Use `RUST_LOG=debug` for per-scan details.
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = config::Config::load_or_default();
	log::info!("starting with feed window {:?}", config.app_name);

	eframe::run_native(
		"Monstie Dex",
		eframe::NativeOptions::default(),
		Box::new(|cc| Ok(Box::new(ui::MonstieDex::new(cc, config)))),
	)
}
