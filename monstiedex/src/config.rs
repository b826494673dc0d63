//! Persistent application configuration.
//!
//! Stored as JSON in a platform-appropriate config directory.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// On-disk configuration for the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
	/// Application name of the window the feed is captured from
	/// (from `xcap::Window::app_name()`), e.g. a capture-card viewer.
	///
	/// If multiple windows share the same app name, the first match is used.
	pub app_name: String,

	/// How often the preview frame is refreshed (milliseconds).
	pub preview_interval_ms: u64,

	/// Alignment guide size, relative to the displayed preview.
	pub guide_width_ratio: f32,
	pub guide_height_ratio: f32,

	/// Transform applied to the cropped guide region before OCR.
	pub preprocess: ie::Preprocess,

	pub ocr_backend: ie::OcrBackend,
	pub ocr: ie::OcrConfig,
	/// Tesseract language code (only used by the Tesseract backend).
	pub tesseract_lang: String,

	/// Give up on a scan when OCR takes longer than this (seconds). `None` waits forever.
	pub ocr_timeout_s: Option<f32>,

	/// Matching policy (thresholds, minimum length, hyphen handling).
	pub resolver: data::ResolverConfig,

	/// Load this dataset instead of the built-in one.
	pub dataset_path: Option<PathBuf>,

	pub ui_zoom_factor: f32,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			app_name: String::new(),
			preview_interval_ms: 100,
			guide_width_ratio: 0.8,
			guide_height_ratio: 0.15,
			preprocess: ie::Preprocess::threshold(),
			ocr_backend: ie::OcrBackend::Paddle,
			ocr: ie::OcrConfig::default(),
			tesseract_lang: "eng".to_string(),
			ocr_timeout_s: Some(20.0),
			resolver: data::ResolverConfig::default(),
			dataset_path: None,
			ui_zoom_factor: 1.0,
		}
	}
}

impl Config {
	/// Path to the config file.
	pub fn path() -> Result<PathBuf> {
		let base = dirs::config_dir().context("config_dir() unavailable")?;
		Ok(base.join("monstiedex.json"))
	}

	/// Load configuration from disk, falling back to defaults on any error.
	pub fn load_or_default() -> Self {
		match Self::try_load() {
			Ok(cfg) => cfg,
			Err(err) => {
				log::warn!("failed to load config; using defaults: {err:#}");
				Self::default()
			}
		}
	}

	/// Try to load configuration from disk. A missing file yields the defaults.
	pub fn try_load() -> Result<Self> {
		let path = Self::path()?;
		if !path.exists() {
			return Ok(Self::default());
		}
		let json = fs::read_to_string(&path).with_context(|| format!("read {:?}", path))?;
		Self::from_json(&json).with_context(|| format!("parse {:?}", path))
	}

	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	/// Save configuration to disk.
	pub fn save(&self) -> Result<()> {
		let path = Self::path()?;
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).with_context(|| format!("create {:?}", parent))?;
		}
		let json = serde_json::to_string_pretty(self).context("serialize config")?;
		fs::write(&path, json).with_context(|| format!("write {:?}", path))?;
		Ok(())
	}

	pub fn ocr_timeout(&self) -> Option<Duration> {
		self.ocr_timeout_s
			.filter(|s| s.is_finite() && *s > 0.0)
			.map(Duration::from_secs_f32)
	}

	pub fn preview_interval(&self) -> Duration {
		Duration::from_millis(self.preview_interval_ms.max(16))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_files_fill_in_defaults() {
		let cfg = Config::from_json(r#"{ "app_name": "obs", "resolver": { "acceptance_threshold": 0.6 } }"#).unwrap();
		assert_eq!(cfg.app_name, "obs");
		assert_eq!(cfg.resolver.acceptance_threshold, 0.6);
		assert_eq!(cfg.resolver.min_length, 3);
		assert_eq!(cfg.preprocess, ie::Preprocess::threshold());
	}

	#[test]
	fn round_trips_through_json() {
		let cfg = Config {
			preprocess: ie::Preprocess::Contrast { amount: 30.0 },
			ocr_backend: ie::OcrBackend::Tesseract,
			ocr_timeout_s: None,
			..Config::default()
		};
		let json = serde_json::to_string(&cfg).unwrap();
		assert_eq!(Config::from_json(&json).unwrap(), cfg);
	}

	#[test]
	fn non_positive_timeout_disables_it() {
		let mut cfg = Config::default();
		assert_eq!(cfg.ocr_timeout(), Some(Duration::from_secs(20)));
		cfg.ocr_timeout_s = Some(0.0);
		assert_eq!(cfg.ocr_timeout(), None);
	}
}
