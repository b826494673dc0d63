//! Turns recognized text into a dataset record.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
	Candidate, Dataset, Matcher, MatcherConfig, Record,
	text::{clean_with, match_key},
};

/// Terminal status of one scan attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanStatus {
	Found,
	Unsure,
	NoMatch,
	TextUnclear,
	CameraOrOcrError,
}

/// Outcome of one scan attempt. Replaced by the next scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
	pub status: ScanStatus,
	pub raw_text: String,
	pub cleaned_text: String,
	pub matched: Option<Record>,
	/// Best candidate score, also reported for `Unsure`.
	pub score: Option<f32>,
	/// Failure description for `CameraOrOcrError`.
	pub error: Option<String>,
}

impl ScanResult {
	fn unresolved(status: ScanStatus, cleaned: &str, score: Option<f32>) -> Self {
		Self {
			status,
			raw_text: cleaned.to_string(),
			cleaned_text: cleaned.to_string(),
			matched: None,
			score,
			error: None,
		}
	}

	/// The capture or OCR step failed before any text was available.
	pub fn failed(error: impl std::fmt::Display) -> Self {
		Self {
			status: ScanStatus::CameraOrOcrError,
			raw_text: String::new(),
			cleaned_text: String::new(),
			matched: None,
			score: None,
			error: Some(error.to_string()),
		}
	}

	/// Short line for the status bar. Raw text is echoed whenever matching did not settle.
	pub fn message(&self) -> String {
		match self.status {
			ScanStatus::Found => match &self.matched {
				Some(record) => format!("Found {}", record.name),
				None => "Found".to_string(),
			},
			ScanStatus::Unsure => format!("Unsure match for \"{}\", try again", self.raw_text),
			ScanStatus::NoMatch => format!("No monster matches \"{}\"", self.raw_text),
			ScanStatus::TextUnclear => format!("Scanned \"{}\": too short/unclear, hold steady", self.cleaned_text),
			ScanStatus::CameraOrOcrError => format!(
				"Scan failed: {}",
				self.error.as_deref().unwrap_or("unknown error")
			),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
	/// Matcher used for scans.
	pub matcher: MatcherConfig,
	/// Best scores above this are reported as `Unsure`.
	pub acceptance_threshold: f32,
	/// Distance threshold for the manual search list.
	pub search_threshold: f32,
	/// Cleaned text shorter than this (in chars) is `TextUnclear`.
	pub min_length: usize,
	pub allow_hyphen: bool,
}

impl Default for ResolverConfig {
	fn default() -> Self {
		Self {
			matcher: MatcherConfig::default(),
			acceptance_threshold: 0.5,
			search_threshold: 0.35,
			min_length: 3,
			allow_hyphen: true,
		}
	}
}

/// Owns the dataset reference and matching policy. No state is shared between instances.
#[derive(Debug, Clone)]
pub struct Resolver {
	dataset: Arc<Dataset>,
	config: ResolverConfig,
	scan_matcher: Matcher,
	search_matcher: Matcher,
}

impl Resolver {
	pub fn new(dataset: Arc<Dataset>, config: ResolverConfig) -> Self {
		let scan_matcher = Matcher::new(config.matcher.clone());
		let search_matcher = Matcher::new(MatcherConfig {
			distance_threshold: config.search_threshold,
			..config.matcher.clone()
		});

		Self {
			dataset,
			config,
			scan_matcher,
			search_matcher,
		}
	}

	pub fn dataset(&self) -> &Dataset {
		&self.dataset
	}

	pub fn config(&self) -> &ResolverConfig {
		&self.config
	}

	pub fn clean(&self, raw: &str) -> String {
		clean_with(raw, self.config.allow_hyphen)
	}

	/// Clean raw OCR output and resolve it.
	pub fn scan(&self, raw: &str) -> ScanResult {
		let cleaned = self.clean(raw);
		ScanResult {
			raw_text: raw.to_string(),
			..self.resolve(&cleaned)
		}
	}

	/// Resolve already cleaned text against the dataset.
	pub fn resolve(&self, cleaned: &str) -> ScanResult {
		if cleaned.chars().count() < self.config.min_length {
			log::debug!("text too short to match: {cleaned:?}");
			return ScanResult::unresolved(ScanStatus::TextUnclear, cleaned, None);
		}

		let candidates = self.scan_matcher.search(cleaned, self.dataset.records());
		let Some(best) = candidates.first() else {
			log::debug!("no candidates for {cleaned:?}");
			return ScanResult::unresolved(ScanStatus::NoMatch, cleaned, None);
		};

		if best.score > self.config.acceptance_threshold {
			log::debug!("best candidate {} for {cleaned:?} scored {:.3}, not accepted", best.record.name, best.score);
			return ScanResult::unresolved(ScanStatus::Unsure, cleaned, Some(best.score));
		}

		log::debug!("{cleaned:?} resolved to {} ({:.3})", best.record.name, best.score);
		ScanResult {
			status: ScanStatus::Found,
			raw_text: cleaned.to_string(),
			cleaned_text: cleaned.to_string(),
			matched: Some(best.record.clone()),
			score: Some(best.score),
			error: None,
		}
	}

	/// Ranked records for a typed query; empty for a blank query.
	pub fn search(&self, query: &str) -> Vec<Candidate<'_>> {
		if match_key(query).is_empty() {
			return vec![];
		}
		self.search_matcher.search(query, self.dataset.records())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn resolver() -> Resolver {
		Resolver::new(Arc::new(Dataset::builtin().unwrap()), ResolverConfig::default())
	}

	#[test]
	fn short_text_is_unclear() {
		let r = resolver().resolve("xk");
		assert_eq!(r.status, ScanStatus::TextUnclear);
		assert!(r.matched.is_none() && r.score.is_none());
	}

	#[test]
	fn exact_name_is_found_with_zero_score() {
		let r = resolver().resolve("Rathalos");
		assert_eq!(r.status, ScanStatus::Found);
		assert_eq!(r.matched.map(|m| m.id), Some(1));
		assert_eq!(r.score, Some(0.0));
	}

	#[test]
	fn scan_keeps_raw_text() {
		let r = resolver().scan("|Velkhana 7");
		assert_eq!(r.raw_text, "|Velkhana 7");
		assert_eq!(r.cleaned_text, "Velkhana");
		assert_eq!(r.matched.map(|m| m.id), Some(7));
	}

	#[test]
	fn weak_candidate_is_unsure() {
		let r = resolver().resolve("Raxxxxxx");
		assert_eq!(r.status, ScanStatus::Unsure);
		assert!(r.matched.is_none());
		assert!(r.score.is_some_and(|s| s > 0.5));
		assert!(r.message().contains("Raxxxxxx"));
	}

	#[test]
	fn acceptance_threshold_is_configurable() {
		let strict = Resolver::new(
			Arc::new(Dataset::builtin().unwrap()),
			ResolverConfig {
				acceptance_threshold: 0.1,
				..Default::default()
			},
		);
		assert_eq!(strict.resolve("Rathaloss").status, ScanStatus::Found);
		assert_eq!(strict.resolve("Ratalos").status, ScanStatus::Unsure);
	}

	#[test]
	fn search_ranks_and_ignores_blank_queries() {
		let resolver = resolver();
		assert!(resolver.search("   ").is_empty());

		let hits = resolver.search("chatacab");
		assert_eq!(hits.first().map(|c| c.record.id), Some(8));

		let hits = resolver.search("zino");
		assert_eq!(hits.iter().map(|c| c.record.id).collect::<Vec<_>>(), vec![2]);
	}

	#[test]
	fn failure_message_carries_error() {
		let r = ScanResult::failed("engine crashed");
		assert_eq!(r.status, ScanStatus::CameraOrOcrError);
		assert_eq!(r.message(), "Scan failed: engine crashed");
	}
}
