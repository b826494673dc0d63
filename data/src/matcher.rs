//! Fuzzy name matching.
//!
//! Scores are normalized edit distances in `[0, 1]`: 0 is an exact match,
//! 1 means nothing in common. OCR output is noisy at the edges (a stray glyph
//! from the frame border, a second line of HUD text), so by default the
//! position of a name inside the query is ignored.

use serde::{Deserialize, Serialize};

use crate::{Record, text::match_key};

/// Record fields the matcher searches, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
	Name,
	Aliases,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
	pub fields: Vec<Field>,
	/// Candidates scoring above this are dropped.
	pub distance_threshold: f32,
	/// Score a name against any part of the query (and the query against any part of a name).
	pub ignore_location: bool,
}

impl Default for MatcherConfig {
	fn default() -> Self {
		Self {
			fields: vec![Field::Name, Field::Aliases],
			distance_threshold: 0.75,
			ignore_location: true,
		}
	}
}

/// Queries are cut to this many times the longest searched name before
/// scoring. Substring scoring grows with the query length, and a block of
/// OCR output far longer than any name cannot score well anyway.
const QUERY_LIMIT_FACTOR: usize = 4;

#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
	pub record: &'a Record,
	pub score: f32,
	rank: Rank,
}

/// Ordering key for one record. Lower is better, compared field by field.
///
/// Location-insensitive scores tie at 0 whenever one name contains another
/// ("Gore Magala" inside "Chaotic Gore Magala"), so ties are broken by the
/// whole-string distance and then by preferring the main name over aliases.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Rank {
	score: f32,
	whole: f32,
	alias: bool,
}

impl Rank {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.score
			.total_cmp(&other.score)
			.then(self.whole.total_cmp(&other.whole))
			.then(self.alias.cmp(&other.alias))
	}
}

#[derive(Debug, Clone)]
pub struct Matcher {
	config: MatcherConfig,
}

impl Matcher {
	pub fn new(config: MatcherConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &MatcherConfig {
		&self.config
	}

	/// Candidates at or under the distance threshold, best first.
	///
	/// A record named exactly by the query always ranks first. Otherwise the
	/// sort is stable, so records sharing a rank keep dataset order.
	pub fn search<'a>(&self, query: &str, records: &'a [Record]) -> Vec<Candidate<'a>> {
		let mut query = match_key(query);
		if query.is_empty() {
			return vec![];
		}

		let longest = records
			.iter()
			.flat_map(|record| self.values(record))
			.map(|(value, _)| value.chars().count())
			.max()
			.unwrap_or(0);
		let limit = longest.saturating_mul(QUERY_LIMIT_FACTOR).max(1);
		if let Some((cut, _)) = query.char_indices().nth(limit) {
			log::debug!("query of {} chars cut to {limit}", query.chars().count());
			query.truncate(cut);
			query.truncate(query.trim_end().len());
		}

		let mut candidates = records
			.iter()
			.filter_map(|record| {
				let rank = self.rank_record(&query, record)?;
				(rank.score <= self.config.distance_threshold).then_some(Candidate {
					record,
					score: rank.score,
					rank,
				})
			})
			.collect::<Vec<_>>();

		candidates.sort_by(|a, b| a.rank.cmp(&b.rank));
		candidates
	}

	fn values<'r>(&self, record: &'r Record) -> impl Iterator<Item = (&'r String, bool)> {
		self.config.fields.iter().flat_map(move |field| -> Box<dyn Iterator<Item = (&'r String, bool)>> {
			match field {
				Field::Name => Box::new(std::iter::once((&record.name, false))),
				Field::Aliases => Box::new(record.aliases.iter().map(|alias| (alias, true))),
			}
		})
	}

	fn rank_record(&self, query: &str, record: &Record) -> Option<Rank> {
		let mut best: Option<Rank> = None;
		for (value, alias) in self.values(record) {
			let value = match_key(value);
			let rank = Rank {
				score: score(query, &value, self.config.ignore_location),
				whole: score(query, &value, false),
				alias,
			};
			if best.is_none_or(|b| rank.cmp(&b).is_lt()) {
				best = Some(rank);
			}
		}
		best
	}
}

/// Score two already-normalized strings.
pub fn score(query: &str, target: &str, ignore_location: bool) -> f32 {
	let q_len = query.chars().count();
	let t_len = target.chars().count();
	if q_len == 0 || t_len == 0 {
		return if q_len == t_len { 0.0 } else { 1.0 };
	}

	if !ignore_location {
		let lev = levenshtein::levenshtein(query, target);
		return (lev as f32 / q_len.max(t_len) as f32).min(1.0);
	}

	let forward = substring_distance(query, target) as f32 / q_len as f32;
	if forward == 0.0 {
		return 0.0;
	}
	let backward = substring_distance(target, query) as f32 / t_len as f32;
	forward.min(backward).min(1.0)
}

/// Smallest edit distance between `pattern` and any substring of `text`.
fn substring_distance(pattern: &str, text: &str) -> usize {
	if text.contains(pattern) {
		return 0;
	}

	let p_len = pattern.chars().count();
	// Char boundaries, so every slice below is valid UTF-8.
	let bounds = text
		.char_indices()
		.map(|(i, _)| i)
		.chain(std::iter::once(text.len()))
		.collect::<Vec<_>>();

	// Matching the empty substring costs one insertion per pattern char.
	let mut best = p_len;
	for start in 0..bounds.len() {
		// A substring longer than twice the pattern can never beat `p_len`.
		let last = (start + 2 * p_len).min(bounds.len() - 1);
		for end in start + 1..=last {
			let len = end - start;
			if len.abs_diff(p_len) >= best {
				continue;
			}
			let lev = levenshtein::levenshtein(pattern, &text[bounds[start]..bounds[end]]);
			if lev < best {
				best = lev;
				if best == 0 {
					return 0;
				}
			}
		}
	}
	best
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Dataset;

	const NO_ALIASES: &[&str] = &[];

	fn dataset(records: &[(u32, &str, &[&str])]) -> Dataset {
		let tables = r#""ailments": { "poison": 0, "burn": 0, "paralysis": 0, "sleep": 0, "blast": 0, "bleed": 0, "blind": 0 },
			"elements": { "normal": 0, "fire": 0, "water": 0, "thunder": 0, "ice": 0, "dragon": 0 }"#;
		let json = records
			.iter()
			.map(|(id, name, aliases)| {
				let aliases = serde_json::to_string(aliases).unwrap();
				format!(r#"{{ "id": {id}, "name": "{name}", "aliases": {aliases}, "type": "power", {tables} }}"#)
			})
			.collect::<Vec<_>>()
			.join(",");
		Dataset::from_json(&format!("[{json}]")).unwrap()
	}

	fn best(data: &Dataset, query: &str) -> Option<u32> {
		Matcher::new(MatcherConfig::default())
			.search(query, data.records())
			.first()
			.map(|c| c.record.id)
	}

	#[test]
	fn nested_names_rank_the_exact_record_first() {
		for records in [
			[(1, "Gore Magala", NO_ALIASES), (2, "Chaotic Gore Magala", NO_ALIASES)],
			[(2, "Chaotic Gore Magala", NO_ALIASES), (1, "Gore Magala", NO_ALIASES)],
		] {
			let data = dataset(&records);
			assert_eq!(best(&data, "Chaotic Gore Magala"), Some(2));
			assert_eq!(best(&data, "Gore Magala"), Some(1));
		}
	}

	#[test]
	fn main_name_beats_an_identical_alias() {
		let data = dataset(&[(1, "Stygian Zinogre", &["Zinogre"][..]), (2, "Zinogre", NO_ALIASES)]);
		assert_eq!(best(&data, "Zinogre"), Some(2));
		assert_eq!(best(&data, "Stygian Zinogre"), Some(1));
	}

	#[test]
	fn overlong_queries_are_cut_before_scoring() {
		let data = dataset(&[(1, "Rathalos", NO_ALIASES)]);
		let query = format!("Rathalos {}", "x".repeat(5000));
		let hits = Matcher::new(MatcherConfig::default()).search(&query, data.records());
		assert_eq!(hits.len(), 1);
		assert_eq!(hits[0].score, 0.0);
	}

	#[test]
	fn exact_is_zero() {
		assert_eq!(score("rathalos", "rathalos", true), 0.0);
		assert_eq!(score("rathalos", "rathalos", false), 0.0);
	}

	#[test]
	fn noise_around_a_name_is_ignored() {
		assert_eq!(score("x rathalos yy", "rathalos", true), 0.0);
		assert!(score("x rathalos yy", "rathalos", false) > 0.3);
	}

	#[test]
	fn one_typo_costs_one_edit() {
		let s = score("rathaios", "rathalos", true);
		assert!((s - 1.0 / 8.0).abs() < 1e-6, "{s}");
	}

	#[test]
	fn unrelated_text_scores_high() {
		assert!(score("zzzzzzz", "zinogre", true) > 0.8);
		assert_eq!(score("qqq", "tigrex", true), 1.0);
	}

	#[test]
	fn substring_distance_handles_multibyte() {
		assert_eq!(substring_distance("déjà", "xx déjà vu"), 0);
		assert_eq!(substring_distance("deja", "xx déjà vu"), 2);
	}
}
