use std::{collections::HashSet, path::Path};

use crate::{DataError, Record, RecordId};

/// The monsters shipped with the application.
const BUILTIN: &str = include_str!("../assets/monsters.json");

/// Immutable, ordered list of records, validated once at load time.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
	records: Vec<Record>,
}

impl Dataset {
	/// The embedded dataset.
	pub fn builtin() -> Result<Self, DataError> {
		Self::from_json(BUILTIN)
	}

	pub fn from_json(json: &str) -> Result<Self, DataError> {
		let records = serde_json::from_str::<Vec<Record>>(json)?;
		Self::from_records(records)
	}

	pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
		let path = path.as_ref();
		let json = std::fs::read_to_string(path).map_err(|source| DataError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_json(&json)
	}

	pub fn from_records(records: Vec<Record>) -> Result<Self, DataError> {
		let mut ids = HashSet::new();
		for record in &records {
			if !ids.insert(record.id) {
				return Err(DataError::DuplicateId(record.id));
			}
			if record.name.trim().is_empty() {
				return Err(DataError::EmptyName(record.id));
			}
			if record.aliases.iter().any(|a| a.trim().is_empty()) {
				return Err(DataError::EmptyAlias(record.id));
			}

			let mut variants = HashSet::new();
			for variant in &record.variants {
				let key = variant.name.trim().to_ascii_lowercase();
				if key.is_empty() || !variants.insert(key) {
					return Err(DataError::BadVariant {
						id: record.id,
						name: variant.name.clone(),
					});
				}
			}
		}

		log::debug!("loaded {} records", records.len());
		Ok(Self { records })
	}

	pub fn get(&self, id: RecordId) -> Option<&Record> {
		self.records.iter().find(|r| r.id == id)
	}

	pub fn records(&self) -> &[Record] {
		&self.records
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Record> {
		self.records.iter()
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{Ailment, Element, Resistance};

	const TABLES: &str = r#"
		"ailments": { "poison": 0, "burn": 0, "paralysis": 0, "sleep": 0, "blast": 0, "bleed": 0, "blind": 0 },
		"elements": { "normal": 0, "fire": 0, "water": 0, "thunder": 0, "ice": 0, "dragon": 0 }
	"#;

	fn record(id: u32, name: &str) -> String {
		format!(r#"{{ "id": {id}, "name": "{name}", "type": "power", {TABLES} }}"#)
	}

	#[test]
	fn builtin_dataset_is_valid() {
		let data = Dataset::builtin().unwrap();
		assert_eq!(data.len(), 8);

		let rathalos = data.get(1).unwrap();
		assert_eq!(rathalos.name, "Rathalos");
		assert_eq!(rathalos.elements.get(Element::Dragon), Resistance::VeryWeak);
		assert_eq!(rathalos.ailments.get(Ailment::Burn), Resistance::VeryResistant);

		let chatacabra = data.get(8).unwrap();
		assert_eq!(chatacabra.aliases, vec!["Feral Chatacabra", "Chatacabra Subspecies"]);
		assert!(chatacabra.variant("Feral").is_some());
	}

	#[test]
	fn minimal_records_use_defaults() {
		let data = Dataset::from_json(&format!("[{}]", record(3, "Tigrex"))).unwrap();
		let tigrex = data.get(3).unwrap();
		assert!(tigrex.aliases.is_empty());
		assert!(tigrex.enraged.is_none());
		assert!(tigrex.parts.is_empty());
	}

	#[test]
	fn duplicate_ids_are_rejected() {
		let json = format!("[{}, {}]", record(1, "Rathalos"), record(1, "Rathian"));
		assert!(matches!(Dataset::from_json(&json), Err(DataError::DuplicateId(1))));
	}

	#[test]
	fn empty_names_are_rejected() {
		let json = format!("[{}]", record(4, "  "));
		assert!(matches!(Dataset::from_json(&json), Err(DataError::EmptyName(4))));
	}

	#[test]
	fn incomplete_tables_are_rejected() {
		let json = r#"[{ "id": 1, "name": "Rathalos", "type": "power",
			"ailments": { "poison": 0 },
			"elements": { "normal": 0, "fire": 0, "water": 0, "thunder": 0, "ice": 0, "dragon": 0 } }]"#;
		assert!(matches!(Dataset::from_json(json), Err(DataError::Parse(_))));
	}

	#[test]
	fn missing_file_reports_path() {
		let err = Dataset::load("/nonexistent/monsters.json").unwrap_err();
		assert!(err.to_string().contains("/nonexistent/monsters.json"));
	}
}
