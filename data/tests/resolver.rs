use std::sync::Arc;

use data::{Dataset, Record, Resolver, ResolverConfig, ScanStatus, clean};

fn builtin() -> Arc<Dataset> {
	Arc::new(Dataset::builtin().expect("builtin dataset"))
}

fn resolver(dataset: Arc<Dataset>) -> Resolver {
	Resolver::new(dataset, ResolverConfig::default())
}

#[test]
fn every_name_resolves_to_its_record() {
	let dataset = builtin();
	let resolver = resolver(dataset.clone());
	for record in dataset.iter() {
		let result = resolver.resolve(&record.name);
		assert_eq!(result.status, ScanStatus::Found, "{}", record.name);
		assert_eq!(result.matched.as_ref().map(|m| m.id), Some(record.id));
		assert_eq!(result.score, Some(0.0));
	}
}

#[test]
fn names_resolve_in_any_subset_of_the_dataset() {
	let all = builtin();
	let records = all.records();
	for skip in 0..records.len() {
		let subset: Vec<Record> = records
			.iter()
			.enumerate()
			.filter(|(i, _)| *i != skip)
			.map(|(_, r)| r.clone())
			.rev()
			.collect();
		let subset = Arc::new(Dataset::from_records(subset).unwrap());
		let resolver = resolver(subset.clone());
		for record in subset.iter() {
			let result = resolver.resolve(&record.name);
			assert_eq!(result.matched.map(|m| m.id), Some(record.id));
		}
	}
}

#[test]
fn nested_names_resolve_to_their_own_record() {
	let record = |id: u32, name: &str| {
		format!(
			r#"{{ "id": {id}, "name": "{name}", "type": "tech",
				"ailments": {{ "poison": 0, "burn": 0, "paralysis": 0, "sleep": 0, "blast": 0, "bleed": 0, "blind": 0 }},
				"elements": {{ "normal": 0, "fire": 0, "water": 0, "thunder": 0, "ice": 0, "dragon": 0 }} }}"#
		)
	};
	let short = record(1, "Gore Magala");
	let long = record(2, "Chaotic Gore Magala");

	for json in [format!("[{short}, {long}]"), format!("[{long}, {short}]")] {
		let dataset = Arc::new(Dataset::from_json(&json).unwrap());
		let resolver = resolver(dataset.clone());
		for record in dataset.iter() {
			let result = resolver.resolve(&record.name);
			assert_eq!(result.status, ScanStatus::Found, "{}", record.name);
			assert_eq!(result.matched.map(|m| m.id), Some(record.id), "{}", record.name);
		}
	}
}

#[test]
fn short_text_never_matches() {
	let resolver = resolver(builtin());
	for text in ["", "R", "xk", "Ra", "--"] {
		let result = resolver.resolve(text);
		assert_eq!(result.status, ScanStatus::TextUnclear, "{text:?}");
		assert!(result.score.is_none());
	}
}

#[test]
fn unrelated_text_has_no_match() {
	let resolver = resolver(builtin());
	for text in ["zzzzzzz", "qqqqqq", "wwwwwwwwww"] {
		let result = resolver.resolve(text);
		assert_eq!(result.status, ScanStatus::NoMatch, "{text:?}");
		assert!(result.matched.is_none());
		assert!(result.message().contains(text));
	}
}

#[test]
fn noisy_alias_scan_finds_chatacabra() {
	let resolver = resolver(builtin());
	let result = resolver.scan("BFeral Chatacabra");
	assert_eq!(result.status, ScanStatus::Found);
	assert_eq!(result.matched.map(|m| m.id), Some(8));
}

#[test]
fn two_letter_scan_is_unclear() {
	let resolver = resolver(builtin());
	let result = resolver.scan("xk");
	assert_eq!(result.cleaned_text, "xk");
	assert_eq!(result.status, ScanStatus::TextUnclear);
}

#[test]
fn name_inside_longer_ocr_output_matches() {
	let resolver = resolver(builtin());
	let result = resolver.scan("HUNT TARGET Nargacuga LV");
	assert_eq!(result.matched.map(|m| m.id), Some(4));
}

#[test]
fn ties_keep_dataset_order() {
	let tables = r#"
		"ailments": { "poison": 0, "burn": 0, "paralysis": 0, "sleep": 0, "blast": 0, "bleed": 0, "blind": 0 },
		"elements": { "normal": 0, "fire": 0, "water": 0, "thunder": 0, "ice": 0, "dragon": 0 }"#;
	let json = format!(
		r#"[
			{{ "id": 20, "name": "Gore Magala", "aliases": ["Magala"], "type": "tech", {tables} }},
			{{ "id": 10, "name": "Chaotic Gore Magala", "aliases": ["Magala"], "type": "tech", {tables} }}
		]"#
	);
	let resolver = resolver(Arc::new(Dataset::from_json(&json).unwrap()));
	let result = resolver.resolve("Magala");
	assert_eq!(result.matched.map(|m| m.id), Some(20));
}

#[test]
fn clean_then_resolve_is_stable() {
	let resolver = resolver(builtin());
	for raw in ["  Tigrex!! ", "Kulu-Ya-Ku 42", "Lagia crus"] {
		let once = clean(raw);
		assert_eq!(clean(&once), once);
		assert_eq!(resolver.resolve(&once), resolver.resolve(&clean(&once)));
	}
}
