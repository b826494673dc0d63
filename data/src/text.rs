use std::sync::LazyLock;

use regex::Regex;

static OUTSIDE_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\p{L}\s-]").expect("regex"));
static OUTSIDE_NAME_NO_HYPHEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\p{L}\s]").expect("regex"));

/// Strip everything but letters, whitespace and hyphens from raw OCR text, then trim.
pub fn clean(raw: &str) -> String {
	clean_with(raw, true)
}

/// Like [`clean`], with hyphens optionally stripped as well.
pub fn clean_with(raw: &str, allow_hyphen: bool) -> String {
	let re = if allow_hyphen { &*OUTSIDE_NAME } else { &*OUTSIDE_NAME_NO_HYPHEN };
	re.replace_all(raw, "").trim().to_string()
}

/// Lowercased with whitespace runs collapsed; the form names are compared in.
pub(crate) fn match_key(s: &str) -> String {
	s.split_whitespace()
		.collect::<Vec<_>>()
		.join(" ")
		.to_lowercase()
}
