use std::path::PathBuf;

use crate::RecordId;

/// Problems found while loading or validating a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
	#[error("resistance level {0} is outside -2..=2")]
	ResistanceOutOfRange(i8),
	#[error("dataset is not valid: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("failed to read dataset {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("record id {0} appears more than once")]
	DuplicateId(RecordId),
	#[error("record id {0} has an empty name")]
	EmptyName(RecordId),
	#[error("record id {0} has an empty alias")]
	EmptyAlias(RecordId),
	#[error("record id {id} has an empty or repeated variant name {name:?}")]
	BadVariant { id: RecordId, name: String },
}
