//! Error types for dataset loading.
//!
//! These never reach UI callers: the dataset store logs them and substitutes
//! an empty value, so a missing or broken file reads as an empty subtree.

use thiserror::Error;

use super::source::DatasetKey;

/// Result type alias for dataset loading.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Errors raised while fetching or decoding a dataset file.
#[derive(Debug, Error)]
pub enum LoadError {
	/// No file is registered for the key.
	#[error("no dataset registered for {0}")]
	NotFound(DatasetKey),

	/// The file exists but could not be read.
	#[error("failed to read {key}: {message}")]
	Unavailable {
		/// Dataset that failed.
		key: DatasetKey,
		/// Description of the failure.
		message: String,
	},

	/// The file was read but is not valid for its dataset kind.
	#[error("malformed {key}: {source}")]
	Malformed {
		/// Dataset that failed to decode.
		key: DatasetKey,
		/// Underlying JSON error.
		#[source]
		source: serde_json::Error,
	},
}

impl LoadError {
	/// Whether the error only means "nothing registered under this key".
	pub fn is_not_found(&self) -> bool {
		matches!(self, LoadError::NotFound(_))
	}
}
