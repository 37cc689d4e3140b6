//! Dataset loading errors.

use thiserror::Error;

/// Why the bundled dataset could not be turned into a graph. Any of these
/// ends the session; nothing is partially loaded.
#[derive(Debug, Error)]
pub enum LoadError {
	/// The encoded blob is not valid base64.
	#[error("dataset is not valid base64: {0}")]
	Base64(#[from] base64::DecodeError),

	/// The decoded bytes are not the expected JSON.
	#[error("dataset is not valid JSON: {0}")]
	Json(#[from] serde_json::Error),

	/// Valid JSON, but neither the compact nor the document layout.
	#[error("unrecognised dataset layout: expected `n`/`e` or `nodes`/`edges`")]
	UnsupportedLayout,
}
