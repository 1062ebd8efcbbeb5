//! Error types shared by the store and the annotation controller.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a corpus file into a [`StoryStore`](crate::store::StoryStore).
#[derive(Debug, Error)]
pub enum LoadError {
	/// The file could not be read.
	#[error("cannot read {}: {source}", .path.display())]
	Io {
		/// File that was asked for.
		path: PathBuf,
		/// Underlying read failure.
		source: std::io::Error,
	},

	/// The text is not valid corpus JSON.
	#[error("{origin}: malformed JSON{}: {source}", line_suffix(.line))]
	Parse {
		/// File path or import name.
		origin: String,
		/// 1-based line for JSON lines input.
		line: Option<usize>,
		/// What serde_json rejected.
		source: serde_json::Error,
	},

	/// A story parsed but breaks a graph rule.
	#[error("{origin}: story {story}: {reason}")]
	Invalid {
		/// File path or import name.
		origin: String,
		/// Index of the offending story.
		story: usize,
		/// Which rule the story breaks.
		reason: String,
	},

	/// The corpus holds no stories.
	#[error("{origin}: corpus contains no stories")]
	Empty {
		/// File path or import name.
		origin: String,
	},
}

fn line_suffix(line: &Option<usize>) -> String {
	line.map(|l| format!(" on line {l}")).unwrap_or_default()
}

/// Failure to serialize or write the store.
#[derive(Debug, Error)]
pub enum SaveError {
	/// The file could not be written or moved into place.
	#[error("cannot write {}: {source}", .path.display())]
	Io {
		/// Target of the save.
		path: PathBuf,
		/// Underlying write or rename failure.
		source: std::io::Error,
	},

	/// The stories could not be turned into JSON.
	#[error("cannot serialize stories: {0}")]
	Serialize(#[from] serde_json::Error),
}

/// Top-level error for every store and controller operation.
#[derive(Debug, Error)]
pub enum AnnotatorError {
	/// Importing a corpus failed.
	#[error("load failed: {0}")]
	Load(#[from] LoadError),

	/// Saving a corpus failed.
	#[error("save failed: {0}")]
	Save(#[from] SaveError),

	/// A story index outside the corpus.
	#[error("story index {idx} is out of range (corpus has {len} stories)")]
	Index {
		/// Requested index.
		idx: usize,
		/// Number of stories in the corpus.
		len: usize,
	},

	/// An edit or graph set that breaks a graph rule.
	#[error("invalid graph edit: {0}")]
	Validation(String),

	/// The action needs a loaded corpus.
	#[error("no story file loaded")]
	NotLoaded,
}

/// Crate result, failing with [`AnnotatorError`] by default.
pub type Result<T, E = AnnotatorError> = std::result::Result<T, E>;
