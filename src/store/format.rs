//! On-disk corpus layouts: a JSON array or JSON lines.

use std::path::Path;

use crate::error::{LoadError, SaveError};

use super::model::Story;

/// How a corpus is laid out in its file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreFormat {
	/// A single JSON array of story objects, written pretty-printed.
	#[default]
	Json,
	/// One compact story object per line.
	JsonLines,
}

impl StoreFormat {
	/// Format implied by a `.json` / `.jsonl` extension, if any.
	pub fn from_path(path: &Path) -> Option<Self> {
		match path.extension()?.to_str()? {
			ext if ext.eq_ignore_ascii_case("jsonl") => Some(StoreFormat::JsonLines),
			ext if ext.eq_ignore_ascii_case("json") => Some(StoreFormat::Json),
			_ => None,
		}
	}

	/// Guess the format from file contents: arrays start with `[`.
	pub fn detect(contents: &str) -> Self {
		match contents.trim_start().chars().next() {
			Some('[') => StoreFormat::Json,
			_ => StoreFormat::JsonLines,
		}
	}

	/// Parses every story; JSON lines errors carry the 1-based line.
	pub fn parse(self, origin: &str, contents: &str) -> Result<Vec<Story>, LoadError> {
		match self {
			StoreFormat::Json => {
				serde_json::from_str(contents).map_err(|source| LoadError::Parse {
					origin: origin.to_string(),
					line: None,
					source,
				})
			}
			StoreFormat::JsonLines => contents
				.lines()
				.enumerate()
				.filter(|(_, line)| !line.trim().is_empty())
				.map(|(i, line)| {
					serde_json::from_str(line).map_err(|source| LoadError::Parse {
						origin: origin.to_string(),
						line: Some(i + 1),
						source,
					})
				})
				.collect(),
		}
	}

	/// Serializes `stories` in this layout, ending with a newline.
	pub fn render(self, stories: &[Story]) -> Result<String, SaveError> {
		match self {
			StoreFormat::Json => {
				let mut out = serde_json::to_string_pretty(stories)?;
				out.push('\n');
				Ok(out)
			}
			StoreFormat::JsonLines => {
				let mut out = String::new();
				for story in stories {
					out.push_str(&serde_json::to_string(story)?);
					out.push('\n');
				}
				Ok(out)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn extension_decides_format() {
		assert_eq!(
			StoreFormat::from_path(Path::new("Data/fables.jsonl")),
			Some(StoreFormat::JsonLines)
		);
		assert_eq!(
			StoreFormat::from_path(Path::new("fables.JSON")),
			Some(StoreFormat::Json)
		);
		assert_eq!(StoreFormat::from_path(Path::new("fables.txt")), None);
		assert_eq!(StoreFormat::from_path(Path::new("fables")), None);
	}

	#[test]
	fn detect_looks_at_first_character() {
		assert_eq!(StoreFormat::detect("  \n[ {} ]"), StoreFormat::Json);
		assert_eq!(StoreFormat::detect("{\"sentences\": []}"), StoreFormat::JsonLines);
	}

	#[test]
	fn json_lines_errors_carry_line_numbers() {
		let contents = "{\"sentences\":[],\"events\":[]}\n\n{not json}\n";
		match StoreFormat::JsonLines.parse("test", contents) {
			Err(LoadError::Parse { line, .. }) => assert_eq!(line, Some(3)),
			other => panic!("expected parse error, got {other:?}"),
		}
	}

	#[test]
	fn json_lines_skip_blank_lines() {
		let contents = "\n{\"sentences\":[\"a\"],\"events\":[]}\n   \n{\"sentences\":[\"b\"],\"events\":[]}\n";
		let stories = StoreFormat::JsonLines.parse("test", contents).unwrap();
		assert_eq!(stories.len(), 2);
		assert_eq!(stories[1].sentences, vec!["b".to_string()]);
	}
}
