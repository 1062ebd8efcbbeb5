//! Start-up configuration read from the host page.

use log::Level;
use serde::Deserialize;

use crate::components::graph_canvas::Theme;

/// Settings for one annotator page. Every field is optional in the JSON.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
	/// `"default"` (dark) or `"paper"` (light).
	pub theme: String,
	/// Canvas width in CSS pixels.
	pub canvas_width: f64,
	/// Canvas height in CSS pixels.
	pub canvas_height: f64,
	/// Run the force layout; when off nodes only move when dragged.
	pub simulate: bool,
	/// Name offered for downloaded exports.
	pub export_file_name: String,
	/// One of `error`, `warn`, `info`, `debug`, `trace`.
	pub log_level: String,
}

impl Default for AnnotatorConfig {
	fn default() -> Self {
		Self {
			theme: "default".to_string(),
			canvas_width: 900.0,
			canvas_height: 640.0,
			simulate: false,
			export_file_name: "Full_Fables_Graph_New.json".to_string(),
			log_level: "debug".to_string(),
		}
	}
}

impl AnnotatorConfig {
	/// Parses the config block; missing fields take their defaults.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}

	/// Configured log level, falling back to `Info` for unknown names.
	pub fn log_level(&self) -> Level {
		self.log_level.parse().unwrap_or(Level::Info)
	}

	/// Configured theme, falling back to the default theme for unknown names.
	pub fn theme(&self) -> Theme {
		Theme::by_name(&self.theme).unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_fields_use_defaults() {
		let config = AnnotatorConfig::from_json(r#"{"theme": "paper"}"#).unwrap();
		assert_eq!(config.theme().name, "paper");
		assert_eq!(config.canvas_width, AnnotatorConfig::default().canvas_width);
		assert!(!config.simulate);
	}

	#[test]
	fn unknown_names_fall_back() {
		let config = AnnotatorConfig::from_json(r#"{"theme": "neon", "log_level": "loud"}"#).unwrap();
		assert_eq!(config.theme().name, "default");
		assert_eq!(config.log_level(), Level::Info);
	}

	#[test]
	fn log_level_names_are_case_insensitive() {
		let config = AnnotatorConfig::from_json(r#"{"log_level": "WARN"}"#).unwrap();
		assert_eq!(config.log_level(), Level::Warn);
	}
}
