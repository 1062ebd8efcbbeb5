//! fable-graph: annotate the relationships between events of short stories.
//!
//! A corpus of stories is loaded from JSON (or JSON lines). For each story the
//! annotator edits five undirected graphs over its events (temporal, spatial,
//! character, causal and intention) on interactive canvases, then exports the
//! corpus with the edited graphs written back.
//!
//! The [`store`] and [`annotate`] modules hold all of the session logic and do
//! not depend on the browser; [`components`] renders it with Leptos.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

/// Session logic: panels, tabs and the controller.
pub mod annotate;
/// Leptos views.
pub mod components;
/// Page configuration.
pub mod config;
/// Error types.
pub mod error;
/// Corpus model and persistence.
pub mod store;

use annotate::Controller;
use components::{GraphTabs, StatusLine, TextPaneView, Toolbar, TreePaneView};
use config::AnnotatorConfig;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging(level: Level) {
	let _ = console_log::init_with_level(level);
	console_error_panic_hook::set_once();
	info!("fable-graph: logging initialized at {level}");
}

/// Text of the `<script id=...>` element, if the page has one.
fn read_script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Reads the page configuration and starts logging with its level.
///
/// Config comes from `<script id="annotator-config">`; a missing or broken
/// block leaves the defaults in place.
pub fn bootstrap() -> AnnotatorConfig {
	let parsed = read_script_text("annotator-config").map(|text| AnnotatorConfig::from_json(&text));
	let config = match &parsed {
		Some(Ok(config)) => config.clone(),
		_ => AnnotatorConfig::default(),
	};
	init_logging(config.log_level());
	if let Some(Err(e)) = parsed {
		warn!("fable-graph: ignoring annotator config: {e}");
	}
	config
}

/// Main application component.
///
/// Stories embedded in `<script id="story-data">` are imported on start;
/// otherwise the window opens empty until a file is imported.
#[component]
pub fn App(config: AnnotatorConfig) -> impl IntoView {
	provide_meta_context();

	let mut session = Controller::new();
	if let Some(text) = read_script_text("story-data") {
		let result = session.import_json("embedded story data", &text);
		session.report(result);
	}
	let controller = RwSignal::new(session);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme=config.theme.clone() />
		<Title text="Fable Graph Annotator" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="annotator">
			<Toolbar controller=controller export_file_name=config.export_file_name.clone() />
			<main class="workspace">
				<GraphTabs controller=controller config=config.clone() />
				<aside class="panes">
					<TextPaneView controller=controller />
					<TreePaneView controller=controller />
				</aside>
			</main>
			<StatusLine controller=controller />
		</div>
	}
}
