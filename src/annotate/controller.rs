//! Story navigation, panes and persistence actions behind the main window.

use std::path::Path;

use log::{debug, info, warn};

use crate::error::{AnnotatorError, Result};
use crate::store::{Event, Relation, StoryStore};

use super::dispatch::{PanelGesture, ViewEvent};
use super::tabs::TabbedGraphView;

/// Where the annotator is in its workflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavState {
	/// Nothing imported yet.
	NoFileLoaded,
	/// Showing the story at this index.
	StoryLoaded(usize),
}

/// Read-only story text with at most one highlighted line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextPane {
	lines: Vec<String>,
	highlighted: Option<usize>,
}

impl TextPane {
	/// One `"> sentence"` line per sentence, a blank line, then the moral.
	///
	/// Sentence `i` stays on line `i`, which is what `sent_id` points at.
	pub fn for_story(sentences: &[String], moral: &str) -> Self {
		let mut lines: Vec<String> = sentences.iter().map(|s| format!("> {s}")).collect();
		lines.push(String::new());
		lines.push(moral.to_string());
		Self {
			lines,
			highlighted: None,
		}
	}

	/// Lines as displayed.
	pub fn lines(&self) -> &[String] {
		&self.lines
	}

	/// Currently highlighted line.
	pub fn highlighted(&self) -> Option<usize> {
		self.highlighted
	}

	/// Highlights `line`, replacing any earlier highlight.
	pub fn highlight(&mut self, line: usize) -> bool {
		if line < self.lines.len() {
			self.highlighted = Some(line);
			true
		} else {
			self.highlighted = None;
			false
		}
	}

	/// Removes the highlight.
	pub fn clear_highlight(&mut self) {
		self.highlighted = None;
	}
}

/// Rendered parse tree of the selected event's sentence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreePane {
	lines: Vec<String>,
}

impl TreePane {
	/// Tree lines, empty when nothing is selected.
	pub fn lines(&self) -> &[String] {
		&self.lines
	}

	/// Replaces the shown tree.
	pub fn show(&mut self, tree: &[String]) {
		self.lines = tree.to_vec();
	}

	/// Empties the pane.
	pub fn clear(&mut self) {
		self.lines.clear();
	}
}

/// Severity of a [`Notice`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
	/// Progress or confirmation.
	Info,
	/// A failed action.
	Error,
}

/// Last message shown to the user in the status line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
	/// How the status line styles it.
	pub level: NoticeLevel,
	/// Text shown to the user.
	pub message: String,
}

/// Drives the annotation session: owns the store, the current position, the
/// five graph panels and the two text panes.
///
/// Moving to another story always flushes the open graphs into the store
/// first; failures never leave a half-updated store behind.
#[derive(Clone, Debug)]
pub struct Controller {
	store: Option<StoryStore>,
	nav: NavState,
	tabs: TabbedGraphView,
	text: TextPane,
	tree: TreePane,
	selected: Option<usize>,
	dirty: bool,
	notice: Option<Notice>,
}

impl Default for Controller {
	fn default() -> Self {
		Self::new()
	}
}

impl Controller {
	/// Starts in [`NavState::NoFileLoaded`].
	pub fn new() -> Self {
		Self {
			store: None,
			nav: NavState::NoFileLoaded,
			tabs: TabbedGraphView::new(),
			text: TextPane::default(),
			tree: TreePane::default(),
			selected: None,
			dirty: false,
			notice: None,
		}
	}

	/// Where the session is.
	pub fn nav_state(&self) -> NavState {
		self.nav
	}

	/// Index of the open story, if any.
	pub fn current_idx(&self) -> Option<usize> {
		match self.nav {
			NavState::StoryLoaded(idx) => Some(idx),
			NavState::NoFileLoaded => None,
		}
	}

	/// The loaded corpus, with edits flushed so far.
	pub fn store(&self) -> Option<&StoryStore> {
		self.store.as_ref()
	}

	/// Stories in the loaded corpus, 0 when nothing is loaded.
	pub fn story_count(&self) -> usize {
		self.store.as_ref().map_or(0, StoryStore::len)
	}

	/// The five graph panels of the open story.
	pub fn tabs(&self) -> &TabbedGraphView {
		&self.tabs
	}

	/// Story text pane.
	pub fn text(&self) -> &TextPane {
		&self.text
	}

	/// Parse tree pane.
	pub fn tree(&self) -> &TreePane {
		&self.tree
	}

	/// Event whose tree is currently shown.
	pub fn selected(&self) -> Option<usize> {
		self.selected
	}

	/// Whether graph edits were made since the last export.
	pub fn is_dirty(&self) -> bool {
		self.dirty
	}

	/// Last message for the status line.
	pub fn notice(&self) -> Option<&Notice> {
		self.notice.as_ref()
	}

	/// Switches the visible graph tab.
	pub fn set_active_tab(&mut self, relation: Relation) {
		self.tabs.set_active(relation);
	}

	fn loaded(&self) -> Result<(&StoryStore, usize)> {
		match (&self.store, self.nav) {
			(Some(store), NavState::StoryLoaded(idx)) => Ok((store, idx)),
			_ => Err(AnnotatorError::NotLoaded),
		}
	}

	fn current_events(&self) -> Result<&[Event]> {
		let (store, idx) = self.loaded()?;
		store.get_event_info(idx)
	}

	/// Imports corpus text (browser upload or embedded data).
	///
	/// On failure the previous session, loaded or not, is kept as is.
	pub fn import_json(&mut self, origin: &str, contents: &str) -> Result<()> {
		let store = StoryStore::from_json(origin, contents)?;
		self.install(store)
	}

	/// Imports a corpus file from disk.
	pub fn import_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
		let store = StoryStore::load(path)?;
		self.install(store)
	}

	fn install(&mut self, store: StoryStore) -> Result<()> {
		let origin = store.origin().to_string();
		let count = store.len();
		let previous = self.store.replace(store);
		if let Err(e) = self.enter(0) {
			self.store = previous;
			return Err(e);
		}
		self.dirty = false;
		self.inform(format!("Loaded {count} stories from {origin}"));
		Ok(())
	}

	/// Loads story `idx` into the panes and rebuilds the graph tabs.
	fn enter(&mut self, idx: usize) -> Result<()> {
		let store = self.store.as_ref().ok_or(AnnotatorError::NotLoaded)?;
		let events = store.get_event_info(idx)?;
		let graphs = store.get_graph_info(idx)?;
		let text = TextPane::for_story(store.get_story_text(idx)?, store.get_story_moral(idx)?);

		self.tabs.build(events, &graphs)?;
		self.text = text;
		self.tree.clear();
		self.selected = None;
		self.nav = NavState::StoryLoaded(idx);
		info!("showing story {idx} ({} events)", events.len());
		Ok(())
	}

	/// Writes the open graphs back into the store.
	pub fn save_story(&mut self) -> Result<()> {
		let idx = self.loaded()?.1;
		let graphs = self.tabs.collect_edges();
		let store = self.store.as_mut().ok_or(AnnotatorError::NotLoaded)?;
		store.set_graph_info(idx, graphs)?;
		debug!("flushed graphs of story {idx}");
		Ok(())
	}

	fn flush_and_enter(&mut self, target: usize) -> Result<()> {
		self.save_story()?;
		self.enter(target)
	}

	/// Flushes and moves to the next story, wrapping to the first.
	pub fn next(&mut self) -> Result<()> {
		let (store, idx) = self.loaded()?;
		let target = store.get_next_idx(idx)?;
		self.flush_and_enter(target)
	}

	/// Flushes and moves to the previous story, wrapping to the last.
	pub fn prev(&mut self) -> Result<()> {
		let (store, idx) = self.loaded()?;
		let target = store.get_prev_idx(idx)?;
		self.flush_and_enter(target)
	}

	/// Moves to `target`; an invalid index is rejected before anything is flushed.
	pub fn jump(&mut self, target: usize) -> Result<()> {
		let (store, _) = self.loaded()?;
		if !store.check_idx(target) {
			return Err(AnnotatorError::Index {
				idx: target,
				len: store.len(),
			});
		}
		self.flush_and_enter(target)
	}

	/// Jumps to the index typed into the toolbar.
	pub fn jump_input(&mut self, input: &str) -> Result<()> {
		self.loaded()?;
		let target = input.trim().parse::<usize>().map_err(|_| {
			AnnotatorError::Validation(format!("'{}' is not a story index", input.trim()))
		})?;
		self.jump(target)
	}

	/// Flushes the open story and serializes the whole store.
	///
	/// The session stays dirty until [`Controller::mark_exported`] confirms
	/// the text actually left the page.
	pub fn export_json(&mut self) -> Result<String> {
		self.save_story()?;
		let store = self.store.as_ref().ok_or(AnnotatorError::NotLoaded)?;
		Ok(store.to_json()?)
	}

	/// Records a completed export of the text returned by `export_json`.
	pub fn mark_exported(&mut self) {
		self.dirty = false;
		self.inform(format!("Exported {} stories", self.story_count()));
	}

	/// Flushes the open story and writes the store to `path`.
	pub fn export_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
		let path = path.as_ref();
		self.save_story()?;
		let store = self.store.as_ref().ok_or(AnnotatorError::NotLoaded)?;
		store.save_file(path)?;
		let count = store.len();
		self.dirty = false;
		self.inform(format!("Saved {count} stories to {}", path.display()));
		Ok(())
	}

	/// Applies a canvas gesture and reacts to what it caused.
	pub fn handle_gesture(&mut self, relation: Relation, gesture: PanelGesture) -> Result<()> {
		self.loaded()?;
		self.tabs.handle_gesture(relation, gesture)?;
		for event in self.tabs.drain_events() {
			self.on_view_event(event)?;
		}
		Ok(())
	}

	fn on_view_event(&mut self, event: ViewEvent) -> Result<()> {
		match event {
			ViewEvent::NodeSelected { relation, node } => {
				debug!("{relation}: selected node {node}");
				self.select_node(node)
			}
			ViewEvent::GraphChanged { relation } => {
				debug!("{relation} graph changed");
				self.dirty = true;
				Ok(())
			}
		}
	}

	/// Shows the parse tree of event `node` and highlights its sentence.
	pub fn select_node(&mut self, node: usize) -> Result<()> {
		let event = self
			.current_events()?
			.get(node)
			.cloned()
			.ok_or_else(|| AnnotatorError::Validation(format!("no event {node} in this story")))?;

		self.tree.show(&event.parsed_tree);
		let highlighted = match event.sentence() {
			Some(line) => self.text.highlight(line),
			None => {
				self.text.clear_highlight();
				false
			}
		};
		if !highlighted {
			warn!("event {node} points at missing sentence {}", event.sent_id);
		}
		self.selected = Some(node);
		Ok(())
	}

	fn inform(&mut self, message: String) {
		info!("{message}");
		self.notice = Some(Notice {
			level: NoticeLevel::Info,
			message,
		});
	}

	/// Shows a failure that happened outside the controller, such as a
	/// browser file read or download.
	pub fn notify_error(&mut self, message: impl Into<String>) {
		let message = message.into();
		warn!("{message}");
		self.notice = Some(Notice {
			level: NoticeLevel::Error,
			message,
		});
	}

	/// Surfaces an action's failure in the status line and the log.
	pub fn report<T>(&mut self, result: Result<T>) -> Option<T> {
		match result {
			Ok(value) => Some(value),
			Err(e) => {
				self.notify_error(e.to_string());
				None
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::store::Edge;

	const CORPUS: &str = r#"[
		{"sentences": ["A crow had cheese.", "A fox flattered her.", "She sang and lost it."],
		 "moral": "Do not trust flatterers.",
		 "events": [
			{"instance": "crow had cheese", "sent_id": 0, "parsed_tree": ["(S (NP crow) (VP had cheese))"]},
			{"instance": "fox flattered crow", "sent_id": 1, "parsed_tree": ["(S (NP fox)", "  (VP flattered))"]},
			{"instance": "crow sang", "sent_id": 2, "parsed_tree": ["(S crow sang)"]}
		 ],
		 "graphs": {"Temporal": [[0, 1]]}},
		{"sentences": ["A dog saw his reflection."],
		 "events": [{"instance": "dog saw reflection", "sent_id": 0, "parsed_tree": ["(S dog saw)"]}]}
	]"#;

	fn loaded() -> Controller {
		let mut controller = Controller::new();
		controller.import_json("corpus.json", CORPUS).unwrap();
		controller
	}

	#[test]
	fn starts_without_a_file() {
		let mut controller = Controller::new();
		assert_eq!(controller.nav_state(), NavState::NoFileLoaded);
		assert!(matches!(controller.next(), Err(AnnotatorError::NotLoaded)));
		assert!(matches!(controller.save_story(), Err(AnnotatorError::NotLoaded)));
		assert!(matches!(controller.export_json(), Err(AnnotatorError::NotLoaded)));
	}

	#[test]
	fn import_enters_the_first_story() {
		let controller = loaded();
		assert_eq!(controller.nav_state(), NavState::StoryLoaded(0));
		assert_eq!(controller.text().lines()[1], "> A fox flattered her.");
		assert_eq!(controller.text().lines()[3], "");
		assert_eq!(controller.text().lines()[4], "Do not trust flatterers.");
		assert_eq!(controller.text().highlighted(), None);
		assert_eq!(
			controller.tabs().panel(Relation::Temporal).unwrap().current_edges(),
			&[Edge::new(0, 1)]
		);
	}

	#[test]
	fn failed_import_keeps_the_previous_session() {
		let mut controller = loaded();
		controller.next().unwrap();
		let result = controller.import_json("broken.json", "[{\"sentences\": 3}]");
		assert!(matches!(result, Err(AnnotatorError::Load(_))));
		assert_eq!(controller.nav_state(), NavState::StoryLoaded(1));
		assert_eq!(controller.story_count(), 2);
	}

	#[test]
	fn failed_first_import_stays_unloaded() {
		let mut controller = Controller::new();
		let result = controller.import_json("broken.json", "not json at all");
		assert!(controller.report(result).is_none());
		assert_eq!(controller.nav_state(), NavState::NoFileLoaded);
		assert_eq!(controller.notice().map(|n| n.level), Some(NoticeLevel::Error));
	}

	#[test]
	fn selecting_a_node_shows_tree_and_highlights_sentence() {
		let mut controller = loaded();
		controller
			.handle_gesture(Relation::Causal, PanelGesture::Select(1))
			.unwrap();
		assert_eq!(controller.tree().lines(), ["(S (NP fox)", "  (VP flattered))"]);
		assert_eq!(controller.text().highlighted(), Some(1));

		controller
			.handle_gesture(Relation::Spatial, PanelGesture::Select(2))
			.unwrap();
		assert_eq!(controller.tree().lines(), ["(S crow sang)"]);
		assert_eq!(controller.text().highlighted(), Some(2));
		assert_eq!(controller.selected(), Some(2));
	}

	#[test]
	fn navigation_clears_selection_and_highlight() {
		let mut controller = loaded();
		controller
			.handle_gesture(Relation::Temporal, PanelGesture::Select(0))
			.unwrap();
		controller.next().unwrap();
		assert_eq!(controller.text().highlighted(), None);
		assert!(controller.tree().lines().is_empty());
		assert_eq!(controller.selected(), None);
	}

	#[test]
	fn edge_edits_mark_the_session_dirty_until_export() {
		let mut controller = loaded();
		assert!(!controller.is_dirty());
		controller
			.handle_gesture(Relation::Causal, PanelGesture::ToggleEdge(0, 2))
			.unwrap();
		assert!(controller.is_dirty());
		let json = controller.export_json().unwrap();
		assert!(json.contains("\"Causal\""));
		assert!(controller.is_dirty());
		controller.mark_exported();
		assert!(!controller.is_dirty());
		assert_eq!(controller.notice().map(|n| n.level), Some(NoticeLevel::Info));
	}

	#[test]
	fn failed_download_keeps_edits_unsaved_and_says_so() {
		let mut controller = loaded();
		controller
			.handle_gesture(Relation::Spatial, PanelGesture::ToggleEdge(0, 1))
			.unwrap();
		let exported = controller.export_json();
		assert!(controller.report(exported).is_some());
		controller.notify_error("export download failed: blocked");

		assert!(controller.is_dirty());
		let notice = controller.notice().unwrap();
		assert_eq!(notice.level, NoticeLevel::Error);
		assert_eq!(notice.message, "export download failed: blocked");
	}

	#[test]
	fn jump_input_rejects_garbage_without_moving() {
		let mut controller = loaded();
		assert!(controller.jump_input("two").is_err());
		assert!(controller.jump_input("7").is_err());
		assert_eq!(controller.nav_state(), NavState::StoryLoaded(0));
		controller.jump_input(" 1 ").unwrap();
		assert_eq!(controller.nav_state(), NavState::StoryLoaded(1));
	}

	#[test]
	fn events_without_a_sentence_still_show_their_tree() {
		let corpus = r#"[{"sentences": ["A wind blew.", "The sun shone."],
			"events": [
				{"instance": "wind blew", "sent_id": 0, "parsed_tree": ["(S wind blew)"]},
				{"instance": "traveller sweated", "sent_id": -1, "parsed_tree": ["(S traveller sweated)"]},
				{"instance": "cloak removed", "sent_id": 9, "parsed_tree": ["(S cloak removed)"]}
			]}]"#;
		let mut controller = Controller::new();
		controller.import_json("sun.json", corpus).unwrap();

		controller
			.handle_gesture(Relation::Temporal, PanelGesture::Select(0))
			.unwrap();
		assert_eq!(controller.text().highlighted(), Some(0));

		controller
			.handle_gesture(Relation::Temporal, PanelGesture::Select(1))
			.unwrap();
		assert_eq!(controller.tree().lines(), ["(S traveller sweated)"]);
		assert_eq!(controller.text().highlighted(), None);

		controller
			.handle_gesture(Relation::Temporal, PanelGesture::Select(2))
			.unwrap();
		assert_eq!(controller.tree().lines(), ["(S cloak removed)"]);
		assert_eq!(controller.text().highlighted(), None);
		assert_eq!(controller.selected(), Some(2));

		let json = controller.export_json().unwrap();
		assert!(json.contains("\"sent_id\": -1"));
	}

	#[test]
	fn text_pane_ignores_out_of_range_highlights() {
		let mut pane = TextPane::for_story(&["one".to_string()], "moral");
		assert!(pane.highlight(0));
		assert!(!pane.highlight(9));
		assert_eq!(pane.highlighted(), None);
	}
}
