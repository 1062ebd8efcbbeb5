//! In-memory corpus with per-story accessors, navigation and persistence.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::{AnnotatorError, LoadError, Result, SaveError};

use super::format::StoreFormat;
use super::model::{Edge, Event, Relation, RelationGraph, Story};

/// All stories of one corpus file.
///
/// A store only exists once its whole input parsed and validated; editing
/// touches nothing but graph edge lists.
#[derive(Clone, Debug, PartialEq)]
pub struct StoryStore {
	stories: Vec<Story>,
	format: StoreFormat,
	origin: String,
}

impl StoryStore {
	/// Reads and validates a corpus file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
		let path = path.as_ref();
		let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let format = StoreFormat::from_path(path).unwrap_or_else(|| StoreFormat::detect(&contents));
		Self::parse(path.display().to_string(), &contents, format)
	}

	/// Builds a store from corpus text, guessing the layout from its contents.
	pub fn from_json(origin: impl Into<String>, contents: &str) -> Result<Self, LoadError> {
		Self::parse(origin.into(), contents, StoreFormat::detect(contents))
	}

	/// Wraps already-built stories, applying the same checks as a file load.
	pub fn from_stories(
		origin: impl Into<String>,
		stories: Vec<Story>,
		format: StoreFormat,
	) -> Result<Self, LoadError> {
		let origin = origin.into();
		if stories.is_empty() {
			return Err(LoadError::Empty { origin });
		}
		for (story, entry) in stories.iter().enumerate() {
			entry.validate().map_err(|reason| LoadError::Invalid {
				origin: origin.clone(),
				story,
				reason,
			})?;
		}
		Ok(Self {
			stories,
			format,
			origin,
		})
	}

	fn parse(origin: String, contents: &str, format: StoreFormat) -> Result<Self, LoadError> {
		let stories = format.parse(&origin, contents)?;
		let store = Self::from_stories(origin, stories, format)?;
		info!(
			"loaded {} stories from {} ({:?})",
			store.len(),
			store.origin,
			store.format
		);
		Ok(store)
	}

	/// Number of stories.
	pub fn len(&self) -> usize {
		self.stories.len()
	}

	/// Never true for a loaded store.
	pub fn is_empty(&self) -> bool {
		self.stories.is_empty()
	}

	/// Layout the corpus was read in.
	pub fn format(&self) -> StoreFormat {
		self.format
	}

	/// Where the stories came from (file path or import name).
	pub fn origin(&self) -> &str {
		&self.origin
	}

	/// Whether `idx` names a story.
	pub fn check_idx(&self, idx: usize) -> bool {
		idx < self.stories.len()
	}

	fn out_of_range(&self, idx: usize) -> AnnotatorError {
		AnnotatorError::Index {
			idx,
			len: self.stories.len(),
		}
	}

	/// Story at `idx`.
	pub fn story(&self, idx: usize) -> Result<&Story> {
		self.stories.get(idx).ok_or_else(|| self.out_of_range(idx))
	}

	/// Events of story `idx`, which are its graph nodes.
	pub fn get_event_info(&self, idx: usize) -> Result<&[Event]> {
		Ok(&self.story(idx)?.events)
	}

	/// Sentences of story `idx`.
	pub fn get_story_text(&self, idx: usize) -> Result<&[String]> {
		Ok(&self.story(idx)?.sentences)
	}

	/// Moral of story `idx`.
	pub fn get_story_moral(&self, idx: usize) -> Result<&str> {
		Ok(&self.story(idx)?.moral)
	}

	/// The five relationship graphs of a story in [`Relation::ALL`] order.
	pub fn get_graph_info(&self, idx: usize) -> Result<Vec<RelationGraph>> {
		Ok(self.story(idx)?.graphs.to_graphs())
	}

	/// Replaces a story's edge lists.
	///
	/// `graphs` must hold exactly the five relationships in [`Relation::ALL`]
	/// order and every edge must join two distinct events of the story.
	/// Nothing is written unless the whole set is valid.
	pub fn set_graph_info(&mut self, idx: usize, graphs: Vec<RelationGraph>) -> Result<()> {
		let node_count = self.story(idx)?.events.len();
		check_graph_set(&graphs, node_count)?;

		let story = &mut self.stories[idx];
		for graph in graphs {
			*story.graphs.edges_mut(graph.relation) = graph.edges;
		}
		debug!("stored graphs for story {idx}");
		Ok(())
	}

	/// Index after `idx`, wrapping from the last story to the first.
	pub fn get_next_idx(&self, idx: usize) -> Result<usize> {
		if !self.check_idx(idx) {
			return Err(self.out_of_range(idx));
		}
		Ok((idx + 1) % self.stories.len())
	}

	/// Index before `idx`, wrapping from the first story to the last.
	pub fn get_prev_idx(&self, idx: usize) -> Result<usize> {
		if !self.check_idx(idx) {
			return Err(self.out_of_range(idx));
		}
		Ok((idx + self.stories.len() - 1) % self.stories.len())
	}

	/// Serializes every story in the store's own format.
	pub fn to_json(&self) -> Result<String, SaveError> {
		self.format.render(&self.stories)
	}

	/// Writes the store to `path`.
	///
	/// A `.json`/`.jsonl` extension picks the layout, otherwise the loaded
	/// layout is reused. The data goes to a sibling temporary file that is
	/// renamed over `path`, so a failed save leaves any existing file intact.
	pub fn save_file(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
		let path = path.as_ref();
		let format = StoreFormat::from_path(path).unwrap_or(self.format);
		let contents = format.render(&self.stories)?;
		let tmp = temp_path(path);

		let written = write_synced(&tmp, contents.as_bytes()).and_then(|()| fs::rename(&tmp, path));
		if let Err(source) = written {
			if tmp.exists() {
				if let Err(e) = fs::remove_file(&tmp) {
					warn!("could not remove {}: {e}", tmp.display());
				}
			}
			return Err(SaveError::Io {
				path: path.to_path_buf(),
				source,
			});
		}
		info!("saved {} stories to {}", self.len(), path.display());
		Ok(())
	}
}

fn check_graph_set(graphs: &[RelationGraph], node_count: usize) -> Result<()> {
	if graphs.len() != Relation::ALL.len() {
		return Err(AnnotatorError::Validation(format!(
			"expected {} relationship graphs, got {}",
			Relation::ALL.len(),
			graphs.len()
		)));
	}
	for (graph, expected) in graphs.iter().zip(Relation::ALL) {
		if graph.relation != expected {
			return Err(AnnotatorError::Validation(format!(
				"expected {expected} graph at position {}, got {}",
				expected.index(),
				graph.relation
			)));
		}
		Edge::check_all(&graph.edges, node_count)
			.map_err(|reason| AnnotatorError::Validation(format!("{expected} graph: {reason}")))?;
	}
	Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
	let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
	name.push(".tmp");
	path.with_file_name(name)
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
	let mut file = fs::File::create(path)?;
	file.write_all(bytes)?;
	file.sync_all()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::store::{Edge, Event};

	fn story(events: usize) -> Story {
		Story::new(
			vec!["The fox ran.".into(), "The crow sang.".into()],
			"Beware flatterers.",
			(0..events)
				.map(|i| Event::new(format!("event {i}"), (i % 2) as i64, vec![format!("(S {i})")]))
				.collect(),
		)
	}

	fn store(sizes: &[usize]) -> StoryStore {
		StoryStore::from_stories("test", sizes.iter().map(|&n| story(n)).collect(), StoreFormat::Json)
			.unwrap()
	}

	fn graphs_with(relation: Relation, edges: Vec<Edge>) -> Vec<RelationGraph> {
		Relation::ALL
			.iter()
			.map(|&r| {
				if r == relation {
					RelationGraph::new(r, edges.clone())
				} else {
					RelationGraph::empty(r)
				}
			})
			.collect()
	}

	#[test]
	fn navigation_wraps_at_both_ends() {
		let store = store(&[1, 1, 1]);
		assert_eq!(store.get_next_idx(0).unwrap(), 1);
		assert_eq!(store.get_next_idx(2).unwrap(), 0);
		assert_eq!(store.get_prev_idx(0).unwrap(), 2);
		assert_eq!(store.get_prev_idx(1).unwrap(), 0);
		assert!(matches!(
			store.get_next_idx(3),
			Err(AnnotatorError::Index { idx: 3, len: 3 })
		));
	}

	#[test]
	fn single_story_navigation_stays_put() {
		let store = store(&[2]);
		assert_eq!(store.get_next_idx(0).unwrap(), 0);
		assert_eq!(store.get_prev_idx(0).unwrap(), 0);
	}

	#[test]
	fn accessors_reject_bad_indices() {
		let store = store(&[2]);
		assert!(store.check_idx(0));
		assert!(!store.check_idx(1));
		assert!(store.get_event_info(1).is_err());
		assert!(store.get_story_text(1).is_err());
		assert!(store.get_story_moral(1).is_err());
		assert!(store.get_graph_info(1).is_err());
	}

	#[test]
	fn set_graph_info_requires_five_graphs_in_order() {
		let mut store = store(&[3]);
		let mut graphs = graphs_with(Relation::Temporal, vec![Edge::new(0, 1)]);
		graphs.pop();
		assert!(matches!(
			store.set_graph_info(0, graphs),
			Err(AnnotatorError::Validation(_))
		));

		let mut graphs = graphs_with(Relation::Temporal, vec![Edge::new(0, 1)]);
		graphs.swap(0, 1);
		assert!(matches!(
			store.set_graph_info(0, graphs),
			Err(AnnotatorError::Validation(_))
		));
		assert!(store.get_graph_info(0).unwrap().iter().all(|g| g.edges.is_empty()));
	}

	#[test]
	fn set_graph_info_rejects_invalid_edges_without_writing() {
		let mut store = store(&[3]);
		let graphs = graphs_with(Relation::Causal, vec![Edge::new(0, 1), Edge::new(2, 2)]);
		assert!(store.set_graph_info(0, graphs).is_err());
		let graphs = graphs_with(Relation::Causal, vec![Edge::new(0, 7)]);
		assert!(store.set_graph_info(0, graphs).is_err());
		assert!(store.get_graph_info(0).unwrap()[Relation::Causal.index()].edges.is_empty());
	}

	#[test]
	fn set_graph_info_rejects_repeated_edges() {
		let mut store = store(&[3]);
		let graphs = graphs_with(Relation::Temporal, vec![Edge::new(0, 1), Edge::new(1, 0)]);
		assert!(matches!(
			store.set_graph_info(0, graphs),
			Err(AnnotatorError::Validation(_))
		));
		assert!(store.get_graph_info(0).unwrap()[Relation::Temporal.index()].edges.is_empty());
	}

	#[test]
	fn set_graph_info_replaces_only_the_target_story() {
		let mut store = store(&[3, 3]);
		store
			.set_graph_info(1, graphs_with(Relation::Spatial, vec![Edge::new(2, 0)]))
			.unwrap();
		assert_eq!(
			store.get_graph_info(1).unwrap()[Relation::Spatial.index()].edges,
			vec![Edge::new(2, 0)]
		);
		assert!(store.get_graph_info(0).unwrap().iter().all(|g| g.edges.is_empty()));
	}

	#[test]
	fn empty_corpus_is_a_load_error() {
		assert!(matches!(
			StoryStore::from_json("empty", "[]"),
			Err(LoadError::Empty { .. })
		));
	}

	#[test]
	fn out_of_range_edges_fail_the_load() {
		let raw = r#"[{"sentences":["a"],"events":[{"instance":"x","sent_id":0,"parsed_tree":[]}],
			"graphs":{"Temporal":[[0,4]]}}]"#;
		assert!(matches!(
			StoryStore::from_json("bad", raw),
			Err(LoadError::Invalid { story: 0, .. })
		));
	}

	#[test]
	fn repeated_edges_fail_the_load() {
		let raw = r#"[{"sentences":["a"],"events":[
			{"instance":"x","sent_id":0,"parsed_tree":[]},
			{"instance":"y","sent_id":0,"parsed_tree":[]}],
			"graphs":{"Temporal":[[0,1],[1,0]]}}]"#;
		match StoryStore::from_json("dup", raw) {
			Err(LoadError::Invalid { story: 0, reason, .. }) => assert!(reason.contains("duplicate")),
			other => panic!("expected invalid story, got {other:?}"),
		}
	}

	#[test]
	fn missing_required_fields_fail_the_load() {
		let raw = r#"[{"sentences":["a"],"events":[{"instance":"x","parsed_tree":[]}]}]"#;
		assert!(matches!(
			StoryStore::from_json("bad", raw),
			Err(LoadError::Parse { .. })
		));
	}

	#[test]
	fn save_replaces_file_and_leaves_no_temporary() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("fables.json");
		fs::write(&path, "old contents").unwrap();

		let store = store(&[2, 1]);
		store.save_file(&path).unwrap();

		assert_eq!(StoryStore::load(&path).unwrap().stories, store.stories);
		assert!(!temp_path(&path).exists());
	}

	#[test]
	fn failed_save_reports_the_target() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("missing").join("fables.json");
		match store(&[1]).save_file(&path) {
			Err(SaveError::Io { path: reported, .. }) => assert_eq!(reported, path),
			other => panic!("expected io error, got {other:?}"),
		}
	}

	#[test]
	fn failed_rename_keeps_the_target_and_drops_the_temporary() {
		let dir = tempfile::tempdir().unwrap();
		// a non-empty directory cannot be replaced by a file
		let path = dir.path().join("fables.json");
		fs::create_dir(&path).unwrap();
		fs::write(path.join("keep.txt"), b"annotations").unwrap();

		let result = store(&[1]).save_file(&path);
		assert!(matches!(result, Err(SaveError::Io { .. })));
		assert!(path.is_dir());
		assert_eq!(fs::read(path.join("keep.txt")).unwrap(), b"annotations");
		assert!(!temp_path(&path).exists());
	}

	#[test]
	fn failed_write_leaves_the_existing_file_untouched() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("fables.json");
		fs::write(&path, b"previous corpus").unwrap();
		// the temporary cannot be created where a directory already sits
		fs::create_dir(temp_path(&path)).unwrap();
		fs::write(temp_path(&path).join("other"), b"x").unwrap();

		assert!(store(&[1]).save_file(&path).is_err());
		assert_eq!(fs::read(&path).unwrap(), b"previous corpus");
	}

	#[test]
	fn jsonl_extension_overrides_loaded_format() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("fables.jsonl");
		store(&[1, 2]).save_file(&path).unwrap();
		let text = fs::read_to_string(&path).unwrap();
		assert_eq!(text.lines().count(), 2);
		assert_eq!(StoryStore::load(&path).unwrap().format(), StoreFormat::JsonLines);
	}
}
