//! Story, event and relationship graph records as they appear on disk.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The five relationship types annotated for every story, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Relation {
	/// One event happens before another.
	Temporal,
	/// Events share a place.
	Spatial,
	/// Events share a character.
	Character,
	/// One event leads to another.
	Causal,
	/// One event is done in order to bring about another.
	Intention,
}

impl Relation {
	/// Fixed order used for tabs, graph lists and the on-disk `graphs` object.
	pub const ALL: [Relation; 5] = [
		Relation::Temporal,
		Relation::Spatial,
		Relation::Character,
		Relation::Causal,
		Relation::Intention,
	];

	/// Name used as the `graphs` key and tab label.
	pub fn name(self) -> &'static str {
		match self {
			Relation::Temporal => "Temporal",
			Relation::Spatial => "Spatial",
			Relation::Character => "Character",
			Relation::Causal => "Causal",
			Relation::Intention => "Intention",
		}
	}

	/// Position of this relation in [`Relation::ALL`].
	pub fn index(self) -> usize {
		self as usize
	}
}

impl fmt::Display for Relation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// An undirected edge between two event indices, serialized as `[a, b]`.
///
/// The stored orientation is kept so files round-trip unchanged; comparisons
/// made while editing go through [`Edge::connects`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge(pub usize, pub usize);

impl Edge {
	/// Edge between events `a` and `b`, stored in that order.
	pub fn new(a: usize, b: usize) -> Self {
		Self(a, b)
	}

	/// True when the edge joins `a` and `b` in either orientation.
	pub fn connects(&self, a: usize, b: usize) -> bool {
		(self.0 == a && self.1 == b) || (self.0 == b && self.1 == a)
	}

	/// Whether `node` is one of the endpoints.
	pub fn touches(&self, node: usize) -> bool {
		self.0 == node || self.1 == node
	}

	/// The endpoint opposite `node`, if the edge touches it.
	pub fn other(&self, node: usize) -> Option<usize> {
		if self.0 == node {
			Some(self.1)
		} else if self.1 == node {
			Some(self.0)
		} else {
			None
		}
	}

	/// Whether both endpoints are the same event.
	pub fn is_self_loop(&self) -> bool {
		self.0 == self.1
	}

	/// Checks the edge against a story with `node_count` events.
	pub fn check(&self, node_count: usize) -> Result<(), String> {
		if self.is_self_loop() {
			return Err(format!("self-loop on event {}", self.0));
		}
		if self.0 >= node_count || self.1 >= node_count {
			return Err(format!(
				"edge ({}, {}) references a missing event (story has {node_count})",
				self.0, self.1
			));
		}
		Ok(())
	}

	/// Checks every edge of one relationship and rejects repeats in either
	/// orientation, since a graph holds each undirected edge once.
	pub fn check_all(edges: &[Edge], node_count: usize) -> Result<(), String> {
		for (i, edge) in edges.iter().enumerate() {
			edge.check(node_count)?;
			if edges[..i].iter().any(|seen| seen.connects(edge.0, edge.1)) {
				return Err(format!("duplicate edge ({}, {})", edge.0, edge.1));
			}
		}
		Ok(())
	}
}

/// One relationship's edge list for a story.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationGraph {
	/// Which relationship the edges belong to.
	pub relation: Relation,
	/// Undirected edges, each pair at most once.
	pub edges: Vec<Edge>,
}

impl RelationGraph {
	/// Graph of `relation` over `edges`.
	pub fn new(relation: Relation, edges: Vec<Edge>) -> Self {
		Self { relation, edges }
	}

	/// A graph with no edges.
	pub fn empty(relation: Relation) -> Self {
		Self::new(relation, Vec::new())
	}
}

/// The `graphs` object of a story: exactly one edge list per relationship.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphSet {
	#[serde(rename = "Temporal", default)]
	temporal: Vec<Edge>,
	#[serde(rename = "Spatial", default)]
	spatial: Vec<Edge>,
	#[serde(rename = "Character", default)]
	character: Vec<Edge>,
	#[serde(rename = "Causal", default)]
	causal: Vec<Edge>,
	#[serde(rename = "Intention", default)]
	intention: Vec<Edge>,
}

impl GraphSet {
	/// Edges of `relation`.
	pub fn edges(&self, relation: Relation) -> &[Edge] {
		match relation {
			Relation::Temporal => &self.temporal,
			Relation::Spatial => &self.spatial,
			Relation::Character => &self.character,
			Relation::Causal => &self.causal,
			Relation::Intention => &self.intention,
		}
	}

	/// Mutable edges of `relation`.
	pub fn edges_mut(&mut self, relation: Relation) -> &mut Vec<Edge> {
		match relation {
			Relation::Temporal => &mut self.temporal,
			Relation::Spatial => &mut self.spatial,
			Relation::Character => &mut self.character,
			Relation::Causal => &mut self.causal,
			Relation::Intention => &mut self.intention,
		}
	}

	/// All five graphs in [`Relation::ALL`] order.
	pub fn to_graphs(&self) -> Vec<RelationGraph> {
		Relation::ALL
			.iter()
			.map(|&r| RelationGraph::new(r, self.edges(r).to_vec()))
			.collect()
	}

	/// Relations and their edges in [`Relation::ALL`] order.
	pub fn iter(&self) -> impl Iterator<Item = (Relation, &[Edge])> {
		Relation::ALL.into_iter().map(|r| (r, self.edges(r)))
	}
}

/// One extracted action or predicate of a story.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
	/// Short human-readable description used as the node label.
	pub instance: String,
	/// Index of the sentence this event was extracted from. Corpora mark
	/// events without a source sentence with negative ids.
	pub sent_id: i64,
	/// Rendered syntax tree of the source sentence, one line per entry.
	pub parsed_tree: Vec<String>,
	/// Fields this tool does not interpret, kept for lossless saving.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Event {
	/// Creates an event with no extra fields.
	pub fn new(instance: impl Into<String>, sent_id: i64, parsed_tree: Vec<String>) -> Self {
		Self {
			instance: instance.into(),
			sent_id,
			parsed_tree,
			extra: Map::new(),
		}
	}

	/// Source sentence as a line index, or `None` for a negative id.
	pub fn sentence(&self) -> Option<usize> {
		usize::try_from(self.sent_id).ok()
	}
}

/// One corpus entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Story {
	/// Story text, one entry per sentence.
	pub sentences: Vec<String>,
	/// Moral shown under the story, empty when absent.
	#[serde(default)]
	pub moral: String,
	/// Graph nodes, addressed by position.
	pub events: Vec<Event>,
	/// Annotated relationship graphs.
	#[serde(default)]
	pub graphs: GraphSet,
	/// Fields this tool does not interpret.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Story {
	/// A story with empty graphs.
	pub fn new(sentences: Vec<String>, moral: impl Into<String>, events: Vec<Event>) -> Self {
		Self {
			sentences,
			moral: moral.into(),
			events,
			graphs: GraphSet::default(),
			extra: Map::new(),
		}
	}

	/// Every stored edge must reference existing events and join two distinct ones.
	pub fn validate(&self) -> Result<(), String> {
		for (relation, edges) in self.graphs.iter() {
			Edge::check_all(edges, self.events.len())
				.map_err(|reason| format!("{relation} graph: {reason}"))?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn edges_match_in_either_orientation() {
		let edge = Edge::new(2, 0);
		assert!(edge.connects(0, 2));
		assert!(edge.connects(2, 0));
		assert!(!edge.connects(0, 1));
		assert_eq!(edge.other(2), Some(0));
		assert_eq!(edge.other(1), None);
	}

	#[test]
	fn edge_check_rejects_loops_and_missing_events() {
		assert!(Edge::new(1, 1).check(3).is_err());
		assert!(Edge::new(0, 3).check(3).is_err());
		assert!(Edge::new(0, 2).check(3).is_ok());
	}

	#[test]
	fn negative_sentence_ids_load_without_a_line() {
		let event: Event =
			serde_json::from_str(r#"{"instance": "x", "sent_id": -1, "parsed_tree": []}"#).unwrap();
		assert_eq!(event.sent_id, -1);
		assert_eq!(event.sentence(), None);
		assert_eq!(Event::new("y", 3, vec![]).sentence(), Some(3));
	}

	#[test]
	fn edge_lists_hold_each_pair_once() {
		assert!(Edge::check_all(&[Edge::new(0, 1), Edge::new(1, 2)], 3).is_ok());
		assert!(Edge::check_all(&[Edge::new(0, 1), Edge::new(0, 1)], 3).is_err());
		assert!(Edge::check_all(&[Edge::new(2, 1), Edge::new(0, 2), Edge::new(1, 2)], 3).is_err());
	}

	#[test]
	fn graph_set_uses_relation_names_as_keys() {
		let mut graphs = GraphSet::default();
		graphs.edges_mut(Relation::Causal).push(Edge::new(0, 1));
		let json = serde_json::to_value(&graphs).unwrap();
		assert_eq!(json["Causal"], serde_json::json!([[0, 1]]));
		assert_eq!(json["Temporal"], serde_json::json!([]));
	}

	#[test]
	fn graph_set_rejects_unknown_relations() {
		let err = serde_json::from_str::<GraphSet>(r#"{"Emotional": []}"#);
		assert!(err.is_err());
	}

	#[test]
	fn story_keeps_unknown_fields() {
		let raw = r#"{"id":"fable-7","sentences":["A fox."],"events":[],"source":"aesop"}"#;
		let story: Story = serde_json::from_str(raw).unwrap();
		assert_eq!(story.extra["id"], "fable-7");
		assert_eq!(story.extra["source"], "aesop");
		assert_eq!(story.moral, "");
	}
}
