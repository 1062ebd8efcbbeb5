//! Node and edge model behind one relationship's graph canvas.

use log::debug;

use crate::error::{AnnotatorError, Result};
use crate::store::{Edge, Event, Relation, RelationGraph};

use super::dispatch::{EventQueue, PanelGesture, ViewEvent};

/// A node as the canvas shows it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelNode {
	/// `"{index}: {instance}"`.
	pub label: String,
	/// Source sentence, used to colour nodes from the same sentence alike.
	pub group: usize,
}

/// One relationship graph of the current story.
///
/// The node set is fixed to the story's events; only the edge list changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphPanel {
	relation: Relation,
	nodes: Vec<PanelNode>,
	edges: Vec<Edge>,
	selected: Option<usize>,
}

impl GraphPanel {
	/// Panel over `events` holding a copy of `edges`.
	pub fn new(relation: Relation, events: &[Event], edges: &[Edge]) -> Self {
		let nodes = events
			.iter()
			.enumerate()
			.map(|(idx, event)| PanelNode {
				label: format!("{idx}: {}", event.instance),
				group: event.sentence().unwrap_or_default(),
			})
			.collect();
		Self {
			relation,
			nodes,
			edges: edges.to_vec(),
			selected: None,
		}
	}

	/// Relationship this panel edits.
	pub fn relation(&self) -> Relation {
		self.relation
	}

	/// Event nodes in event order.
	pub fn nodes(&self) -> &[PanelNode] {
		&self.nodes
	}

	/// Number of event nodes.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Selected node, mirrored across panels.
	pub fn selected(&self) -> Option<usize> {
		self.selected
	}

	/// The live edge list, including every edit made so far.
	pub fn current_edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Current edges as a [`RelationGraph`].
	pub fn to_graph(&self) -> RelationGraph {
		RelationGraph::new(self.relation, self.edges.clone())
	}

	/// Whether `a` and `b` are connected, in either orientation.
	pub fn has_edge(&self, a: usize, b: usize) -> bool {
		self.edges.iter().any(|e| e.connects(a, b))
	}

	fn check_node(&self, node: usize) -> Result<()> {
		if node >= self.nodes.len() {
			return Err(AnnotatorError::Validation(format!(
				"{} graph has no node {node} ({} events)",
				self.relation,
				self.nodes.len()
			)));
		}
		Ok(())
	}

	pub(crate) fn set_selected(&mut self, node: Option<usize>) {
		self.selected = node;
	}

	/// Adds or removes the edge between `a` and `b`; returns whether it now exists.
	pub fn toggle_edge(&mut self, a: usize, b: usize) -> Result<bool> {
		Edge::new(a, b)
			.check(self.nodes.len())
			.map_err(|reason| AnnotatorError::Validation(format!("{} graph: {reason}", self.relation)))?;

		if let Some(pos) = self.edges.iter().position(|e| e.connects(a, b)) {
			self.edges.remove(pos);
			debug!("{}: removed edge ({a}, {b})", self.relation);
			Ok(false)
		} else {
			self.edges.push(Edge::new(a, b));
			debug!("{}: added edge ({a}, {b})", self.relation);
			Ok(true)
		}
	}

	/// Applies a canvas gesture and queues the resulting notification.
	pub fn apply(&mut self, gesture: PanelGesture, queue: &mut EventQueue) -> Result<()> {
		match gesture {
			PanelGesture::Select(node) => {
				self.check_node(node)?;
				self.selected = Some(node);
				queue.push(ViewEvent::NodeSelected {
					relation: self.relation,
					node,
				});
			}
			PanelGesture::ToggleEdge(a, b) => {
				self.toggle_edge(a, b)?;
				queue.push(ViewEvent::GraphChanged {
					relation: self.relation,
				});
			}
		}
		Ok(())
	}
}
