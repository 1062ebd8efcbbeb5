//! The five relationship panels of the current story.

use crate::error::{AnnotatorError, Result};
use crate::store::{Edge, Event, Relation, RelationGraph};

use super::dispatch::{EventQueue, PanelGesture, ViewEvent};
use super::panel::GraphPanel;

/// Owns one [`GraphPanel`] per relationship and funnels their events into a
/// single queue for the controller.
#[derive(Clone, Debug, Default)]
pub struct TabbedGraphView {
	panels: Vec<GraphPanel>,
	active: usize,
	events: EventQueue,
	generation: u64,
}

impl TabbedGraphView {
	/// An empty view with no panels.
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces every panel with fresh ones for a story.
	pub fn build(&mut self, event_info: &[Event], graph_info: &[RelationGraph]) -> Result<()> {
		if graph_info.len() != Relation::ALL.len() {
			return Err(AnnotatorError::Validation(format!(
				"expected {} relationship graphs, got {}",
				Relation::ALL.len(),
				graph_info.len()
			)));
		}
		let mut panels = Vec::with_capacity(graph_info.len());
		for (graph, relation) in graph_info.iter().zip(Relation::ALL) {
			if graph.relation != relation {
				return Err(AnnotatorError::Validation(format!(
					"expected {relation} graph, got {}",
					graph.relation
				)));
			}
			Edge::check_all(&graph.edges, event_info.len())
				.map_err(|reason| AnnotatorError::Validation(format!("{relation} graph: {reason}")))?;
			panels.push(GraphPanel::new(relation, event_info, &graph.edges));
		}

		self.panels = panels;
		self.events.clear();
		self.generation += 1;
		Ok(())
	}

	/// Discards all panels.
	pub fn clear(&mut self) {
		self.panels.clear();
		self.events.clear();
		self.generation += 1;
	}

	/// Whether a story is open.
	pub fn is_built(&self) -> bool {
		!self.panels.is_empty()
	}

	/// Changes whenever the panels are rebuilt.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Relation of the visible tab.
	pub fn active(&self) -> Relation {
		Relation::ALL[self.active]
	}

	/// Shows the tab of `relation`.
	pub fn set_active(&mut self, relation: Relation) {
		self.active = relation.index();
	}

	/// Panel of `relation`, if a story is open.
	pub fn panel(&self, relation: Relation) -> Option<&GraphPanel> {
		self.panels.get(relation.index())
	}

	/// All panels in [`Relation::ALL`] order.
	pub fn panels(&self) -> &[GraphPanel] {
		&self.panels
	}

	/// Current edges of every panel, ready for [`StoryStore::set_graph_info`].
	///
	/// [`StoryStore::set_graph_info`]: crate::store::StoryStore::set_graph_info
	pub fn collect_edges(&self) -> Vec<RelationGraph> {
		self.panels.iter().map(GraphPanel::to_graph).collect()
	}

	/// Routes a gesture to the panel of `relation`.
	///
	/// Selections are mirrored to the other panels since all five share the
	/// same event nodes.
	pub fn handle_gesture(&mut self, relation: Relation, gesture: PanelGesture) -> Result<()> {
		let panel = self
			.panels
			.get_mut(relation.index())
			.ok_or_else(|| AnnotatorError::Validation("no story graphs are open".into()))?;
		panel.apply(gesture, &mut self.events)?;

		if let PanelGesture::Select(node) = gesture {
			for panel in &mut self.panels {
				panel.set_selected(Some(node));
			}
		}
		Ok(())
	}

	/// Takes the queued panel events.
	pub fn drain_events(&mut self) -> Vec<ViewEvent> {
		self.events.drain()
	}
}
