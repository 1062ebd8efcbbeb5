//! Snapshot of one graph panel handed to the canvas component.

use crate::annotate::{GraphPanel, PanelNode};
use crate::store::Edge;

/// Everything a canvas needs to draw one relationship graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PanelData {
	/// Build counter of the tab view; a change means a different story.
	pub generation: u64,
	/// One node per event.
	pub nodes: Vec<PanelNode>,
	/// Edges as stored, orientation kept.
	pub edges: Vec<Edge>,
	/// Event to draw the selection ring on.
	pub selected: Option<usize>,
}

impl PanelData {
	/// Copies what the canvas needs out of `panel`.
	pub fn from_panel(panel: &GraphPanel, generation: u64) -> Self {
		Self {
			generation,
			nodes: panel.nodes().to_vec(),
			edges: panel.current_edges().to_vec(),
			selected: panel.selected(),
		}
	}
}
