//! Messages exchanged between graph views and the controller.

use std::collections::VecDeque;

use crate::store::Relation;

/// An interaction on a graph canvas, forwarded to its panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelGesture {
	/// The user clicked a node.
	Select(usize),
	/// Add the edge between two nodes, or remove it if present.
	ToggleEdge(usize, usize),
}

/// A notification raised by a panel for the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewEvent {
	/// A node was clicked in the panel of `relation`.
	NodeSelected {
		/// Panel the click came from.
		relation: Relation,
		/// Event index of the clicked node.
		node: usize,
	},
	/// An edge was added to or removed from `relation`.
	GraphChanged {
		/// Panel whose edges changed.
		relation: Relation,
	},
}

/// FIFO of view events waiting for the controller.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
	pending: VecDeque<ViewEvent>,
}

impl EventQueue {
	/// Queues `event` behind any pending ones.
	pub fn push(&mut self, event: ViewEvent) {
		self.pending.push_back(event);
	}

	/// Whether nothing is pending.
	pub fn is_empty(&self) -> bool {
		self.pending.is_empty()
	}

	/// Drops pending events.
	pub fn clear(&mut self) {
		self.pending.clear();
	}

	/// Takes every pending event in arrival order.
	pub fn drain(&mut self) -> Vec<ViewEvent> {
		self.pending.drain(..).collect()
	}
}
