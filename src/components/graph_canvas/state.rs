//! Canvas-side graph state: layout simulation, view transform and
//! interaction tracking.
//!
//! Nodes are addressed by event index everywhere outside this module; the
//! `force_graph` node handles are an internal detail that changes whenever
//! the graph is rebuilt after an edge edit.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::store::Edge;

use super::scale::{ScaleConfig, ScaledValues};
use super::theme::{Color, Theme};
use super::types::PanelData;

/// Per-node display metadata attached to each node in the simulation.
#[derive(Clone, Debug)]
pub struct NodeInfo {
	/// Event index this node stands for.
	pub event: usize,
	/// Text drawn beside the node.
	pub label: String,
	/// Fill taken from the theme palette.
	pub color: Color,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	/// Horizontal offset in screen pixels.
	pub x: f64,
	/// Vertical offset in screen pixels.
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

impl ViewTransform {
	/// Zooms by `factor` keeping the screen point `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	/// Event being dragged.
	pub event: Option<usize>,
	/// Cursor position when the drag started.
	pub start_x: f64,
	/// Vertical counterpart of `start_x`.
	pub start_y: f64,
	/// Node position when the drag started.
	pub node_start_x: f32,
	/// Vertical counterpart of `node_start_x`.
	pub node_start_y: f32,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// Set while the background is being dragged.
	pub active: bool,
	/// Cursor position when the pan started.
	pub start_x: f64,
	/// Vertical counterpart of `start_x`.
	pub start_y: f64,
	/// Transform offset when the pan started.
	pub transform_start_x: f64,
	/// Vertical counterpart of `transform_start_x`.
	pub transform_start_y: f64,
}

/// Hover highlight of a node and its neighbours.
///
/// Each node's intensity eases towards 1.0 while it is in the hovered set
/// and back to 0.0 afterwards, so highlights fade instead of flashing.
#[derive(Clone, Debug, Default)]
pub struct HoverState {
	/// Event under the cursor.
	pub hovered: Option<usize>,
	targets: HashSet<usize>,
	intensity: HashMap<usize, f64>,
	max: f64,
}

impl HoverState {
	const FADE_IN_SPEED: f64 = 6.0;
	const FADE_OUT_SPEED: f64 = 4.0;

	/// Targets `node` and its neighbours along `edges`.
	pub fn set_hover(&mut self, node: Option<usize>, edges: &[Edge]) {
		if self.hovered == node {
			return;
		}
		self.hovered = node;
		self.targets.clear();
		if let Some(node) = node {
			self.targets.insert(node);
			self.targets
				.extend(edges.iter().filter_map(|edge| edge.other(node)));
		}
	}

	/// Advances the fades by `dt` seconds.
	pub fn tick(&mut self, dt: f64) {
		let fade_in = 1.0 - (-Self::FADE_IN_SPEED * dt).exp();
		let fade_out = (-Self::FADE_OUT_SPEED * dt).exp();

		for &node in &self.targets {
			let value = self.intensity.entry(node).or_insert(0.0);
			*value += (1.0 - *value) * fade_in;
		}

		let targets = &self.targets;
		let mut max: f64 = 0.0;
		self.intensity.retain(|node, value| {
			if !targets.contains(node) {
				*value *= fade_out;
			}
			max = max.max(*value);
			*value > 0.005
		});
		self.max = max;
	}

	/// Highlight of `node`, 0.0 when not lit.
	pub fn node_intensity(&self, node: usize) -> f64 {
		self.intensity.get(&node).copied().unwrap_or(0.0)
	}

	/// Geometric mean of both endpoints, so edges fade with their nodes.
	pub fn edge_intensity(&self, a: usize, b: usize) -> f64 {
		(self.node_intensity(a) * self.node_intensity(b)).sqrt()
	}

	/// Strongest highlight on screen, used to dim everything else.
	pub fn max_intensity(&self) -> f64 {
		self.max
	}
}

/// Where a node sits and whether the user pinned it there.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Placement {
	x: f32,
	y: f32,
	anchored: bool,
}

/// Graph layout plus interaction state for one canvas.
///
/// Rebuilt from scratch when a new story arrives (new `generation`); edge
/// edits rebuild only the simulation graph and keep every node where it was.
pub struct PanelState {
	/// Node positions and the optional force simulation.
	pub graph: ForceGraph<NodeInfo, ()>,
	/// Current pan and zoom.
	pub transform: ViewTransform,
	/// Node drag in progress.
	pub drag: DragState,
	/// Background pan in progress.
	pub pan: PanState,
	/// Hover highlight fades.
	pub hover: HoverState,
	/// Event drawn with the selection ring.
	pub selected: Option<usize>,
	/// Canvas size in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
	/// Whether the force layout runs each frame.
	pub simulate: bool,
	generation: u64,
	nodes: Vec<DefaultNodeIdx>,
	edges: Vec<Edge>,
}

impl PanelState {
	/// Lays `data` out on a circle centred in the canvas.
	pub fn new(data: &PanelData, width: f64, height: f64, theme: &Theme, simulate: bool) -> Self {
		let placements = circle_layout(data.nodes.len(), width, height);
		let (graph, nodes) = build_graph(data, theme, &placements);
		Self {
			graph,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			selected: data.selected,
			width,
			height,
			simulate,
			generation: data.generation,
			nodes,
			edges: data.edges.clone(),
		}
	}

	/// Generation of the panel data last laid out.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Number of event nodes.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Edges currently drawn.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Brings the canvas in line with the panel it shows.
	pub fn sync(&mut self, data: &PanelData, theme: &Theme) {
		if data.generation != self.generation || data.nodes.len() != self.nodes.len() {
			*self = Self::new(data, self.width, self.height, theme, self.simulate);
			return;
		}
		self.selected = data.selected;
		if data.edges != self.edges {
			let placements = self.placements();
			let (graph, nodes) = build_graph(data, theme, &placements);
			self.graph = graph;
			self.nodes = nodes;
			self.edges = data.edges.clone();
			self.hover.targets.clear();
			self.hover.hovered = None;
		}
	}

	fn placements(&self) -> Vec<Placement> {
		let mut placements = vec![
			Placement {
				x: 0.0,
				y: 0.0,
				anchored: false,
			};
			self.nodes.len()
		];
		self.graph.visit_nodes(|node| {
			if let Some(slot) = placements.get_mut(node.data.user_data.event) {
				*slot = Placement {
					x: node.x(),
					y: node.y(),
					anchored: node.data.is_anchor,
				};
			}
		});
		placements
	}

	/// World position of an event's node.
	pub fn node_position(&self, event: usize) -> Option<(f32, f32)> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.data.user_data.event == event {
				found = Some((node.x(), node.y()));
			}
		});
		found
	}

	/// Moves a node and anchors it there.
	pub fn move_node(&mut self, event: usize, x: f32, y: f32) {
		self.graph.visit_nodes_mut(|node| {
			if node.data.user_data.event == event {
				node.data.x = x;
				node.data.y = y;
				node.data.is_anchor = true;
			}
		});
	}

	/// Converts canvas pixels to world coordinates.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Event under the screen point, preferring the closest node.
	pub fn event_at_position(&self, sx: f64, sy: f64, config: &ScaleConfig) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(config, self.transform.k);
		let mut best: Option<(usize, f64)> = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist < scale.hit_radius && best.is_none_or(|(_, d)| dist < d) {
				best = Some((node.data.user_data.event, dist));
			}
		});
		best.map(|(event, _)| event)
	}

	/// Lights up `event` and its neighbours, or fades everything with `None`.
	pub fn set_hover(&mut self, event: Option<usize>) {
		self.hover.set_hover(event, &self.edges);
	}

	/// Advances the layout and hover fades by one frame.
	pub fn tick(&mut self, dt: f32) {
		if self.simulate {
			self.graph.update(dt);
		}
		self.hover.tick(dt as f64);
	}
}

fn circle_layout(count: usize, width: f64, height: f64) -> Vec<Placement> {
	let radius = if count > 1 {
		width.min(height) * 0.35
	} else {
		0.0
	};
	(0..count)
		.map(|i| {
			let angle = (i as f64) * 2.0 * PI / count as f64 - PI / 2.0;
			Placement {
				x: (radius * angle.cos()) as f32,
				y: (radius * angle.sin()) as f32,
				anchored: false,
			}
		})
		.collect()
}

fn build_graph(
	data: &PanelData,
	theme: &Theme,
	placements: &[Placement],
) -> (ForceGraph<NodeInfo, ()>, Vec<DefaultNodeIdx>) {
	let mut graph = ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	});

	let nodes: Vec<DefaultNodeIdx> = data
		.nodes
		.iter()
		.zip(placements)
		.enumerate()
		.map(|(event, (node, place))| {
			graph.add_node(NodeData {
				x: place.x,
				y: place.y,
				mass: 10.0,
				is_anchor: place.anchored,
				user_data: NodeInfo {
					event,
					label: node.label.clone(),
					color: theme.palette.get(node.group),
				},
			})
		})
		.collect();

	for edge in &data.edges {
		if let (Some(&a), Some(&b)) = (nodes.get(edge.0), nodes.get(edge.1)) {
			graph.add_edge(a, b, EdgeData::default());
		}
	}

	(graph, nodes)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::annotate::PanelNode;

	fn data(generation: u64, count: usize, edges: Vec<Edge>) -> PanelData {
		PanelData {
			generation,
			nodes: (0..count)
				.map(|i| PanelNode {
					label: format!("{i}: e{i}"),
					group: i,
				})
				.collect(),
			edges,
			selected: None,
		}
	}

	fn state(panel: &PanelData) -> PanelState {
		PanelState::new(panel, 800.0, 600.0, &Theme::default(), false)
	}

	#[test]
	fn nodes_start_on_a_circle_around_the_centre() {
		let state = state(&data(1, 4, vec![]));
		assert_eq!(state.node_count(), 4);
		let (x, y) = state.node_position(0).unwrap();
		assert!(x.abs() < 0.001);
		assert!((y + 210.0).abs() < 0.001);
	}

	#[test]
	fn clicking_a_node_finds_its_event() {
		let state = state(&data(1, 4, vec![]));
		let (x, y) = state.node_position(2).unwrap();
		let (sx, sy) = (
			x as f64 * state.transform.k + state.transform.x,
			y as f64 * state.transform.k + state.transform.y,
		);
		let config = ScaleConfig::default();
		assert_eq!(state.event_at_position(sx, sy, &config), Some(2));
		assert_eq!(state.event_at_position(state.transform.x, state.transform.y, &config), None);
	}

	#[test]
	fn edge_edits_keep_node_positions() {
		let mut state = state(&data(1, 3, vec![]));
		state.move_node(1, 42.0, -17.0);
		state.sync(&data(1, 3, vec![Edge::new(0, 1)]), &Theme::default());
		assert_eq!(state.edges(), &[Edge::new(0, 1)]);
		assert_eq!(state.node_position(1), Some((42.0, -17.0)));
	}

	#[test]
	fn new_generation_resets_the_layout() {
		let mut state = state(&data(1, 3, vec![]));
		state.move_node(1, 42.0, -17.0);
		state.sync(&data(2, 3, vec![]), &Theme::default());
		assert_eq!(state.generation(), 2);
		assert_ne!(state.node_position(1), Some((42.0, -17.0)));
	}

	#[test]
	fn hover_lights_up_neighbours_only() {
		let mut state = state(&data(1, 4, vec![Edge::new(0, 1), Edge::new(2, 0)]));
		state.set_hover(Some(0));
		state.tick(0.5);
		assert!(state.hover.node_intensity(1) > 0.9);
		assert!(state.hover.node_intensity(2) > 0.9);
		assert_eq!(state.hover.node_intensity(3), 0.0);

		state.set_hover(None);
		for _ in 0..60 {
			state.tick(0.05);
		}
		assert_eq!(state.hover.max_intensity(), 0.0);
	}

	#[test]
	fn zoom_keeps_the_cursor_point_fixed() {
		let mut transform = ViewTransform {
			x: 100.0,
			y: 50.0,
			k: 1.0,
		};
		transform.zoom_at(300.0, 200.0, 2.0);
		assert_eq!(transform.k, 2.0);
		// world point under the cursor was (200, 150) before and after
		assert_eq!((300.0 - transform.x) / transform.k, 200.0);
		assert_eq!((200.0 - transform.y) / transform.k, 150.0);
	}
}
