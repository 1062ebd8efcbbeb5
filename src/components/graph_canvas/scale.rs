//! Zoom-dependent sizes for canvas drawing and hit testing.
//!
//! Drawing happens after the pan/zoom transform is applied, so every value
//! handed to the renderer is in world units. [`ScaleBehavior`] decides how a
//! configured base size reacts to the zoom factor `k`.

/// How a size reacts to zooming.
#[derive(Clone, Debug, PartialEq)]
pub enum ScaleBehavior {
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space size, kept within `[min_screen, max_screen]` pixels.
	Clamped {
		/// Smallest on-screen size in pixels.
		min_screen: f64,
		/// Largest on-screen size in pixels.
		max_screen: f64,
	},
}

impl ScaleBehavior {
	/// World-space value for `base` at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Node sizes and label font.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeScaleConfig {
	/// Base node radius in world units.
	pub radius: f64,
	/// How `radius` follows the zoom.
	pub radius_behavior: ScaleBehavior,
	/// Click radius in world units.
	pub hit_radius: f64,
	/// How `hit_radius` follows the zoom.
	pub hit_behavior: ScaleBehavior,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Below this zoom labels stop shrinking.
	pub label_min_k: f64,
}

/// Scale settings for every drawn element.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleConfig {
	/// Node and label sizes.
	pub node: NodeScaleConfig,
	/// Edge stroke in world units.
	pub edge_width: f64,
	/// Selection ring stroke and gap in world units.
	pub ring_width: f64,
	/// Gap between the node and its selection ring.
	pub ring_offset: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				radius: 9.0,
				radius_behavior: ScaleBehavior::Clamped {
					min_screen: 5.0,
					max_screen: f64::INFINITY,
				},
				hit_radius: 14.0,
				hit_behavior: ScaleBehavior::Clamped {
					min_screen: 8.0,
					max_screen: f64::INFINITY,
				},
				label_size: 12.0,
				label_min_k: 0.5,
			},
			edge_width: 1.5,
			ring_width: 2.0,
			ring_offset: 3.0,
		}
	}
}

/// Scale values resolved for one zoom level, computed once per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaledValues {
	/// Zoom factor these values were computed for.
	pub k: f64,
	/// Node radius in world units.
	pub node_radius: f64,
	/// Click radius in world units.
	pub hit_radius: f64,
	/// CSS font string, e.g. `"12px sans-serif"`.
	pub label_font: String,
	/// Edge stroke in world units.
	pub edge_width: f64,
	/// Selection ring stroke in world units.
	pub ring_width: f64,
	/// Selection ring gap in world units.
	pub ring_offset: f64,
}

impl ScaledValues {
	/// Resolves `config` at zoom `k`.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let label_font_size = config.node.label_size / k.max(config.node.label_min_k);
		Self {
			k,
			node_radius: config.node.radius_behavior.apply(config.node.radius, k),
			hit_radius: config.node.hit_behavior.apply(config.node.hit_radius, k),
			label_font: format!("{label_font_size}px sans-serif"),
			edge_width: ScaleBehavior::Screen.apply(config.edge_width, k),
			ring_width: ScaleBehavior::Screen.apply(config.ring_width, k),
			ring_offset: ScaleBehavior::Screen.apply(config.ring_offset, k),
		}
	}
}
