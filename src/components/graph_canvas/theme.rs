//! Visual theming for the graph canvas.
//!
//! Provides colors, node palettes and per-element style configuration.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha, 0.0 to 1.0.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with alpha replaced.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		self.lerp(Color::rgba(255, 255, 255, self.a), factor)
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		self.lerp(Color::rgba(0, 0, 0, self.a), factor)
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		let mix = |a: u8, b: u8| (a as f64 * (1.0 - t) + b as f64 * t).round() as u8;
		Self {
			r: mix(self.r, other.r),
			g: mix(self.g, other.g),
			b: mix(self.b, other.b),
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	/// CSS color string, `#rrggbb` when opaque.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Colors assigned to nodes by sentence, cycling when a story is long.
#[derive(Clone, Debug, PartialEq)]
pub struct NodePalette {
	/// Colors cycled through by group index.
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Muted slate blues and teals
	pub fn slate() -> Self {
		Self {
			colors: vec![
				Color::rgb(94, 129, 172),  // Steel blue
				Color::rgb(100, 148, 160), // Teal gray
				Color::rgb(130, 120, 150), // Wisteria
				Color::rgb(100, 145, 135), // Eucalyptus
				Color::rgb(180, 136, 100), // Tan
				Color::rgb(165, 115, 90),  // Rust
				Color::rgb(120, 130, 160), // Periwinkle
				Color::rgb(143, 163, 180), // Cool gray
			],
		}
	}

	/// Saturated tones that read well on a light background
	pub fn ink() -> Self {
		Self {
			colors: vec![
				Color::rgb(25, 118, 210),
				Color::rgb(123, 31, 162),
				Color::rgb(230, 81, 0),
				Color::rgb(46, 125, 50),
				Color::rgb(198, 40, 40),
				Color::rgb(0, 131, 143),
				Color::rgb(69, 90, 100),
				Color::rgb(117, 117, 117),
			],
		}
	}

	/// Color for a group, cycling through the palette.
	pub fn get(&self, index: usize) -> Color {
		self.colors[index % self.colors.len()]
	}
}

/// Background style configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundStyle {
	/// Canvas fill.
	pub color: Color,
	/// Centre color of the radial gradient
	pub color_secondary: Color,
	pub use_gradient: bool,
	/// Color of the "no events" placeholder text
	pub text_color: Color,
}

/// Edge visual style.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStyle {
	/// Resting edge color.
	pub color: Color,
	/// Color edges fade towards while one of their nodes is hovered
	pub highlight_color: Color,
}

/// Node visual style.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	/// Whether nodes have inner gradients
	pub use_gradient: bool,
	/// Border/stroke width (0 = no border)
	pub border_width: f64,
	/// Stroke drawn when `border_width` is above zero.
	pub border_color: Color,
	/// Ring drawn around the selected node
	pub selected_color: Color,
	/// Label text color.
	pub label_color: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
	/// Name used in configuration.
	pub name: &'static str,
	/// Canvas background.
	pub background: BackgroundStyle,
	/// Edge strokes.
	pub edge: EdgeStyle,
	/// Node fills, borders and labels.
	pub node: NodeStyle,
	/// Node fills, picked by sentence.
	pub palette: NodePalette,
}

impl Theme {
	/// Dark theme with gradient nodes (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
				text_color: Color::rgba(200, 210, 220, 0.6),
			},
			edge: EdgeStyle {
				color: Color::rgba(140, 160, 180, 0.7),
				highlight_color: Color::rgba(230, 240, 250, 1.0),
			},
			node: NodeStyle {
				use_gradient: true,
				border_width: 0.0,
				border_color: Color::rgba(255, 255, 255, 0.0),
				selected_color: Color::rgb(255, 214, 10),
				label_color: Color::rgba(255, 255, 255, 0.9),
			},
			palette: NodePalette::slate(),
		}
	}

	/// Light theme close to a printed page
	pub fn paper() -> Self {
		Self {
			name: "paper",
			background: BackgroundStyle {
				color: Color::rgb(200, 255, 255),
				color_secondary: Color::rgb(235, 255, 255),
				use_gradient: true,
				text_color: Color::rgba(40, 40, 40, 0.6),
			},
			edge: EdgeStyle {
				color: Color::rgba(0, 0, 255, 0.8),
				highlight_color: Color::rgb(0, 0, 140),
			},
			node: NodeStyle {
				use_gradient: false,
				border_width: 1.0,
				border_color: Color::rgba(0, 0, 0, 0.5),
				selected_color: Color::rgb(230, 160, 0),
				label_color: Color::rgb(20, 20, 20),
			},
			palette: NodePalette::ink(),
		}
	}

	/// Looks a theme up by its configured name.
	pub fn by_name(name: &str) -> Option<Self> {
		match name {
			"default" => Some(Self::default_theme()),
			"paper" => Some(Self::paper()),
			_ => None,
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}
