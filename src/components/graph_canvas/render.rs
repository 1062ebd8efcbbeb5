//! Canvas rendering for a relationship graph.
//!
//! Passes, back to front:
//! 1. Background (screen space)
//! 2. Edges, brighter where a hovered node touches them (world space)
//! 3. Nodes, the selection ring, then labels

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{NodeInfo, PanelState};
use super::theme::Theme;

fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Renders the complete graph to the canvas.
pub fn render(state: &PanelState, ctx: &CanvasRenderingContext2d, config: &ScaleConfig, theme: &Theme) {
	let scale = ScaledValues::new(config, state.transform.k);

	draw_background(state, ctx, theme);
	if state.node_count() == 0 {
		draw_placeholder(state, ctx, theme);
		return;
	}

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, &scale, theme);
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();
}

fn draw_background(state: &PanelState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (cx, cy) = (state.width / 2.0, state.height / 2.0);
	let gradient = if theme.background.use_gradient {
		ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, state.width.max(state.height) * 0.8)
			.ok()
	} else {
		None
	};

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&theme.background.color.to_css()),
	}
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_placeholder(state: &PanelState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	ctx.set_fill_style_str(&theme.background.text_color.to_css());
	ctx.set_font("14px sans-serif");
	let _ = ctx.fill_text("No events in this story", state.width / 2.0 - 75.0, state.height / 2.0);
}

fn draw_edges(state: &PanelState, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	let dim = smooth_step(state.hover.max_intensity());

	state.graph.visit_edges(|n1, n2, _| {
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}

		let t = smooth_step(
			state
				.hover
				.edge_intensity(n1.data.user_data.event, n2.data.user_data.event),
		);
		let base = theme.edge.color;
		let color = if t > 0.01 {
			base.lerp(theme.edge.highlight_color, t)
		} else {
			base.with_alpha(base.a * (1.0 - 0.6 * dim))
		};

		ctx.set_stroke_style_str(&color.to_css());
		ctx.set_line_width(scale.edge_width * (1.0 + 0.8 * t));

		// stop at the node rims so edges do not cross the node fill
		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1 + ux * scale.node_radius, y1 + uy * scale.node_radius);
		ctx.line_to(x2 - ux * scale.node_radius, y2 - uy * scale.node_radius);
		ctx.stroke();
	});
}

fn draw_nodes(state: &PanelState, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	let dim = smooth_step(state.hover.max_intensity());

	state.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		let t = smooth_step(state.hover.node_intensity(info.event));
		let base_alpha = 1.0 - 0.6 * dim;
		let alpha = base_alpha + (1.0 - base_alpha) * t;
		let radius = scale.node_radius * (1.0 + 0.3 * t);
		let (x, y) = (node.x() as f64, node.y() as f64);

		draw_node(ctx, x, y, radius, info, scale, theme, alpha);

		if state.selected == Some(info.event) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + scale.ring_offset, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&theme.node.selected_color.to_css());
			ctx.set_line_width(scale.ring_width);
			ctx.stroke();
		}

		ctx.set_global_alpha(alpha);
		ctx.set_fill_style_str(&theme.node.label_color.to_css());
		ctx.set_font(&scale.label_font);
		let _ = ctx.fill_text(&info.label, x + radius + 4.0, y + 4.0);
		ctx.set_global_alpha(1.0);
	});
}

#[allow(clippy::too_many_arguments)]
fn draw_node(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	radius: f64,
	info: &NodeInfo,
	scale: &ScaledValues,
	theme: &Theme,
	alpha: f64,
) {
	ctx.set_global_alpha(alpha);

	let gradient = if theme.node.use_gradient {
		ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
			.ok()
	} else {
		None
	};

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &info.color.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(0.7, &info.color.to_css());
			let _ = gradient.add_color_stop(1.0, &info.color.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&info.color.to_css()),
	}
	ctx.fill();

	if theme.node.border_width > 0.0 {
		ctx.set_stroke_style_str(&theme.node.border_color.to_css());
		ctx.set_line_width(theme.node.border_width / scale.k);
		ctx.stroke();
	}

	ctx.set_global_alpha(1.0);
}
