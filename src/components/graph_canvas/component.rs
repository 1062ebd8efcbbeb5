//! Leptos component wrapping one relationship graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel
//! handlers for node selection, edge toggling, dragging, panning and zooming.
//! An animation loop runs via `requestAnimationFrame`. Edits are not applied
//! here: they leave as [`PanelGesture`]s and come back through `data`.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use crate::annotate::PanelGesture;

use super::render;
use super::scale::ScaleConfig;
use super::state::PanelState;
use super::theme::Theme;
use super::types::PanelData;

/// Bundles graph state with its visual configuration.
struct CanvasContext {
	state: PanelState,
	scale: ScaleConfig,
	theme: Theme,
}

type SharedContext = Rc<RefCell<Option<CanvasContext>>>;

fn canvas_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// Mouse position relative to the canvas' top-left corner.
fn local_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders one interactive relationship graph.
///
/// `data` carries the panel to show; a new `generation` re-lays the graph out,
/// edge changes keep node positions. Click selects a node, Shift+click on a
/// second node toggles the edge to the selected one, dragging moves nodes,
/// dragging the background pans and the wheel zooms.
#[component]
pub fn GraphCanvas(
	#[prop(into)] data: Signal<PanelData>,
	#[prop(into)] on_gesture: Callback<PanelGesture>,
	theme: Theme,
	width: f64,
	height: f64,
	#[prop(default = false)] simulate: bool,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init) = (context.clone(), animate.clone());

	Effect::new(move |_| {
		let panel = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};

		if let Some(ref mut c) = *context_init.borrow_mut() {
			c.state.sync(&panel, &c.theme);
			return;
		}

		let canvas: HtmlCanvasElement = canvas.into();
		canvas.set_width(width as u32);
		canvas.set_height(height as u32);
		let Some(ctx) = canvas_2d(&canvas) else {
			warn!("graph canvas: 2d context unavailable");
			return;
		};

		*context_init.borrow_mut() = Some(CanvasContext {
			state: PanelState::new(&panel, width, height, &theme, simulate),
			scale: ScaleConfig::default(),
			theme: theme.clone(),
		});

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick(0.016);
				render::render(&c.state, &ctx, &c.scale, &c.theme);
			}
			if let (Some(window), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let (Some(window), Some(cb)) = (web_sys::window(), animate_init.borrow().as_ref()) {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};

		let gesture = {
			let mut guard = context_md.borrow_mut();
			let Some(c) = guard.as_mut() else {
				return;
			};
			match c.state.event_at_position(x, y, &c.scale) {
				Some(event) if ev.shift_key() => match c.state.selected {
					Some(selected) if selected != event => {
						Some(PanelGesture::ToggleEdge(selected, event))
					}
					_ => Some(PanelGesture::Select(event)),
				},
				Some(event) => {
					if let Some((nx, ny)) = c.state.node_position(event) {
						c.state.drag.event = Some(event);
						c.state.drag.start_x = x;
						c.state.drag.start_y = y;
						c.state.drag.node_start_x = nx;
						c.state.drag.node_start_y = ny;
					}
					Some(PanelGesture::Select(event))
				}
				None => {
					c.state.pan.active = true;
					c.state.pan.start_x = x;
					c.state.pan.start_y = y;
					c.state.pan.transform_start_x = c.state.transform.x;
					c.state.pan.transform_start_y = c.state.transform.y;
					None
				}
			}
		};

		if let Some(gesture) = gesture {
			debug!("graph canvas: {gesture:?}");
			on_gesture.run(gesture);
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};

		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if let Some(event) = c.state.drag.event {
				let (dx, dy) = (
					(x - c.state.drag.start_x) / c.state.transform.k,
					(y - c.state.drag.start_y) / c.state.transform.k,
				);
				let (nx, ny) = (
					c.state.drag.node_start_x + dx as f32,
					c.state.drag.node_start_y + dy as f32,
				);
				c.state.move_node(event, nx, ny);
			} else if c.state.pan.active {
				c.state.transform.x = c.state.pan.transform_start_x + (x - c.state.pan.start_x);
				c.state.transform.y = c.state.pan.transform_start_y + (y - c.state.pan.start_y);
			} else {
				let hovered = c.state.event_at_position(x, y, &c.scale);
				c.state.set_hover(hovered);
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			c.state.drag.event = None;
			c.state.pan.active = false;
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.drag.event = None;
			c.state.pan.active = false;
			c.state.set_hover(None);
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};

		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			c.state.transform.zoom_at(x, y, factor);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
