//! Tab strip plus one graph canvas per relationship.

use leptos::prelude::*;

use crate::annotate::{Controller, PanelGesture};
use crate::config::AnnotatorConfig;
use crate::store::Relation;

use super::graph_canvas::{GraphCanvas, PanelData};

/// Shows the five relationship canvases of the current story, one at a time.
///
/// All five stay mounted so each keeps its layout while hidden.
#[component]
pub fn GraphTabs(controller: RwSignal<Controller>, config: AnnotatorConfig) -> impl IntoView {
	let active = Memo::new(move |_| controller.with(|c| c.tabs().active()));
	let theme = config.theme();

	let tab_buttons = Relation::ALL
		.into_iter()
		.map(|relation| {
			view! {
				<button
					class="tab"
					class:active=move || active.get() == relation
					on:click=move |_| controller.update(|c| c.set_active_tab(relation))
				>
					{relation.name()}
				</button>
			}
		})
		.collect_view();

	let canvases = Relation::ALL
		.into_iter()
		.map(|relation| {
			let data = Memo::new(move |_| {
				controller.with(|c| {
					let tabs = c.tabs();
					tabs.panel(relation)
						.map(|panel| PanelData::from_panel(panel, tabs.generation()))
						.unwrap_or_default()
				})
			});
			let on_gesture = Callback::new(move |gesture: PanelGesture| {
				controller.update(|c| {
					let result = c.handle_gesture(relation, gesture);
					c.report(result);
				});
			});
			view! {
				<div
					class="tab-page"
					style:display=move || if active.get() == relation { "block" } else { "none" }
				>
					<GraphCanvas
						data=data
						on_gesture=on_gesture
						theme=theme.clone()
						width=config.canvas_width
						height=config.canvas_height
						simulate=config.simulate
					/>
				</div>
			}
		})
		.collect_view();

	view! {
		<div class="graph-tabs">
			<div class="tab-strip">{tab_buttons}</div>
			<div class="tab-pages">{canvases}</div>
			<p class="hint">
				"Click a node to select it. Shift+click another node to add or remove an edge. "
				"Drag nodes to reposition. Scroll to zoom. Drag background to pan."
			</p>
		</div>
	}
}
