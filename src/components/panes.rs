//! Read-only story text and parse tree panes.

use leptos::prelude::*;

use crate::annotate::{Controller, NoticeLevel};

/// Story sentences and moral, with the selected event's sentence highlighted.
#[component]
pub fn TextPaneView(controller: RwSignal<Controller>) -> impl IntoView {
	let lines = move || {
		controller.with(|c| {
			let pane = c.text();
			pane.lines()
				.iter()
				.enumerate()
				.map(|(i, line)| {
					let highlighted = pane.highlighted() == Some(i);
					let text = if line.is_empty() { "\u{a0}".to_string() } else { line.clone() };
					view! {
						<div class="text-line" class:highlighted=highlighted>
							{text}
						</div>
					}
				})
				.collect_view()
		})
	};

	view! {
		<section class="pane text-pane">
			<h2>"Story"</h2>
			<div class="pane-body">{lines}</div>
		</section>
	}
}

/// Parse tree of the sentence the selected event came from.
#[component]
pub fn TreePaneView(controller: RwSignal<Controller>) -> impl IntoView {
	let tree = move || controller.with(|c| c.tree().lines().join("\n"));

	view! {
		<section class="pane tree-pane">
			<h2>"Parse tree"</h2>
			<pre class="pane-body">{tree}</pre>
		</section>
	}
}

/// Position, unsaved-changes marker and the last notice.
#[component]
pub fn StatusLine(controller: RwSignal<Controller>) -> impl IntoView {
	let position = move || {
		controller.with(|c| match c.current_idx() {
			Some(idx) => format!("Story #{idx} ({} total)", c.story_count()),
			None => "No file loaded".to_string(),
		})
	};
	let dirty = move || controller.with(|c| if c.is_dirty() { " \u{2022} unsaved edits" } else { "" });
	let notice = move || controller.with(|c| c.notice().map(|n| n.message.clone()).unwrap_or_default());
	let is_error = move || {
		controller.with(|c| {
			c.notice().is_some_and(|n| n.level == NoticeLevel::Error)
		})
	};

	view! {
		<footer class="status-line">
			<span class="position">{position}{dirty}</span>
			<span class="notice" class:error=is_error>{notice}</span>
		</footer>
	}
}
