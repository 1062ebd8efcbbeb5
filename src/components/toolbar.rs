//! Navigation and persistence controls.

use leptos::prelude::*;
use web_sys::HtmlInputElement;

use crate::annotate::Controller;

use super::file_io;

/// Prev / Next / Jump, Save graph, Export file and Import file.
#[component]
pub fn Toolbar(controller: RwSignal<Controller>, export_file_name: String) -> impl IntoView {
	let jump_text = RwSignal::new(String::new());
	let file_input = NodeRef::<leptos::html::Input>::new();

	// keep the index box showing where we are
	Effect::new(move |_| {
		if let Some(idx) = controller.with(|c| c.current_idx()) {
			jump_text.set(idx.to_string());
		}
	});

	let prev = move |_| {
		controller.update(|c| {
			let result = c.prev();
			c.report(result);
		})
	};
	let next = move |_| {
		controller.update(|c| {
			let result = c.next();
			c.report(result);
		})
	};
	let jump = move |_| {
		let target = jump_text.get_untracked();
		controller.update(|c| {
			let result = c.jump_input(&target);
			c.report(result);
		})
	};
	let save_graph = move |_| {
		controller.update(|c| {
			let result = c.save_story();
			c.report(result);
		})
	};
	let export = move |_| {
		let mut exported = None;
		controller.update(|c| {
			let result = c.export_json();
			exported = c.report(result);
		});
		let Some(json) = exported else {
			return;
		};
		let downloaded = file_io::download_text(&export_file_name, &json);
		controller.update(|c| match downloaded {
			Ok(()) => c.mark_exported(),
			Err(e) => c.notify_error(format!("export download failed: {e}")),
		});
	};
	let choose_file = move |_| {
		if let Some(input) = file_input.get() {
			input.click();
		}
	};
	let import = move |ev: leptos::ev::Event| {
		let input: HtmlInputElement = event_target(&ev);
		let started = file_io::read_chosen_file(&input, move |loaded| {
			controller.update(|c| match loaded {
				Ok((name, text)) => {
					let result = c.import_json(&name, &text);
					c.report(result);
				}
				Err(e) => c.notify_error(format!("import failed: {e}")),
			});
		});
		if let Err(e) = started {
			controller.update(|c| c.notify_error(format!("import failed: {e}")));
		}
		input.set_value("");
	};

	view! {
		<nav class="toolbar">
			<button on:click=prev>"Prev"</button>
			<button on:click=next>"Next"</button>
			<input
				class="jump-index"
				type="text"
				prop:value=move || jump_text.get()
				on:input=move |ev| jump_text.set(event_target_value(&ev))
			/>
			<button on:click=jump>"Jump"</button>
			<span class="spacer" />
			<button on:click=save_graph>"Save graph"</button>
			<span class="spacer" />
			<button on:click=export>"Export file"</button>
			<button on:click=choose_file>"Import file"</button>
			<input
				node_ref=file_input
				type="file"
				accept=".json,.jsonl"
				style="display: none;"
				on:change=import
			/>
		</nav>
	}
}
