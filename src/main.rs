//! Client entrypoint for the CSR build.

// Bin target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use fable_graph::{App, bootstrap};
use leptos::prelude::*;

fn main() {
	let config = bootstrap();

	mount_to_body(move || {
		view! { <App config=config.clone() /> }
	})
}
