//! Browser file import and download helpers.

use js_sys::Array;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, FileReader, HtmlAnchorElement, HtmlInputElement, Url};

fn js_error(context: &str, err: JsValue) -> String {
	match err.as_string() {
		Some(msg) => format!("{context}: {msg}"),
		None => format!("{context}: {err:?}"),
	}
}

/// Reads the first file chosen in `input` as text.
///
/// `on_done` later receives the file name and its contents, or a message if
/// the read failed. An error here means the read never started.
pub fn read_chosen_file(
	input: &HtmlInputElement,
	on_done: impl FnOnce(Result<(String, String), String>) + 'static,
) -> Result<(), String> {
	let Some(file) = input.files().and_then(|files| files.get(0)) else {
		return Ok(());
	};
	let name = file.name();

	let reader = FileReader::new().map_err(|e| js_error("cannot create file reader", e))?;
	let reader_done = reader.clone();
	let onloadend = Closure::once_into_js(move || {
		let text = reader_done
			.result()
			.ok()
			.and_then(|value| value.as_string());
		match text {
			Some(text) => on_done(Ok((name, text))),
			None => on_done(Err(format!("could not read {name} as text"))),
		}
	});
	reader.set_onloadend(Some(onloadend.unchecked_ref()));

	reader
		.read_as_text(&file)
		.map_err(|e| js_error("file read failed to start", e))
}

/// Offers `contents` to the user as a downloaded file.
pub fn download_text(file_name: &str, contents: &str) -> Result<(), String> {
	let parts = Array::of1(&JsValue::from_str(contents));
	let options = BlobPropertyBag::new();
	options.set_type("application/json");
	let blob = Blob::new_with_str_sequence_and_options(&parts, &options)
		.map_err(|e| js_error("cannot build download", e))?;
	let url = Url::create_object_url_with_blob(&blob).map_err(|e| js_error("cannot build download", e))?;

	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| "no document to download from".to_string())?;
	let anchor: HtmlAnchorElement = document
		.create_element("a")
		.map_err(|e| js_error("cannot build download", e))?
		.dyn_into()
		.map_err(|_| "cannot build download link".to_string())?;
	anchor.set_href(&url);
	anchor.set_download(file_name);
	anchor.click();

	Url::revoke_object_url(&url).map_err(|e| js_error("cannot release download", e))
}
