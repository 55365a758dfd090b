//! Browser side of the export: canvas rasterization and file download.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use js_sys::{Array, Promise, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use super::orchestrator::{DocumentSink, ExportError, ExportSurface, SurfaceSize};
use super::pdf::JpegImage;
use crate::components::sankey::DiagramHandle;

const JPEG_QUALITY: f64 = 0.95;

fn js_error(e: JsValue) -> String {
	format!("{e:?}")
}

/// Resolves on the browser's next animation frame.
async fn next_frame() {
	let promise = Promise::new(&mut |resolve, _reject| {
		if let Some(window) = web_sys::window() {
			let _ = window.request_animation_frame(&resolve);
		}
	});
	let _ = JsFuture::from(promise).await;
}

/// Strip the `data:image/jpeg;base64,` prefix and decode the payload.
fn decode_data_url(url: &str) -> Result<Vec<u8>, ExportError> {
	let (_, payload) = url
		.split_once(";base64,")
		.ok_or_else(|| ExportError::Raster("canvas did not return a base64 data URL".into()))?;
	STANDARD
		.decode(payload)
		.map_err(|e| ExportError::Raster(e.to_string()))
}

impl ExportSurface for DiagramHandle {
	fn snapshot(&self) -> SurfaceSize {
		DiagramHandle::snapshot(self)
	}

	fn apply(&self, size: SurfaceSize) {
		DiagramHandle::apply(self, size);
		self.render_now();
	}

	fn hold(&self, held: bool) {
		self.hold_viewport(held);
	}

	/// Layout and drawing are synchronous, so one frame is enough for the browser to flush.
	async fn settle(&self) {
		self.render_now();
		next_frame().await;
	}

	async fn rasterize(&self) -> Result<JpegImage, ExportError> {
		let canvas = self
			.canvas()
			.ok_or_else(|| ExportError::Surface("diagram canvas is not mounted".into()))?;
		let url = canvas
			.to_data_url_with_type_and_encoder_options("image/jpeg", &JsValue::from_f64(JPEG_QUALITY))
			.map_err(|e| ExportError::Raster(js_error(e)))?;
		Ok(JpegImage {
			width: canvas.width(),
			height: canvas.height(),
			data: decode_data_url(&url)?,
		})
	}
}

/// Saves through a temporary object URL and reports failures with a blocking alert.
pub struct BrowserDownload;

impl DocumentSink for BrowserDownload {
	fn save(&self, filename: &str, bytes: &[u8]) -> Result<(), ExportError> {
		let save_err = |e: JsValue| ExportError::Save(js_error(e));
		let window = web_sys::window().ok_or_else(|| ExportError::Save("no window".into()))?;
		let document = window
			.document()
			.ok_or_else(|| ExportError::Save("no document".into()))?;

		let parts = Array::of1(&Uint8Array::from(bytes));
		let options = BlobPropertyBag::new();
		options.set_type("application/pdf");
		let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(save_err)?;
		let url = Url::create_object_url_with_blob(&blob).map_err(save_err)?;

		let anchor: HtmlAnchorElement = document
			.create_element("a")
			.map_err(save_err)?
			.dyn_into()
			.map_err(|_| ExportError::Save("anchor element has unexpected type".into()))?;
		anchor.set_href(&url);
		anchor.set_download(filename);
		anchor.click();
		Url::revoke_object_url(&url).map_err(save_err)
	}

	fn notify_failure(&self, message: &str) {
		if let Some(window) = web_sys::window() {
			let _ = window.alert_with_message(message);
		}
	}
}
