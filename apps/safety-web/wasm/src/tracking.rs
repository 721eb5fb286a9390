//! Landing page report lookup

use report_core::tracking::{track_url, TrackingOutcome};
use safety_types::TrackResponse;
use wasm_bindgen::prelude::*;

use crate::browser;

/// Look up a report by reference; resolves to `{outcome: "found", view}` or
/// `{outcome: "not-found"}`, rejects when the reference is blank
#[wasm_bindgen(js_name = trackReport)]
pub async fn track_report(reference: String) -> Result<JsValue, JsValue> {
    let url = track_url(&reference).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let reply = match browser::request("GET", &url, None) {
        Ok(request) => browser::fetch_json::<TrackResponse>(&request).await,
        Err(e) => Err(e),
    };
    browser::to_js(&TrackingOutcome::from_reply(reference.trim(), reply))
}
