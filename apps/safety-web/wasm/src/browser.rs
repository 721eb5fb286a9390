//! Thin wrappers over browser APIs shared by every page

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use report_core::{IntakeConfig, Reply, TransportError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Request, RequestInit, Response, Storage, Url, Window};

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("No window"))
}

pub fn local_storage() -> Result<Storage, JsValue> {
    window()?
        .local_storage()?
        .ok_or_else(|| JsValue::from_str("No localStorage"))
}

pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

pub fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

pub fn error(message: &str) {
    web_sys::console::error_1(&JsValue::from_str(message));
}

/// Serialise for JavaScript, maps and structs become plain objects
pub fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    value
        .serialize(&serializer)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

pub fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid argument: {}", e)))
}

/// Page config overrides; absent or blank JSON means the defaults
pub fn config(json: Option<String>) -> Result<IntakeConfig, JsValue> {
    match json.as_deref().map(str::trim) {
        Some(json) if !json.is_empty() => {
            IntakeConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))
        }
        _ => Ok(IntakeConfig::default()),
    }
}

pub fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

pub fn transport_error(value: JsValue) -> TransportError {
    TransportError(describe(&value))
}

pub fn now_ms() -> i64 {
    js_sys::Date::now() as i64
}

pub fn now_utc() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(now_ms()).unwrap_or_default()
}

/// Wall-clock time in the browser's time zone
pub fn local_now() -> NaiveDateTime {
    let date = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        date.get_full_year() as i32,
        date.get_month() + 1,
        date.get_date(),
    )
    .and_then(|d| d.and_hms_opt(date.get_hours(), date.get_minutes(), date.get_seconds()))
    .unwrap_or_else(|| now_utc().naive_utc())
}

/// Resolve after `delay` on the browser event loop
pub async fn sleep(delay: Duration) {
    let ms = delay.as_millis().min(i32::MAX as u128) as i32;
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Ok(window) = window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
        }
    });
    let _ = JsFuture::from(promise).await;
}

pub fn request(method: &str, url: &str, body: Option<&JsValue>) -> Result<Request, TransportError> {
    let opts = RequestInit::new();
    opts.set_method(method);
    if let Some(body) = body {
        opts.set_body(body);
    }
    Request::new_with_str_and_init(url, &opts).map_err(transport_error)
}

async fn send(request: &Request) -> Result<Response, TransportError> {
    let window = window().map_err(transport_error)?;
    JsFuture::from(window.fetch_with_request(request))
        .await
        .map_err(transport_error)?
        .dyn_into()
        .map_err(transport_error)
}

async fn body_text(response: &Response) -> Result<String, TransportError> {
    let text = JsFuture::from(response.text().map_err(transport_error)?)
        .await
        .map_err(transport_error)?;
    Ok(text.as_string().unwrap_or_default())
}

/// Fetch and read either the redirect target or a JSON body
pub async fn fetch_reply<T: DeserializeOwned>(request: &Request) -> Result<Reply<T>, TransportError> {
    let response = send(request).await?;
    if response.redirected() {
        return Ok(Reply::Redirected {
            url: response.url(),
        });
    }
    let text = body_text(&response).await?;
    Ok(Reply::from_parts(false, &response.url(), &text)?)
}

/// Fetch a JSON body; non-2xx statuses are transport failures
pub async fn fetch_json<T: DeserializeOwned>(request: &Request) -> Result<T, TransportError> {
    let response = send(request).await?;
    if !response.ok() {
        return Err(TransportError(format!("HTTP error! status: {}", response.status())));
    }
    let text = body_text(&response).await?;
    Ok(serde_json::from_str(&text)?)
}

pub fn navigate(url: &str) -> Result<(), JsValue> {
    window()?.location().set_href(url)
}

/// Offer `contents` as a file download
pub fn download_text(filename: &str, contents: &str, mime: &str) -> Result<(), JsValue> {
    let parts = js_sys::Array::of1(&JsValue::from_str(contents));
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let document = window()?
        .document()
        .ok_or_else(|| JsValue::from_str("No document"))?;
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    Url::revoke_object_url(&url)
}
