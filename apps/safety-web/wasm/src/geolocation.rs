//! `navigator.geolocation` as a [`PositionSource`]
//!
//! Accessed through `Reflect` so hosts without the API report as
//! unsupported instead of failing at binding time.

use js_sys::{Function, Object, Reflect};
use report_core::{Position, PositionErrorKind, PositionOptions, PositionSource};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::browser;

pub struct BrowserGeolocation;

fn geolocation() -> Option<JsValue> {
    let navigator = browser::window().ok()?.navigator();
    Reflect::get(&navigator, &JsValue::from_str("geolocation"))
        .ok()
        .filter(|g| !g.is_undefined() && !g.is_null())
}

fn number(target: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(target, &JsValue::from_str(key)).ok()?.as_f64()
}

fn options_object(options: &PositionOptions) -> Result<Object, JsValue> {
    let obj = Object::new();
    Reflect::set(&obj, &"enableHighAccuracy".into(), &options.enable_high_accuracy.into())?;
    Reflect::set(&obj, &"timeout".into(), &options.timeout_ms.into())?;
    Reflect::set(&obj, &"maximumAge".into(), &options.maximum_age_ms.into())?;
    Ok(obj)
}

fn read_position(value: &JsValue) -> Option<Position> {
    let coords = Reflect::get(value, &JsValue::from_str("coords")).ok()?;
    Some(Position {
        latitude: number(&coords, "latitude")?,
        longitude: number(&coords, "longitude")?,
        accuracy: number(&coords, "accuracy").unwrap_or(0.0),
    })
}

fn read_error(value: &JsValue) -> PositionErrorKind {
    number(value, "code")
        .map(|code| PositionErrorKind::from_code(code as u16))
        .unwrap_or(PositionErrorKind::Unknown)
}

impl PositionSource for BrowserGeolocation {
    fn is_supported(&self) -> bool {
        geolocation().is_some()
    }

    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Position, PositionErrorKind> {
        let geo = geolocation().ok_or(PositionErrorKind::Unknown)?;
        let get_current: Function = Reflect::get(&geo, &JsValue::from_str("getCurrentPosition"))
            .ok()
            .and_then(|f| f.dyn_into().ok())
            .ok_or(PositionErrorKind::Unknown)?;
        let opts = options_object(options).map_err(|_| PositionErrorKind::Unknown)?;

        let promise = js_sys::Promise::new(&mut |resolve, reject| {
            let reject_on_throw = reject.clone();
            let on_success = Closure::once_into_js(move |position: JsValue| {
                let _ = resolve.call1(&JsValue::NULL, &position);
            });
            let on_error = Closure::once_into_js(move |err: JsValue| {
                let _ = reject.call1(&JsValue::NULL, &err);
            });
            if let Err(e) = get_current.call3(&geo, &on_success, &on_error, &opts) {
                browser::error(&format!("getCurrentPosition threw: {}", browser::describe(&e)));
                let _ = reject_on_throw.call1(&JsValue::NULL, &e);
            }
        });

        match JsFuture::from(promise).await {
            Ok(position) => read_position(&position).ok_or(PositionErrorKind::PositionUnavailable),
            Err(err) => Err(read_error(&err)),
        }
    }
}
