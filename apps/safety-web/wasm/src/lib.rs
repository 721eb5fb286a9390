//! WASM bindings for the citizen safety reporting pages
//!
//! State lives in Rust; the pages forward DOM events and render the plain
//! objects handed back.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { ReportSession, HotspotMap, PoliceDashboard } from './pkg/safety_web_wasm.js';
//!
//! await init();
//!
//! // Report form
//! const session = new ReportSession(null);
//! const badge = session.setDescription(textarea.value);
//! const gps = await session.captureGps();
//! const preview = await session.selectAttachment(input.files[0]);
//! const result = await session.submit();
//!
//! // Hotspot map
//! const map = new HotspotMap(feedJson);
//! map.markers().forEach(m => L.circleMarker([m.lat, m.lon], { radius: m.risk.radius, color: m.risk.color }).addTo(layer));
//!
//! // Police dashboard
//! const dashboard = new PoliceDashboard(null);
//! const view = dashboard.openReport(row.dataset);
//! const outcome = await dashboard.translate('sw');
//! ```

pub mod admin;
pub mod browser;
pub mod dashboard;
pub mod geolocation;
pub mod map;
pub mod session;
pub mod tracking;

use wasm_bindgen::prelude::*;

// Re-export main types for JavaScript
pub use dashboard::PoliceDashboard;
pub use map::HotspotMap;
pub use session::ReportSession;

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Language of a description without creating a session
#[wasm_bindgen(js_name = detectLanguage)]
pub fn detect_language(text: &str) -> Result<JsValue, JsValue> {
    browser::to_js(&session::LanguageBadge::from(report_core::detect(text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_version() {
        let version = get_version();
        assert!(!version.is_empty());
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_detect_language_badge() {
        let badge = detect_language("Kuna wizi mkubwa sana hapa mjini").unwrap();
        let label = js_sys::Reflect::get(&badge, &"label".into()).unwrap();
        assert_eq!(label.as_string().as_deref(), Some("Kiswahili"));
    }

    #[wasm_bindgen_test]
    fn test_draft_survives_storage() {
        let fields = browser::to_js(&vec![report_core::stations::DraftField {
            name: "constituency".to_string(),
            input_type: "text".to_string(),
            value: "Molo".to_string(),
        }])
        .unwrap();
        admin::save_draft("addStationForm", fields.clone()).unwrap();
        let restored = admin::restore_draft("addStationForm", fields).unwrap();
        assert!(!restored.is_undefined());
    }

    #[wasm_bindgen_test]
    fn test_report_session_starts_idle() {
        let session = ReportSession::new(None).unwrap();
        assert!(!session.is_submitting());
    }
}
