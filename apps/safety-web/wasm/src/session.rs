//! Report form session exposed to the page
//!
//! All form state lives in Rust. JavaScript forwards input events, awaits the
//! returned promises and renders the plain objects they resolve to.

use std::cell::RefCell;
use std::rc::Rc;

use report_core::receipt::{Receipt, RECEIPT_SAVED};
use report_core::{
    CaptureStart, GpsCaptureState, IntakeSession, Language, PositionSource, Reply,
    ReportForm, ReportTransport, SelectedFile, StagedAttachment, SubmissionResult, TransportError,
};
use safety_types::ReportResponse;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{File, FormData};

use crate::browser;
use crate::geolocation::BrowserGeolocation;

const REPORT_PATH: &str = "/report";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageBadge {
    pub language: Language,
    pub label: &'static str,
    pub class: &'static str,
}

impl From<Language> for LanguageBadge {
    fn from(language: Language) -> Self {
        Self {
            language,
            label: language.badge_label(),
            class: language.badge_class(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GpsView {
    pub state: GpsCaptureState,
    pub title: Option<&'static str>,
    pub message: Option<String>,
    pub trigger_label: &'static str,
    pub trigger_enabled: bool,
    pub lat: f64,
    pub lon: f64,
    pub gps_was_captured: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentView {
    pub name: String,
    pub size_label: String,
    pub media_type: String,
    pub kind: report_core::PreviewKind,
    pub summary: String,
    pub data_url: Option<String>,
}

impl AttachmentView {
    fn new(staged: &StagedAttachment, contents: Option<&[u8]>) -> Self {
        Self {
            name: staged.file.name.clone(),
            size_label: staged.size_label(),
            media_type: staged.file.media_type.clone(),
            kind: staged.kind,
            summary: staged.summary(),
            data_url: contents.and_then(|bytes| staged.data_url(bytes)),
        }
    }
}

/// Posts the form as `multipart/form-data`
struct BrowserReportTransport {
    media: Option<File>,
}

impl ReportTransport for BrowserReportTransport {
    async fn submit_report(
        &self,
        form: &ReportForm,
    ) -> Result<Reply<ReportResponse>, TransportError> {
        let data = FormData::new().map_err(browser::transport_error)?;
        for (name, value) in form.text_fields() {
            data.append_with_str(name, &value)
                .map_err(browser::transport_error)?;
        }
        if let (Some(file), Some(_)) = (&self.media, &form.media) {
            data.append_with_blob_and_filename("media", file, &file.name())
                .map_err(browser::transport_error)?;
        }

        let body: JsValue = data.into();
        let request = browser::request("POST", REPORT_PATH, Some(&body))?;
        browser::fetch_reply(&request).await
    }
}

#[wasm_bindgen]
pub struct ReportSession {
    inner: Rc<RefCell<IntakeSession>>,
    media: Rc<RefCell<Option<File>>>,
}

impl ReportSession {
    fn gps_view_internal(&self) -> GpsView {
        let session = self.inner.borrow();
        gps_view(&session)
    }
}

/// Whether `staged` is still the file the draft holds
fn still_staged(session: &IntakeSession, staged: &StagedAttachment) -> bool {
    session.draft().attachment.as_ref() == Some(staged)
}

fn gps_view(session: &IntakeSession) -> GpsView {
    let state = *session.gps_state();
    GpsView {
        state,
        title: state.title(),
        message: state.message(),
        trigger_label: state.trigger_label(),
        trigger_enabled: state.trigger_enabled(),
        lat: session.draft().coordinates.lat,
        lon: session.draft().coordinates.lon,
        gps_was_captured: session.draft().gps_was_captured,
    }
}

#[wasm_bindgen]
impl ReportSession {
    /// Create a session; `config_json` optionally overrides the defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<ReportSession, JsValue> {
        let config = browser::config(config_json)?;
        Ok(Self {
            inner: Rc::new(RefCell::new(IntakeSession::new(config))),
            media: Rc::new(RefCell::new(None)),
        })
    }

    /// Update the description; returns the language badge
    #[wasm_bindgen(js_name = setDescription)]
    pub fn set_description(&self, text: String) -> Result<JsValue, JsValue> {
        let language = self.inner.borrow_mut().set_description(text);
        browser::to_js(&LanguageBadge::from(language))
    }

    /// Set the category; returns whether the custom category input applies
    #[wasm_bindgen(js_name = setCategory)]
    pub fn set_category(&self, category: String) -> bool {
        let mut session = self.inner.borrow_mut();
        session.set_category(category);
        session.draft().is_other_category()
    }

    #[wasm_bindgen(js_name = setCustomCategory)]
    pub fn set_custom_category(&self, text: String) {
        self.inner.borrow_mut().set_custom_category(text);
    }

    #[wasm_bindgen(js_name = setManualLocation)]
    pub fn set_manual_location(&self, text: String) {
        self.inner.borrow_mut().set_manual_location(text);
    }

    #[wasm_bindgen(js_name = setConstituency)]
    pub fn set_constituency(&self, text: String) {
        self.inner.borrow_mut().set_constituency(text);
    }

    #[wasm_bindgen(js_name = gpsView)]
    pub fn gps_view(&self) -> Result<JsValue, JsValue> {
        browser::to_js(&self.gps_view_internal())
    }

    /// Handle a press of the GPS trigger; resolves to the new GPS view
    #[wasm_bindgen(js_name = captureGps)]
    pub fn capture_gps(&self) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let source = BrowserGeolocation;
            let start = inner.borrow_mut().begin_capture(source.is_supported());
            if let CaptureStart::Request(options) = start {
                let outcome = source.current_position(&options).await;
                inner.borrow_mut().finish_capture(outcome);
            }
            let view = gps_view(&inner.borrow());
            browser::to_js(&view)
        })
    }

    /// Stage a picked file; resolves to its preview or rejects with a message
    ///
    /// Resolves to `null` when a newer pick replaced the file while its
    /// contents were being read.
    #[wasm_bindgen(js_name = selectAttachment)]
    pub fn select_attachment(&self, file: File) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        let media = Rc::clone(&self.media);
        future_to_promise(async move {
            let selected = SelectedFile::new(file.name(), file.size() as u64, file.type_());
            let staged = match inner.borrow_mut().select_attachment(selected) {
                Ok(staged) => staged,
                Err(e) => {
                    *media.borrow_mut() = None;
                    return Err(JsValue::from_str(&e.to_string()));
                }
            };
            *media.borrow_mut() = Some(file.clone());

            let contents = if staged.kind.is_inline() {
                let buffer = JsFuture::from(file.array_buffer()).await?;
                Some(js_sys::Uint8Array::new(&buffer).to_vec())
            } else {
                None
            };
            if !still_staged(&inner.borrow(), &staged) {
                return Ok(JsValue::NULL);
            }
            browser::to_js(&AttachmentView::new(&staged, contents.as_deref()))
        })
    }

    #[wasm_bindgen(js_name = removeAttachment)]
    pub fn remove_attachment(&self) {
        self.inner.borrow_mut().remove_attachment();
        *self.media.borrow_mut() = None;
    }

    #[wasm_bindgen(getter, js_name = isSubmitting)]
    pub fn is_submitting(&self) -> bool {
        self.inner.borrow().is_submitting()
    }

    /// Submit the report; resolves to the submission result
    pub fn submit(&self) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        let media = Rc::clone(&self.media);
        future_to_promise(async move {
            let form = inner
                .borrow_mut()
                .begin_submit()
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            let transport = BrowserReportTransport {
                media: media.borrow().clone(),
            };

            let outcome = transport.submit_report(&form).await;
            let result = inner.borrow_mut().finish_submit(outcome);

            match &result {
                SubmissionResult::Submitted { report_id, .. } => {
                    *media.borrow_mut() = None;
                    browser::log(&format!(
                        "Report submitted: {}",
                        report_id.as_deref().unwrap_or("(no id)")
                    ));
                }
                SubmissionResult::Redirected { url } => browser::navigate(url)?,
                SubmissionResult::Failed { message } => browser::warn(message),
            }
            browser::to_js(&result)
        })
    }

    /// Download the confirmation for the last submitted report
    #[wasm_bindgen(js_name = downloadReceipt)]
    pub fn download_receipt(&self) -> Result<String, JsValue> {
        let session = self.inner.borrow();
        let report_id = session
            .last_report_id()
            .ok_or_else(|| JsValue::from_str(report_core::receipt::NO_REPORT_ID))?;
        let receipt = Receipt::new(report_id, browser::local_now())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        browser::download_text(&receipt.filename, &receipt.body, "text/plain")?;
        Ok(RECEIPT_SAVED.to_string())
    }

    /// Current draft, for re-rendering the form
    pub fn draft(&self) -> Result<JsValue, JsValue> {
        browser::to_js(self.inner.borrow().draft())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session_gps_view() {
        let session = ReportSession::new(None).unwrap();
        let view = session.gps_view_internal();
        assert_eq!(view.trigger_label, "Capture GPS Location");
        assert!(view.trigger_enabled);
        assert!(!view.gps_was_captured);
        assert_eq!(view.lat, report_core::FALLBACK_COORDINATES.lat);
    }

    #[test]
    fn test_language_badge() {
        let badge = LanguageBadge::from(Language::Kiswahili);
        assert_eq!(badge.label, "Kiswahili");
        assert_eq!(badge.class, "badge bg-success");
    }

    #[test]
    fn test_replaced_attachment_is_not_previewed() {
        let mut session = IntakeSession::default();
        let first = session
            .select_attachment(SelectedFile::new("first.jpg", 4096, "image/jpeg"))
            .unwrap();
        assert!(still_staged(&session, &first));

        let second = session
            .select_attachment(SelectedFile::new("second.png", 2048, "image/png"))
            .unwrap();
        assert!(!still_staged(&session, &first));
        assert!(still_staged(&session, &second));

        session.remove_attachment();
        assert!(!still_staged(&session, &second));
    }

    #[test]
    fn test_attachment_view_without_contents() {
        let staged = StagedAttachment {
            file: SelectedFile::new("notes.pdf", 2048, "application/pdf"),
            kind: report_core::PreviewKind::Generic,
        };
        let view = AttachmentView::new(&staged, None);
        assert_eq!(view.size_label, "0.00 MB");
        assert_eq!(view.summary, "notes.pdf ready for upload");
        assert!(view.data_url.is_none());
    }
}
