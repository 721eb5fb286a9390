//! Police dashboard bindings: managed report modal, translation, response form

use std::cell::RefCell;
use std::rc::Rc;

use report_core::police::{ManagedReportView, ReportRow, ResponseOutcome};
use report_core::translation::{fetch_once, translation_url, TranslationStart};
use report_core::{
    RetryPolicy, TargetLanguage, TranslationDesk, TranslationSource, TransportError,
};
use safety_types::{ActionResponse, TranslationResponse};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{FormData, HtmlFormElement};

use crate::browser;

struct BrowserTranslationSource;

impl TranslationSource for BrowserTranslationSource {
    async fn fetch_translation(
        &self,
        report_id: &str,
        target: TargetLanguage,
    ) -> Result<TranslationResponse, TransportError> {
        let url = translation_url(report_id, target, browser::now_ms());
        let request = browser::request("GET", &url, None)?;
        browser::fetch_json(&request).await
    }
}

#[wasm_bindgen]
pub struct PoliceDashboard {
    retry: RetryPolicy,
    desk: Rc<RefCell<Option<TranslationDesk>>>,
    respond_url: Rc<RefCell<Option<String>>>,
}

impl PoliceDashboard {
    fn with_retry(retry: RetryPolicy) -> Self {
        Self {
            retry,
            desk: Rc::new(RefCell::new(None)),
            respond_url: Rc::new(RefCell::new(None)),
        }
    }

    fn open_report_internal(&self, row: &ReportRow) -> ManagedReportView {
        let view = ManagedReportView::new(row);
        *self.desk.borrow_mut() = Some(TranslationDesk::open(&row.id, &row.language, self.retry));
        *self.respond_url.borrow_mut() = Some(view.respond_url.clone());
        view
    }
}

#[wasm_bindgen]
impl PoliceDashboard {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PoliceDashboard, JsValue> {
        let config = browser::config(config_json)?;
        Ok(Self::with_retry(config.translation_retry))
    }

    /// Open the modal for a row's `data-*` attributes; returns the view
    #[wasm_bindgen(js_name = openReport)]
    pub fn open_report(&self, dataset: JsValue) -> Result<JsValue, JsValue> {
        let row: ReportRow = browser::from_js(dataset)?;
        browser::to_js(&self.open_report_internal(&row))
    }

    /// Close the modal and forget cached translations
    #[wasm_bindgen(js_name = closeReport)]
    pub fn close_report(&self) {
        *self.desk.borrow_mut() = None;
        *self.respond_url.borrow_mut() = None;
    }

    /// Translate the open report to `en` or `sw`
    ///
    /// Resolves to the outcome, or `null` while a request for the same
    /// target is still running.
    pub fn translate(&self, target: String) -> js_sys::Promise {
        let desk = Rc::clone(&self.desk);
        future_to_promise(async move {
            let target = TargetLanguage::from_code(&target)
                .ok_or_else(|| JsValue::from_str("Unknown target language"))?;

            let start = desk
                .borrow_mut()
                .as_mut()
                .map(|d| d.begin(target))
                .ok_or_else(|| JsValue::from_str("No report open"))?;

            let outcome = match start {
                TranslationStart::Done(outcome) => outcome,
                TranslationStart::Busy => return Ok(JsValue::NULL),
                TranslationStart::Fetch { report_id, retry } => {
                    browser::log(&format!(
                        "Translation requested: {} -> {}",
                        report_id,
                        target.code()
                    ));
                    let source = BrowserTranslationSource;
                    let result = retry
                        .run(
                            |attempt| {
                                browser::log(&format!(
                                    "Translation attempt {} of {}",
                                    attempt, retry.max_attempts
                                ));
                                fetch_once(&source, &report_id, target)
                            },
                            browser::sleep,
                        )
                        .await;

                    // The modal may have been closed or switched meanwhile
                    let mut guard = desk.borrow_mut();
                    let outcome = match guard.as_mut().filter(|d| d.report_id() == report_id) {
                        Some(d) => d.complete(target, result),
                        None => return Ok(JsValue::NULL),
                    };
                    outcome
                }
            };

            browser::to_js(&outcome)
        })
    }

    /// Post the response form; resolves to the outcome
    #[wasm_bindgen(js_name = submitResponse)]
    pub fn submit_response(&self, form: HtmlFormElement) -> js_sys::Promise {
        let respond_url = self.respond_url.borrow().clone();
        future_to_promise(async move {
            let url = respond_url.ok_or_else(|| JsValue::from_str("No report open"))?;
            let data = FormData::new_with_form(&form)?;
            let body: JsValue = data.into();

            let reply = match browser::request("POST", &url, Some(&body)) {
                Ok(request) => browser::fetch_reply::<ActionResponse>(&request).await,
                Err(e) => Err(e),
            };
            let outcome = ResponseOutcome::from_reply(reply);

            if let ResponseOutcome::Navigate { url } = &outcome {
                browser::navigate(url)?;
            }
            browser::to_js(&outcome)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_report_resets_desk() {
        let dashboard = PoliceDashboard::with_retry(RetryPolicy::default());
        let row = ReportRow {
            id: "9".to_string(),
            language: "sw".to_string(),
            ..Default::default()
        };
        let view = dashboard.open_report_internal(&row);

        assert_eq!(view.respond_url, "/police/respond/9");
        let desk_guard = dashboard.desk.borrow();
        let desk = desk_guard.as_ref().unwrap();
        assert_eq!(desk.report_id(), "9");
        assert_eq!(desk.original_language(), TargetLanguage::Sw);

        drop(desk_guard);
        dashboard.close_report();
        assert!(dashboard.desk.borrow().is_none());
    }
}
