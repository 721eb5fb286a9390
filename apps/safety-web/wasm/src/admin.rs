//! Station administration dashboard bindings

use js_sys::Function;
use report_core::stations::{
    self, DraftField, StationAction, StationFilter, StationForm, StationRow, DRAFT_RESTORED,
    EXPORT_DONE, STATISTICS_PATH,
};
use report_core::Notice;
use safety_types::{ActionResponse, StatisticsResponse};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};

use crate::browser;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeView {
    pub level: report_core::NoticeLevel,
    pub message: String,
    pub background: &'static str,
    pub color: &'static str,
}

impl From<Notice> for NoticeView {
    fn from(notice: Notice) -> Self {
        Self {
            level: notice.level,
            background: notice.level.background(),
            color: notice.level.foreground(),
            message: notice.message,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionView {
    pub notice: NoticeView,
    pub reload: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoredDraft {
    pub values: Vec<(String, String)>,
    pub notice: NoticeView,
}

fn validate_internal(form: &StationForm) -> Option<String> {
    form.validate().err().map(|e| e.to_string())
}

fn restore_internal(stored: Option<String>, fields: &[DraftField]) -> Option<RestoredDraft> {
    let values = stations::restore_draft(&stored?, fields).ok()?;
    Some(RestoredDraft {
        values,
        notice: Notice::info(DRAFT_RESTORED).into(),
    })
}

/// Check the add-station form; resolves to the first error or `undefined`
#[wasm_bindgen(js_name = validateStationForm)]
pub fn validate_station_form(form: JsValue) -> Result<Option<String>, JsValue> {
    let form: StationForm = browser::from_js(form)?;
    Ok(validate_internal(&form))
}

/// Indices of `{active, cells}` rows to keep visible
#[wasm_bindgen(js_name = visibleStations)]
pub fn visible_stations(rows: JsValue, filter: &str, search: &str) -> Result<JsValue, JsValue> {
    let rows: Vec<StationRow> = browser::from_js(rows)?;
    browser::to_js(&stations::visible_rows(
        &rows,
        StationFilter::parse(filter),
        search,
    ))
}

/// Download the visible table as CSV; returns the success notice
#[wasm_bindgen(js_name = exportStations)]
pub fn export_stations(table: JsValue) -> Result<JsValue, JsValue> {
    let table: Vec<Vec<String>> = browser::from_js(table)?;
    let csv = stations::export_csv(&table);
    let filename = stations::csv_filename(browser::local_now().date());
    browser::download_text(&filename, &csv, "text/csv")?;
    browser::log(&format!("Exported {} rows to {}", table.len(), filename));
    browser::to_js(&NoticeView::from(Notice::success(EXPORT_DONE)))
}

#[wasm_bindgen(js_name = confirmStationAction)]
pub fn confirm_station_action(name: &str, activate: bool) -> String {
    action(activate).confirm_prompt(name)
}

fn action(activate: bool) -> StationAction {
    if activate {
        StationAction::Activate
    } else {
        StationAction::Deactivate
    }
}

/// Activate or deactivate a station; resolves to `{notice, reload}`
#[wasm_bindgen(js_name = setStationActive)]
pub fn set_station_active(station_id: String, name: String, activate: bool) -> js_sys::Promise {
    future_to_promise(async move {
        let action = action(activate);
        let result = match browser::request("POST", &action.url(&station_id), None) {
            Ok(request) => browser::fetch_json::<ActionResponse>(&request).await,
            Err(e) => Err(e),
        };
        let (notice, reload) = action.outcome(&name, result);
        browser::to_js(&ActionView {
            notice: notice.into(),
            reload,
        })
    })
}

async fn fetch_statistics() -> Result<StatisticsResponse, report_core::TransportError> {
    let request = browser::request("GET", STATISTICS_PATH, None)?;
    browser::fetch_json(&request).await
}

/// Fetch the counters; resolves to `{name: text}` for the ones to update
#[wasm_bindgen(js_name = refreshStatistics)]
pub fn refresh_statistics() -> js_sys::Promise {
    future_to_promise(async move {
        let updates = match fetch_statistics().await {
            Ok(response) => stations::statistics_updates(&response),
            Err(e) => {
                browser::warn(&format!("Statistics refresh failed: {}", e));
                Default::default()
            }
        };
        browser::to_js(&updates)
    })
}

/// Call `on_update` with fresh counters every poll period; returns the interval id
#[wasm_bindgen(js_name = startStatisticsPolling)]
pub fn start_statistics_polling(
    on_update: Function,
    config_json: Option<String>,
) -> Result<i32, JsValue> {
    let config = browser::config(config_json)?;
    let period_ms = config.statistics_poll_interval().as_millis().min(i32::MAX as u128) as i32;

    let tick = Closure::<dyn FnMut()>::new(move || {
        let on_update = on_update.clone();
        spawn_local(async move {
            let response = match fetch_statistics().await {
                Ok(response) => response,
                Err(e) => {
                    browser::warn(&format!("Statistics refresh failed: {}", e));
                    return;
                }
            };
            let updates = stations::statistics_updates(&response);
            if updates.is_empty() {
                return;
            }
            match browser::to_js(&updates) {
                Ok(value) => {
                    if let Err(e) = on_update.call1(&JsValue::NULL, &value) {
                        browser::error(&format!(
                            "Statistics callback threw: {}",
                            browser::describe(&e)
                        ));
                    }
                }
                Err(e) => browser::error(&browser::describe(&e)),
            }
        });
    });

    let id = browser::window()?.set_interval_with_callback_and_timeout_and_arguments_0(
        tick.as_ref().unchecked_ref(),
        period_ms,
    )?;
    // Lives for the page
    tick.forget();
    Ok(id)
}

/// Store the named controls of a form, passwords excluded
#[wasm_bindgen(js_name = saveDraft)]
pub fn save_draft(form_id: &str, fields: JsValue) -> Result<(), JsValue> {
    let fields: Vec<DraftField> = browser::from_js(fields)?;
    let snapshot = stations::save_draft(&fields).map_err(|e| JsValue::from_str(&e.to_string()))?;
    browser::local_storage()?.set_item(&stations::draft_storage_key(form_id), &snapshot)
}

/// Values to put back into a form, or `undefined` when nothing was stored
#[wasm_bindgen(js_name = restoreDraft)]
pub fn restore_draft(form_id: &str, fields: JsValue) -> Result<JsValue, JsValue> {
    let fields: Vec<DraftField> = browser::from_js(fields)?;
    let stored = browser::local_storage()?.get_item(&stations::draft_storage_key(form_id))?;
    match restore_internal(stored, &fields) {
        Some(restored) => browser::to_js(&restored),
        None => Ok(JsValue::UNDEFINED),
    }
}
