//! Police station administration
//!
//! Covers the admin dashboard's client-side rules: station form checks,
//! table filtering and search, CSV export, activation outcomes, statistics
//! refresh, and form draft persistence.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use safety_types::{ActionResponse, StatisticsResponse};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, TransportError};
use crate::notice::Notice;

pub const MIN_CONSTITUENCY_CHARS: usize = 3;
pub const MIN_USERNAME_CHARS: usize = 5;
pub const MIN_PASSWORD_CHARS: usize = 8;

pub const STATISTICS_PATH: &str = "/admin/api/statistics";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationForm {
    pub constituency: String,
    pub username: String,
    pub password: String,
}

impl StationForm {
    /// First failing rule wins; constituency and username are trimmed
    pub fn validate(&self) -> Result<(), ReportError> {
        check_length("Constituency name", self.constituency.trim(), MIN_CONSTITUENCY_CHARS)?;
        check_length("Username", self.username.trim(), MIN_USERNAME_CHARS)?;
        check_length("Password", &self.password, MIN_PASSWORD_CHARS)?;
        Ok(())
    }
}

fn check_length(field: &'static str, value: &str, min: usize) -> Result<(), ReportError> {
    if value.chars().count() < min {
        return Err(ReportError::FieldTooShort { field, min });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StationFilter {
    pub fn parse(value: &str) -> Self {
        match value {
            "active" => StationFilter::Active,
            "inactive" => StationFilter::Inactive,
            _ => StationFilter::All,
        }
    }

    pub fn matches(&self, active: bool) -> bool {
        match self {
            StationFilter::All => true,
            StationFilter::Active => active,
            StationFilter::Inactive => !active,
        }
    }
}

/// One row of the stations table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRow {
    pub active: bool,
    pub cells: Vec<String>,
}

impl StationRow {
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.cells
            .iter()
            .any(|cell| cell.to_lowercase().contains(&term))
    }
}

/// Indices of rows passing both the status filter and the search term
pub fn visible_rows(rows: &[StationRow], filter: StationFilter, search: &str) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| filter.matches(row.active) && row.matches_search(search))
        .map(|(i, _)| i)
        .collect()
}

fn quote_cell(cell: &str) -> String {
    format!("\"{}\"", cell.trim().replace('"', "\"\""))
}

/// Every cell quoted, rows joined with `\n`
pub fn export_csv<R, C>(rows: R) -> String
where
    R: IntoIterator<Item = C>,
    C: IntoIterator,
    C::Item: AsRef<str>,
{
    rows.into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| quote_cell(cell.as_ref()))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn csv_filename(date: NaiveDate) -> String {
    format!("stations_{}.csv", date.format("%Y-%m-%d"))
}

pub const EXPORT_DONE: &str = "Station data exported successfully";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationAction {
    Activate,
    Deactivate,
}

impl StationAction {
    pub fn url(&self, station_id: &str) -> String {
        match self {
            StationAction::Activate => format!("/admin/activate_station/{}", station_id),
            StationAction::Deactivate => format!("/admin/deactivate_station/{}", station_id),
        }
    }

    pub fn confirm_prompt(&self, name: &str) -> String {
        match self {
            StationAction::Activate => format!("Activate {} Police Station?", name),
            StationAction::Deactivate => {
                format!("Deactivate {} Police Station? This will prevent login.", name)
            }
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            StationAction::Activate => "activate",
            StationAction::Deactivate => "deactivate",
        }
    }

    /// Notice for the finished request, plus whether to reload the page
    pub fn outcome(
        &self,
        name: &str,
        result: Result<ActionResponse, TransportError>,
    ) -> (Notice, bool) {
        match result {
            Ok(body) if body.success => (
                Notice::success(format!("{} has been {}d successfully", name, self.verb())),
                true,
            ),
            Ok(body) => (
                Notice::error(
                    body.error
                        .filter(|e| !e.is_empty())
                        .unwrap_or_else(|| format!("Failed to {} station", self.verb())),
                ),
                false,
            ),
            Err(e) => {
                tracing::error!(error = %e, action = self.verb(), "station request failed");
                (Notice::error("Network error. Please try again."), false)
            }
        }
    }
}

/// Dashboard counters to overwrite; falsy values are skipped
pub fn statistics_updates(response: &StatisticsResponse) -> BTreeMap<String, String> {
    if !response.success {
        return BTreeMap::new();
    }
    response
        .stats
        .iter()
        .filter_map(|(name, value)| display_truthy(value).map(|text| (name.clone(), text)))
        .collect()
}

fn display_truthy(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// A named form control as seen by the draft store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftField {
    pub name: String,
    pub input_type: String,
    pub value: String,
}

impl DraftField {
    fn is_password(&self) -> bool {
        self.input_type.eq_ignore_ascii_case("password")
    }
}

pub const DRAFT_RESTORED: &str = "Draft data restored";

pub fn draft_storage_key(form_id: &str) -> String {
    format!("draft_{}", form_id)
}

/// Serialise a form for local storage; passwords are never written
pub fn save_draft(fields: &[DraftField]) -> Result<String, ReportError> {
    let snapshot: BTreeMap<&str, &str> = fields
        .iter()
        .filter(|f| !f.name.is_empty() && !f.is_password())
        .map(|f| (f.name.as_str(), f.value.as_str()))
        .collect();
    serde_json::to_string(&snapshot).map_err(|e| ReportError::Serialization(e.to_string()))
}

/// Values to write back into `fields` from a stored draft
pub fn restore_draft(
    stored: &str,
    fields: &[DraftField],
) -> Result<Vec<(String, String)>, ReportError> {
    let saved: BTreeMap<String, String> =
        serde_json::from_str(stored).map_err(|e| ReportError::Serialization(e.to_string()))?;
    Ok(fields
        .iter()
        .filter(|f| !f.is_password())
        .filter_map(|f| saved.get(&f.name).map(|v| (f.name.clone(), v.clone())))
        .collect())
}
