//! JSON bodies returned by the reporting server
//!
//! Every field other than `success` is optional: the client must tolerate
//! any server that adheres to the general shape.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reply to `POST /report`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub report_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub gps_captured: Option<bool>,
    #[serde(default)]
    pub file_uploaded: Option<bool>,
}

/// Reply to station activation and police response endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Reply to `GET /api/track_report/<id>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub report: Option<TrackedReport>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackedReport {
    #[serde(default)]
    pub short_id: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub manual_location: String,
    #[serde(default)]
    pub constituency: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, deserialize_with = "crate::timestamp::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub officer_name: Option<String>,
    #[serde(default)]
    pub action_taken: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_status() -> String {
    "pending".to_string()
}

/// Reply to `GET /api/translate_report/<id>/<lang>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub translated: Option<TranslatedFields>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedFields {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub manual_location: String,
}

/// Reply to `GET /admin/api/statistics`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub stats: BTreeMap<String, serde_json::Value>,
}
