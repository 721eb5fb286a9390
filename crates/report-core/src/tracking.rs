//! Report status lookup on the landing page

use safety_types::TrackResponse;
use serde::Serialize;

use crate::error::{ReportError, TransportError};

/// Validate a typed reference and build its lookup path
pub fn track_url(reference: &str) -> Result<String, ReportError> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(ReportError::EmptyReference);
    }
    Ok(format!("/api/track_report/{}", reference))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub class: String,
    pub label: String,
}

impl StatusBadge {
    pub fn new(status: &str) -> Self {
        Self {
            class: format!("status-badge status-{}", status),
            label: status.to_uppercase(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfficerResponse {
    pub officer: String,
    pub action: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingView {
    pub reference: String,
    pub category: String,
    pub location: String,
    /// `YYYY-MM-DD`, or empty when the server sent no date
    pub submitted_on: String,
    pub status: StatusBadge,
    /// Present once an officer has responded
    pub response: Option<OfficerResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum TrackingOutcome {
    Found { view: TrackingView },
    NotFound,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl TrackingOutcome {
    /// Any failure, logical or network, reads as "not found"
    pub fn from_reply(reference: &str, reply: Result<TrackResponse, TransportError>) -> Self {
        let response = match reply {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "tracking lookup failed");
                return TrackingOutcome::NotFound;
            }
        };

        let report = match response.report {
            Some(report) if response.success => report,
            _ => return TrackingOutcome::NotFound,
        };

        let officer_response = non_empty(report.officer_name).map(|officer| OfficerResponse {
            officer,
            action: non_empty(report.action_taken).unwrap_or_else(|| "N/A".to_string()),
            notes: non_empty(report.notes).unwrap_or_else(|| "No additional notes".to_string()),
        });

        TrackingOutcome::Found {
            view: TrackingView {
                reference: non_empty(report.short_id)
                    .unwrap_or_else(|| reference.trim().to_string()),
                category: report.category,
                location: report.manual_location,
                submitted_on: report
                    .created_at
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                status: StatusBadge::new(&report.status),
                response: officer_response,
            },
        }
    }
}
