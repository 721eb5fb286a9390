//! Report submission
//!
//! One submission may be outstanding per form. The coordinator snapshots the
//! draft into a [`ReportForm`] on `begin`, and applies the single outcome on
//! `finish`. A successful submission resets the draft; every failure leaves
//! it untouched so the user can resubmit.

use safety_types::ReportResponse;
use serde::{Deserialize, Serialize};

use crate::attachment::StagedAttachment;
use crate::draft::DraftReport;
use crate::error::{ReportError, TransportError};
use crate::transport::Reply;

pub const SUBMIT_FAILED: &str = "Failed to submit report";
pub const SUBMIT_NETWORK_ERROR: &str =
    "An error occurred while submitting your report. Please try again.";

/// Multi-part payload for `POST /report`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportForm {
    pub category: String,
    pub custom_category: String,
    pub description: String,
    pub manual_location: String,
    pub constituency: String,
    pub lat: f64,
    pub lon: f64,
    pub gps_was_captured: bool,
    pub media: Option<StagedAttachment>,
}

impl ReportForm {
    pub fn from_draft(draft: &DraftReport) -> Self {
        Self {
            category: draft.resolved_category(),
            custom_category: draft.custom_category.trim().to_string(),
            description: draft.description.clone(),
            manual_location: draft.manual_location.clone(),
            constituency: draft.constituency.clone(),
            lat: draft.coordinates.lat,
            lon: draft.coordinates.lon,
            gps_was_captured: draft.gps_was_captured,
            media: draft.attachment.clone(),
        }
    }

    /// Text parts in wire order; the `media` part is appended by the transport
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("category", self.category.clone()),
            ("customCategory", self.custom_category.clone()),
            ("description", self.description.clone()),
            ("manual_location", self.manual_location.clone()),
            ("constituency", self.constituency.clone()),
            ("lat", self.lat.to_string()),
            ("lon", self.lon.to_string()),
            ("gpsWasCaptured", self.gps_was_captured.to_string()),
        ]
    }
}

#[allow(async_fn_in_trait)]
pub trait ReportTransport {
    async fn submit_report(
        &self,
        form: &ReportForm,
    ) -> Result<Reply<ReportResponse>, TransportError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum SubmissionResult {
    Submitted {
        report_id: Option<String>,
        message: Option<String>,
    },
    /// Navigation takes over; nothing else to do
    Redirected { url: String },
    Failed { message: String },
}

impl SubmissionResult {
    pub fn is_success(&self) -> bool {
        !matches!(self, SubmissionResult::Failed { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionCoordinator {
    in_flight: bool,
    last_report_id: Option<String>,
}

impl SubmissionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn last_report_id(&self) -> Option<&str> {
        self.last_report_id.as_deref()
    }

    /// Snapshot the draft and mark a submission outstanding
    pub fn begin(&mut self, draft: &DraftReport) -> Result<ReportForm, ReportError> {
        if self.in_flight {
            return Err(ReportError::SubmissionInFlight);
        }
        self.in_flight = true;
        Ok(ReportForm::from_draft(draft))
    }

    /// Apply the outcome of the outstanding submission
    pub fn finish(
        &mut self,
        draft: &mut DraftReport,
        outcome: Result<Reply<ReportResponse>, TransportError>,
    ) -> SubmissionResult {
        self.in_flight = false;

        match outcome {
            Ok(Reply::Redirected { url }) => {
                tracing::info!(%url, "report submission redirected");
                SubmissionResult::Redirected { url }
            }
            Ok(Reply::Json(body)) if body.success => {
                tracing::info!(
                    report_id = body.report_id.as_deref().unwrap_or("-"),
                    gps_captured = ?body.gps_captured,
                    file_uploaded = ?body.file_uploaded,
                    "report submitted"
                );
                draft.reset();
                self.last_report_id = body.report_id.clone();
                SubmissionResult::Submitted {
                    report_id: body.report_id,
                    message: body.message,
                }
            }
            Ok(Reply::Json(body)) => {
                let message = body
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| SUBMIT_FAILED.to_string());
                tracing::warn!(%message, "report rejected by server");
                SubmissionResult::Failed { message }
            }
            Err(e) => {
                tracing::error!(error = %e, "report submission failed");
                SubmissionResult::Failed {
                    message: SUBMIT_NETWORK_ERROR.to_string(),
                }
            }
        }
    }

    pub async fn submit<T: ReportTransport>(
        &mut self,
        draft: &mut DraftReport,
        transport: &T,
    ) -> Result<SubmissionResult, ReportError> {
        let form = self.begin(draft)?;
        let outcome = transport.submit_report(&form).await;
        Ok(self.finish(draft, outcome))
    }
}
