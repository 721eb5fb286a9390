//! One report form, from page load to submission

use crate::attachment::{AttachmentValidator, SelectedFile, StagedAttachment};
use crate::config::IntakeConfig;
use crate::draft::DraftReport;
use crate::error::{ReportError, TransportError};
use crate::geo::{CaptureStart, GeoCapture, GpsCaptureState, Position, PositionErrorKind, PositionSource};
use crate::language::Language;
use crate::submission::{ReportForm, ReportTransport, SubmissionCoordinator, SubmissionResult};
use crate::transport::Reply;
use safety_types::ReportResponse;

/// Owns the draft and every controller acting on it
#[derive(Debug, Clone)]
pub struct IntakeSession {
    config: IntakeConfig,
    draft: DraftReport,
    geo: GeoCapture,
    attachments: AttachmentValidator,
    submission: SubmissionCoordinator,
}

impl Default for IntakeSession {
    fn default() -> Self {
        Self::new(IntakeConfig::default())
    }
}

impl IntakeSession {
    pub fn new(config: IntakeConfig) -> Self {
        Self {
            draft: DraftReport::with_fallback(config.fallback),
            geo: GeoCapture::new(config.region, config.geolocation),
            attachments: AttachmentValidator::new(config.max_attachment_bytes),
            submission: SubmissionCoordinator::new(),
            config,
        }
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    pub fn draft(&self) -> &DraftReport {
        &self.draft
    }

    pub fn gps_state(&self) -> &GpsCaptureState {
        self.geo.state()
    }

    pub fn is_submitting(&self) -> bool {
        self.submission.is_in_flight()
    }

    pub fn last_report_id(&self) -> Option<&str> {
        self.submission.last_report_id()
    }

    pub fn set_description(&mut self, text: impl Into<String>) -> Language {
        self.draft.set_description(text)
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.draft.set_category(category);
    }

    pub fn set_custom_category(&mut self, text: impl Into<String>) {
        self.draft.custom_category = text.into();
    }

    pub fn set_manual_location(&mut self, text: impl Into<String>) {
        self.draft.manual_location = text.into();
    }

    pub fn set_constituency(&mut self, text: impl Into<String>) {
        self.draft.constituency = text.into();
    }

    pub fn select_attachment(&mut self, file: SelectedFile) -> Result<StagedAttachment, ReportError> {
        self.attachments.select(&mut self.draft, file)
    }

    pub fn remove_attachment(&mut self) {
        self.attachments.remove(&mut self.draft);
    }

    pub fn begin_capture(&mut self, supported: bool) -> CaptureStart {
        self.geo.begin(&mut self.draft, supported)
    }

    pub fn finish_capture(
        &mut self,
        outcome: Result<Position, PositionErrorKind>,
    ) -> &GpsCaptureState {
        self.geo.finish(&mut self.draft, outcome)
    }

    pub async fn capture<S: PositionSource>(&mut self, source: &S) -> &GpsCaptureState {
        self.geo.capture(&mut self.draft, source).await
    }

    pub fn begin_submit(&mut self) -> Result<ReportForm, ReportError> {
        self.submission.begin(&self.draft)
    }

    pub fn finish_submit(
        &mut self,
        outcome: Result<Reply<ReportResponse>, TransportError>,
    ) -> SubmissionResult {
        let result = self.submission.finish(&mut self.draft, outcome);
        if matches!(result, SubmissionResult::Submitted { .. }) {
            self.geo.reset();
        }
        result
    }

    pub async fn submit<T: ReportTransport>(
        &mut self,
        transport: &T,
    ) -> Result<SubmissionResult, ReportError> {
        let form = self.begin_submit()?;
        let outcome = transport.submit_report(&form).await;
        Ok(self.finish_submit(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{Coordinates, FALLBACK_COORDINATES};

    #[test]
    fn test_session_uses_configured_fallback() {
        let config = IntakeConfig {
            fallback: Coordinates::new(-1.2921, 36.8219),
            ..Default::default()
        };
        let session = IntakeSession::new(config);
        assert_eq!(session.draft().coordinates, Coordinates::new(-1.2921, 36.8219));
    }

    #[test]
    fn test_successful_submit_returns_gps_to_idle() {
        let mut session = IntakeSession::default();
        session.begin_capture(true);
        session.finish_capture(Ok(Position {
            latitude: -0.29,
            longitude: 36.06,
            accuracy: 8.0,
        }));
        assert!(matches!(session.gps_state(), GpsCaptureState::Success { .. }));

        session.begin_submit().unwrap();
        session.finish_submit(Ok(Reply::Json(ReportResponse {
            success: true,
            report_id: Some("r1".to_string()),
            ..Default::default()
        })));

        assert_eq!(*session.gps_state(), GpsCaptureState::Idle);
        assert_eq!(session.draft().coordinates, FALLBACK_COORDINATES);
        assert_eq!(session.last_report_id(), Some("r1"));
    }

    #[test]
    fn test_submit_during_capture_keeps_request_outstanding() {
        let mut session = IntakeSession::default();
        assert!(matches!(session.begin_capture(true), CaptureStart::Request(_)));

        session.begin_submit().unwrap();
        session.finish_submit(Ok(Reply::Json(ReportResponse {
            success: true,
            report_id: Some("r2".to_string()),
            ..Default::default()
        })));

        assert_eq!(*session.gps_state(), GpsCaptureState::Capturing);
        assert_eq!(session.begin_capture(true), CaptureStart::Ignored);

        session.finish_capture(Ok(Position {
            latitude: -0.29,
            longitude: 36.06,
            accuracy: 8.0,
        }));
        assert!(matches!(session.gps_state(), GpsCaptureState::Success { .. }));
        assert!(session.draft().gps_was_captured);
        assert_eq!(session.begin_capture(true), CaptureStart::ToggledOff);
    }

    #[test]
    fn test_failed_submit_keeps_gps_fix() {
        let mut session = IntakeSession::default();
        session.begin_capture(true);
        session.finish_capture(Ok(Position {
            latitude: -0.29,
            longitude: 36.06,
            accuracy: 8.0,
        }));
        session.begin_submit().unwrap();
        session.finish_submit(Err(TransportError("offline".to_string())));

        assert!(session.draft().gps_was_captured);
        assert!(matches!(session.gps_state(), GpsCaptureState::Success { .. }));
        assert!(!session.is_submitting());
    }
}
