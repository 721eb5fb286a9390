//! Client-side logic of the citizen safety reporting platform
//!
//! Everything here is UI-free: the browser adapter feeds DOM events,
//! geolocation results and fetch replies into these controllers and renders
//! the values they return.
//!
//! - [`language`] detects Kiswahili vs English descriptions
//! - [`geo`] drives the GPS capture state machine
//! - [`attachment`] validates and previews evidence files
//! - [`submission`] and [`session`] own the report form lifecycle
//! - [`risk`] and [`hotspots`] back the hotspot map
//! - [`police`], [`translation`], [`stations`] and [`tracking`] back the
//!   dashboards and the tracking page

pub mod attachment;
pub mod config;
pub mod draft;
pub mod error;
pub mod geo;
pub mod hotspots;
pub mod language;
pub mod notice;
pub mod police;
pub mod receipt;
pub mod retry;
pub mod risk;
pub mod session;
pub mod stations;
pub mod submission;
pub mod tracking;
pub mod translation;
pub mod transport;

pub use attachment::{AttachmentValidator, PreviewKind, SelectedFile, StagedAttachment, MAX_ATTACHMENT_BYTES};
pub use config::IntakeConfig;
pub use draft::{DraftReport, OTHER_CATEGORY};
pub use error::{ReportError, TransportError};
pub use geo::{
    CaptureFailure, CaptureStart, GeoCapture, GpsCaptureState, Position, PositionErrorKind,
    PositionOptions, PositionSource, RegionBounds, FALLBACK_COORDINATES,
};
pub use language::{detect, Language};
pub use notice::{Notice, NoticeLevel};
pub use retry::{RetryExhausted, RetryPolicy};
pub use risk::{classify, RiskLevel, RiskTier};
pub use session::IntakeSession;
pub use submission::{ReportForm, ReportTransport, SubmissionCoordinator, SubmissionResult};
pub use translation::{TargetLanguage, TranslationDesk, TranslationOutcome, TranslationSource};
pub use transport::Reply;

pub use safety_types::{Coordinates, HotspotAggregate};
