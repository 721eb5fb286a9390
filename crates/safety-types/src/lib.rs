pub mod hotspot;
pub mod responses;
pub mod timestamp;
pub mod types;

pub use hotspot::HotspotAggregate;
pub use responses::{
    ActionResponse, ReportResponse, StatisticsResponse, TrackResponse, TrackedReport,
    TranslatedFields, TranslationResponse,
};
pub use types::{Coordinates, Language};
