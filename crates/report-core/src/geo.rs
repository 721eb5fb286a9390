//! GPS capture for the report form
//!
//! A single capture walks `Idle -> Capturing -> {Success, Error, OutOfRegion}`.
//! Activating the trigger again after a success does not query the device:
//! it drops the captured fix and returns to `Idle` with the fallback
//! coordinates written back into the draft.

use serde::{Deserialize, Serialize};

use crate::draft::DraftReport;

pub use safety_types::Coordinates;

/// Nakuru town centre
pub const FALLBACK_COORDINATES: Coordinates = Coordinates::new(-0.3031, 36.0800);

/// Axis-aligned bounding box, bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl RegionBounds {
    /// Rough box around Kenya
    pub const KENYA: RegionBounds = RegionBounds {
        min_lat: -5.0,
        max_lat: 5.0,
        min_lon: 33.0,
        max_lon: 42.0,
    };

    /// Finite bounds with each minimum at or below its maximum
    pub fn is_well_formed(&self) -> bool {
        [self.min_lat, self.max_lat, self.min_lon, self.max_lon]
            .iter()
            .all(|v| v.is_finite())
            && self.min_lat <= self.max_lat
            && self.min_lon <= self.max_lon
    }

    pub fn contains(&self, point: Coordinates) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lon..=self.max_lon).contains(&point.lon)
    }
}

impl Default for RegionBounds {
    fn default() -> Self {
        Self::KENYA
    }
}

/// Options passed to the platform position request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout_ms: u32,
    pub maximum_age_ms: u32,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout_ms: 10_000,
            maximum_age_ms: 0,
        }
    }
}

/// A position fix reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy in metres
    pub accuracy: f64,
}

impl Position {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PositionErrorKind {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown,
}

impl PositionErrorKind {
    /// Map a W3C `GeolocationPositionError.code`
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => PositionErrorKind::PermissionDenied,
            2 => PositionErrorKind::PositionUnavailable,
            3 => PositionErrorKind::Timeout,
            _ => PositionErrorKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "kebab-case")]
pub enum CaptureFailure {
    /// The platform has no positioning capability
    Unsupported,
    Device(PositionErrorKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum GpsCaptureState {
    Idle,
    Capturing,
    Success { coordinates: Coordinates, accuracy: f64 },
    Error { failure: CaptureFailure },
    OutOfRegion { detected: Coordinates },
}

impl GpsCaptureState {
    /// The trigger stays disabled only while a request is outstanding
    pub fn trigger_enabled(&self) -> bool {
        !matches!(self, GpsCaptureState::Capturing)
    }

    pub fn trigger_label(&self) -> &'static str {
        match self {
            GpsCaptureState::Idle => "Capture GPS Location",
            GpsCaptureState::Capturing => "Capturing Location...",
            GpsCaptureState::Success { .. } => "Recapture GPS",
            GpsCaptureState::Error {
                failure: CaptureFailure::Unsupported,
            } => "Capture GPS Location",
            GpsCaptureState::Error { .. } | GpsCaptureState::OutOfRegion { .. } => {
                "Retry GPS Capture"
            }
        }
    }

    pub fn title(&self) -> Option<&'static str> {
        match self {
            GpsCaptureState::Idle => None,
            GpsCaptureState::Capturing => Some("Capturing GPS Location..."),
            GpsCaptureState::Success { .. } => Some("GPS Location Captured Successfully!"),
            GpsCaptureState::OutOfRegion { .. } => Some("Location Outside Kenya"),
            GpsCaptureState::Error { failure } => Some(match failure {
                CaptureFailure::Unsupported => "Geolocation Not Supported",
                CaptureFailure::Device(PositionErrorKind::PermissionDenied) => {
                    "Location Access Denied"
                }
                CaptureFailure::Device(PositionErrorKind::PositionUnavailable) => {
                    "Location Unavailable"
                }
                CaptureFailure::Device(PositionErrorKind::Timeout) => "Request Timeout",
                CaptureFailure::Device(PositionErrorKind::Unknown) => "GPS Capture Failed",
            }),
        }
    }

    pub fn message(&self) -> Option<String> {
        match self {
            GpsCaptureState::Idle => None,
            GpsCaptureState::Capturing => {
                Some("Please allow location access when prompted.".to_string())
            }
            GpsCaptureState::Success {
                coordinates,
                accuracy,
            } => Some(format!(
                "Latitude: {:.6}, Longitude: {:.6}, Accuracy: ±{} meters",
                coordinates.lat,
                coordinates.lon,
                accuracy.round()
            )),
            GpsCaptureState::OutOfRegion { detected } => Some(format!(
                "Detected: {:.6}, {:.6}. Using default Nakuru location for this report.",
                detected.lat, detected.lon
            )),
            GpsCaptureState::Error { failure } => Some(
                match failure {
                    CaptureFailure::Unsupported => {
                        "Your browser doesn't support GPS location. Using default Nakuru location."
                    }
                    CaptureFailure::Device(PositionErrorKind::PermissionDenied) => {
                        "Please enable location permissions in your browser settings."
                    }
                    CaptureFailure::Device(PositionErrorKind::PositionUnavailable) => {
                        "Your device cannot determine your location at this time."
                    }
                    CaptureFailure::Device(PositionErrorKind::Timeout) => {
                        "Location request took too long. Please try again."
                    }
                    CaptureFailure::Device(PositionErrorKind::Unknown) => {
                        "An unknown error occurred while capturing location."
                    }
                }
                .to_string(),
            ),
        }
    }
}

/// What the caller must do after activating the capture trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStart {
    /// A request is already outstanding
    Ignored,
    /// A previous fix was dropped; nothing to request
    ToggledOff,
    /// No positioning capability; the state is already `Error`
    Unsupported,
    /// Issue exactly one position request with these options
    Request(PositionOptions),
}

/// Host positioning capability
#[allow(async_fn_in_trait)]
pub trait PositionSource {
    fn is_supported(&self) -> bool;

    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Position, PositionErrorKind>;
}

#[derive(Debug, Clone)]
pub struct GeoCapture {
    state: GpsCaptureState,
    region: RegionBounds,
    options: PositionOptions,
}

impl GeoCapture {
    pub fn new(region: RegionBounds, options: PositionOptions) -> Self {
        Self {
            state: GpsCaptureState::Idle,
            region,
            options,
        }
    }

    pub fn state(&self) -> &GpsCaptureState {
        &self.state
    }

    /// Handle a trigger activation
    pub fn begin(&mut self, draft: &mut DraftReport, supported: bool) -> CaptureStart {
        if self.state == GpsCaptureState::Capturing {
            return CaptureStart::Ignored;
        }

        if draft.gps_was_captured {
            draft.revert_coordinates();
            self.state = GpsCaptureState::Idle;
            tracing::debug!("gps fix dropped, back to fallback coordinates");
            return CaptureStart::ToggledOff;
        }

        if !supported {
            self.state = GpsCaptureState::Error {
                failure: CaptureFailure::Unsupported,
            };
            tracing::warn!("geolocation not supported by host");
            return CaptureStart::Unsupported;
        }

        self.state = GpsCaptureState::Capturing;
        CaptureStart::Request(self.options)
    }

    /// Apply the single outcome of an outstanding request
    pub fn finish(
        &mut self,
        draft: &mut DraftReport,
        outcome: Result<Position, PositionErrorKind>,
    ) -> &GpsCaptureState {
        if self.state != GpsCaptureState::Capturing {
            tracing::warn!("position outcome arrived with no request outstanding");
            return &self.state;
        }

        self.state = match outcome {
            Ok(position) => {
                let coordinates = position.coordinates();
                if self.region.contains(coordinates) {
                    draft.coordinates = coordinates;
                    draft.gps_was_captured = true;
                    tracing::info!(
                        lat = coordinates.lat,
                        lon = coordinates.lon,
                        accuracy = position.accuracy,
                        "gps fix captured"
                    );
                    GpsCaptureState::Success {
                        coordinates,
                        accuracy: position.accuracy,
                    }
                } else {
                    draft.revert_coordinates();
                    tracing::warn!(
                        lat = coordinates.lat,
                        lon = coordinates.lon,
                        "gps fix outside region"
                    );
                    GpsCaptureState::OutOfRegion {
                        detected: coordinates,
                    }
                }
            }
            Err(kind) => {
                draft.revert_coordinates();
                tracing::warn!(?kind, "gps capture failed");
                GpsCaptureState::Error {
                    failure: CaptureFailure::Device(kind),
                }
            }
        };

        &self.state
    }

    /// Run a full activation against `source`
    pub async fn capture<S: PositionSource>(
        &mut self,
        draft: &mut DraftReport,
        source: &S,
    ) -> &GpsCaptureState {
        match self.begin(draft, source.is_supported()) {
            CaptureStart::Request(options) => {
                let outcome = source.current_position(&options).await;
                self.finish(draft, outcome)
            }
            _ => &self.state,
        }
    }

    /// Back to `Idle`; an outstanding request keeps `Capturing` until it answers
    pub fn reset(&mut self) {
        if self.state != GpsCaptureState::Capturing {
            self.state = GpsCaptureState::Idle;
        }
    }
}

impl Default for GeoCapture {
    fn default() -> Self {
        Self::new(RegionBounds::KENYA, PositionOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakeDevice {
        supported: bool,
        reply: Result<Position, PositionErrorKind>,
        queries: Cell<u32>,
    }

    impl FakeDevice {
        fn at(lat: f64, lon: f64) -> Self {
            Self {
                supported: true,
                reply: Ok(Position {
                    latitude: lat,
                    longitude: lon,
                    accuracy: 12.4,
                }),
                queries: Cell::new(0),
            }
        }

        fn failing(kind: PositionErrorKind) -> Self {
            Self {
                supported: true,
                reply: Err(kind),
                queries: Cell::new(0),
            }
        }
    }

    impl PositionSource for FakeDevice {
        fn is_supported(&self) -> bool {
            self.supported
        }

        async fn current_position(
            &self,
            options: &PositionOptions,
        ) -> Result<Position, PositionErrorKind> {
            assert_eq!(*options, PositionOptions::default());
            self.queries.set(self.queries.get() + 1);
            self.reply
        }
    }

    #[test]
    fn test_region_bounds_inclusive() {
        let kenya = RegionBounds::KENYA;
        assert!(kenya.contains(Coordinates::new(-5.0, 33.0)));
        assert!(kenya.contains(Coordinates::new(5.0, 42.0)));
        assert!(!kenya.contains(Coordinates::new(5.0001, 40.0)));
        assert!(!kenya.contains(Coordinates::new(0.0, 32.9)));
    }

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(PositionErrorKind::from_code(1), PositionErrorKind::PermissionDenied);
        assert_eq!(PositionErrorKind::from_code(2), PositionErrorKind::PositionUnavailable);
        assert_eq!(PositionErrorKind::from_code(3), PositionErrorKind::Timeout);
        assert_eq!(PositionErrorKind::from_code(0), PositionErrorKind::Unknown);
        assert_eq!(PositionErrorKind::from_code(99), PositionErrorKind::Unknown);
    }

    #[tokio::test]
    async fn test_capture_inside_region() {
        let mut geo = GeoCapture::default();
        let mut draft = DraftReport::default();
        let device = FakeDevice::at(1.0, 40.0);

        let state = *geo.capture(&mut draft, &device).await;

        assert!(matches!(state, GpsCaptureState::Success { .. }));
        assert_eq!(draft.coordinates, Coordinates::new(1.0, 40.0));
        assert!(draft.gps_was_captured);
        assert_eq!(state.trigger_label(), "Recapture GPS");
    }

    #[tokio::test]
    async fn test_capture_outside_region_keeps_fallback() {
        let mut geo = GeoCapture::default();
        let mut draft = DraftReport::default();
        let device = FakeDevice::at(10.0, 40.0);

        let state = *geo.capture(&mut draft, &device).await;

        assert!(matches!(state, GpsCaptureState::OutOfRegion { .. }));
        assert_eq!(draft.coordinates, FALLBACK_COORDINATES);
        assert!(!draft.gps_was_captured);
        assert!(state.trigger_enabled());
        assert_eq!(state.trigger_label(), "Retry GPS Capture");
    }

    #[tokio::test]
    async fn test_second_activation_toggles_off_without_query() {
        let mut geo = GeoCapture::default();
        let mut draft = DraftReport::default();
        let device = FakeDevice::at(-0.29, 36.06);

        geo.capture(&mut draft, &device).await;
        assert_eq!(device.queries.get(), 1);

        let state = *geo.capture(&mut draft, &device).await;

        assert_eq!(state, GpsCaptureState::Idle);
        assert_eq!(device.queries.get(), 1);
        assert_eq!(draft.coordinates, FALLBACK_COORDINATES);
        assert!(!draft.gps_was_captured);
    }

    #[tokio::test]
    async fn test_device_errors_keep_fallback_and_allow_retry() {
        for kind in [
            PositionErrorKind::PermissionDenied,
            PositionErrorKind::PositionUnavailable,
            PositionErrorKind::Timeout,
            PositionErrorKind::Unknown,
        ] {
            let mut geo = GeoCapture::default();
            let mut draft = DraftReport::default();

            let state = *geo.capture(&mut draft, &FakeDevice::failing(kind)).await;

            assert_eq!(
                state,
                GpsCaptureState::Error {
                    failure: CaptureFailure::Device(kind)
                }
            );
            assert_eq!(draft.coordinates, FALLBACK_COORDINATES);
            assert!(state.trigger_enabled());
            assert!(state.message().is_some());
        }
    }

    #[tokio::test]
    async fn test_unsupported_host() {
        let mut geo = GeoCapture::default();
        let mut draft = DraftReport::default();
        let mut device = FakeDevice::at(0.0, 36.0);
        device.supported = false;

        let state = *geo.capture(&mut draft, &device).await;

        assert_eq!(
            state,
            GpsCaptureState::Error {
                failure: CaptureFailure::Unsupported
            }
        );
        assert_eq!(device.queries.get(), 0);
        assert_eq!(state.title(), Some("Geolocation Not Supported"));
    }

    #[test]
    fn test_reentrant_activation_ignored() {
        let mut geo = GeoCapture::default();
        let mut draft = DraftReport::default();

        assert!(matches!(geo.begin(&mut draft, true), CaptureStart::Request(_)));
        assert!(!geo.state().trigger_enabled());
        assert_eq!(geo.begin(&mut draft, true), CaptureStart::Ignored);
        assert_eq!(*geo.state(), GpsCaptureState::Capturing);
    }

    #[test]
    fn test_stale_outcome_ignored() {
        let mut geo = GeoCapture::default();
        let mut draft = DraftReport::default();
        let outcome = Ok(Position {
            latitude: 1.0,
            longitude: 40.0,
            accuracy: 5.0,
        });

        assert_eq!(*geo.finish(&mut draft, outcome), GpsCaptureState::Idle);
        assert!(!draft.gps_was_captured);
    }

    #[test]
    fn test_success_message_rounds_accuracy() {
        let state = GpsCaptureState::Success {
            coordinates: Coordinates::new(-0.2833, 36.0667),
            accuracy: 12.6,
        };
        assert_eq!(
            state.message().unwrap(),
            "Latitude: -0.283300, Longitude: 36.066700, Accuracy: ±13 meters"
        );
    }
}
