//! Hotspot map analysis
//!
//! Pure helpers over the server's hotspot feed: marker presentation, pattern
//! insights, filtering and search. Rendering stays in the browser adapter.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::risk::{classify, RiskLevel, RiskTier};
use safety_types::HotspotAggregate;

/// Zoom level at which markers use their base radius
pub const REFERENCE_ZOOM: f64 = 13.0;
pub const MIN_MARKER_RADIUS: f64 = 5.0;
/// Zoom used when centring on a search hit
pub const SEARCH_ZOOM: u8 = 15;
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Marker data handed to the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotspotMarker {
    pub location: String,
    pub lat: f64,
    pub lon: f64,
    pub incident_count: u32,
    pub risk: RiskLevel,
    pub last_incident: String,
}

impl From<&HotspotAggregate> for HotspotMarker {
    fn from(hotspot: &HotspotAggregate) -> Self {
        Self {
            location: hotspot.location.clone(),
            lat: hotspot.lat,
            lon: hotspot.lon,
            incident_count: hotspot.incident_count,
            risk: classify(hotspot.incident_count),
            last_incident: format_date(hotspot.last_incident),
        }
    }
}

pub fn markers(hotspots: &[HotspotAggregate]) -> Vec<HotspotMarker> {
    hotspots.iter().map(HotspotMarker::from).collect()
}

/// Popup date, e.g. `Jan 5, 2025`
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(d) => d.format("%b %-d, %Y").to_string(),
        None => "N/A".to_string(),
    }
}

/// Cluster icon edge length in pixels
pub fn cluster_icon_size(child_count: usize) -> u32 {
    if child_count > 20 {
        60
    } else if child_count > 10 {
        50
    } else {
        40
    }
}

pub fn zoom_radius(base_radius: f64, zoom: f64) -> f64 {
    (base_radius * zoom / REFERENCE_ZOOM).max(MIN_MARKER_RADIUS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskFilter {
    All,
    Only(RiskTier),
}

impl RiskFilter {
    /// Parse the filter control value; unknown values show everything
    pub fn parse(value: &str) -> Self {
        RiskTier::from_name(value)
            .map(RiskFilter::Only)
            .unwrap_or(RiskFilter::All)
    }

    /// Whether a marker with this base radius stays visible
    pub fn shows_radius(&self, radius: f64) -> bool {
        match self {
            RiskFilter::All => true,
            RiskFilter::Only(tier) => tier_for_radius(radius) == *tier,
        }
    }

    pub fn shows(&self, hotspot: &HotspotAggregate) -> bool {
        self.shows_radius(classify(hotspot.incident_count).radius as f64)
    }
}

fn tier_for_radius(radius: f64) -> RiskTier {
    if radius >= 18.0 {
        RiskTier::Critical
    } else if radius >= 15.0 {
        RiskTier::High
    } else if radius >= 12.0 {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

/// First hotspot whose location contains `term`, ignoring case
pub fn search<'a>(hotspots: &'a [HotspotAggregate], term: &str) -> Option<&'a HotspotAggregate> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    hotspots
        .iter()
        .find(|h| h.location.to_lowercase().contains(&needle))
}

pub fn not_found_message(term: &str) -> String {
    format!("Location \"{}\" not found on map", term)
}

/// South-west and north-east corners enclosing every hotspot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

pub fn bounds(hotspots: &[HotspotAggregate]) -> Option<MapBounds> {
    let first = hotspots.first()?;
    let init = MapBounds {
        south: first.lat,
        west: first.lon,
        north: first.lat,
        east: first.lon,
    };
    Some(hotspots.iter().skip(1).fold(init, |b, h| MapBounds {
        south: b.south.min(h.lat),
        west: b.west.min(h.lon),
        north: b.north.max(h.lat),
        east: b.east.max(h.lon),
    }))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Insight {
    HighestRisk { location: String, incident_count: u32 },
    Average { per_location: f64 },
    CriticalZones { count: usize },
    HighRiskAreas { count: usize },
    RecentActivity { locations: usize },
    Concentration { percent: u32 },
}

impl Insight {
    pub fn text(&self) -> String {
        match self {
            Insight::HighestRisk {
                location,
                incident_count,
            } => format!("Highest Risk: {} ({} incidents)", location, incident_count),
            Insight::Average { per_location } => {
                format!("Average: {:.1} incidents per location", per_location)
            }
            Insight::CriticalZones { count } => format!("{} critical risk zones identified", count),
            Insight::HighRiskAreas { count } => format!("{} high risk areas detected", count),
            Insight::RecentActivity { locations } => format!(
                "{} locations with incidents in last {} days",
                locations, RECENT_WINDOW_DAYS
            ),
            Insight::Concentration { percent } => {
                format!("{}% of incidents in top 3 locations", percent)
            }
        }
    }
}

/// Pattern insights for the map sidebar; an empty feed yields none
pub fn analyze_patterns(hotspots: &[HotspotAggregate], now: DateTime<Utc>) -> Vec<Insight> {
    if hotspots.is_empty() {
        return Vec::new();
    }

    let mut insights = Vec::new();
    let tier_count = |tier: RiskTier| {
        hotspots
            .iter()
            .filter(|h| RiskTier::for_count(h.incident_count) == tier)
            .count()
    };

    if let Some(top) = hotspots
        .iter()
        .filter(|h| RiskTier::for_count(h.incident_count) == RiskTier::Critical)
        .rev()
        .max_by_key(|h| h.incident_count)
    {
        insights.push(Insight::HighestRisk {
            location: top.location.clone(),
            incident_count: top.incident_count,
        });
    }

    let total: u64 = hotspots.iter().map(|h| u64::from(h.incident_count)).sum();
    insights.push(Insight::Average {
        per_location: total as f64 / hotspots.len() as f64,
    });

    let critical = tier_count(RiskTier::Critical);
    if critical > 0 {
        insights.push(Insight::CriticalZones { count: critical });
    }
    let high = tier_count(RiskTier::High);
    if high > 0 {
        insights.push(Insight::HighRiskAreas { count: high });
    }

    let window = Duration::days(RECENT_WINDOW_DAYS);
    let recent = hotspots
        .iter()
        .filter_map(|h| h.last_incident)
        .filter(|last| now - *last <= window)
        .count();
    if recent > 0 {
        insights.push(Insight::RecentActivity { locations: recent });
    }

    if total > 0 {
        let mut counts: Vec<u32> = hotspots.iter().map(|h| h.incident_count).collect();
        counts.sort_unstable_by(|a, b| b.cmp(a));
        let top3: u64 = counts.iter().take(3).map(|c| u64::from(*c)).sum();
        insights.push(Insight::Concentration {
            percent: (top3 as f64 / total as f64 * 100.0).round() as u32,
        });
    }

    insights
}
