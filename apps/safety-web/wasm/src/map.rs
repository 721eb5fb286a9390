//! Hotspot map bindings
//!
//! The page owns the Leaflet map. This module holds the feed and answers the
//! questions the map asks: how to draw each marker, what to show in the
//! insights panel, which markers survive a filter, and where a search lands.

use report_core::hotspots::{self, RiskFilter, SEARCH_ZOOM};
use report_core::{classify, HotspotAggregate};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::browser;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub location: String,
    pub lat: f64,
    pub lon: f64,
    pub zoom: u8,
    pub index: usize,
}

#[wasm_bindgen]
pub struct HotspotMap {
    feed: Vec<HotspotAggregate>,
}

impl HotspotMap {
    fn from_json_internal(feed_json: &str) -> Result<Self, String> {
        let feed = HotspotAggregate::parse_feed(feed_json)
            .map_err(|e| format!("Invalid hotspot feed: {}", e))?;
        Ok(Self { feed })
    }

    fn insights_internal(&self) -> Vec<String> {
        hotspots::analyze_patterns(&self.feed, browser::now_utc())
            .iter()
            .map(|insight| insight.text())
            .collect()
    }

    fn search_internal(&self, term: &str) -> Result<SearchHit, String> {
        let hit = hotspots::search(&self.feed, term)
            .ok_or_else(|| hotspots::not_found_message(term))?;
        let index = self
            .feed
            .iter()
            .position(|h| std::ptr::eq(h, hit))
            .unwrap_or_default();
        Ok(SearchHit {
            location: hit.location.clone(),
            lat: hit.lat,
            lon: hit.lon,
            zoom: SEARCH_ZOOM,
            index,
        })
    }

    fn visible_internal(&self, level: &str) -> Vec<bool> {
        let filter = RiskFilter::parse(level);
        self.feed.iter().map(|h| filter.shows(h)).collect()
    }
}

#[wasm_bindgen]
impl HotspotMap {
    /// Load the JSON feed embedded in the page
    #[wasm_bindgen(constructor)]
    pub fn new(feed_json: &str) -> Result<HotspotMap, JsValue> {
        let map = Self::from_json_internal(feed_json).map_err(|e| JsValue::from_str(&e))?;
        browser::log(&format!("Loaded {} hotspots", map.feed.len()));
        Ok(map)
    }

    #[wasm_bindgen(getter)]
    pub fn count(&self) -> usize {
        self.feed.len()
    }

    /// Marker descriptors in feed order
    pub fn markers(&self) -> Result<JsValue, JsValue> {
        browser::to_js(&hotspots::markers(&self.feed))
    }

    /// Bounds to auto-fit, or `undefined` for an empty feed
    pub fn bounds(&self) -> Result<JsValue, JsValue> {
        match hotspots::bounds(&self.feed) {
            Some(bounds) => browser::to_js(&bounds),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Insight sentences for the patterns panel
    pub fn insights(&self) -> Result<JsValue, JsValue> {
        browser::to_js(&self.insights_internal())
    }

    /// Visibility per marker for a filter value (`all`, `critical`, ...)
    pub fn visible(&self, level: &str) -> Result<JsValue, JsValue> {
        browser::to_js(&self.visible_internal(level))
    }

    /// Locate a hotspot by name; rejects with the not-found message
    pub fn search(&self, term: &str) -> Result<JsValue, JsValue> {
        let hit = self.search_internal(term).map_err(|e| JsValue::from_str(&e))?;
        browser::to_js(&hit)
    }
}

/// Marker style for an incident count
#[wasm_bindgen(js_name = riskLevel)]
pub fn risk_level(count: u32) -> Result<JsValue, JsValue> {
    browser::to_js(&classify(count))
}

#[wasm_bindgen(js_name = clusterIconSize)]
pub fn cluster_icon_size(child_count: usize) -> u32 {
    hotspots::cluster_icon_size(child_count)
}

#[wasm_bindgen(js_name = zoomRadius)]
pub fn zoom_radius(base_radius: f64, zoom: f64) -> f64 {
    hotspots::zoom_radius(base_radius, zoom)
}

/// Whether a marker with this base radius passes a filter
#[wasm_bindgen(js_name = radiusVisible)]
pub fn radius_visible(level: &str, radius: f64) -> bool {
    RiskFilter::parse(level).shows_radius(radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FEED: &str = r#"[
        {"location":"Nakuru CBD","lat":-0.28,"lon":36.07,"incident_count":12,"last_incident":"2025-01-04T09:00:00"},
        {"location":"Lanet","lat":-0.30,"lon":36.14,"incident_count":2,"last_incident":null}
    ]"#;

    #[test]
    fn test_search_reports_index() {
        let map = HotspotMap::from_json_internal(FEED).unwrap();
        let hit = map.search_internal("lanet").unwrap();
        assert_eq!(hit.index, 1);
        assert_eq!(hit.zoom, 15);
        assert_eq!(
            map.search_internal("Eldoret").unwrap_err(),
            "Location \"Eldoret\" not found on map"
        );
    }

    #[test]
    fn test_visible_by_level() {
        let map = HotspotMap::from_json_internal(FEED).unwrap();
        assert_eq!(map.visible_internal("critical"), vec![true, false]);
        assert_eq!(map.visible_internal("all"), vec![true, true]);
    }

    #[test]
    fn test_bad_feed_rejected() {
        assert!(HotspotMap::from_json_internal("{").is_err());
    }

    proptest! {
        #[test]
        fn prop_own_tier_filter_shows_marker(count in 0u32..500) {
            let level = classify(count);
            prop_assert!(radius_visible("all", level.radius as f64));
            prop_assert!(radius_visible(&level.tier.label().to_lowercase(), level.radius as f64));
        }
    }
}
