use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Incident aggregate for one location, supplied wholesale by the hotspot feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotAggregate {
    pub location: String,
    pub lat: f64,
    pub lon: f64,
    pub incident_count: u32,
    #[serde(default, deserialize_with = "crate::timestamp::deserialize_option")]
    pub last_incident: Option<DateTime<Utc>>,
}

impl HotspotAggregate {
    /// Parse the JSON array embedded in the map page
    pub fn parse_feed(json: &str) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_feed_tolerates_missing_and_null_dates() {
        let json = r#"[
            {"location":"Nakuru Town","lat":-0.28,"lon":36.07,"incident_count":12,"last_incident":"2025-01-04T09:00:00"},
            {"location":"Lanet","lat":-0.30,"lon":36.14,"incident_count":2,"last_incident":null},
            {"location":"Njoro","lat":-0.33,"lon":35.94,"incident_count":4}
        ]"#;

        let feed = HotspotAggregate::parse_feed(json).unwrap();
        assert_eq!(feed.len(), 3);
        assert_eq!(feed[0].incident_count, 12);
        assert!(feed[0].last_incident.is_some());
        assert_eq!(feed[1].last_incident, None);
        assert_eq!(feed[2].last_incident, None);
    }

    #[test]
    fn test_parse_feed_rejects_negative_counts() {
        let json = r#"[{"location":"X","lat":0.0,"lon":36.0,"incident_count":-1}]"#;
        assert!(HotspotAggregate::parse_feed(json).is_err());
    }
}
