//! Incident-count risk tiers for the hotspot map

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    pub const ALL: [RiskTier; 4] = [
        RiskTier::Critical,
        RiskTier::High,
        RiskTier::Medium,
        RiskTier::Low,
    ];

    pub fn for_count(count: u32) -> Self {
        match count {
            10.. => RiskTier::Critical,
            5..=9 => RiskTier::High,
            3..=4 => RiskTier::Medium,
            _ => RiskTier::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Critical => "CRITICAL",
            RiskTier::High => "HIGH",
            RiskTier::Medium => "MEDIUM",
            RiskTier::Low => "LOW",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RiskTier::Critical => "#d32f2f",
            RiskTier::High => "#f57c00",
            RiskTier::Medium => "#fbc02d",
            RiskTier::Low => "#1976d2",
        }
    }

    /// Marker radius in pixels at the reference zoom
    pub fn radius(&self) -> u32 {
        match self {
            RiskTier::Critical => 18,
            RiskTier::High => 15,
            RiskTier::Medium => 12,
            RiskTier::Low => 10,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RiskTier::Critical => "Immediate attention required",
            RiskTier::High => "Frequent incidents",
            RiskTier::Medium => "Moderate activity",
            RiskTier::Low => "Low incident rate",
        }
    }

    /// Recover the tier from a marker's base radius
    pub fn from_radius(radius: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.radius() == radius)
    }

    /// Parse a filter value such as `"critical"` or `"HIGH"`
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.label().eq_ignore_ascii_case(name))
    }
}

/// Everything the map needs to draw one marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskLevel {
    pub tier: RiskTier,
    pub color: &'static str,
    pub radius: u32,
    pub description: &'static str,
}

impl From<RiskTier> for RiskLevel {
    fn from(tier: RiskTier) -> Self {
        Self {
            tier,
            color: tier.color(),
            radius: tier.radius(),
            description: tier.description(),
        }
    }
}

pub fn classify(count: u32) -> RiskLevel {
    RiskTier::for_count(count).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(classify(0).tier, RiskTier::Low);
        assert_eq!(classify(2).tier, RiskTier::Low);
        assert_eq!(classify(3).tier, RiskTier::Medium);
        assert_eq!(classify(5).tier, RiskTier::High);
        assert_eq!(classify(9).tier, RiskTier::High);
        assert_eq!(classify(10).tier, RiskTier::Critical);
    }

    #[test]
    fn test_critical_presentation() {
        let level = classify(42);
        assert_eq!(level.color, "#d32f2f");
        assert_eq!(level.radius, 18);
        assert_eq!(level.description, "Immediate attention required");
    }

    #[test]
    fn test_from_name() {
        assert_eq!(RiskTier::from_name("critical"), Some(RiskTier::Critical));
        assert_eq!(RiskTier::from_name("LOW"), Some(RiskTier::Low));
        assert_eq!(RiskTier::from_name("all"), None);
    }

    #[test]
    fn test_serialized_label() {
        assert_eq!(serde_json::to_string(&RiskTier::High).unwrap(), "\"HIGH\"");
    }

    proptest! {
        #[test]
        fn prop_classify_monotone(a in 0u32..1000, b in 0u32..1000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(classify(lo).tier <= classify(hi).tier);
        }

        #[test]
        fn prop_tier_recoverable_from_radius(count in any::<u32>()) {
            let level = classify(count);
            prop_assert_eq!(RiskTier::from_radius(level.radius), Some(level.tier));
        }
    }
}
