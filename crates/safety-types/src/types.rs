#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Language of a free-text description as shown on the report form badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Kiswahili,
    #[default]
    Undetermined,
}

impl Language {
    /// Badge text for the report form
    pub fn badge_label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Kiswahili => "Kiswahili",
            Language::Undetermined => "Auto-detecting...",
        }
    }

    /// Badge CSS class for the report form
    pub fn badge_class(&self) -> &'static str {
        match self {
            Language::English => "badge bg-primary",
            Language::Kiswahili => "badge bg-success",
            Language::Undetermined => "badge bg-secondary",
        }
    }
}
