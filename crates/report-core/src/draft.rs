//! The in-progress report held by the form

use serde::Serialize;

use crate::attachment::StagedAttachment;
use crate::geo::{Coordinates, FALLBACK_COORDINATES};
use crate::language::{self, Language};

/// Category value that enables the free-text override
pub const OTHER_CATEGORY: &str = "Other";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftReport {
    pub category: String,
    pub custom_category: String,
    pub description: String,
    pub manual_location: String,
    pub constituency: String,
    pub coordinates: Coordinates,
    pub gps_was_captured: bool,
    pub attachment: Option<StagedAttachment>,
    pub detected_language: Language,
    #[serde(skip)]
    fallback: Coordinates,
}

impl Default for DraftReport {
    fn default() -> Self {
        Self::with_fallback(FALLBACK_COORDINATES)
    }
}

impl DraftReport {
    pub fn with_fallback(fallback: Coordinates) -> Self {
        Self {
            category: String::new(),
            custom_category: String::new(),
            description: String::new(),
            manual_location: String::new(),
            constituency: String::new(),
            coordinates: fallback,
            gps_was_captured: false,
            attachment: None,
            detected_language: Language::Undetermined,
            fallback,
        }
    }

    pub fn fallback(&self) -> Coordinates {
        self.fallback
    }

    /// Drop any captured fix
    pub fn revert_coordinates(&mut self) {
        self.coordinates = self.fallback;
        self.gps_was_captured = false;
    }

    /// Back to the state of a freshly loaded form
    pub fn reset(&mut self) {
        *self = Self::with_fallback(self.fallback);
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
        if !self.is_other_category() {
            self.custom_category.clear();
        }
    }

    pub fn is_other_category(&self) -> bool {
        self.category == OTHER_CATEGORY
    }

    /// Update the description and re-run detection
    pub fn set_description(&mut self, text: impl Into<String>) -> Language {
        self.description = text.into();
        self.detected_language = language::detect(&self.description);
        self.detected_language
    }

    /// The category sent to the server
    pub fn resolved_category(&self) -> String {
        let custom = self.custom_category.trim();
        if self.is_other_category() && !custom.is_empty() {
            custom.to_string()
        } else {
            self.category.clone()
        }
    }
}
