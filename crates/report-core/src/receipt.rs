//! Downloadable plain-text confirmation for a submitted report

use chrono::{Datelike, NaiveDateTime};

use crate::error::ReportError;

pub const RECEIPT_SAVED: &str = "Report ID downloaded successfully! Please keep this file safe.";
pub const NO_REPORT_ID: &str = "No report ID available";

const RULE: &str = "=========================================";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub filename: String,
    pub body: String,
}

impl Receipt {
    /// `generated_at` is local wall-clock time
    pub fn new(report_id: &str, generated_at: NaiveDateTime) -> Result<Self, ReportError> {
        let report_id = report_id.trim();
        if report_id.is_empty() {
            return Err(ReportError::EmptyReference);
        }

        let body = [
            "NAKURU CITIZEN SAFETY REPORTING PLATFORM".to_string(),
            RULE.to_string(),
            String::new(),
            "REPORT CONFIRMATION".to_string(),
            "-------------------".to_string(),
            String::new(),
            format!("Report ID: {}", report_id),
            String::new(),
            format!("Date: {}", generated_at.format("%-m/%-d/%Y, %-I:%M:%S %p")),
            String::new(),
            "IMPORTANT INFORMATION:".to_string(),
            "- Keep this Report ID safe".to_string(),
            "- Use this ID to track your report status".to_string(),
            "- Visit the platform and use \"Track Report\" feature".to_string(),
            "- Contact: 0725646760 for emergencies".to_string(),
            String::new(),
            "Thank you for helping keep Nakuru safe!".to_string(),
            String::new(),
            RULE.to_string(),
            format!("© {} Citizen Safety Reporting Platform", generated_at.year()),
        ]
        .join("\n");

        Ok(Self {
            filename: format!("Report_ID_{}.txt", report_id),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 4)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap()
    }

    #[test]
    fn test_receipt_contents() {
        let receipt = Receipt::new("a1b2c3d4", at()).unwrap();
        assert_eq!(receipt.filename, "Report_ID_a1b2c3d4.txt");
        assert!(receipt.body.starts_with("NAKURU CITIZEN SAFETY REPORTING PLATFORM\n"));
        assert!(receipt.body.contains("\nReport ID: a1b2c3d4\n"));
        assert!(receipt.body.contains("\nDate: 3/4/2025, 2:05:09 PM\n"));
        assert!(receipt.body.ends_with("© 2025 Citizen Safety Reporting Platform"));
    }

    #[test]
    fn test_receipt_needs_an_id() {
        assert_eq!(Receipt::new("  ", at()), Err(ReportError::EmptyReference));
    }
}
