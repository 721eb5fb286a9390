use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("File exceeds {}. Please choose a smaller file.", limit_label(.limit))]
    AttachmentTooLarge { size: u64, limit: u64 },

    #[error("A report submission is already in progress")]
    SubmissionInFlight,

    #[error("{field} must be at least {min} characters")]
    FieldTooShort { field: &'static str, min: usize },

    #[error("Please enter a report reference number")]
    EmptyReference,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

fn limit_label(limit: &u64) -> String {
    crate::attachment::megabytes(*limit)
}

/// Failure to reach the server or read its reply
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Network error: {0}")]
pub struct TransportError(pub String);

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        TransportError(format!("invalid JSON body: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_megabyte_limit_message() {
        let err = ReportError::AttachmentTooLarge {
            size: 600 * 1024,
            limit: 512 * 1024,
        };
        assert_eq!(
            err.to_string(),
            "File exceeds 0.50 MB. Please choose a smaller file."
        );
    }
}
