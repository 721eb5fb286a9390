//! Managed report modal on the police dashboard

use safety_types::ActionResponse;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::notice::Notice;
use crate::transport::Reply;
use crate::translation::TargetLanguage;

/// Spam scores above this raise a warning
pub const SPAM_WARNING_THRESHOLD: i64 = 50;

pub const RESPONSE_SUBMITTED: &str = "Response submitted successfully";
pub const RESPONSE_FAILED: &str = "Failed to submit response";
pub const RESPONSE_NETWORK_ERROR: &str = "Network error. Please try again.";

/// Report attributes carried on the dashboard row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportRow {
    pub id: String,
    pub short: String,
    pub category: String,
    pub location: String,
    pub language: String,
    pub description: String,
    pub spam_score: String,
    pub media_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl MediaKind {
    pub fn for_path(path: &str) -> Self {
        let ext = path
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" | "png" => MediaKind::Image,
            "mp4" | "mov" => MediaKind::Video,
            _ => MediaKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaView {
    pub kind: MediaKind,
    pub url: String,
    /// Shown instead of a player for unrecognised files
    pub caption: Option<String>,
}

impl MediaView {
    pub fn for_path(path: &str) -> Option<Self> {
        if path.is_empty() {
            return None;
        }
        let kind = MediaKind::for_path(path);
        Some(Self {
            kind,
            url: format!("/media/{}", path),
            caption: (kind == MediaKind::Other).then(|| format!("File attached: {}", path)),
        })
    }
}

/// Everything the modal shows for one report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagedReportView {
    pub id: String,
    pub short_id: String,
    pub category: String,
    pub location: String,
    pub language_label: String,
    pub language: TargetLanguage,
    pub indicator: String,
    pub indicator_color: &'static str,
    pub description: String,
    pub spam_warning: Option<i64>,
    pub media: Option<MediaView>,
    pub respond_url: String,
    pub translate_en_label: String,
    pub translate_sw_label: String,
}

impl ManagedReportView {
    pub fn new(row: &ReportRow) -> Self {
        let language = TargetLanguage::from_label(&row.language);
        let spam_score = leading_int(&row.spam_score).unwrap_or(0);

        Self {
            id: row.id.clone(),
            short_id: row.short.clone(),
            category: row.category.clone(),
            location: row.location.clone(),
            language_label: row.language.clone(),
            language,
            indicator: row.language.chars().take(2).collect::<String>().to_uppercase(),
            indicator_color: match language {
                TargetLanguage::En => "#1976d2",
                TargetLanguage::Sw => "#ff9800",
            },
            description: row.description.clone(),
            spam_warning: (spam_score > SPAM_WARNING_THRESHOLD).then_some(spam_score),
            media: MediaView::for_path(&row.media_path),
            respond_url: respond_url(&row.id),
            translate_en_label: TargetLanguage::En.translate_button_label(language),
            translate_sw_label: TargetLanguage::Sw.translate_button_label(language),
        }
    }
}

pub fn respond_url(report_id: &str) -> String {
    format!("/police/respond/{}", report_id)
}

/// Integer prefix of `s`, skipping leading whitespace
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let digits_start = usize::from(s.starts_with(&['-', '+'][..]));
    let end = s[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(s.len(), |i| i + digits_start);
    s[..end].parse().ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum ResponseOutcome {
    /// Follow the server's redirect
    Navigate { url: String },
    /// Notify, then close the modal and reload
    Accepted { notice: Notice },
    /// Notify and re-enable the form
    Rejected { notice: Notice },
}

impl ResponseOutcome {
    pub fn from_reply(outcome: Result<Reply<ActionResponse>, TransportError>) -> Self {
        match outcome {
            Ok(Reply::Redirected { url }) => ResponseOutcome::Navigate { url },
            Ok(Reply::Json(body)) if body.success => ResponseOutcome::Accepted {
                notice: Notice::success(RESPONSE_SUBMITTED),
            },
            Ok(Reply::Json(body)) => ResponseOutcome::Rejected {
                notice: Notice::error(
                    body.error
                        .filter(|e| !e.is_empty())
                        .unwrap_or_else(|| RESPONSE_FAILED.to_string()),
                ),
            },
            Err(e) => {
                tracing::error!(error = %e, "police response submission failed");
                ResponseOutcome::Rejected {
                    notice: Notice::error(RESPONSE_NETWORK_ERROR),
                }
            }
        }
    }
}
