//! Evidence attachment staging
//!
//! At most one file is staged on a draft. Selection replaces whatever was
//! staged before, and an oversized file clears the selection entirely.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use crate::draft::DraftReport;
use crate::error::ReportError;

/// 10 MiB
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Metadata of a file picked by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub media_type: String,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, size: u64, media_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            media_type: media_type.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewKind {
    Image,
    Video,
    Generic,
}

impl PreviewKind {
    pub fn for_media_type(media_type: &str) -> Self {
        if media_type.starts_with("image/") {
            PreviewKind::Image
        } else if media_type.starts_with("video/") {
            PreviewKind::Video
        } else {
            PreviewKind::Generic
        }
    }

    /// Whether the preview renders the file contents inline
    pub fn is_inline(&self) -> bool {
        !matches!(self, PreviewKind::Generic)
    }
}

/// A file accepted onto the draft
/// `bytes` as MB with two decimals, e.g. `"0.50 MB"`
pub fn megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedAttachment {
    pub file: SelectedFile,
    pub kind: PreviewKind,
}

impl StagedAttachment {
    /// Size in MB with two decimals
    pub fn size_label(&self) -> String {
        megabytes(self.file.size)
    }

    pub fn summary(&self) -> String {
        match self.kind {
            PreviewKind::Generic => format!("{} ready for upload", self.file.name),
            _ => self.file.name.clone(),
        }
    }

    /// `data:` URL for inline previews
    pub fn data_url(&self, contents: &[u8]) -> Option<String> {
        if !self.kind.is_inline() {
            return None;
        }
        Some(format!(
            "data:{};base64,{}",
            self.file.media_type,
            STANDARD.encode(contents)
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentValidator {
    max_bytes: u64,
}

impl Default for AttachmentValidator {
    fn default() -> Self {
        Self::new(MAX_ATTACHMENT_BYTES)
    }
}

impl AttachmentValidator {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn check(&self, file: &SelectedFile) -> Result<(), ReportError> {
        if file.size > self.max_bytes {
            return Err(ReportError::AttachmentTooLarge {
                size: file.size,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }

    /// Stage `file` on the draft, replacing any earlier selection
    pub fn select(
        &self,
        draft: &mut DraftReport,
        file: SelectedFile,
    ) -> Result<StagedAttachment, ReportError> {
        if let Err(e) = self.check(&file) {
            draft.attachment = None;
            tracing::warn!(name = %file.name, size = file.size, "attachment rejected");
            return Err(e);
        }

        let staged = StagedAttachment {
            kind: PreviewKind::for_media_type(&file.media_type),
            file,
        };
        tracing::debug!(name = %staged.file.name, kind = ?staged.kind, "attachment staged");
        draft.attachment = Some(staged.clone());
        Ok(staged)
    }

    pub fn remove(&self, draft: &mut DraftReport) {
        draft.attachment = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_exact_limit_accepted() {
        let mut draft = DraftReport::default();
        let staged = AttachmentValidator::default()
            .select(
                &mut draft,
                SelectedFile::new("clip.mp4", MAX_ATTACHMENT_BYTES, "video/mp4"),
            )
            .unwrap();
        assert_eq!(staged.kind, PreviewKind::Video);
        assert_eq!(staged.size_label(), "10.00 MB");
        assert!(draft.attachment.is_some());
    }

    #[test]
    fn test_oversize_rejected_and_selection_cleared() {
        let validator = AttachmentValidator::default();
        let mut draft = DraftReport::default();
        validator
            .select(&mut draft, SelectedFile::new("a.png", 1024, "image/png"))
            .unwrap();

        let err = validator
            .select(
                &mut draft,
                SelectedFile::new("big.png", MAX_ATTACHMENT_BYTES + 1, "image/png"),
            )
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "File exceeds 10.00 MB. Please choose a smaller file."
        );
        assert!(draft.attachment.is_none());
    }

    #[test]
    fn test_new_selection_replaces_previous() {
        let validator = AttachmentValidator::default();
        let mut draft = DraftReport::default();
        validator
            .select(&mut draft, SelectedFile::new("a.png", 10, "image/png"))
            .unwrap();
        validator
            .select(&mut draft, SelectedFile::new("b.pdf", 20, "application/pdf"))
            .unwrap();

        let staged = draft.attachment.as_ref().unwrap();
        assert_eq!(staged.file.name, "b.pdf");
        assert_eq!(staged.kind, PreviewKind::Generic);
        assert_eq!(staged.summary(), "b.pdf ready for upload");
    }

    #[test]
    fn test_remove_clears() {
        let validator = AttachmentValidator::default();
        let mut draft = DraftReport::default();
        validator
            .select(&mut draft, SelectedFile::new("a.jpg", 10, "image/jpeg"))
            .unwrap();
        validator.remove(&mut draft);
        assert!(draft.attachment.is_none());
    }

    #[test]
    fn test_data_url_only_for_inline_kinds() {
        let image = StagedAttachment {
            file: SelectedFile::new("a.png", 3, "image/png"),
            kind: PreviewKind::Image,
        };
        assert_eq!(image.data_url(b"abc").unwrap(), "data:image/png;base64,YWJj");

        let doc = StagedAttachment {
            file: SelectedFile::new("a.txt", 3, "text/plain"),
            kind: PreviewKind::Generic,
        };
        assert_eq!(doc.data_url(b"abc"), None);
    }

    #[test]
    fn test_size_label_two_decimals() {
        let staged = StagedAttachment {
            file: SelectedFile::new("a.jpg", 1_572_864, "image/jpeg"),
            kind: PreviewKind::Image,
        };
        assert_eq!(staged.size_label(), "1.50 MB");
    }
}
