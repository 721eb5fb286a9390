use serde::Serialize;

/// Severity of a transient dashboard notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
    Warning,
}

impl NoticeLevel {
    pub fn background(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "#d4edda",
            NoticeLevel::Error => "#f8d7da",
            NoticeLevel::Info => "#d1ecf1",
            NoticeLevel::Warning => "#fff3cd",
        }
    }

    pub fn foreground(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "#155724",
            NoticeLevel::Error => "#721c24",
            NoticeLevel::Info => "#0c5460",
            NoticeLevel::Warning => "#856404",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}
