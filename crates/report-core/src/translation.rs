//! Report translation on the police dashboard
//!
//! A [`TranslationDesk`] is opened per managed report. It knows the report's
//! own language, caches one successful translation per target, and turns
//! the fetch-with-retry loop into a single [`TranslationOutcome`].

use std::collections::HashMap;
use std::time::Duration;

use safety_types::{TranslatedFields, TranslationResponse};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::TransportError;
use crate::retry::{RetryExhausted, RetryPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    En,
    Sw,
}

impl TargetLanguage {
    pub fn code(&self) -> &'static str {
        match self {
            TargetLanguage::En => "en",
            TargetLanguage::Sw => "sw",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TargetLanguage::En => "English",
            TargetLanguage::Sw => "Kiswahili",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(TargetLanguage::En),
            "sw" => Some(TargetLanguage::Sw),
            _ => None,
        }
    }

    /// Normalise a stored language label such as `"Kiswahili"` or `"sw"`
    pub fn from_label(label: &str) -> Self {
        if label.to_lowercase().contains("sw") {
            TargetLanguage::Sw
        } else {
            TargetLanguage::En
        }
    }

    pub fn translate_button_label(&self, original: TargetLanguage) -> String {
        if *self == original {
            format!("Already in {}", self.name())
        } else {
            format!("Translate to {}", self.name())
        }
    }
}

/// `GET` path for one translation attempt; `now_ms` defeats caches
pub fn translation_url(report_id: &str, target: TargetLanguage, now_ms: i64) -> String {
    format!(
        "/api/translate_report/{}/{}?t={}",
        report_id,
        target.code(),
        now_ms
    )
}

/// Why a single attempt failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    #[error("translation rejected: {}", .0.as_deref().unwrap_or("no reason given"))]
    Rejected(Option<String>),
    #[error(transparent)]
    Network(#[from] TransportError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    #[error("Translation unavailable. Please try again later.")]
    Unavailable { attempts: u32 },
    #[error("Network error. Check your connection and try again.")]
    Network { attempts: u32 },
}

impl From<RetryExhausted<AttemptFailure>> for TranslationError {
    fn from(exhausted: RetryExhausted<AttemptFailure>) -> Self {
        match exhausted.last_error {
            AttemptFailure::Rejected(_) => TranslationError::Unavailable {
                attempts: exhausted.attempts,
            },
            AttemptFailure::Network(_) => TranslationError::Network {
                attempts: exhausted.attempts,
            },
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait TranslationSource {
    async fn fetch_translation(
        &self,
        report_id: &str,
        target: TargetLanguage,
    ) -> Result<TranslationResponse, TransportError>;
}

/// Fetch once, treating `success: false` as a failed attempt
pub async fn fetch_once<S: TranslationSource>(
    source: &S,
    report_id: &str,
    target: TargetLanguage,
) -> Result<TranslationResponse, AttemptFailure> {
    let response = source.fetch_translation(report_id, target).await?;
    if response.success && response.translated.is_some() {
        Ok(response)
    } else {
        Err(AttemptFailure::Rejected(response.error))
    }
}

/// Rendered translation panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationPanel {
    pub target: TargetLanguage,
    pub heading: String,
    pub fields: TranslatedFields,
    pub footer: String,
}

impl TranslationPanel {
    fn new(target: TargetLanguage, response: &TranslationResponse) -> Self {
        let original = response
            .original_language
            .as_deref()
            .filter(|l| !l.is_empty())
            .map(str::to_uppercase)
            .unwrap_or_else(|| "Unknown".to_string());
        Self {
            target,
            heading: format!("Translated to {}:", target.name()),
            fields: response.translated.clone().unwrap_or_default(),
            footer: format!("Auto-translated • Original language: {}", original),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum TranslationOutcome {
    AlreadyInTarget { message: String },
    Translated { panel: TranslationPanel, cached: bool },
    Failed { message: String },
}

/// What to do after a translate button press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationStart {
    /// Already resolved without a fetch
    Done(TranslationOutcome),
    /// A fetch for this target is already running
    Busy,
    /// Run the retry loop, then call `complete`
    Fetch { report_id: String, retry: RetryPolicy },
}

#[derive(Debug, Clone)]
pub struct TranslationDesk {
    report_id: String,
    original: TargetLanguage,
    retry: RetryPolicy,
    cache: HashMap<TargetLanguage, TranslationResponse>,
    pending: Vec<TargetLanguage>,
}

impl TranslationDesk {
    pub fn open(report_id: impl Into<String>, language_label: &str, retry: RetryPolicy) -> Self {
        Self {
            report_id: report_id.into(),
            original: TargetLanguage::from_label(language_label),
            retry,
            cache: HashMap::new(),
            pending: Vec::new(),
        }
    }

    pub fn report_id(&self) -> &str {
        &self.report_id
    }

    pub fn original_language(&self) -> TargetLanguage {
        self.original
    }

    pub fn is_pending(&self, target: TargetLanguage) -> bool {
        self.pending.contains(&target)
    }

    pub fn begin(&mut self, target: TargetLanguage) -> TranslationStart {
        if target == self.original {
            return TranslationStart::Done(TranslationOutcome::AlreadyInTarget {
                message: format!(
                    "This report is already in {}. No translation needed.",
                    target.name()
                ),
            });
        }

        if let Some(response) = self.cache.get(&target) {
            tracing::debug!(report_id = %self.report_id, target = target.code(), "translation cache hit");
            return TranslationStart::Done(TranslationOutcome::Translated {
                panel: TranslationPanel::new(target, response),
                cached: true,
            });
        }

        if self.is_pending(target) {
            return TranslationStart::Busy;
        }

        self.pending.push(target);
        TranslationStart::Fetch {
            report_id: self.report_id.clone(),
            retry: self.retry,
        }
    }

    pub fn complete(
        &mut self,
        target: TargetLanguage,
        result: Result<TranslationResponse, RetryExhausted<AttemptFailure>>,
    ) -> TranslationOutcome {
        self.pending.retain(|t| *t != target);

        match result {
            Ok(response) => {
                let panel = TranslationPanel::new(target, &response);
                self.cache.insert(target, response);
                TranslationOutcome::Translated {
                    panel,
                    cached: false,
                }
            }
            Err(exhausted) => {
                tracing::error!(
                    report_id = %self.report_id,
                    target = target.code(),
                    attempts = exhausted.attempts,
                    error = %exhausted.last_error,
                    "translation failed"
                );
                TranslationOutcome::Failed {
                    message: TranslationError::from(exhausted).to_string(),
                }
            }
        }
    }

    /// Full button press: cache lookup, fetch with retry, caching
    pub async fn translate<S, Sleep, SleepFut>(
        &mut self,
        target: TargetLanguage,
        source: &S,
        sleep: Sleep,
    ) -> Option<TranslationOutcome>
    where
        S: TranslationSource,
        Sleep: FnMut(Duration) -> SleepFut,
        SleepFut: std::future::Future<Output = ()>,
    {
        let (report_id, retry) = match self.begin(target) {
            TranslationStart::Done(outcome) => return Some(outcome),
            TranslationStart::Busy => return None,
            TranslationStart::Fetch { report_id, retry } => (report_id, retry),
        };

        let result = retry
            .run(|_| fetch_once(source, &report_id, target), sleep)
            .await;
        Some(self.complete(target, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::{Cell, RefCell};

    struct ScriptedSource {
        replies: RefCell<Vec<Result<TranslationResponse, TransportError>>>,
        calls: Cell<u32>,
    }

    impl ScriptedSource {
        fn new(mut replies: Vec<Result<TranslationResponse, TransportError>>) -> Self {
            replies.reverse();
            Self {
                replies: RefCell::new(replies),
                calls: Cell::new(0),
            }
        }
    }

    impl TranslationSource for ScriptedSource {
        async fn fetch_translation(
            &self,
            report_id: &str,
            target: TargetLanguage,
        ) -> Result<TranslationResponse, TransportError> {
            assert_eq!(report_id, "42");
            assert_eq!(target, TargetLanguage::Sw);
            self.calls.set(self.calls.get() + 1);
            self.replies
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Err(TransportError("script exhausted".to_string())))
        }
    }

    fn translated() -> TranslationResponse {
        TranslationResponse {
            success: true,
            translated: Some(TranslatedFields {
                category: "Wizi".to_string(),
                description: "Simu yangu iliibiwa".to_string(),
                manual_location: "Soko".to_string(),
            }),
            original_language: Some("en".to_string()),
            target_language: Some("sw".to_string()),
            error: None,
        }
    }

    fn rejected() -> TranslationResponse {
        TranslationResponse {
            error: Some("backend down".to_string()),
            ..Default::default()
        }
    }

    fn no_wait(_: Duration) -> std::future::Ready<()> {
        std::future::ready(())
    }

    #[test]
    fn test_language_label_normalisation() {
        assert_eq!(TargetLanguage::from_label("Kiswahili"), TargetLanguage::Sw);
        assert_eq!(TargetLanguage::from_label("SW"), TargetLanguage::Sw);
        assert_eq!(TargetLanguage::from_label("English"), TargetLanguage::En);
        assert_eq!(TargetLanguage::from_label(""), TargetLanguage::En);
    }

    #[test]
    fn test_translation_url() {
        assert_eq!(
            translation_url("42", TargetLanguage::Sw, 1_700_000_000_000),
            "/api/translate_report/42/sw?t=1700000000000"
        );
    }

    #[test]
    fn test_button_labels() {
        assert_eq!(
            TargetLanguage::En.translate_button_label(TargetLanguage::En),
            "Already in English"
        );
        assert_eq!(
            TargetLanguage::Sw.translate_button_label(TargetLanguage::En),
            "Translate to Kiswahili"
        );
    }

    #[tokio::test]
    async fn test_same_language_short_circuits() {
        let source = ScriptedSource::new(vec![]);
        let mut desk = TranslationDesk::open("42", "sw", RetryPolicy::default());
        let outcome = desk.translate(TargetLanguage::Sw, &source, no_wait).await;
        assert_eq!(
            outcome,
            Some(TranslationOutcome::AlreadyInTarget {
                message: "This report is already in Kiswahili. No translation needed.".to_string()
            })
        );
        assert_eq!(source.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_fetch() {
        let source = ScriptedSource::new(vec![Ok(translated())]);
        let mut desk = TranslationDesk::open("42", "English", RetryPolicy::default());

        let first = desk.translate(TargetLanguage::Sw, &source, no_wait).await.unwrap();
        let second = desk.translate(TargetLanguage::Sw, &source, no_wait).await.unwrap();

        assert_eq!(source.calls.get(), 1);
        match (first, second) {
            (
                TranslationOutcome::Translated { panel: a, cached: false },
                TranslationOutcome::Translated { panel: b, cached: true },
            ) => {
                assert_eq!(a, b);
                assert_eq!(a.fields.category, "Wizi");
                assert_eq!(a.footer, "Auto-translated • Original language: EN");
            }
            other => panic!("unexpected outcomes {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_retries_then_succeeds() {
        let source = ScriptedSource::new(vec![
            Err(TransportError("timeout".to_string())),
            Ok(rejected()),
            Ok(translated()),
        ]);
        let mut desk = TranslationDesk::open("42", "en", RetryPolicy::default());
        let outcome = desk.translate(TargetLanguage::Sw, &source, no_wait).await.unwrap();
        assert!(matches!(outcome, TranslationOutcome::Translated { cached: false, .. }));
        assert_eq!(source.calls.get(), 3);
    }

    #[tokio::test]
    async fn test_three_rejections_report_unavailable() {
        let source = ScriptedSource::new(vec![Ok(rejected()), Ok(rejected()), Ok(rejected())]);
        let mut desk = TranslationDesk::open("42", "en", RetryPolicy::default());
        let waits = RefCell::new(Vec::new());

        let outcome = desk
            .translate(TargetLanguage::Sw, &source, |d| {
                waits.borrow_mut().push(d);
                std::future::ready(())
            })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            TranslationOutcome::Failed {
                message: "Translation unavailable. Please try again later.".to_string()
            }
        );
        assert_eq!(source.calls.get(), 3);
        assert_eq!(*waits.borrow(), vec![Duration::from_millis(1500); 2]);
        assert!(!desk.is_pending(TargetLanguage::Sw));
    }

    #[tokio::test]
    async fn test_network_failure_message() {
        let source = ScriptedSource::new(vec![]);
        let mut desk = TranslationDesk::open("42", "en", RetryPolicy::default());
        let outcome = desk.translate(TargetLanguage::Sw, &source, no_wait).await.unwrap();
        assert_eq!(
            outcome,
            TranslationOutcome::Failed {
                message: "Network error. Check your connection and try again.".to_string()
            }
        );
    }

    #[test]
    fn test_second_press_while_pending_is_busy() {
        let mut desk = TranslationDesk::open("42", "en", RetryPolicy::default());
        assert!(matches!(desk.begin(TargetLanguage::Sw), TranslationStart::Fetch { .. }));
        assert_eq!(desk.begin(TargetLanguage::Sw), TranslationStart::Busy);
    }
}
