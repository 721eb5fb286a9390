//! Kiswahili / English detection for report descriptions
//!
//! Detection is a lexicon count, not a model: a description is Kiswahili when
//! it contains at least two common Kiswahili words, or when such words make up
//! a fifth of its tokens.

pub use safety_types::Language;

/// Inputs shorter than this (after trimming) are not classified
pub const MIN_DETECTION_CHARS: usize = 5;

const MIN_MATCHES: usize = 2;
const MIN_RATIO: f64 = 0.2;

/// Common Kiswahili function and everyday words
pub const KISWAHILI_LEXICON: &[&str] = &[
    "ni", "na", "ya", "wa", "kwa", "hii", "hiyo", "hizo", "watu", "polisi", "tafadhali", "sasa",
    "hapa", "pale", "yule", "huyu", "wale", "hawa", "mimi", "wewe", "yeye", "sisi", "ninyi",
    "wao", "yake", "yangu", "yako", "kuna", "hakuna", "kwamba", "lakini", "au", "ndiyo",
    "hapana", "jambo", "habari", "asante", "karibu", "samahani", "leo", "jana", "kesho", "mtu",
    "kitu", "vitu", "mahali", "wakati", "sababu", "namna",
];

/// Token counts behind a detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LexiconMatch {
    /// Whitespace-separated tokens, including ones left empty after stripping
    pub tokens: usize,
    pub matches: usize,
}

impl LexiconMatch {
    pub fn ratio(&self) -> f64 {
        if self.tokens == 0 {
            0.0
        } else {
            self.matches as f64 / self.tokens as f64
        }
    }

    pub fn language(&self) -> Language {
        if self.matches >= MIN_MATCHES || self.ratio() >= MIN_RATIO {
            Language::Kiswahili
        } else {
            Language::English
        }
    }
}

fn is_lexicon_word(token: &str) -> bool {
    KISWAHILI_LEXICON.contains(&token)
}

fn normalise_token(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Count lexicon hits in `text`
pub fn analyze(text: &str) -> LexiconMatch {
    let lowered = text.to_lowercase();
    let mut result = LexiconMatch::default();

    for token in lowered.split_whitespace() {
        result.tokens += 1;
        if is_lexicon_word(&normalise_token(token)) {
            result.matches += 1;
        }
    }

    result
}

/// Classify a description
pub fn detect(text: &str) -> Language {
    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_DETECTION_CHARS {
        return Language::Undetermined;
    }

    let counts = analyze(trimmed);
    let language = counts.language();
    tracing::trace!(
        tokens = counts.tokens,
        matches = counts.matches,
        ?language,
        "language detected"
    );
    language
}
