//! Offline fallback backend reporting plain text statistics.

use async_trait::async_trait;

use crate::error::AnalysisError;
use crate::{AnalysisBackend, Result, TenderAnalysis};

/// Characters of the document quoted in the summary.
pub const EXCERPT_CHARS: usize = 200;

const NEEDS_API_KEY: &str =
    "Not available: configure an analysis API key for a detailed analysis.";

/// Counts over a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStats {
    pub words: usize,
    pub characters: usize,
    pub paragraphs: usize,
    pub sentences: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        Self {
            words: text.split_whitespace().count(),
            characters: text.chars().count(),
            paragraphs: count_paragraphs(text),
            sentences: count_sentences(text),
        }
    }
}

/// Non-empty blocks separated by blank lines.
fn count_paragraphs(text: &str) -> usize {
    let mut count = 0;
    let mut in_paragraph = false;
    for line in text.lines() {
        if line.trim().is_empty() {
            in_paragraph = false;
        } else if !in_paragraph {
            in_paragraph = true;
            count += 1;
        }
    }
    count
}

/// Runs of `.`, `!` or `?` (so "..." ends one sentence).
fn count_sentences(text: &str) -> usize {
    let mut count = 0;
    let mut previous_terminal = false;
    for c in text.chars() {
        let terminal = matches!(c, '.' | '!' | '?');
        if terminal && !previous_terminal {
            count += 1;
        }
        previous_terminal = terminal;
    }
    count
}

/// Backend used when no analysis service is configured. It never fails on
/// non-empty text: the summary carries word, character, paragraph and
/// sentence counts plus the start of the document.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsBackend;

impl StatsBackend {
    pub fn new() -> Self {
        Self
    }

    /// The analysis for `text`, computed synchronously.
    pub fn analysis(&self, text: &str) -> TenderAnalysis {
        let stats = TextStats::of(text);
        let excerpt: String = text.chars().take(EXCERPT_CHARS).collect();
        let ellipsis = if stats.characters > EXCERPT_CHARS { "..." } else { "" };

        let summary = format!(
            "Text statistics: {} words, {} characters, {} paragraphs, {} sentences. \
             First {} characters: \"{}{}\"",
            stats.words,
            stats.characters,
            stats.paragraphs,
            stats.sentences,
            EXCERPT_CHARS,
            excerpt.trim(),
            ellipsis
        );

        TenderAnalysis {
            summary,
            required_experience: NEEDS_API_KEY.to_string(),
            required_codes: NEEDS_API_KEY.to_string(),
            personnel_experience: NEEDS_API_KEY.to_string(),
            financial_indicators: NEEDS_API_KEY.to_string(),
            required_documents: NEEDS_API_KEY.to_string(),
        }
    }
}

#[async_trait]
impl AnalysisBackend for StatsBackend {
    async fn analyze(&self, text: &str) -> Result<TenderAnalysis> {
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyInput);
        }
        Ok(self.analysis(text))
    }

    fn name(&self) -> &str {
        "text-statistics"
    }
}
