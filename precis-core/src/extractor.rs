//! The sentence-extraction summarizer: assembler → detector → preprocessor → scorer.

use std::sync::Arc;

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::assemble::assemble;
use crate::error::{checked_count, SummarizeError};
use crate::language::{Language, LanguageResources};
use crate::preprocess::{preprocess, WordWeights};
use crate::score::{classic_abstract, keyword_abstract, score_sentences, ScoredSentence};

pub const DEFAULT_ABSTRACT_SIZE: usize = 10;
pub const DEFAULT_KEYWORD_COUNT: usize = 15;
pub const DEFAULT_PARAGRAPH_WEIGHT: f64 = 1.0;

/// Tunables for [`SentenceExtractor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractorConfig {
    /// Sentences in the classic abstract unless a call overrides it.
    pub abstract_size: usize,
    /// Words in the keyword abstract.
    pub keyword_count: usize,
    /// Constant multiplier reserved for paragraph-position weighting.
    pub paragraph_weight: f64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            abstract_size: DEFAULT_ABSTRACT_SIZE,
            keyword_count: DEFAULT_KEYWORD_COUNT,
            paragraph_weight: DEFAULT_PARAGRAPH_WEIGHT,
        }
    }
}

impl ExtractorConfig {
    /// Validate raw values coming from configuration files or requests.
    pub fn from_raw(
        abstract_size: i64,
        keyword_count: i64,
        paragraph_weight: f64,
    ) -> Result<Self, SummarizeError> {
        let abstract_size = checked_count("abstract_size", abstract_size)?;
        let keyword_count = checked_count("keyword_count", keyword_count)?;
        if !paragraph_weight.is_finite() || paragraph_weight < 0.0 {
            return Err(SummarizeError::InvalidWeight {
                field: "paragraph_weight",
                value: paragraph_weight,
            });
        }
        Ok(Self {
            abstract_size,
            keyword_count,
            paragraph_weight,
        })
    }
}

/// A successful summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Abstract {
    /// Selected sentences in reading order, space separated.
    pub classic_abstract: String,
    /// Heaviest words, heaviest first.
    pub keyword_abstract: Vec<String>,
    pub language: Language,
}

/// Result of [`SentenceExtractor::summarize`].
///
/// `TooShort` is returned when the assembled document has no sentences or no
/// qualifying words; callers are expected to branch on it.
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    Abstract(Abstract),
    TooShort,
}

impl Summary {
    pub fn is_too_short(&self) -> bool {
        matches!(self, Summary::TooShort)
    }

    pub fn as_abstract(&self) -> Option<&Abstract> {
        match self {
            Summary::Abstract(a) => Some(a),
            Summary::TooShort => None,
        }
    }
}

impl Serialize for Summary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Summary::Abstract(a) => a.serialize(serializer),
            Summary::TooShort => {
                let mut state = serializer.serialize_struct("TooShort", 1)?;
                state.serialize_field("too_short", &true)?;
                state.end()
            }
        }
    }
}

/// Intermediate results of one run, for inspection.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub language: Language,
    pub document: String,
    pub sentences: Vec<ScoredSentence>,
    pub weights: WordWeights,
}

/// Extractive summarizer over a shared, read-only set of language resources.
///
/// ```
/// use std::sync::Arc;
/// use precis_core::{ExtractorConfig, LanguageResources, SentenceExtractor, Summary};
///
/// let extractor = SentenceExtractor::new(
///     Arc::new(LanguageResources::load()),
///     ExtractorConfig::default(),
/// );
/// let blocks = ["Rustaceans maintain the compiler with great care and patience."];
/// match extractor.summarize(&blocks) {
///     Summary::Abstract(a) => assert!(!a.classic_abstract.is_empty()),
///     Summary::TooShort => unreachable!(),
/// }
/// assert!(extractor.summarize::<&str>(&[]).is_too_short());
/// ```
#[derive(Debug, Clone)]
pub struct SentenceExtractor {
    resources: Arc<LanguageResources>,
    config: ExtractorConfig,
}

impl SentenceExtractor {
    pub fn new(resources: Arc<LanguageResources>, config: ExtractorConfig) -> Self {
        Self { resources, config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn resources(&self) -> &LanguageResources {
        &self.resources
    }

    /// Summarize text blocks with the configured abstract size.
    pub fn summarize<S: AsRef<str>>(&self, blocks: &[S]) -> Summary {
        self.summarize_with(blocks, self.config.abstract_size)
    }

    /// Summarize text blocks with an explicit abstract size.
    pub fn summarize_with<S: AsRef<str>>(&self, blocks: &[S], abstract_size: usize) -> Summary {
        self.summarize_document(&assemble(blocks), abstract_size)
    }

    /// Summarize an already assembled document.
    pub fn summarize_document(&self, document: &str, abstract_size: usize) -> Summary {
        match self.analyze_document(document) {
            Some(analysis) => Summary::Abstract(Abstract {
                classic_abstract: classic_abstract(&analysis.sentences, abstract_size),
                keyword_abstract: keyword_abstract(&analysis.weights, self.config.keyword_count),
                language: analysis.language,
            }),
            None => {
                tracing::debug!(chars = document.len(), "core.summary.too_short");
                Summary::TooShort
            }
        }
    }

    /// Run every stage and return the scored sentences and weight table.
    ///
    /// `None` means the document is too short to summarize.
    pub fn analyze<S: AsRef<str>>(&self, blocks: &[S]) -> Option<Analysis> {
        self.analyze_document(&assemble(blocks))
    }

    pub fn analyze_document(&self, document: &str) -> Option<Analysis> {
        let language = self.resources.detect(document);
        let profile = self.resources.profile(language);
        let pre = preprocess(document, profile);
        if pre.is_degenerate() {
            return None;
        }

        let sentences = score_sentences(
            &pre.sentences,
            &pre.weights,
            profile.segmenter(),
            self.config.paragraph_weight,
        );
        Some(Analysis {
            language,
            document: document.to_string(),
            sentences,
            weights: pre.weights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_negative_counts() {
        assert_eq!(
            ExtractorConfig::from_raw(-1, 15, 1.0),
            Err(SummarizeError::InvalidConfig {
                field: "abstract_size",
                value: -1
            })
        );
        assert_eq!(
            ExtractorConfig::from_raw(10, -3, 1.0),
            Err(SummarizeError::InvalidConfig {
                field: "keyword_count",
                value: -3
            })
        );
        assert!(ExtractorConfig::from_raw(10, 15, f64::NAN).is_err());
        assert!(ExtractorConfig::from_raw(10, 15, -0.5).is_err());
    }

    #[test]
    fn from_raw_accepts_zero() {
        let cfg = ExtractorConfig::from_raw(0, 0, 1.0).unwrap();
        assert_eq!(cfg.abstract_size, 0);
        assert_eq!(cfg.keyword_count, 0);
    }

    #[test]
    fn defaults() {
        let cfg = ExtractorConfig::default();
        assert_eq!(cfg.abstract_size, 10);
        assert_eq!(cfg.keyword_count, 15);
        assert_eq!(cfg.paragraph_weight, 1.0);
    }

    #[test]
    fn too_short_serializes_as_flag() {
        let json = serde_json::to_value(Summary::TooShort).unwrap();
        assert_eq!(json, serde_json::json!({ "too_short": true }));
    }

    #[test]
    fn abstract_serializes_flat() {
        let summary = Summary::Abstract(Abstract {
            classic_abstract: "One.".into(),
            keyword_abstract: vec!["one".into()],
            language: Language::Spanish,
        });
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "classic_abstract": "One.",
                "keyword_abstract": ["one"],
                "language": "spanish"
            })
        );
    }
}
