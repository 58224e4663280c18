//! Extractive summarization of web page text.
//!
//! The pipeline runs in four stages, each a plain function over in-memory
//! data:
//!
//! 1. [`assemble`]: text blocks → one cleaned document string
//! 2. [`LanguageResources::detect`]: stop-word language heuristic
//! 3. [`preprocess`]: sentences, filtered words, [`WordWeights`]
//! 4. [`score`]: sentence weights, classic abstract, keyword abstract
//!
//! [`SentenceExtractor`] wires them together. Nothing here performs I/O or
//! holds state between calls, so one extractor can serve many threads.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use precis_core::{ExtractorConfig, LanguageResources, SentenceExtractor};
//!
//! let resources = Arc::new(LanguageResources::load());
//! let config = ExtractorConfig::from_raw(1, 3, 1.0).unwrap();
//! let extractor = SentenceExtractor::new(resources, config);
//!
//! let summary = extractor.summarize(&[
//!     "Volcanoes release molten rock, volcanic ash and gases from below the crust.",
//! ]);
//! let abstract_ = summary.as_abstract().unwrap();
//! assert!(abstract_.keyword_abstract.len() <= 3);
//! ```

pub mod assemble;
pub mod error;
pub mod extractor;
pub mod language;
pub mod preprocess;
pub mod score;

pub use assemble::{assemble, clean_text};
pub use error::{checked_count, SummarizeError};
pub use extractor::{
    Abstract, Analysis, ExtractorConfig, SentenceExtractor, Summary, DEFAULT_ABSTRACT_SIZE,
    DEFAULT_KEYWORD_COUNT, DEFAULT_PARAGRAPH_WEIGHT,
};
pub use language::{Language, LanguageProfile, LanguageResources, Segmenter};
pub use preprocess::{preprocess, Preprocessed, WordWeights};
pub use score::ScoredSentence;
