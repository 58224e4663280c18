//! Sentence/word tokenization and the document-wide word weight table.

use std::collections::HashMap;

use serde::ser::{Serialize, Serializer};

use crate::language::LanguageProfile;

/// Normalized word importance: `frequency / max_frequency`, in `[0, 1]`.
///
/// Entries keep the order in which each word first appeared in the
/// document, which is also the tie-break order for equal weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordWeights {
    entries: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl WordWeights {
    /// Count `tokens` and scale by the highest count.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for token in tokens {
            let token = token.into();
            match index.get(&token) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    index.insert(token.clone(), counts.len());
                    counts.push((token, 1));
                }
            }
        }

        let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(1) as f64;
        let entries = counts
            .into_iter()
            .map(|(word, n)| (word, n as f64 / max))
            .collect();
        Self { entries, index }
    }

    pub fn get(&self, word: &str) -> Option<f64> {
        self.index.get(word).map(|&slot| self.entries[slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(w, weight)| (w.as_str(), *weight))
    }

    pub fn max_weight(&self) -> Option<f64> {
        self.entries.iter().map(|(_, w)| *w).reduce(f64::max)
    }

    /// The `count` heaviest words, heaviest first; ties keep document order.
    pub fn top(&self, count: usize) -> Vec<&str> {
        let mut ranked: Vec<&(String, f64)> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
            .into_iter()
            .take(count)
            .map(|(word, _)| word.as_str())
            .collect()
    }
}

impl Serialize for WordWeights {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Output of [`preprocess`].
#[derive(Debug, Clone)]
pub struct Preprocessed<'a> {
    /// Sentences in document order; a sentence's position is its index.
    pub sentences: Vec<&'a str>,
    /// Every qualifying word, lower-cased, in document order.
    pub words: Vec<String>,
    pub weights: WordWeights,
}

impl Preprocessed<'_> {
    /// No sentences or no qualifying words: nothing to summarize.
    pub fn is_degenerate(&self) -> bool {
        self.sentences.is_empty() || self.weights.is_empty()
    }
}

/// `true` for non-empty tokens made only of alphabetic characters.
pub fn is_alphabetic(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphabetic)
}

fn is_punctuation(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_punctuation())
}

/// Segment `text` and build the word weight table.
///
/// A token counts toward the table when its lower-cased form is not a stop
/// word, it is not punctuation and it is purely alphabetic.
pub fn preprocess<'a>(text: &'a str, profile: &LanguageProfile) -> Preprocessed<'a> {
    let segmenter = profile.segmenter();
    let sentences = segmenter.sentences(text);

    let words: Vec<String> = sentences
        .iter()
        .flat_map(|sentence| segmenter.words(sentence))
        .filter(|token| !is_punctuation(token) && is_alphabetic(token))
        .map(str::to_lowercase)
        .filter(|word| !profile.is_stop_word(word))
        .collect();

    let weights = WordWeights::from_tokens(words.iter().cloned());
    tracing::debug!(
        language = %profile.language(),
        sentences = sentences.len(),
        words = words.len(),
        distinct = weights.len(),
        "core.preprocess"
    );

    Preprocessed {
        sentences,
        words,
        weights,
    }
}
