//! Sentence scoring and abstract selection.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::language::Segmenter;
use crate::preprocess::{is_alphabetic, WordWeights};

/// A sentence with its derived weight and original position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSentence {
    pub text: String,
    pub weight: f64,
    pub index: usize,
}

/// Position bonus: `1 - index / total`, from 1 for the first sentence down
/// to just above 0 for the last.
pub fn position_weight(index: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    1.0 - index as f64 / total as f64
}

/// Term-frequency score of one sentence against the document table.
///
/// Each distinct alphabetic word contributes `tf / token_count * weight`;
/// the denominator counts every token, punctuation included.
pub fn content_score(sentence: &str, weights: &WordWeights, segmenter: &Segmenter) -> f64 {
    let tokens = segmenter.words(sentence);
    if tokens.is_empty() {
        return 0.0;
    }

    let mut term_freq: BTreeMap<String, usize> = BTreeMap::new();
    for token in tokens.iter().filter(|t| is_alphabetic(t)) {
        *term_freq.entry(token.to_lowercase()).or_insert(0) += 1;
    }

    let total = tokens.len() as f64;
    term_freq
        .iter()
        .map(|(word, &tf)| tf as f64 / total * weights.get(word).unwrap_or(0.0))
        .sum()
}

/// Score every sentence: `content_score * position_weight * paragraph_weight`.
pub fn score_sentences(
    sentences: &[&str],
    weights: &WordWeights,
    segmenter: &Segmenter,
    paragraph_weight: f64,
) -> Vec<ScoredSentence> {
    let total = sentences.len();
    sentences
        .iter()
        .enumerate()
        .map(|(index, sentence)| ScoredSentence {
            text: (*sentence).to_string(),
            weight: content_score(sentence, weights, segmenter)
                * position_weight(index, total)
                * paragraph_weight,
            index,
        })
        .collect()
}

/// The `abstract_size` heaviest sentences, restored to reading order and
/// joined with single spaces. Equal weights keep document order.
pub fn classic_abstract(scored: &[ScoredSentence], abstract_size: usize) -> String {
    let mut ranked: Vec<&ScoredSentence> = scored.iter().collect();
    ranked.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    ranked.truncate(abstract_size);
    ranked.sort_by_key(|s| s.index);

    ranked
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The `keyword_count` heaviest words, heaviest first.
pub fn keyword_abstract(weights: &WordWeights, keyword_count: usize) -> Vec<String> {
    weights
        .top(keyword_count)
        .into_iter()
        .map(str::to_string)
        .collect()
}
