//! Language tags, per-language resources and the stop-word language detector.
//!
//! Supported languages live in a single table ([`LANGUAGE_TABLE`]); adding a
//! language means adding a row there and a variant to [`Language`].

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// A supported document language, in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Spanish,
}

impl Language {
    /// Every supported language; the first one is the detection fallback.
    pub const ALL: [Language; 2] = [Language::English, Language::Spanish];

    /// The primary language, used when detection is inconclusive.
    pub const DEFAULT: Language = Language::English;

    /// Two-letter ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::English => "english",
            Language::Spanish => "spanish",
        };
        f.write_str(name)
    }
}

struct LanguageRow {
    language: Language,
    stop_words: fn() -> Vec<String>,
    abbreviations: &'static [&'static str],
}

fn english_stop_words() -> Vec<String> {
    stop_words::get(stop_words::LANGUAGE::English)
        .iter()
        .map(|w| w.to_lowercase())
        .collect()
}

fn spanish_stop_words() -> Vec<String> {
    stop_words::get(stop_words::LANGUAGE::Spanish)
        .iter()
        .map(|w| w.to_lowercase())
        .collect()
}

/// Rows must follow the order of [`Language::ALL`].
const LANGUAGE_TABLE: &[LanguageRow] = &[
    LanguageRow {
        language: Language::English,
        stop_words: english_stop_words,
        abbreviations: &[
            "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "vs.", "etc.", "inc.",
            "ltd.", "co.", "corp.", "e.g.", "i.e.", "u.s.", "no.", "fig.", "jan.", "feb.",
            "aug.", "sept.", "oct.", "nov.", "dec.",
        ],
    },
    LanguageRow {
        language: Language::Spanish,
        stop_words: spanish_stop_words,
        abbreviations: &[
            "sr.", "sra.", "srta.", "dr.", "dra.", "lic.", "ing.", "prof.", "ud.", "uds.",
            "etc.", "pág.", "núm.", "av.", "cía.", "ej.", "aprox.",
        ],
    },
];

/// Sentence and word segmentation for one language.
///
/// Boundaries follow Unicode UAX #29 with two adjustments. A sentence boundary
/// found right after one of the language's abbreviations (`Dr.`, `Sra.`) is
/// not a boundary. A terminator followed by whitespace and a lowercase letter
/// is a boundary unless the word before it is an abbreviation.
#[derive(Debug, Clone)]
pub struct Segmenter {
    abbreviations: HashSet<&'static str>,
}

impl Segmenter {
    pub fn new(abbreviations: &[&'static str]) -> Self {
        Self {
            abbreviations: abbreviations.iter().copied().collect(),
        }
    }

    /// Split `text` into trimmed, non-empty sentences in document order.
    pub fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut out = Vec::new();
        let mut pending: Option<usize> = None;

        for (idx, piece) in text.split_sentence_bound_indices() {
            let begin = pending.unwrap_or(idx);
            if self.ends_with_abbreviation(piece) {
                pending = Some(begin);
                continue;
            }
            pending = None;
            self.push_split(&mut out, &text[begin..idx + piece.len()]);
        }
        if let Some(begin) = pending {
            self.push_split(&mut out, &text[begin..]);
        }
        out
    }

    /// Word tokens: every non-whitespace UAX #29 word-boundary segment, with
    /// English clitics split off the way the Penn Treebank does it.
    ///
    /// Punctuation marks come out as their own tokens, so `"Hello, world."`
    /// yields `["Hello", ",", "world", "."]`, and `"company's"` yields
    /// `["company", "'s"]`.
    pub fn words<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut out = Vec::new();
        for token in text.split_word_bounds() {
            if token.trim().is_empty() {
                continue;
            }
            match clitic_split(token) {
                Some(at) => {
                    out.push(&token[..at]);
                    out.push(&token[at..]);
                }
                None => out.push(token),
            }
        }
        out
    }

    // UAX #29 never breaks before a lowercase letter after `. `, and the
    // assembler's `.` splits make such continuations common.
    fn push_split<'a>(&self, out: &mut Vec<&'a str>, sentence: &'a str) {
        let mut start = 0;
        for (i, c) in sentence.char_indices() {
            if !matches!(c, '.' | '!' | '?') {
                continue;
            }
            let end = i + c.len_utf8();
            let rest = &sentence[end..];
            let after_space = rest.trim_start();
            if after_space.len() == rest.len() {
                continue;
            }
            if !after_space.chars().next().is_some_and(char::is_lowercase) {
                continue;
            }
            if self.ends_with_abbreviation(&sentence[start..end]) {
                continue;
            }
            push_trimmed(out, &sentence[start..end]);
            start = end;
        }
        push_trimmed(out, &sentence[start..]);
    }

    fn ends_with_abbreviation(&self, piece: &str) -> bool {
        let trimmed = piece.trim_end();
        if !trimmed.ends_with('.') {
            return false;
        }
        trimmed
            .split_whitespace()
            .next_back()
            .map(|last| self.abbreviations.contains(last.to_lowercase().as_str()))
            .unwrap_or(false)
    }
}

const CLITICS: &[&str] = &["s", "re", "ll", "ve", "d", "m"];

/// Byte offset where a trailing clitic (`'s`, `n't`, `'re`, `'ll`, `'ve`,
/// `'d`, `'m`) starts, with either `'` or `’` as the apostrophe.
fn clitic_split(token: &str) -> Option<usize> {
    let (at, apostrophe) = token
        .char_indices()
        .rev()
        .find(|(_, c)| matches!(c, '\'' | '\u{2019}'))?;
    let tail = token[at + apostrophe.len_utf8()..].to_lowercase();
    if CLITICS.contains(&tail.as_str()) {
        return (at > 0).then_some(at);
    }
    if tail == "t" {
        let head = &token[..at];
        if head.len() > 1 && head.ends_with(['n', 'N']) {
            return Some(at - 1);
        }
    }
    None
}

fn push_trimmed<'a>(out: &mut Vec<&'a str>, sentence: &'a str) {
    let sentence = sentence.trim();
    if !sentence.is_empty() {
        out.push(sentence);
    }
}

/// Reference data for a single language.
#[derive(Debug, Clone)]
pub struct LanguageProfile {
    language: Language,
    stop_words: HashSet<String>,
    segmenter: Segmenter,
}

impl LanguageProfile {
    pub fn language(&self) -> Language {
        self.language
    }

    /// `word` must already be lower-cased.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    pub fn stop_word_count(&self) -> usize {
        self.stop_words.len()
    }
}

/// Stop words and segmentation rules for every supported language.
///
/// Load once at start-up and share (`Arc`) between extractors; the data is
/// read-only after construction.
#[derive(Debug, Clone)]
pub struct LanguageResources {
    profiles: Vec<LanguageProfile>,
}

impl LanguageResources {
    pub fn load() -> Self {
        let profiles = LANGUAGE_TABLE
            .iter()
            .map(|row| LanguageProfile {
                language: row.language,
                stop_words: (row.stop_words)().into_iter().collect(),
                segmenter: Segmenter::new(row.abbreviations),
            })
            .collect::<Vec<_>>();
        tracing::debug!(
            languages = profiles.len(),
            stop_words = profiles.iter().map(|p| p.stop_words.len()).sum::<usize>(),
            "core.resources.loaded"
        );
        Self { profiles }
    }

    pub fn profile(&self, language: Language) -> &LanguageProfile {
        &self.profiles[language.index()]
    }

    /// Heuristic detection: the language whose stop words occur most often.
    ///
    /// Ties, including documents with no stop words at all, resolve to the
    /// language that comes first in [`Language::ALL`].
    pub fn detect(&self, text: &str) -> Language {
        let lowered = text.to_lowercase();
        let tokens = self.profile(Language::DEFAULT).segmenter.words(&lowered);

        let mut best = Language::DEFAULT;
        let mut best_count = 0usize;
        for language in Language::ALL {
            let profile = self.profile(language);
            let count = tokens.iter().filter(|t| profile.is_stop_word(t)).count();
            if count > best_count {
                best = language;
                best_count = count;
            }
        }
        tracing::debug!(language = %best, stop_word_hits = best_count, "core.language.detected");
        best
    }
}
