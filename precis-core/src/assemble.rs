//! Turns extracted text blocks (paragraphs) into one cleaned document string.

use std::sync::LazyLock;

use regex::Regex;

/// Candidate sentences this short (in characters, after trimming) are dropped.
pub const MIN_SENTENCE_CHARS: usize = 20;

static TERMINATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("terminator pattern is valid"));
// Entities never contain whitespace; `AT&T and others;` is left alone.
static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&[^;\s]+;").expect("entity pattern is valid"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Join the usable sentences of every block into one document.
///
/// Each block is cut on runs of `.`, `!` and `?`; pieces of
/// [`MIN_SENTENCE_CHARS`] characters or fewer (navigation, captions) are
/// discarded and the rest are rejoined with `". "` before [`clean_text`].
///
/// ```
/// use precis_core::assemble;
///
/// let doc = assemble(&["Menu", "This paragraph is long enough to keep. Short one."]);
/// assert_eq!(doc, "This paragraph is long enough to keep");
/// assert_eq!(assemble::<&str>(&[]), "");
/// ```
pub fn assemble<S: AsRef<str>>(blocks: &[S]) -> String {
    let kept: Vec<&str> = blocks
        .iter()
        .map(|block| block.as_ref().trim())
        .filter(|block| !block.is_empty())
        .flat_map(|block| TERMINATORS.split(block))
        .map(str::trim)
        .filter(|candidate| candidate.chars().count() > MIN_SENTENCE_CHARS)
        .collect();

    tracing::debug!(
        blocks = blocks.len(),
        sentences = kept.len(),
        "core.assemble"
    );
    clean_text(&kept.join(". "))
}

/// Replace HTML entities with a space, collapse whitespace runs, trim.
///
/// An entity is `&`, one or more characters that are neither `;` nor
/// whitespace, then `;`. A bare `&` followed by prose (`AT&T said; ...`) is
/// therefore kept rather than erased up to the next semicolon.
///
/// ```
/// use precis_core::assemble::clean_text;
///
/// assert_eq!(clean_text("Fish&nbsp;&amp;  chips"), "Fish chips");
/// assert_eq!(clean_text("AT&T said; prices rose"), "AT&T said; prices rose");
/// ```
pub fn clean_text(text: &str) -> String {
    let without_entities = ENTITY.replace_all(text, " ");
    WHITESPACE
        .replace_all(&without_entities, " ")
        .trim()
        .to_string()
}
