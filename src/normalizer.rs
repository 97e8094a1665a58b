//! Review text normalization.
//!
//! Turns raw user input (possibly containing HTML fragments) into the
//! lowercase word tokens the model was trained on.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

// Function words plus the domain terms every review mentions.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "the", "and", "a", "an", "is", "it", "to", "i", "this", "that", "in", "of", "was",
        "do", "were", "for", "with", "as", "movie", "film",
    ]
    .into_iter()
    .collect()
});

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").expect("valid tag regex"));

static NON_WORD_CHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z\s']").expect("valid character regex"));

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Normalizes `text` into tokens with stop words removed.
pub fn normalize(text: &str) -> Vec<String> {
    let lowercase_text = text.to_lowercase();
    let without_tags = HTML_TAG.replace_all(&lowercase_text, " ");
    let letters_only = NON_WORD_CHAR.replace_all(&without_tags, " ");
    let collapsed = WHITESPACE_RUN.replace_all(&letters_only, " ");

    collapsed
        .trim()
        .split(' ')
        .filter(|t| !t.is_empty() && !is_stop_word(t))
        .map(str::to_string)
        .collect()
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}
