//! # Text Processing Module
//!
//! ## Purpose
//! Tokenization and word-level text manipulation for the document search
//! engine.
//!
//! ## Input/Output Specification
//! - **Input**: Raw document text or ad-hoc query strings
//! - **Output**: Normalized word tokens in left-to-right reading order
//! - **Normalization**: ASCII case folding, optional Unicode NFC
//!
//! ## Key Features
//! - Splits on any non-alphanumeric boundary (underscore included)
//! - Folds ASCII letters to lowercase; non-ASCII alphanumerics are kept
//!   verbatim as opaque token characters
//! - Lazy, restartable token iteration with no side effects
//! - Word-boundary-respecting literal replacement for the replace command

use crate::config::TextProcessingConfig;
use regex::Regex;
use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

/// Tokenizer for documents and query strings
pub struct Tokenizer {
    word_pattern: Regex,
    normalize_unicode: bool,
}

impl Tokenizer {
    /// Create a tokenizer from the text processing configuration
    pub fn new(config: &TextProcessingConfig) -> Self {
        // Runs of Unicode letters and digits; everything else is a boundary.
        let word_pattern = Regex::new(r"[\p{Alphabetic}\p{N}]+").unwrap();

        Self {
            word_pattern,
            normalize_unicode: config.enable_unicode_normalization,
        }
    }

    /// Normalize raw text before tokenization
    pub fn normalize(&self, text: &str) -> String {
        if self.normalize_unicode {
            text.nfc().collect()
        } else {
            text.to_string()
        }
    }

    /// Iterate tokens of already-normalized text in reading order.
    /// The iterator is lazy and can be created again from the same text.
    pub fn tokens<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        self.word_pattern
            .find_iter(text)
            .map(|m| m.as_str().to_ascii_lowercase())
    }

    /// Normalize and tokenize in one pass, collecting all tokens
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = self.normalize(text);
        self.tokens(&normalized).collect()
    }

    /// Per-token counts of a text, in first-seen order
    pub fn token_counts(&self, text: &str) -> Vec<(String, u64)> {
        let mut counts: Vec<(String, u64)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        let normalized = self.normalize(text);
        for token in self.tokens(&normalized) {
            match positions.get(&token) {
                Some(&pos) => counts[pos].1 += 1,
                None => {
                    positions.insert(token.clone(), counts.len());
                    counts.push((token, 1));
                }
            }
        }

        counts
    }

    /// Normalize a single query word. Returns `None` when the input contains
    /// no token characters at all.
    pub fn normalize_query_word(&self, word: &str) -> Option<String> {
        let normalized = self.normalize(word);
        let mut tokens = self.tokens(&normalized);
        tokens.next()
    }

    /// Length in characters of the longest token in the text
    pub fn longest_token_len(&self, text: &str) -> usize {
        let normalized = self.normalize(text);
        self.tokens(&normalized)
            .map(|t| t.chars().count())
            .max()
            .unwrap_or(0)
    }
}

/// Replace every standalone occurrence of `find` with `replace` in `text`.
///
/// The substitution is literal and case-sensitive; an occurrence counts only
/// when both neighbors are non-alphanumeric (or text boundaries). Returns the
/// modified text and the number of substitutions performed; zero is a valid
/// outcome, not an error.
pub fn replace_standalone(text: &str, find: &str, replace: &str) -> (String, usize) {
    if find.is_empty() {
        return (text.to_string(), 0);
    }

    let mut out = String::with_capacity(text.len());
    let mut count = 0;
    let mut last = 0;

    for (pos, matched) in text.match_indices(find) {
        let before_ok = text[..pos]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = text[pos + matched.len()..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());

        if before_ok && after_ok {
            out.push_str(&text[last..pos]);
            out.push_str(replace);
            last = pos + matched.len();
            count += 1;
        }
    }

    out.push_str(&text[last..]);
    (out, count)
}
