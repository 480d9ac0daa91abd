//! Text Normalizer — turns free text into a keyword set.
//!
//! Pipeline: lowercase → trim → punctuation to spaces (hyphens and periods
//! survive) → whitespace split → drop tokens of ≤ 2 chars → stop-word filter
//! (preserved terms exempt) → common-word filter → union with phrase matches.

use crate::analysis::lexicon::{Lexicon, ENGLISH};
use crate::analysis::models::KeywordSet;

/// Tokens this short never become keywords.
const MIN_TOKEN_CHARS: usize = 3;

#[derive(Clone, Copy)]
pub struct Normalizer<'a> {
    lexicon: &'a Lexicon,
}

impl Default for Normalizer<'static> {
    fn default() -> Self {
        Self::new(&ENGLISH)
    }
}

impl<'a> Normalizer<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    /// Extracts keywords from `text`. Absent or blank input yields an empty set.
    pub fn extract_keywords(&self, text: Option<&str>) -> KeywordSet {
        let mut keywords = KeywordSet::new();

        let Some(text) = text else {
            return keywords;
        };
        let normalized = normalize_text(text);
        if normalized.is_empty() {
            return keywords;
        }

        keywords.extend(
            normalized
                .split_whitespace()
                .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
                .filter(|token| self.keeps_token(token)),
        );
        keywords.extend(self.extract_phrases(&normalized));

        keywords
    }

    fn keeps_token(&self, token: &str) -> bool {
        if self.lexicon.is_preserved(token) {
            return true;
        }
        !self.lexicon.is_stop_word(token) && !self.lexicon.is_common_word(token)
    }

    /// Every occurrence of every phrase pattern, whitespace collapsed.
    fn extract_phrases(&self, normalized: &str) -> Vec<String> {
        self.lexicon
            .phrase_patterns()
            .iter()
            .flat_map(|pattern| pattern.find_iter(normalized))
            .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
            .collect()
    }
}

/// Keyword extraction against the built-in English lexicon.
pub fn extract_keywords(text: Option<&str>) -> KeywordSet {
    Normalizer::default().extract_keywords(text)
}

/// Lowercases and trims `text`, replacing everything except letters, digits,
/// underscores, whitespace, hyphens and periods with a space.
fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                ' '
            }
        })
        .collect()
}
