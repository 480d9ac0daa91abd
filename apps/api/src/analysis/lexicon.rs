//! Fixed vocabulary tables the keyword analysis runs on.
//!
//! Built once per process and never mutated. The normalizer borrows a
//! `Lexicon` rather than reaching for globals, so tests can supply their own.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use stop_words::LANGUAGE;

/// Technical vocabulary that survives stop-word filtering unconditionally.
pub const PRESERVED_TERMS: &[&str] = &[
    "javascript", "python", "java", "react", "angular", "vue", "node", "express",
    "mongodb", "sql", "postgresql", "mysql", "aws", "azure", "docker", "kubernetes",
    "git", "github", "api", "rest", "graphql", "html", "css", "typescript", "php",
    "ruby", "golang", "rust", "machine learning", "ai", "data science", "analytics",
    "agile", "scrum", "devops", "ci/cd", "testing", "automation", "security",
];

/// Generic resume verbs and nouns that carry no matching signal.
pub const COMMON_WORDS: &[&str] = &[
    "experience", "work", "team", "project", "company", "business", "management",
    "development", "application", "system", "service", "client", "customer",
    "solution", "process", "support", "analysis", "design", "implementation",
    "requirements", "responsible", "ensure", "provide", "develop", "create",
    "manage", "lead", "coordinate", "collaborate", "maintain", "improve",
    "optimize", "implement",
];

/// Multi-word technical phrases, matched against normalized text.
pub const PHRASE_PATTERNS: &[&str] = &[
    r"machine\s+learning",
    r"data\s+science",
    r"software\s+engineer",
    r"full\s+stack",
    r"front\s+end",
    r"back\s+end",
    r"web\s+development",
    r"project\s+management",
    r"business\s+analysis",
    r"quality\s+assurance",
    r"user\s+experience",
    r"user\s+interface",
    r"database\s+design",
    r"system\s+design",
    r"cloud\s+computing",
    r"artificial\s+intelligence",
];

/// The process-wide English lexicon, on the NLTK stop-word list.
pub static ENGLISH: Lazy<Lexicon> = Lazy::new(|| {
    let mut words = HashSet::new();
    for word in stop_words::get(LANGUAGE::English).iter() {
        words.insert(word.to_ascii_lowercase());
    }

    Lexicon::new(words, PRESERVED_TERMS, COMMON_WORDS, PHRASE_PATTERNS)
        .expect("built-in phrase patterns are valid regexes")
});

pub struct Lexicon {
    stop_words: HashSet<String>,
    preserved_terms: HashSet<String>,
    common_words: HashSet<String>,
    phrase_patterns: Vec<Regex>,
}

impl Lexicon {
    pub fn new(
        stop_words: HashSet<String>,
        preserved_terms: &[&str],
        common_words: &[&str],
        phrase_patterns: &[&str],
    ) -> Result<Self, regex::Error> {
        let phrase_patterns = phrase_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            stop_words,
            preserved_terms: preserved_terms.iter().map(|t| t.to_lowercase()).collect(),
            common_words: common_words.iter().map(|w| w.to_lowercase()).collect(),
            phrase_patterns,
        })
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    pub fn is_preserved(&self, token: &str) -> bool {
        self.preserved_terms.contains(token)
    }

    pub fn is_common_word(&self, token: &str) -> bool {
        self.common_words.contains(token)
    }

    pub fn phrase_patterns(&self) -> &[Regex] {
        &self.phrase_patterns
    }
}
