//! Data shapes shared by both analysis strategies.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Maximum number of missing keywords a report may carry.
pub const MAX_MISSING_KEYWORDS: usize = 15;
/// Maximum number of matched keywords a report may carry.
pub const MAX_MATCHED_KEYWORDS: usize = 20;

/// Deduplicated, lower-cased set of keywords.
///
/// Iterates in first-insertion order so that every downstream result
/// (matching, truncation, suggestions) is deterministic for a given input.
#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    ordered: Vec<String>,
    index: HashSet<String>,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a keyword, folding it to lowercase. Returns false if it was already present.
    pub fn insert(&mut self, keyword: impl AsRef<str>) -> bool {
        let keyword = keyword.as_ref().to_lowercase();
        if self.index.contains(&keyword) {
            return false;
        }
        self.index.insert(keyword.clone());
        self.ordered.push(keyword);
        true
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.index.contains(keyword)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.ordered
    }
}

/// Set equality: order does not matter.
impl PartialEq for KeywordSet {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for KeywordSet {}

impl<S: AsRef<str>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = KeywordSet::new();
        for keyword in iter {
            set.insert(keyword);
        }
        set
    }
}

impl<S: AsRef<str>> Extend<S> for KeywordSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for keyword in iter {
            self.insert(keyword);
        }
    }
}

/// Outcome of comparing resume keywords to job keywords.
///
/// `matched_keywords` and `missing_keywords` partition the job keyword set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub matched_keywords: KeywordSet,
    pub missing_keywords: KeywordSet,
    pub exact_match_count: usize,
    pub partial_match_count: usize,
}

/// Which strategy produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisMethod {
    #[serde(rename = "AI-Powered")]
    AiPowered,
    #[serde(rename = "Keyword-Based")]
    KeywordBased,
}

impl AnalysisMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMethod::AiPowered => "AI-Powered",
            AnalysisMethod::KeywordBased => "Keyword-Based",
        }
    }
}

/// The report every caller receives, regardless of which strategy ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// 0 – 100
    pub match_score: u32,
    /// at most `MAX_MISSING_KEYWORDS`
    pub missing_keywords: Vec<String>,
    /// at most `MAX_MATCHED_KEYWORDS`
    pub matched_keywords: Vec<String>,
    pub suggested_additions: String,
    pub total_job_keywords: usize,
    pub analysis_method: AnalysisMethod,
}

/// Clamps any signed score into the 0 – 100 range.
pub fn clamp_score(score: i64) -> u32 {
    score.clamp(0, 100) as u32
}

/// Copies at most `cap` keywords into an owned list.
pub fn capped<'a>(keywords: impl IntoIterator<Item = &'a str>, cap: usize) -> Vec<String> {
    keywords.into_iter().take(cap).map(str::to_string).collect()
}
