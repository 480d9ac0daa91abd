//! Exact, then stemmed, comparison of job keywords against a resume.

use std::collections::HashSet;

use crate::analysis::models::{KeywordSet, MatchResult};
use crate::analysis::stemmer::stem;

/// Partitions `job_keywords` into matched and missing.
///
/// A job keyword is matched exactly when the resume contains it verbatim,
/// partially when its stem equals the stem of any resume keyword. Exact wins
/// when both apply. Matched lists exact hits first, then partial hits, each in
/// job keyword order.
pub fn match_keywords(resume_keywords: &KeywordSet, job_keywords: &KeywordSet) -> MatchResult {
    let resume: KeywordSet = resume_keywords.iter().collect();
    let job: KeywordSet = job_keywords.iter().collect();

    let resume_stems: HashSet<String> = resume.iter().map(stem).collect();

    let mut exact = Vec::new();
    let mut partial = Vec::new();
    let mut missing = KeywordSet::new();

    for keyword in job.iter() {
        if resume.contains(keyword) {
            exact.push(keyword);
        } else if resume_stems.contains(&stem(keyword)) {
            partial.push(keyword);
        } else {
            missing.insert(keyword);
        }
    }

    let exact_match_count = exact.len();
    let partial_match_count = partial.len();

    MatchResult {
        matched_keywords: exact.into_iter().chain(partial).collect(),
        missing_keywords: missing,
        exact_match_count,
        partial_match_count,
    }
}
