//! Suggestion Generator — turns missing keywords into an improvement paragraph.

use once_cell::sync::Lazy;
use regex::Regex;

/// Only the first few missing keywords are worth calling out.
const PRIORITY_KEYWORDS: usize = 8;
const MAX_TECHNICAL_SAMPLES: usize = 4;
const MAX_SOFT_SKILL_SAMPLES: usize = 3;
const MAX_OTHER_SAMPLES: usize = 3;

pub const FULL_ALIGNMENT_MESSAGE: &str = "Excellent keyword alignment! Your resume matches well \
    with the job requirements. Consider adding specific metrics and achievements to strengthen \
    your application.";

const CLOSING_ADVICE: &str = "Overall: Focus on quantifiable achievements and use action verbs. \
    Consider tailoring your resume summary to include 3-4 key terms from the job posting.";

static TECHNICAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^(javascript|python|java|react|angular|vue|node|express)$",
        r"(?i)^(mongodb|sql|postgresql|mysql|redis|elasticsearch)$",
        r"(?i)^(aws|azure|gcp|docker|kubernetes|jenkins|git)$",
        r"(?i)^(html|css|typescript|php|ruby|golang|rust|scala)$",
        r"(?i)^(api|rest|graphql|microservices|devops|ci/cd)$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("technical skill patterns are valid regexes"))
    .collect()
});

const SOFT_SKILLS: &[&str] = &[
    "leadership",
    "communication",
    "teamwork",
    "collaboration",
    "problem-solving",
    "analytical",
    "creative",
    "adaptable",
    "organized",
    "detail-oriented",
    "self-motivated",
    "proactive",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordCategory {
    Technical,
    SoftSkill,
    Other,
}

pub fn categorize(keyword: &str) -> KeywordCategory {
    if is_technical_skill(keyword) {
        KeywordCategory::Technical
    } else if is_soft_skill(keyword) {
        KeywordCategory::SoftSkill
    } else {
        KeywordCategory::Other
    }
}

fn is_technical_skill(keyword: &str) -> bool {
    TECHNICAL_PATTERNS.iter().any(|p| p.is_match(keyword))
}

fn is_soft_skill(keyword: &str) -> bool {
    let keyword = keyword.to_lowercase();
    SOFT_SKILLS.iter().any(|skill| keyword.contains(skill))
}

/// Builds plain-text advice from the keywords a resume is missing.
///
/// `matched` is accepted for symmetry with the match result; the advice only
/// depends on what is missing.
pub fn suggest<S: AsRef<str>>(missing: &[S], _matched: &[S]) -> String {
    if missing.is_empty() {
        return FULL_ALIGNMENT_MESSAGE.to_string();
    }

    let mut technical = Vec::new();
    let mut soft = Vec::new();
    let mut other = Vec::new();

    for keyword in missing.iter().take(PRIORITY_KEYWORDS) {
        let keyword: &str = keyword.as_ref();
        match categorize(keyword) {
            KeywordCategory::Technical => technical.push(keyword),
            KeywordCategory::SoftSkill => soft.push(keyword),
            KeywordCategory::Other => other.push(keyword),
        }
    }

    let mut sentences = Vec::new();

    if !technical.is_empty() {
        sentences.push(format!(
            "Technical Skills: Consider highlighting experience with {} in your skills section or project descriptions.",
            sample(&technical, MAX_TECHNICAL_SAMPLES)
        ));
    }
    if !soft.is_empty() {
        sentences.push(format!(
            "Soft Skills: Incorporate examples demonstrating {} in your experience descriptions.",
            sample(&soft, MAX_SOFT_SKILL_SAMPLES)
        ));
    }
    if !other.is_empty() {
        sentences.push(format!(
            "Industry Terms: Include relevant keywords like {} to better match the job requirements.",
            sample(&other, MAX_OTHER_SAMPLES)
        ));
    }
    sentences.push(CLOSING_ADVICE.to_string());

    sentences.join(" ")
}

fn sample(keywords: &[&str], limit: usize) -> String {
    keywords
        .iter()
        .take(limit)
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: &[&str] = &[];

    #[test]
    fn test_empty_missing_returns_full_alignment_message() {
        assert_eq!(suggest(NONE, &["rust"]), FULL_ALIGNMENT_MESSAGE);
    }

    #[test]
    fn test_categorize() {
        assert_eq!(categorize("python"), KeywordCategory::Technical);
        assert_eq!(categorize("Kubernetes"), KeywordCategory::Technical);
        assert_eq!(categorize("ci/cd"), KeywordCategory::Technical);
        assert_eq!(categorize("leadership"), KeywordCategory::SoftSkill);
        assert_eq!(categorize("problem-solving"), KeywordCategory::SoftSkill);
        assert_eq!(categorize("fintech"), KeywordCategory::Other);
        // anchored: substrings of technologies are not technical
        assert_eq!(categorize("javascripting"), KeywordCategory::Other);
    }

    #[test]
    fn test_one_sentence_per_bucket_plus_closing() {
        let text = suggest(&["python", "leadership", "fintech"], NONE);
        assert!(text.starts_with("Technical Skills: Consider highlighting experience with python"));
        assert!(text.contains("Soft Skills: Incorporate examples demonstrating leadership"));
        assert!(text.contains("Industry Terms: Include relevant keywords like fintech"));
        assert!(text.ends_with(CLOSING_ADVICE));
    }

    #[test]
    fn test_missing_bucket_is_omitted() {
        let text = suggest(&["docker", "aws"], NONE);
        assert!(text.contains("docker, aws"));
        assert!(!text.contains("Soft Skills"));
        assert!(!text.contains("Industry Terms"));
    }

    #[test]
    fn test_samples_are_capped_per_bucket() {
        let text = suggest(
            &["python", "java", "rust", "docker", "aws", "redis"],
            NONE,
        );
        assert!(text.contains("python, java, rust, docker in"));
        assert!(!text.contains("aws"));
    }

    #[test]
    fn test_only_first_eight_keywords_considered() {
        let missing = [
            "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "python",
        ];
        let text = suggest(&missing, &[]);
        assert!(!text.contains("python"));
        assert!(text.contains("alpha, bravo, charlie"));
    }

    #[test]
    fn test_output_names_a_supplied_term() {
        let missing = ["stakeholder", "roadmap"];
        let text = suggest(&missing, &[]);
        assert!(!text.is_empty());
        assert!(missing.iter().any(|k| text.contains(k)));
    }

    #[test]
    fn test_plain_text_single_spaced() {
        let text = suggest(&["python", "teamwork"], NONE);
        assert!(!text.contains("  "));
        assert!(!text.contains('\n'));
    }
}
