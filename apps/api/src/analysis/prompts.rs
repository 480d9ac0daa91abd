// All LLM prompt constants for resume analysis.
// Reuses the JSON-only fragment from llm_client::prompts.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

const ANALYZER_ROLE: &str = "You are an expert resume analyzer.";

/// System prompt: analyzer persona plus the JSON-only rule.
pub fn analysis_system() -> String {
    format!("{ANALYZER_ROLE} {JSON_ONLY_SYSTEM}")
}

/// Analysis prompt template. Replace `{resume_text}` and `{job_description}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert resume analyzer. Analyze the following resume against the job description and provide a detailed assessment.

RESUME:
{resume_text}

JOB DESCRIPTION:
{job_description}

Please analyze and respond with a JSON object containing:
1. matchScore: A percentage (0-100) indicating how well the resume matches the job requirements
2. missingKeywords: Array of important keywords/skills from the job description that are missing from the resume
3. matchedKeywords: Array of keywords/skills that are present in both the resume and job description
4. suggestedAdditions: A detailed string with specific suggestions for improving the resume

Focus on technical skills, relevant experience, and industry-specific terminology. Be thorough but concise.

Respond only with valid JSON in this exact format:
{
  "matchScore": 75,
  "missingKeywords": ["keyword1", "keyword2"],
  "matchedKeywords": ["keyword3", "keyword4"],
  "suggestedAdditions": "Detailed suggestions here..."
}"#;

/// Fills the analysis template. The job description is substituted first so
/// placeholder-like text inside the resume is never re-expanded.
pub fn build_analysis_prompt(resume_text: &str, job_description: &str) -> String {
    ANALYSIS_PROMPT_TEMPLATE
        .replace("{job_description}", job_description)
        .replace("{resume_text}", resume_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_both_documents() {
        let prompt = build_analysis_prompt("RESUME BODY", "JOB BODY");
        assert!(prompt.contains("RESUME:\nRESUME BODY"));
        assert!(prompt.contains("JOB DESCRIPTION:\nJOB BODY"));
        assert!(!prompt.contains("{resume_text}"));
        assert!(!prompt.contains("{job_description}"));
    }

    #[test]
    fn test_prompt_names_every_report_field() {
        for field in ["matchScore", "missingKeywords", "matchedKeywords", "suggestedAdditions"] {
            assert!(ANALYSIS_PROMPT_TEMPLATE.contains(field), "missing {field}");
        }
    }

    #[test]
    fn test_system_prompt_demands_json() {
        let system = analysis_system();
        assert!(system.starts_with(ANALYZER_ROLE));
        assert!(system.contains("valid JSON only"));
    }
}
