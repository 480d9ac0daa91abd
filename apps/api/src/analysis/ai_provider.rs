//! AI analysis — pluggable provider trait plus the LLM-backed implementation.
//!
//! The remote payload is never trusted: every field is coerced, clamped or
//! defaulted before it reaches a report.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::analysis::models::{
    clamp_score, AnalysisMethod, AnalysisReport, MAX_MATCHED_KEYWORDS, MAX_MISSING_KEYWORDS,
};
use crate::analysis::normalizer::extract_keywords;
use crate::analysis::prompts::{analysis_system, build_analysis_prompt};
use crate::llm_client::{LlmClient, LlmError};

pub const DEFAULT_SUGGESTION: &str =
    "Consider tailoring your resume to better match the job requirements.";

/// Why the AI tier could not produce a report. Always recovered by the engine.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI transport failure: {0}")]
    Transport(String),

    #[error("AI response parse failure: {0}")]
    Parse(String),
}

impl From<LlmError> for AiError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::NoJson | LlmError::Parse(_) => AiError::Parse(err.to_string()),
            LlmError::Http(_) | LlmError::Api { .. } | LlmError::EmptyContent => {
                AiError::Transport(err.to_string())
            }
        }
    }
}

/// A remote analysis backend. Implement this to swap providers without
/// touching the engine.
///
/// Carried in `AnalysisEngine` as `Arc<dyn AiAnalysisProvider>`.
#[async_trait]
pub trait AiAnalysisProvider: Send + Sync {
    async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalysisReport, AiError>;
}

/// Provider backed by the chat-completion service behind `LlmClient`.
pub struct LlmAnalysisProvider {
    llm: LlmClient,
}

impl LlmAnalysisProvider {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl AiAnalysisProvider for LlmAnalysisProvider {
    async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalysisReport, AiError> {
        let prompt = build_analysis_prompt(resume_text, job_description);
        let payload = self.llm.call_json(&prompt, &analysis_system()).await?;

        let total_job_keywords = extract_keywords(Some(job_description)).len();

        sanitize_payload(&payload, total_job_keywords)
    }
}

/// Turns an untrusted JSON payload into a report.
///
/// `total_job_keywords` comes from local extraction, never from the payload.
pub fn sanitize_payload(
    payload: &Value,
    total_job_keywords: usize,
) -> Result<AnalysisReport, AiError> {
    if !payload.is_object() {
        return Err(AiError::Parse(format!(
            "expected a JSON object, got {}",
            json_type_name(payload)
        )));
    }

    Ok(AnalysisReport {
        match_score: clamp_score(coerce_score(payload.get("matchScore"))),
        missing_keywords: string_list(payload.get("missingKeywords"), MAX_MISSING_KEYWORDS),
        matched_keywords: string_list(payload.get("matchedKeywords"), MAX_MATCHED_KEYWORDS),
        suggested_additions: payload
            .get("suggestedAdditions")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_SUGGESTION)
            .to_string(),
        total_job_keywords,
        analysis_method: AnalysisMethod::AiPowered,
    })
}

/// Integer reading of a score field; 0 when it is not numeric.
///
/// Fractions truncate toward zero and strings are read by their leading
/// integer ("85%" → 85).
fn coerce_score(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => leading_integer(s).unwrap_or(0),
        _ => 0,
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // saturate absurdly long digit runs; the caller clamps anyway
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(sign * magnitude)
}

/// String entries of a JSON array, capped; anything else becomes empty.
fn string_list(value: Option<&Value>, cap: usize) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .take(cap)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
