//! Axum route handlers for the Analysis API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::models::AnalysisReport;
use crate::errors::AppError;
use crate::state::AppState;

const RESUME_MIN_CHARS: usize = 50;
const RESUME_MAX_CHARS: usize = 50_000;
const JOB_MIN_CHARS: usize = 50;
const JOB_MAX_CHARS: usize = 20_000;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub resume_text: Option<String>,
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub data: AnalyzeData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeData {
    #[serde(flatten)]
    pub report: AnalysisReport,
    pub analysis_timestamp: DateTime<Utc>,
}

/// A request that passed validation.
#[derive(Debug)]
pub struct ValidatedRequest {
    pub resume_text: String,
    pub job_description: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

pub fn validate_request(request: AnalyzeRequest) -> Result<ValidatedRequest, AppError> {
    let resume_text = validate_field(
        request.resume_text,
        "Resume text",
        RESUME_MIN_CHARS,
        RESUME_MAX_CHARS,
    )?;
    let job_description = validate_field(
        request.job_description,
        "Job description",
        JOB_MIN_CHARS,
        JOB_MAX_CHARS,
    )?;

    Ok(ValidatedRequest {
        resume_text,
        job_description,
    })
}

fn validate_field(
    value: Option<String>,
    label: &str,
    min: usize,
    max: usize,
) -> Result<String, AppError> {
    let value = match value {
        Some(v) if !v.is_empty() => v,
        _ => return Err(AppError::Validation(format!("{label} is required"))),
    };

    let chars = value.chars().count();
    if chars < min {
        return Err(AppError::Validation(format!(
            "{label} must be at least {min} characters"
        )));
    }
    if chars > max {
        return Err(AppError::Validation(format!(
            "{label} must not exceed {} characters",
            thousands(max)
        )));
    }

    Ok(value)
}

/// 50000 → "50,000"
fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Maps body extraction failures onto the API's error codes.
fn reject(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(e) => AppError::Validation(e.body_text()),
        other if other.status() == StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge,
        other => AppError::InvalidJson(other.body_text()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze
///
/// Analyzes a resume against a job description. Uses the AI tier when it is
/// available and the keyword pipeline otherwise; the response shape is the same.
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(request) = payload.map_err(reject)?;
    let request = validate_request(request)?;

    let report = state
        .engine
        .analyze_resume(&request.resume_text, &request.job_description)
        .await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        data: AnalyzeData {
            report,
            analysis_timestamp: Utc::now(),
        },
    }))
}
