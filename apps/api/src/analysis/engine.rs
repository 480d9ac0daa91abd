//! Analysis Orchestrator — AI first, keyword fallback, one report.
//!
//! Flow: TRY_AI → Ai(report)
//!              ↘ AiError → FALLBACK → Fallback(report)
//!
//! The AI tier gets exactly one attempt, bounded by a timeout. Any failure
//! hands the request to the local keyword pipeline; callers only learn which
//! path ran through `analysis_method`.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analysis::ai_provider::{AiAnalysisProvider, AiError};
use crate::analysis::matcher::match_keywords;
use crate::analysis::models::{
    capped, clamp_score, AnalysisMethod, AnalysisReport, MAX_MATCHED_KEYWORDS,
    MAX_MISSING_KEYWORDS,
};
use crate::analysis::normalizer::Normalizer;
use crate::analysis::suggestions::suggest;

pub const DEFAULT_AI_TIMEOUT: Duration = Duration::from_secs(30);

/// The only error that leaves the engine.
#[derive(Debug, Error)]
#[error("Failed to perform resume analysis: {0}")]
pub struct EngineFailure(pub(crate) String);

/// Which strategy produced a report. Converting into `AnalysisReport` stamps
/// the matching `analysis_method`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Ai(AnalysisReport),
    Fallback(AnalysisReport),
}

impl From<AnalysisOutcome> for AnalysisReport {
    fn from(outcome: AnalysisOutcome) -> Self {
        match outcome {
            AnalysisOutcome::Ai(report) => AnalysisReport {
                analysis_method: AnalysisMethod::AiPowered,
                ..report
            },
            AnalysisOutcome::Fallback(report) => AnalysisReport {
                analysis_method: AnalysisMethod::KeywordBased,
                ..report
            },
        }
    }
}

pub struct AnalysisEngine {
    provider: Option<Arc<dyn AiAnalysisProvider>>,
    normalizer: Normalizer<'static>,
    ai_timeout: Duration,
}

impl AnalysisEngine {
    /// Engine with an AI tier.
    pub fn new(provider: Arc<dyn AiAnalysisProvider>, ai_timeout: Duration) -> Self {
        Self {
            provider: Some(provider),
            normalizer: Normalizer::default(),
            ai_timeout,
        }
    }

    /// Engine that always runs the keyword pipeline.
    pub fn keyword_only() -> Self {
        Self {
            provider: None,
            normalizer: Normalizer::default(),
            ai_timeout: DEFAULT_AI_TIMEOUT,
        }
    }

    pub fn ai_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Analyzes `resume_text` against `job_description`.
    ///
    /// AI failures never escape; only a failure of the local fallback does.
    pub async fn analyze_resume(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalysisReport, EngineFailure> {
        let outcome = match self.try_ai(resume_text, job_description).await {
            Ok(report) => AnalysisOutcome::Ai(report),
            Err(e) => {
                warn!("AI analysis unavailable, using keyword fallback: {e}");
                let report = catch_unwind(AssertUnwindSafe(|| {
                    self.fallback_analysis(resume_text, job_description)
                }))
                .map_err(|_| EngineFailure("keyword fallback panicked".to_string()))?;
                AnalysisOutcome::Fallback(report)
            }
        };

        let report = AnalysisReport::from(outcome);
        info!(
            "Resume analysis complete: method={}, score={}, job_keywords={}",
            report.analysis_method.as_str(),
            report.match_score,
            report.total_job_keywords
        );
        Ok(report)
    }

    async fn try_ai(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalysisReport, AiError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| AiError::Transport("AI analysis is disabled".to_string()))?;

        tokio::time::timeout(
            self.ai_timeout,
            provider.analyze(resume_text, job_description),
        )
        .await
        .map_err(|_| {
            AiError::Transport(format!(
                "AI call timed out after {}ms",
                self.ai_timeout.as_millis()
            ))
        })?
    }

    /// Deterministic keyword analysis: extract, match, score, suggest.
    pub fn fallback_analysis(&self, resume_text: &str, job_description: &str) -> AnalysisReport {
        let resume_keywords = self.normalizer.extract_keywords(Some(resume_text));
        let job_keywords = self.normalizer.extract_keywords(Some(job_description));
        let result = match_keywords(&resume_keywords, &job_keywords);
        debug!(
            "Keyword match: exact={}, partial={}, missing={}",
            result.exact_match_count,
            result.partial_match_count,
            result.missing_keywords.len()
        );

        let total_job_keywords = job_keywords.len();
        let match_score = if total_job_keywords > 0 {
            let ratio = result.matched_keywords.len() as f64 / total_job_keywords as f64;
            clamp_score((ratio * 100.0).round() as i64)
        } else {
            0
        };

        AnalysisReport {
            match_score,
            missing_keywords: capped(result.missing_keywords.iter(), MAX_MISSING_KEYWORDS),
            matched_keywords: capped(result.matched_keywords.iter(), MAX_MATCHED_KEYWORDS),
            suggested_additions: suggest(
                result.missing_keywords.as_slice(),
                result.matched_keywords.as_slice(),
            ),
            total_job_keywords,
            analysis_method: AnalysisMethod::KeywordBased,
        }
    }
}
