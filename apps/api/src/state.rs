use std::sync::Arc;
use std::time::Instant;

use crate::analysis::engine::AnalysisEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Stateless and `Sync`; shared by every request without locking.
    pub engine: Arc<AnalysisEngine>,
    pub started_at: Instant,
}
