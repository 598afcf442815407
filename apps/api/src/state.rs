use std::sync::Arc;

use crate::config::Config;
use crate::workflow::Orchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Stateless between runs; every request builds its own PipelineState.
    pub orchestrator: Arc<Orchestrator>,
}
