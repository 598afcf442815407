//! Axum route handler for the Optimize API, the process boundary of the
//! tailoring workflow.

use anyhow::anyhow;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::workflow::{JobSource, PipelineState};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    /// Base64-encoded PDF.
    pub resume_file_b64: String,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default, alias = "job_url")]
    pub linkedin_job_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OptimizeResponse {
    pub optimized_resume: String,
    pub summary: String,
}

impl OptimizeRequest {
    /// Validates the request and builds the initial pipeline state.
    /// Blank strings count as absent; exactly one job source is required.
    pub fn into_initial_state(self) -> Result<PipelineState, AppError> {
        if self.resume_file_b64.trim().is_empty() {
            return Err(AppError::Validation(
                "resume_file_b64 cannot be empty".to_string(),
            ));
        }

        let description = self.job_description.filter(|d| !d.trim().is_empty());
        let url = self
            .linkedin_job_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        let job_source = match (description, url) {
            (Some(description), None) => JobSource::Description(description),
            (None, Some(url)) => {
                validate_job_url(&url)?;
                JobSource::Url(url)
            }
            (Some(_), Some(_)) => {
                return Err(AppError::Validation(
                    "Provide either job_description or linkedin_job_url, not both.".to_string(),
                ))
            }
            (None, None) => {
                return Err(AppError::Validation(
                    "Either job_description or linkedin_job_url must be provided.".to_string(),
                ))
            }
        };

        Ok(PipelineState::new(self.resume_file_b64, job_source))
    }
}

fn validate_job_url(url: &str) -> Result<(), AppError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| AppError::Validation(format!("linkedin_job_url is not a valid URL: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AppError::Validation(format!(
            "linkedin_job_url must use http or https, got '{other}'"
        ))),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /optimize
///
/// Runs the tailoring workflow to completion and returns the rewritten
/// resume plus fit summary. A degraded run (e.g. the posting could not be
/// fetched) still returns 200 with explanatory text in the fields.
pub async fn handle_optimize(
    State(state): State<AppState>,
    payload: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Result<Json<OptimizeResponse>, AppError> {
    let Json(request) = payload?;
    let initial = request.into_initial_state()?;

    let run_id = Uuid::new_v4();
    info!(%run_id, "Invoking resume tailoring pipeline");

    let final_state = state
        .orchestrator
        .run(initial)
        .instrument(info_span!("pipeline_run", %run_id))
        .await?;

    let (optimized_resume, summary) = final_state
        .into_outputs()
        .ok_or_else(|| AppError::Internal(anyhow!("Pipeline finished without outputs")))?;

    info!(%run_id, "Pipeline run finished");

    Ok(Json(OptimizeResponse {
        optimized_resume,
        summary,
    }))
}
