//! Collaborator contracts the orchestrator depends on.
//!
//! Each step has its own trait with a typed output, so a collaborator cannot
//! return without producing the field its step is responsible for. Steps
//! that must never stall the pipeline (fetch, keyword extraction) are
//! infallible at the type level and encode failures in their output value.
//!
//! Implementations are shared across concurrent runs as `Arc<dyn ...>` and
//! must be stateless or internally synchronized.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::workflow::router::Step;

/// Fatal-to-run failure. Propagated by the orchestrator unchanged.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("Resume could not be decoded: {0}")]
    ResumeDecode(String),

    #[error("Language model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Step {step} dispatched without required field `{field}`")]
    MissingInput { step: Step, field: &'static str },
}

/// Resolves a job posting reference into job description text.
#[async_trait]
pub trait JobFetcher: Send + Sync {
    /// Never fails: on error the returned text explains what went wrong.
    async fn fetch(&self, url: &str) -> String;
}

/// Decodes the opaque resume payload into plain text.
#[async_trait]
pub trait ResumeParser: Send + Sync {
    async fn parse(&self, resume_source: &str) -> Result<String, StepError>;
}

/// Extracts an ordered keyword list from a job description.
#[async_trait]
pub trait KeywordExtractor: Send + Sync {
    /// Best-effort and infallible. `job_description` is `None` only for
    /// malformed runs that started without any job source.
    async fn extract(&self, job_description: Option<&str>) -> Vec<String>;
}

/// Everything the rewrite step reads from the state.
#[derive(Debug, Clone, Copy)]
pub struct RewriteInput<'a> {
    pub resume_text: &'a str,
    pub keywords: &'a [String],
    pub job_description: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenResume {
    pub optimized_resume: String,
    pub summary: String,
}

/// Produces the tailored resume and fit summary.
#[async_trait]
pub trait ResumeRewriter: Send + Sync {
    async fn rewrite(&self, input: RewriteInput<'_>) -> Result<RewrittenResume, StepError>;
}

/// The fixed dispatch table: one collaborator per `Step`.
#[derive(Clone)]
pub struct Collaborators {
    pub job_fetcher: Arc<dyn JobFetcher>,
    pub resume_parser: Arc<dyn ResumeParser>,
    pub keyword_extractor: Arc<dyn KeywordExtractor>,
    pub resume_rewriter: Arc<dyn ResumeRewriter>,
}
