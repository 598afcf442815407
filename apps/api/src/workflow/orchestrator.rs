//! Orchestrator: alternates router decisions with collaborator dispatch.
//!
//! Loop: decide → dispatch one collaborator → merge its patch → decide again,
//! until the router returns `Decision::Terminal`. Exactly one collaborator
//! call is in flight per run. There is no iteration cap: every dispatch
//! produces the field the router checks for that step, so each iteration
//! strictly advances the stage.

use std::time::Instant;

use tracing::{info, warn};

use crate::workflow::collaborators::{Collaborators, RewriteInput, StepError};
use crate::workflow::router::{self, Decision, Step};
use crate::workflow::state::{PipelineState, StatePatch};

pub struct Orchestrator {
    collaborators: Collaborators,
}

impl Orchestrator {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }

    /// Drives `initial` to completion. Fatal collaborator errors are returned
    /// unchanged; no retry, no partial state.
    pub async fn run(&self, initial: PipelineState) -> Result<PipelineState, StepError> {
        let mut state = initial;
        let mut steps_run: u32 = 0;

        loop {
            let step = match router::decide(&state) {
                Decision::Terminal => {
                    info!(steps = steps_run, "Pipeline run complete");
                    return Ok(state);
                }
                Decision::Run(step) => step,
            };

            info!(step = %step, "Dispatching step");
            let started = Instant::now();

            let patch = match self.dispatch(step, &state).await {
                Ok(patch) => patch,
                Err(e) => {
                    warn!(step = %step, error = %e, "Step failed, aborting run");
                    return Err(e);
                }
            };

            info!(
                step = %step,
                fields = ?patch.populated_fields(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Step completed"
            );

            state = state.merge(patch);
            steps_run += 1;
        }
    }

    /// Invokes the single collaborator registered for `step`.
    async fn dispatch(&self, step: Step, state: &PipelineState) -> Result<StatePatch, StepError> {
        let c = &self.collaborators;

        match step {
            Step::FetchJobDescription => {
                let url = require(step, "job_source_url", state.job_source_url())?;
                let job_description = c.job_fetcher.fetch(url).await;
                Ok(StatePatch {
                    job_description: Some(job_description),
                    ..Default::default()
                })
            }
            Step::ParseResume => {
                let resume_text = c.resume_parser.parse(state.resume_source()).await?;
                Ok(StatePatch {
                    resume_text: Some(resume_text),
                    ..Default::default()
                })
            }
            Step::ExtractKeywords => {
                let keywords = c.keyword_extractor.extract(state.job_description()).await;
                Ok(StatePatch {
                    keywords: Some(keywords),
                    ..Default::default()
                })
            }
            Step::RewriteResume => {
                let input = RewriteInput {
                    resume_text: require(step, "resume_text", state.resume_text())?,
                    keywords: require(step, "keywords", state.keywords())?,
                    job_description: state.job_description(),
                };
                let rewritten = c.resume_rewriter.rewrite(input).await?;
                Ok(StatePatch {
                    optimized_resume: Some(rewritten.optimized_resume),
                    summary: Some(rewritten.summary),
                    ..Default::default()
                })
            }
        }
    }
}

fn require<'a, T: ?Sized>(
    step: Step,
    field: &'static str,
    value: Option<&'a T>,
) -> Result<&'a T, StepError> {
    value.ok_or(StepError::MissingInput { step, field })
}
