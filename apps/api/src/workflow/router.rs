//! Router: pure decision function from the current state to the next step.

use std::fmt;

use tracing::debug;

use crate::workflow::state::{PipelineState, Stage};

/// A unit of work the orchestrator can dispatch. Each step is served by
/// exactly one collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    FetchJobDescription,
    ParseResume,
    ExtractKeywords,
    RewriteResume,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::FetchJobDescription => "fetch_job_description",
            Step::ParseResume => "parse_resume",
            Step::ExtractKeywords => "extract_keywords",
            Step::RewriteResume => "rewrite_resume",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Run(Step),
    /// Every required output is present; the run stops.
    Terminal,
}

/// Picks the next step for `state`. Holds no memory between calls, so the
/// same state always yields the same decision.
pub fn decide(state: &PipelineState) -> Decision {
    let decision = match state.stage() {
        Stage::AwaitingJobDescription => Decision::Run(Step::FetchJobDescription),
        Stage::AwaitingResumeText => Decision::Run(Step::ParseResume),
        Stage::AwaitingKeywords => Decision::Run(Step::ExtractKeywords),
        Stage::AwaitingRewrite => Decision::Run(Step::RewriteResume),
        Stage::Done => Decision::Terminal,
    };

    match decision {
        Decision::Run(step) => debug!(step = %step, "Router decision"),
        Decision::Terminal => debug!("Router decision: all outputs present"),
    }

    decision
}
