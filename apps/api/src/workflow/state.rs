//! State Container: the single record threaded through one pipeline run.
//!
//! A `PipelineState` is an immutable value: it is only ever advanced by
//! `merge`, which consumes the previous state and returns the next one.
//! Every optional field is set at most once per run; the router reads field
//! presence (via `Stage`) to pick the next step, so a field that could be
//! unset again would break termination. `StatePatch` therefore has no way to
//! clear a field, and `resume_source` is not patchable at all.

use tracing::warn;

/// Where the job description comes from at the start of a run.
/// Exactly one source is allowed, which the type enforces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobSource {
    /// A posting URL that the fetch step resolves into text.
    Url(String),
    /// Job description text supplied directly by the caller.
    Description(String),
}

/// Pipeline stage derived purely from which fields are populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitingJobDescription,
    AwaitingResumeText,
    AwaitingKeywords,
    AwaitingRewrite,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineState {
    resume_source: String,
    job_source_url: Option<String>,
    job_description: Option<String>,
    resume_text: Option<String>,
    keywords: Option<Vec<String>>,
    optimized_resume: Option<String>,
    summary: Option<String>,
}

/// Partial update produced by one step. `None` means "leave untouched".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatePatch {
    pub job_description: Option<String>,
    pub resume_text: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub optimized_resume: Option<String>,
    pub summary: Option<String>,
}

impl PipelineState {
    /// Creates the initial state of a run.
    pub fn new(resume_source: impl Into<String>, job_source: JobSource) -> Self {
        let (job_source_url, job_description) = match job_source {
            JobSource::Url(url) => (Some(url), None),
            JobSource::Description(text) => (None, Some(text)),
        };

        Self {
            resume_source: resume_source.into(),
            job_source_url,
            job_description,
            resume_text: None,
            keywords: None,
            optimized_resume: None,
            summary: None,
        }
    }

    /// Builds a state with no job source at all. Only reachable from tests:
    /// the request boundary never lets such a state into the pipeline.
    #[cfg(test)]
    pub(crate) fn without_job_source(resume_source: impl Into<String>) -> Self {
        Self {
            resume_source: resume_source.into(),
            job_source_url: None,
            job_description: None,
            resume_text: None,
            keywords: None,
            optimized_resume: None,
            summary: None,
        }
    }

    pub fn resume_source(&self) -> &str {
        &self.resume_source
    }

    pub fn job_source_url(&self) -> Option<&str> {
        self.job_source_url.as_deref()
    }

    pub fn job_description(&self) -> Option<&str> {
        self.job_description.as_deref()
    }

    pub fn resume_text(&self) -> Option<&str> {
        self.resume_text.as_deref()
    }

    pub fn keywords(&self) -> Option<&[String]> {
        self.keywords.as_deref()
    }

    pub fn optimized_resume(&self) -> Option<&str> {
        self.optimized_resume.as_deref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Current stage. Check order mirrors the step dependency chain:
    /// rewrite needs keywords, keywords need the job description, and the
    /// job description may need a fetch.
    pub fn stage(&self) -> Stage {
        if self.job_source_url.is_some() && self.job_description.is_none() {
            Stage::AwaitingJobDescription
        } else if self.resume_text.is_none() {
            Stage::AwaitingResumeText
        } else if self.keywords.is_none() {
            Stage::AwaitingKeywords
        } else if self.optimized_resume.is_none() {
            Stage::AwaitingRewrite
        } else {
            Stage::Done
        }
    }

    /// Additive merge: every field present in `patch` is set on the returned
    /// state, nothing is ever cleared. Overwriting a populated field is a
    /// caller bug; it is applied (last write wins) and logged.
    pub fn merge(self, patch: StatePatch) -> Self {
        Self {
            resume_source: self.resume_source,
            job_source_url: self.job_source_url,
            job_description: merge_field(
                "job_description",
                self.job_description,
                patch.job_description,
            ),
            resume_text: merge_field("resume_text", self.resume_text, patch.resume_text),
            keywords: merge_field("keywords", self.keywords, patch.keywords),
            optimized_resume: merge_field(
                "optimized_resume",
                self.optimized_resume,
                patch.optimized_resume,
            ),
            summary: merge_field("summary", self.summary, patch.summary),
        }
    }

    /// Consumes a finished state, returning `(optimized_resume, summary)`.
    /// `None` if the run has not reached `Stage::Done`.
    pub fn into_outputs(self) -> Option<(String, String)> {
        match (self.optimized_resume, self.summary) {
            (Some(resume), Some(summary)) => Some((resume, summary)),
            _ => None,
        }
    }
}

fn merge_field<T>(name: &'static str, current: Option<T>, incoming: Option<T>) -> Option<T> {
    match (current, incoming) {
        (Some(_), Some(next)) => {
            warn!(field = name, "State field overwritten after it was already set");
            Some(next)
        }
        (current, None) => current,
        (None, next) => next,
    }
}

impl StatePatch {
    /// Names of the fields this patch sets, in declaration order.
    pub fn populated_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.job_description.is_some() {
            fields.push("job_description");
        }
        if self.resume_text.is_some() {
            fields.push("resume_text");
        }
        if self.keywords.is_some() {
            fields.push("keywords");
        }
        if self.optimized_resume.is_some() {
            fields.push("optimized_resume");
        }
        if self.summary.is_some() {
            fields.push("summary");
        }
        fields
    }
}
