//! Test doubles for collaborators and the language model.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::llm_client::{LanguageModel, LlmError};
use crate::tools::job_fetcher::FETCH_FAILURE_PREFIX;
use crate::workflow::collaborators::{
    Collaborators, JobFetcher, KeywordExtractor, ResumeParser, ResumeRewriter, RewriteInput,
    RewrittenResume, StepError,
};
use crate::workflow::router::Step;

/// Records which step each fake was invoked for, in order.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Step>>>);

impl CallLog {
    fn record(&self, step: Step) {
        self.0.lock().unwrap().push(step);
    }

    pub fn steps(&self) -> Vec<Step> {
        self.0.lock().unwrap().clone()
    }
}

pub struct FakeFetcher {
    log: CallLog,
    fail: bool,
}

impl FakeFetcher {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            fail: false,
        }
    }

    pub fn failing(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            fail: true,
        }
    }
}

#[async_trait]
impl JobFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> String {
        self.log.record(Step::FetchJobDescription);
        if self.fail {
            format!("{FETCH_FAILURE_PREFIX} connection reset")
        } else {
            format!("Fetched description for {url}")
        }
    }
}

pub struct EchoParser {
    log: CallLog,
}

#[async_trait]
impl ResumeParser for EchoParser {
    async fn parse(&self, resume_source: &str) -> Result<String, StepError> {
        self.log.record(Step::ParseResume);
        // Yield so concurrent runs actually interleave.
        tokio::task::yield_now().await;
        Ok(format!("text of {resume_source}"))
    }
}

pub struct FailingParser {
    log: CallLog,
}

impl FailingParser {
    pub fn new(log: &CallLog) -> Self {
        Self { log: log.clone() }
    }
}

#[async_trait]
impl ResumeParser for FailingParser {
    async fn parse(&self, _resume_source: &str) -> Result<String, StepError> {
        self.log.record(Step::ParseResume);
        Err(StepError::ResumeDecode("not a PDF".to_string()))
    }
}

pub struct FixedExtractor {
    log: CallLog,
}

#[async_trait]
impl KeywordExtractor for FixedExtractor {
    async fn extract(&self, _job_description: Option<&str>) -> Vec<String> {
        self.log.record(Step::ExtractKeywords);
        vec!["Rust".to_string(), "Tokio".to_string()]
    }
}

pub struct EchoRewriter {
    log: CallLog,
}

#[async_trait]
impl ResumeRewriter for EchoRewriter {
    async fn rewrite(&self, input: RewriteInput<'_>) -> Result<RewrittenResume, StepError> {
        self.log.record(Step::RewriteResume);
        Ok(RewrittenResume {
            optimized_resume: format!(
                "Tailored ({}): {}",
                input.keywords.join(", "),
                input.resume_text
            ),
            summary: "Strong fit for the role.".to_string(),
        })
    }
}

/// Collaborators that always succeed and record every call in `log`.
pub fn fake_collaborators(log: &CallLog) -> Collaborators {
    Collaborators {
        job_fetcher: Arc::new(FakeFetcher::new(log)),
        resume_parser: Arc::new(EchoParser { log: log.clone() }),
        keyword_extractor: Arc::new(FixedExtractor { log: log.clone() }),
        resume_rewriter: Arc::new(EchoRewriter { log: log.clone() }),
    }
}

/// Language model that replays scripted replies in order. `Err(status)`
/// simulates an API failure; an exhausted script fails with `EmptyContent`.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, u16>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<String, u16>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(status)) => Err(LlmError::Api {
                status,
                message: "scripted failure".to_string(),
            }),
            None => Err(LlmError::EmptyContent),
        }
    }
}
