//! Resume Rewriter: tailors the resume text and splits off the fit summary.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::llm_client::LanguageModel;
use crate::tools::prompts::{
    render, MISSING_JOB_DESCRIPTION, REWRITE_PROMPT_TEMPLATE, REWRITE_SYSTEM,
};
use crate::workflow::collaborators::{ResumeRewriter, RewriteInput, RewrittenResume, StepError};

/// Heading the model is asked to put in front of the fit summary.
pub const SUMMARY_MARKER: &str = "Summary:";
/// Used when the model output has no usable summary section.
pub const FALLBACK_SUMMARY: &str = "Summary could not be generated separately.";

pub struct LlmResumeRewriter {
    llm: Arc<dyn LanguageModel>,
}

impl LlmResumeRewriter {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeRewriter for LlmResumeRewriter {
    async fn rewrite(&self, input: RewriteInput<'_>) -> Result<RewrittenResume, StepError> {
        let prompt = build_rewrite_prompt(&input);
        let content = self.llm.complete(&prompt, REWRITE_SYSTEM).await?;

        let rewritten = split_summary(&content);
        info!(
            resume_chars = rewritten.optimized_resume.len(),
            has_summary = rewritten.summary != FALLBACK_SUMMARY,
            "Resume rewritten"
        );
        Ok(rewritten)
    }
}

fn build_rewrite_prompt(input: &RewriteInput<'_>) -> String {
    let keywords = input.keywords.join(", ");
    render(
        REWRITE_PROMPT_TEMPLATE,
        &[
            ("keywords", keywords.as_str()),
            ("summary_marker", SUMMARY_MARKER),
            ("resume_text", input.resume_text),
            (
                "job_description",
                input.job_description.unwrap_or(MISSING_JOB_DESCRIPTION),
            ),
        ],
    )
}

/// Splits model output at the last summary marker, since the fit summary
/// comes after the resume and the resume may carry its own "Summary:"
/// section. Without a marker (or with nothing after it) the whole text is
/// the resume and the summary falls back to `FALLBACK_SUMMARY`.
pub fn split_summary(content: &str) -> RewrittenResume {
    if let Some((resume, summary)) = content.rsplit_once(SUMMARY_MARKER) {
        let summary = summary.trim();
        if !summary.is_empty() {
            return RewrittenResume {
                optimized_resume: resume.trim().to_string(),
                summary: summary.to_string(),
            };
        }
        warn!("Summary marker present but summary section is empty");
        return RewrittenResume {
            optimized_resume: resume.trim().to_string(),
            summary: FALLBACK_SUMMARY.to_string(),
        };
    }

    warn!("Model output has no summary marker, using fallback summary");
    RewrittenResume {
        optimized_resume: content.trim().to_string(),
        summary: FALLBACK_SUMMARY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::testing::ScriptedModel;

    const RESUME: &str = "Jane Doe\nBackend engineer, 6 years Go and Rust";

    fn keywords() -> Vec<String> {
        vec!["Rust".to_string(), "Kubernetes".to_string()]
    }

    #[test]
    fn test_split_summary_with_marker() {
        let out = split_summary(
            "Jane Doe\nSenior Rust engineer\n\nSummary: Jane has shipped Rust services at scale.",
        );
        assert_eq!(out.optimized_resume, "Jane Doe\nSenior Rust engineer");
        assert_eq!(out.summary, "Jane has shipped Rust services at scale.");
    }

    #[test]
    fn test_split_summary_without_marker_keeps_full_text() {
        let out = split_summary("  Jane Doe\nSenior Rust engineer  ");
        assert_eq!(out.optimized_resume, "Jane Doe\nSenior Rust engineer");
        assert_eq!(out.summary, FALLBACK_SUMMARY);
    }

    #[test]
    fn test_split_summary_empty_summary_section() {
        let out = split_summary("Jane Doe\nSummary:   ");
        assert_eq!(out.optimized_resume, "Jane Doe");
        assert_eq!(out.summary, FALLBACK_SUMMARY);
    }

    #[test]
    fn test_split_summary_keeps_resume_summary_heading() {
        let out = split_summary(
            "Jane Doe\nSummary: Backend engineer, 6 years Rust.\nExperience\n- Acme\n\nSummary: Jane is a strong fit.",
        );
        assert_eq!(
            out.optimized_resume,
            "Jane Doe\nSummary: Backend engineer, 6 years Rust.\nExperience\n- Acme"
        );
        assert_eq!(out.summary, "Jane is a strong fit.");
    }

    #[test]
    fn test_prompt_leaves_placeholders_in_resume_untouched() {
        let kws = keywords();
        let resume = "Jane Doe\nWrote a {job_description} templating engine";
        let prompt = build_rewrite_prompt(&RewriteInput {
            resume_text: resume,
            keywords: &kws,
            job_description: Some("Platform engineer"),
        });
        assert!(prompt.contains(resume));
        assert_eq!(prompt.matches("Platform engineer").count(), 1);
    }

    #[test]
    fn test_prompt_contains_inputs() {
        let kws = keywords();
        let prompt = build_rewrite_prompt(&RewriteInput {
            resume_text: RESUME,
            keywords: &kws,
            job_description: Some("Platform engineer, Rust and Kubernetes"),
        });
        assert!(prompt.contains("Rust, Kubernetes"));
        assert!(prompt.contains(RESUME));
        assert!(prompt.contains("Platform engineer, Rust and Kubernetes"));
        assert!(prompt.contains(SUMMARY_MARKER));
    }

    #[test]
    fn test_prompt_without_job_description() {
        let kws = keywords();
        let prompt = build_rewrite_prompt(&RewriteInput {
            resume_text: RESUME,
            keywords: &kws,
            job_description: None,
        });
        assert!(prompt.contains(MISSING_JOB_DESCRIPTION));
    }

    #[tokio::test]
    async fn test_rewrite_populates_both_fields() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(
            "Jane Doe\nRust engineer\nSummary: Great fit.".to_string(),
        )]));
        let rewriter = LlmResumeRewriter::new(model.clone());
        let kws = keywords();

        let out = rewriter
            .rewrite(RewriteInput {
                resume_text: RESUME,
                keywords: &kws,
                job_description: Some("Rust role"),
            })
            .await
            .unwrap();

        assert_eq!(out.optimized_resume, "Jane Doe\nRust engineer");
        assert_eq!(out.summary, "Great fit.");
        assert_eq!(model.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_rewrite_model_error_is_fatal() {
        let model = Arc::new(ScriptedModel::new(vec![Err(529)]));
        let rewriter = LlmResumeRewriter::new(model);
        let kws = keywords();

        let err = rewriter
            .rewrite(RewriteInput {
                resume_text: RESUME,
                keywords: &kws,
                job_description: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StepError::Llm(_)));
    }
}
