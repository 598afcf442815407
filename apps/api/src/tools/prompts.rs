// Prompt constants for the keyword extraction and rewrite steps, and the
// placeholder renderer that fills them.

/// System prompt for keyword extraction: plain list output only.
pub const KEYWORD_SYSTEM: &str = "You are an expert technical recruiter. \
    You identify the skills and keywords a hiring manager screens for. \
    Respond with a single comma-separated list and nothing else. \
    Do NOT number the items. \
    Do NOT include explanations.";

/// Keyword extraction template. Replace `{max_keywords}` and `{job_description}`.
pub const KEYWORD_PROMPT_TEMPLATE: &str = r#"Extract the top {max_keywords} most important keywords and skills from this job description. Return them as a comma-separated list.

Job Description:
{job_description}"#;

/// System prompt for the resume rewrite.
pub const REWRITE_SYSTEM: &str = "You are an expert resume writer. \
    You tailor resumes to a specific role without inventing experience the candidate does not have.";

/// Rewrite template. Replace `{keywords}`, `{summary_marker}`,
/// `{resume_text}` and `{job_description}`.
pub const REWRITE_PROMPT_TEMPLATE: &str = r#"Rewrite the following resume to be tailored to the provided job description.
1. Integrate these specific keywords naturally: {keywords}.
2. Use strong, professional action verbs and quantify achievements where the original supports it.
3. Keep the tone professional and confident.
4. After the rewritten resume, write a compelling 3-sentence summary under the heading "{summary_marker}" explaining why the candidate is an excellent fit for the role.

Original Resume Content:
{resume_text}

Target Job Description:
{job_description}"#;

/// Stand-in used in the rewrite prompt when a run has no job description.
pub const MISSING_JOB_DESCRIPTION: &str = "(no job description was provided)";

/// Fills `{name}` placeholders in one pass over `template`. Substituted
/// values are never scanned again; unknown placeholders are left as is.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let matched = values.iter().find(|(name, _)| {
            tail.strip_prefix(name)
                .is_some_and(|after| after.starts_with('}'))
        });

        match matched {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}
