// Production collaborators for the tailoring workflow.
// LLM-backed steps receive their model handle at construction; nothing here
// holds process-wide state.

pub mod job_fetcher;
pub mod keyword_extractor;
pub mod prompts;
pub mod resume_parser;
pub mod resume_rewriter;
