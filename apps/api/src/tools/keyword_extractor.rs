//! Keyword Extractor: top keywords of a job description via the LLM, with a
//! local frequency-based fallback so the step always yields a list.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::llm_client::LanguageModel;
use crate::tools::prompts::{render, KEYWORD_PROMPT_TEMPLATE, KEYWORD_SYSTEM};
use crate::workflow::collaborators::KeywordExtractor;

pub const MAX_KEYWORDS: usize = 5;
/// Items longer than this are prose the model wrapped around the list.
const MAX_KEYWORD_CHARS: usize = 60;

const STOP_WORDS: &[&str] = &[
    "a", "about", "across", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been",
    "both", "but", "by", "can", "candidate", "company", "do", "each", "experience", "for", "from",
    "have", "help", "if", "in", "including", "into", "is", "it", "its", "join", "looking", "more",
    "must", "new", "not", "of", "on", "or", "our", "plus", "role", "should", "such", "team",
    "that", "the", "their", "this", "to", "us", "we", "well", "what", "who", "will", "with",
    "work", "working", "years", "you", "your",
];

pub struct LlmKeywordExtractor {
    llm: Arc<dyn LanguageModel>,
}

impl LlmKeywordExtractor {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl KeywordExtractor for LlmKeywordExtractor {
    async fn extract(&self, job_description: Option<&str>) -> Vec<String> {
        let Some(job_description) = job_description.filter(|jd| !jd.trim().is_empty()) else {
            warn!("No job description available, keyword list left empty");
            return Vec::new();
        };

        let max_keywords = MAX_KEYWORDS.to_string();
        let prompt = render(
            KEYWORD_PROMPT_TEMPLATE,
            &[
                ("max_keywords", max_keywords.as_str()),
                ("job_description", job_description),
            ],
        );

        match self.llm.complete(&prompt, KEYWORD_SYSTEM).await {
            Ok(content) => {
                let keywords = parse_keyword_list(&content);
                if !keywords.is_empty() {
                    info!(?keywords, "Keywords extracted");
                    return keywords;
                }
                warn!("Model returned no usable keywords, falling back to term frequency");
            }
            Err(e) => {
                warn!(error = %e, "Keyword extraction call failed, falling back to term frequency");
            }
        }

        frequent_terms(job_description, MAX_KEYWORDS)
    }
}

/// Parses a comma- or line-separated list, dropping list decorations,
/// prose-length items and case-insensitive duplicates.
pub fn parse_keyword_list(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();

    content
        .split([',', '\n'])
        .map(clean_item)
        .filter(|item| !item.is_empty() && item.chars().count() <= MAX_KEYWORD_CHARS)
        .filter(|item| seen.insert(item.to_lowercase()))
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

fn clean_item(item: &str) -> &str {
    let item = item.trim();
    // "1. Rust", "2) Go", "- Kafka", "* SQL"
    let digits = item
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(item.len());
    let item = match digits {
        0 => item,
        _ => item[digits..].strip_prefix(['.', ')']).unwrap_or(item),
    };
    let item = item.trim_start_matches(['-', '*', '•']).trim();
    item.trim_matches(['"', '\'', '`', '.']).trim()
}

/// Most frequent non-stop-word terms, ties broken by first occurrence.
pub fn frequent_terms(text: &str, limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();

    let tokens = text
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.' | '-')))
        .map(|t| t.trim_matches(['.', '-']))
        .filter(|t| t.chars().count() > 1);

    for (position, token) in tokens.enumerate() {
        let lower = token.to_lowercase();
        if STOP_WORDS.contains(&lower.as_str()) || lower.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        counts
            .entry(lower)
            .and_modify(|(count, _)| *count += 1)
            .or_insert((1, position));
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(term, (count, first))| (term, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(term, _, _)| term)
        .collect()
}
