//! Job Fetcher: downloads a job posting and pulls out the description text.
//!
//! Never fails from the pipeline's point of view: any error becomes a
//! job description starting with `FETCH_FAILURE_PREFIX`, so the run keeps
//! going with a degraded but human-readable description.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{info, warn};

use crate::workflow::collaborators::JobFetcher;

pub const FETCH_FAILURE_PREFIX: &str = "Failed to scrape the URL:";

/// Class of the element holding the description on LinkedIn job pages.
const DESCRIPTION_CLASS: &str = "show-more-less-html__markup";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// Elements rendered as a line break.
const BLOCK_TAGS: &[&str] = &[
    "br", "p", "div", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "section",
];
/// Elements whose text is never part of the description.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

#[derive(Debug, Error)]
enum FetchError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("Could not find job description on the page. The page structure might have changed.")]
    DescriptionNotFound,
}

pub struct HttpJobFetcher {
    client: Client,
}

impl HttpJobFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .build()?,
        })
    }

    async fn try_fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let html = response.text().await?;
        extract_job_description(&html).ok_or(FetchError::DescriptionNotFound)
    }
}

#[async_trait]
impl JobFetcher for HttpJobFetcher {
    async fn fetch(&self, url: &str) -> String {
        match self.try_fetch(url).await {
            Ok(description) => {
                info!(url, chars = description.len(), "Job description fetched");
                description
            }
            Err(e) => {
                warn!(url, error = %e, "Job description fetch failed");
                format!("{FETCH_FAILURE_PREFIX} {e}")
            }
        }
    }
}

/// Text content of the first element carrying `DESCRIPTION_CLASS`.
/// `None` if there is no such element or it has no text.
pub fn extract_job_description(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(&format!(".{DESCRIPTION_CLASS}")).ok()?;

    document
        .select(&selector)
        .map(|element| {
            let mut raw = String::new();
            collect_text(element, &mut raw);
            normalize_lines(&raw)
        })
        .find(|text| !text.is_empty())
}

/// Appends the text below `element`, breaking lines around block elements.
fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            let name = child_element.value().name();
            if SKIPPED_TAGS.contains(&name) {
                continue;
            }
            let block = BLOCK_TAGS.contains(&name);
            if block {
                out.push('\n');
            }
            collect_text(child_element, out);
            if block {
                out.push('\n');
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}

/// Collapses whitespace within lines and drops empty lines.
fn normalize_lines(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
