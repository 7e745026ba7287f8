use reqwest::Client;
use scraper::{Html, Node};
use std::future::Future;
use std::time::Duration;

use crate::error::Result;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// Elements whose text never reaches the extracted review.
const SKIPPED_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

pub trait PageFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<HttpFetcher> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(HttpFetcher { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let res = self.client.get(url).send().await?.error_for_status()?;
        let body = res.text().await?;
        Ok(body)
    }
}

/// Visible text of a page: script/style content dropped, whitespace
/// collapsed to single spaces, cut to `max_chars` characters.
pub fn extract_review_text(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);

    let mut text = String::new();
    for node in document.root_element().descendants() {
        let Node::Text(chunk) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| SKIPPED_ELEMENTS.contains(&e.name()))
        });
        if hidden {
            continue;
        }
        for word in chunk.split_whitespace() {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(word);
        }
    }

    truncate_chars(text, max_chars)
}

fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text,
    }
}

/// Fetches a review page and extracts its text. Failures are logged and
/// give an empty string so one bad page never stops a run.
pub async fn get_review_content<F: PageFetcher>(fetcher: &F, url: &str, max_chars: usize) -> String {
    match fetcher.fetch(url).await {
        Ok(html) => extract_review_text(&html, max_chars),
        Err(e) => {
            log::error!("error extracting review from {url}, error: {:#}", e);
            String::new()
        }
    }
}
