use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::data_models::{ParsedApiResponse, Usage};
use crate::error::{PipelineError, Result};

static CONTENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)content="(.*?)", refusal="#).unwrap());
static CITATIONS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"citations=\[(.*?)\]").unwrap());
static USAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"usage=CompletionUsage\(completion_tokens=(\d+), prompt_tokens=(\d+), total_tokens=(\d+)",
    )
    .unwrap()
});

/// Turns the text of a response dump into a [`ParsedApiResponse`].
///
/// Decoders never fail: a marker that is missing from the text leaves the
/// matching field at its empty/zero value.
pub trait ResponseDecoder: Send + Sync {
    fn decode(&self, text: &str) -> ParsedApiResponse;
}

/// Regex scraping of the `repr`-style dump written by the chat client.
#[derive(Debug, Default)]
pub struct PatternDecoder;

impl PatternDecoder {
    pub fn extract_content(text: &str) -> String {
        CONTENT_RE
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().replace("\\n", "\n"))
            .unwrap_or_default()
    }

    pub fn extract_citations(text: &str) -> Vec<String> {
        let region = CITATIONS_RE
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .unwrap_or("");
        if region.is_empty() {
            return Vec::new();
        }
        region
            .split(", ")
            .map(|c| c.trim_matches('\'').to_string())
            .collect()
    }

    pub fn extract_usage(text: &str) -> Usage {
        let Some(caps) = USAGE_RE.captures(text) else {
            return Usage::default();
        };
        // \d+ can still overflow u64; any such counter makes the whole usage a miss.
        let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok());
        match (num(1), num(2), num(3)) {
            (Some(completion_tokens), Some(prompt_tokens), Some(total_tokens)) => Usage {
                completion_tokens,
                prompt_tokens,
                total_tokens,
            },
            _ => {
                log::warn!("token usage counter out of range, using zero usage");
                Usage::default()
            }
        }
    }
}

impl ResponseDecoder for PatternDecoder {
    fn decode(&self, text: &str) -> ParsedApiResponse {
        ParsedApiResponse::new(
            Self::extract_content(text),
            Self::extract_citations(text),
            Self::extract_usage(text),
        )
    }
}

pub fn load_response_from_str(text: &str, decoder: &dyn ResponseDecoder) -> ParsedApiResponse {
    decoder.decode(text)
}

/// Reads a response dump from disk. Only I/O failures are reported.
pub fn load_response(path: impl AsRef<Path>, decoder: &dyn ResponseDecoder) -> Result<ParsedApiResponse> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        log::error!("failed to load response file {}: {}", path.display(), e);
        PipelineError::io(path, e)
    })?;
    let response = load_response_from_str(&text, decoder);
    log::info!(
        "loaded response from {}: {} chars of content, {} citations",
        path.display(),
        response.message_content.len(),
        response.citations.len()
    );
    Ok(response)
}
