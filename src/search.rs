//! Client for the Serper web search API.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::error::{PipelineError, Result};

pub const SERPER_ENDPOINT: &str = "https://google.serper.dev/search";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Shopping,
    Organic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub num: usize,
    pub mode: SearchMode,
}

impl SearchQuery {
    /// Shopping query for places to buy the product.
    pub fn buy(product: &str, num: usize) -> SearchQuery {
        SearchQuery {
            query: format!("{product} buy amazon"),
            num,
            mode: SearchMode::Shopping,
        }
    }

    /// Organic query for expert reviews of the product.
    pub fn review(product: &str, num: usize, topic: &str) -> SearchQuery {
        let query = if topic.trim().is_empty() {
            format!("{product} expert review")
        } else {
            format!("{product} {} expert review", topic.trim())
        };
        SearchQuery {
            query,
            num,
            mode: SearchMode::Organic,
        }
    }
}

/// Body POSTed to the search endpoint.
#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
    pub q: &'a str,
    pub num: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_type: Option<SearchMode>,
}

impl<'a> From<&'a SearchQuery> for SearchRequest<'a> {
    fn from(query: &'a SearchQuery) -> Self {
        SearchRequest {
            q: &query.query,
            num: query.num,
            search_type: match query.mode {
                SearchMode::Shopping => Some(SearchMode::Shopping),
                SearchMode::Organic => None,
            },
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
pub struct SearchResponse {
    #[serde(default)]
    pub shopping: Option<Vec<ShoppingResult>>,
    #[serde(default)]
    pub organic: Option<Vec<OrganicResult>>,
}

#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShoppingResult {
    pub title: String,
    pub link: String,
    pub price: String,
}

#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OrganicResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

pub trait SearchProvider {
    fn search(&self, query: &SearchQuery) -> impl Future<Output = Result<SearchResponse>> + Send;
}

pub struct SerperClient {
    client: Client,
    api_key: String,
}

impl SerperClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<SerperClient> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(PipelineError::MissingApiKey);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(SerperClient { client, api_key })
    }
}

impl SearchProvider for SerperClient {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse> {
        log::debug!("searching {:?}: {}", query.mode, query.query);
        let res = self
            .client
            .post(SERPER_ENDPOINT)
            .header("X-API-KEY", &self.api_key)
            .json(&SearchRequest::from(query))
            .send()
            .await?
            .error_for_status()?;
        let body = res.json::<SearchResponse>().await?;
        Ok(body)
    }
}
