use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::config::Config;
use crate::data_models::{BuyLink, Review, SearchEnrichment};
use crate::error::{PipelineError, Result};
use crate::scrapper::{PageFetcher, get_review_content};
use crate::search::{SearchProvider, SearchQuery};

// Single digit then '.', as written by the report formatter. A "10." line is
// not recognized.
static NUMBERED_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]\.").unwrap());

/// Product names from a report's numbered lines, in report order.
pub fn extract_product_names(report: &str) -> Vec<String> {
    report
        .lines()
        .map(str::trim)
        .filter(|line| NUMBERED_LINE_RE.is_match(line))
        .filter_map(|line| line.split_once('.'))
        .map(|(_, name)| name.trim().to_string())
        .collect()
}

pub fn read_product_names(report_path: impl AsRef<Path>) -> Result<Vec<String>> {
    let report_path = report_path.as_ref();
    let report = std::fs::read_to_string(report_path).map_err(|e| {
        log::error!("error reading report {}: {}", report_path.display(), e);
        PipelineError::io(report_path, e)
    })?;
    Ok(extract_product_names(&report))
}

/// Writes enrichment results as pretty JSON, keeping non-ASCII text as is.
pub fn save_search_results(results: &[SearchEnrichment], output_file: impl AsRef<Path>) -> Result<()> {
    let output_file = output_file.as_ref();
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(output_file, json).map_err(|e| {
        log::error!("error saving results to {}: {}", output_file.display(), e);
        PipelineError::io(output_file, e)
    })?;
    log::info!("results saved to {}", output_file.display());
    Ok(())
}

/// Looks up buy links and reviews for each product, one product at a time.
pub struct Enricher<S, F> {
    search: S,
    fetcher: F,
    config: Config,
}

impl<S: SearchProvider, F: PageFetcher> Enricher<S, F> {
    pub fn new(search: S, fetcher: F, config: Config) -> Enricher<S, F> {
        Enricher {
            search,
            fetcher,
            config,
        }
    }

    /// Enriches every product, sleeping between products. Search or scrape
    /// failures only leave the affected list empty.
    pub async fn enrich(&self, names: &[String]) -> Vec<SearchEnrichment> {
        let mut all_results = Vec::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if i > 0 && !self.config.delay_between_products.is_zero() {
                tokio::time::sleep(self.config.delay_between_products).await;
            }
            log::info!("processing: {name}");
            all_results.push(self.enrich_product(name).await);
        }
        all_results
    }

    pub async fn enrich_product(&self, name: &str) -> SearchEnrichment {
        let mut product = SearchEnrichment::new(name.to_string());
        product.buy_links = self.buy_links(name).await;
        product.reviews = self.reviews(name).await;
        product
    }

    async fn buy_links(&self, name: &str) -> Vec<BuyLink> {
        let query = SearchQuery::buy(name, self.config.result_limit);
        let shopping = match self.search.search(&query).await {
            Ok(res) => res.shopping.unwrap_or_default(),
            Err(e) => {
                log::error!("error searching for {name}: {:#}", e);
                return Vec::new();
            }
        };
        shopping
            .into_iter()
            .take(self.config.result_limit)
            .map(|item| BuyLink {
                title: item.title,
                link: item.link,
                price: item.price,
            })
            .collect()
    }

    async fn reviews(&self, name: &str) -> Vec<Review> {
        let query = SearchQuery::review(name, self.config.result_limit, &self.config.review_topic);
        let organic = match self.search.search(&query).await {
            Ok(res) => res.organic.unwrap_or_default(),
            Err(e) => {
                log::error!("error searching for {name}: {:#}", e);
                return Vec::new();
            }
        };

        let mut reviews = Vec::new();
        for item in organic.into_iter().take(self.config.result_limit) {
            if item.link.is_empty() {
                continue;
            }
            let content =
                get_review_content(&self.fetcher, &item.link, self.config.review_char_budget).await;
            reviews.push(Review {
                title: item.title,
                link: item.link,
                snippet: item.snippet,
                content,
            });
        }
        reviews
    }

    /// Reads product names from `report_path`, enriches them and writes the
    /// JSON array to `output_path`.
    pub async fn run(
        &self,
        report_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
    ) -> Result<Vec<SearchEnrichment>> {
        let names = read_product_names(report_path)?;
        log::info!("found {} products to search", names.len());
        let results = self.enrich(&names).await;
        save_search_results(&results, output_path)?;
        Ok(results)
    }
}
