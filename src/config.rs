use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config::from_env()
});

/// Settings for every stage of the pipeline. Components receive this
/// explicitly; only the binary reads the global [`CONFIG`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Raw API response dump read by the loader.
    pub input_path: PathBuf,
    /// Report written by the formatter and read back by the enricher.
    pub report_path: PathBuf,
    /// JSON file the enricher writes.
    pub output_path: PathBuf,
    pub api_key: Option<String>,
    /// Max results kept per search query.
    pub result_limit: usize,
    pub delay_between_products: Duration,
    pub request_timeout: Duration,
    /// Max characters kept from a scraped review page.
    pub review_char_budget: usize,
    /// Product category appended to review queries.
    pub review_topic: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_path: PathBuf::from("response_regular.txt"),
            report_path: PathBuf::from("recommendations.txt"),
            output_path: PathBuf::from("product_reviews.json"),
            api_key: None,
            result_limit: 3,
            delay_between_products: Duration::from_secs(2),
            request_timeout: Duration::from_secs(10),
            review_char_budget: 5000,
            review_topic: "espresso machine".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Config {
        let defaults = Config::default();
        Config {
            input_path: get_env_or("PPLX_RESPONSE_PATH", defaults.input_path),
            report_path: get_env_or("REPORT_PATH", defaults.report_path),
            output_path: get_env_or("ENRICHMENT_PATH", defaults.output_path),
            api_key: get_env_opt("SERPER_API_KEY"),
            result_limit: get_env_or("RESULT_LIMIT", defaults.result_limit),
            delay_between_products: Duration::from_secs(get_env_or(
                "PRODUCT_DELAY_SECS",
                defaults.delay_between_products.as_secs(),
            )),
            request_timeout: Duration::from_secs(get_env_or(
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
            review_char_budget: get_env_or("REVIEW_CHAR_BUDGET", defaults.review_char_budget),
            review_topic: get_env_or("REVIEW_TOPIC", defaults.review_topic),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_result_limit(mut self, limit: usize) -> Self {
        self.result_limit = limit;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_between_products = delay;
        self
    }
}

fn get_env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or<T: FromStr>(key: &str, default: T) -> T {
    match get_env_opt(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("ignoring unparsable value for {key}: {raw}");
            default
        }),
        None => default,
    }
}
