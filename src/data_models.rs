use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub completion_tokens: u64,
    pub prompt_tokens: u64,
    pub total_tokens: u64,
}

/// What the loader pulls out of a raw response dump.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ParsedApiResponse {
    pub success: bool,
    pub message_content: String,
    pub citations: Vec<String>,
    pub usage: Usage,
}

impl ParsedApiResponse {
    pub fn new(message_content: String, citations: Vec<String>, usage: Usage) -> ParsedApiResponse {
        ParsedApiResponse {
            success: true,
            message_content,
            citations,
            usage,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PurchaseLink {
    pub label: String,
    pub url: String,
}

impl PurchaseLink {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> PurchaseLink {
        PurchaseLink {
            label: label.into(),
            url: url.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProductEntry {
    pub name: String,
    pub description: String,
    // Never filled by the current line rules; kept so the output shape stays stable.
    pub features: Vec<String>,
    pub retailers: Vec<String>,
    pub purchase_links: Vec<PurchaseLink>,
}

impl ProductEntry {
    pub fn new(name: String) -> ProductEntry {
        ProductEntry {
            name,
            description: "".to_string(), // filled when the product is closed.
            features: Vec::new(),
            retailers: Vec::new(),
            purchase_links: Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub success: bool,
    pub products: Vec<ProductEntry>,
    pub citations: Vec<String>,
    pub usage: Usage,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BuyLink {
    pub title: String,
    pub link: String,
    pub price: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub title: String,
    pub link: String,
    pub snippet: String,
    pub content: String,
}

/// Search and scrape results gathered for one product.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchEnrichment {
    pub name: String,
    pub buy_links: Vec<BuyLink>,
    pub reviews: Vec<Review>,
}

impl SearchEnrichment {
    pub fn new(name: String) -> SearchEnrichment {
        SearchEnrichment {
            name,
            buy_links: Vec::new(),
            reviews: Vec::new(),
        }
    }
}
