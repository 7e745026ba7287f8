//! Line-oriented parser turning the Markdown-ish answer text into products.
//!
//! The answer is read one trimmed line at a time:
//!
//! * `## Name` opens a new product (closing the previous one),
//! * `- **Available at:** A, B` sets the open product's retailers,
//! * any other `- text` bullet is a description fragment,
//! * a line holding `[label](url)` links adds purchase links,
//! * everything else is skipped.
//!
//! The first matching rule wins, in that order.

use once_cell::sync::Lazy;
use regex::Regex;
use std::str::Lines;

use crate::data_models::{ParseResult, ParsedApiResponse, ProductEntry, PurchaseLink};
use crate::error::{PipelineError, Result};

const HEADING_MARKER: &str = "## ";
const BULLET_MARKER: &str = "- ";
const RETAILERS_MARKER: &str = "**Available at:**";

static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Heading(&'a str),
    Retailers(Vec<String>),
    Bullet(&'a str),
    Links(Vec<PurchaseLink>),
    Other,
}

/// Classifies a single already-trimmed line.
pub fn classify_line(line: &str) -> LineKind<'_> {
    if let Some(name) = line.strip_prefix(HEADING_MARKER) {
        return LineKind::Heading(name.trim());
    }

    if let Some(rest) = line.strip_prefix(BULLET_MARKER) {
        if let Some((_, retailers)) = rest.split_once(RETAILERS_MARKER) {
            let retailers = retailers
                .trim()
                .split(',')
                .map(|r| r.trim().to_string())
                .collect();
            return LineKind::Retailers(retailers);
        }
        return LineKind::Bullet(rest.trim());
    }

    let links = extract_links(line);
    if links.is_empty() {
        LineKind::Other
    } else {
        LineKind::Links(links)
    }
}

/// All `[label](url)` occurrences, left to right.
pub fn extract_links(line: &str) -> Vec<PurchaseLink> {
    LINK_RE
        .captures_iter(line)
        .map(|c| PurchaseLink::new(&c[1], &c[2]))
        .collect()
}

/// The product currently accumulating lines.
#[derive(Debug)]
struct OpenProduct {
    entry: ProductEntry,
    description: Vec<String>,
}

impl OpenProduct {
    fn new(name: &str) -> OpenProduct {
        OpenProduct {
            entry: ProductEntry::new(name.to_string()),
            description: Vec::new(),
        }
    }

    fn finish(self) -> Result<ProductEntry> {
        let mut entry = self.entry;
        // Guards the non-empty name invariant. Parsed input cannot trip it:
        // a trimmed "## " line never survives the heading prefix check.
        if entry.name.is_empty() {
            return Err(PipelineError::Parse(
                "product heading without a name".to_string(),
            ));
        }
        entry.description = self.description.join(" ");
        Ok(entry)
    }
}

/// Single pass over the content, yielding each product once its block ends
/// (at the next heading or at end of input).
pub struct ProductParser<'a> {
    lines: Lines<'a>,
    open: Option<OpenProduct>,
}

impl<'a> ProductParser<'a> {
    pub fn new(content: &'a str) -> ProductParser<'a> {
        ProductParser {
            lines: content.lines(),
            open: None,
        }
    }
}

impl Iterator for ProductParser<'_> {
    type Item = Result<ProductEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            match classify_line(line.trim()) {
                LineKind::Heading(name) => {
                    if let Some(closed) = self.open.replace(OpenProduct::new(name)) {
                        return Some(closed.finish());
                    }
                }
                LineKind::Retailers(retailers) => {
                    if let Some(open) = self.open.as_mut() {
                        open.entry.retailers = retailers;
                    }
                }
                LineKind::Bullet(text) => {
                    if let Some(open) = self.open.as_mut() {
                        open.description.push(text.to_string());
                    }
                }
                LineKind::Links(links) => {
                    if let Some(open) = self.open.as_mut() {
                        open.entry.purchase_links.extend(links);
                    }
                }
                LineKind::Other => {}
            }
        }
        self.open.take().map(OpenProduct::finish)
    }
}

/// Parses the message body of a loaded response. On failure nothing
/// accumulated so far is returned.
pub fn parse_response(response: &ParsedApiResponse) -> Result<ParseResult> {
    let products = ProductParser::new(&response.message_content)
        .collect::<Result<Vec<ProductEntry>>>()
        .inspect_err(|e| log::error!("error parsing response content: {e}"))?;

    log::info!("parsed {} products", products.len());

    Ok(ParseResult {
        success: true,
        products,
        citations: response.citations.clone(),
        usage: response.usage,
    })
}
