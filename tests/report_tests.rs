use prodscout::PipelineError;
use prodscout::data_models::{ParseResult, ProductEntry, PurchaseLink, Usage};
use prodscout::enricher::extract_product_names;
use prodscout::report::*;

mod test_helpers {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static TEST_FILE_COUNTER: AtomicUsize = AtomicUsize::new(0);

    pub fn unique_temp_path(prefix: &str) -> PathBuf {
        let count = TEST_FILE_COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!("{}_{}_{}.txt", prefix, std::process::id(), count))
    }
}

use test_helpers::*;

fn sample_result() -> ParseResult {
    let mut breville = ProductEntry::new("Breville Barista Express".to_string());
    breville.description = "Built-in grinder".to_string();
    breville.retailers = vec!["Amazon".to_string(), "Williams Sonoma".to_string()];
    breville.purchase_links = vec![PurchaseLink::new("Buy on Amazon", "https://amazon.com/x")];

    let silvia = ProductEntry::new("Rancilio Silvia".to_string());

    ParseResult {
        success: true,
        products: vec![breville, silvia],
        citations: vec!["https://a.com".to_string(), "https://b.com".to_string()],
        usage: Usage {
            completion_tokens: 5,
            prompt_tokens: 7,
            total_tokens: 12,
        },
    }
}

#[test]
fn test_render_report_layout() {
    let expected = "=== Parsing Results ===\n\
\n\
Found 2 product recommendations:\n\
\n\
1. Breville Barista Express\n\
Description: Built-in grinder\n\
Available at: Amazon, Williams Sonoma\n\
Purchase Links:\n  - Buy on Amazon: https://amazon.com/x\n\
\n\
2. Rancilio Silvia\n\
Description: \n\
\n\
Citations: 2 sources\n  - https://a.com\n  - https://b.com\n\
\n\
Token Usage:\n  Completion tokens: 5\n  Prompt tokens: 7\n  Total tokens: 12\n";

    assert_eq!(render_report(&sample_result()), expected);
}

#[test]
fn test_empty_result_still_has_sections() {
    let result = ParseResult {
        success: true,
        products: vec![],
        citations: vec![],
        usage: Usage::default(),
    };
    let report = render_report(&result);
    assert!(report.contains("Found 0 product recommendations:"));
    assert!(report.contains("Citations: 0 sources"));
    assert!(report.contains("  Total tokens: 0"));
}

#[test]
fn test_report_names_feed_the_enricher() {
    let report = render_report(&sample_result());
    assert_eq!(
        extract_product_names(&report),
        vec!["Breville Barista Express", "Rancilio Silvia"]
    );
}

#[test]
fn test_write_report_into_any_writer() {
    let mut buf = String::new();
    write_report(&mut buf, &sample_result()).unwrap();
    assert_eq!(buf, render_report(&sample_result()));
    assert!(buf.starts_with("=== Parsing Results ===\n\nFound 2 product recommendations:\n"));
}

/// Writer that refuses everything after its first `limit` bytes.
struct FullWriter {
    written: usize,
    limit: usize,
}

impl std::fmt::Write for FullWriter {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.written += s.len();
        if self.written > self.limit {
            Err(std::fmt::Error)
        } else {
            Ok(())
        }
    }
}

#[test]
fn test_write_report_propagates_writer_errors() {
    let mut writer = FullWriter {
        written: 0,
        limit: 40,
    };
    assert!(write_report(&mut writer, &sample_result()).is_err());
}

#[test]
fn test_save_parsed_results_writes_file() -> anyhow::Result<()> {
    let path = unique_temp_path("prodscout_report");
    save_parsed_results(&sample_result(), &path)?;
    let written = std::fs::read_to_string(&path)?;
    std::fs::remove_file(&path).ok();
    assert_eq!(written, render_report(&sample_result()));
    Ok(())
}

#[test]
fn test_save_to_missing_directory_reports_error() {
    let path = std::env::temp_dir()
        .join("prodscout_no_such_dir_for_report")
        .join("out.txt");
    let err = save_parsed_results(&sample_result(), &path).unwrap_err();
    assert!(matches!(err, PipelineError::Io { .. }));
}
