use prodscout::PipelineError;
use prodscout::data_models::Usage;
use prodscout::loader::*;
use prodscout::parser::parse_response;

const RAW_RESPONSE: &str = r#"ChatCompletion(id='abc', choices=[Choice(finish_reason='stop', index=0, message=ChatCompletionMessage(content="Here are options:\n\n## Breville Bambino\n- Fast heat-up\n- **Available at:** Amazon, Target\n[Buy](https://amazon.com/b)", refusal=None, role='assistant'))], created=1, model='llama-3.1-sonar-large-128k-online', object='chat.completion', citations=['https://a.com/review', 'https://b.com/list', 'https://a.com/review'], usage=CompletionUsage(completion_tokens=512, prompt_tokens=64, total_tokens=576, completion_tokens_details=None))"#;

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

#[cfg(test)]
mod pattern_decoder {
    use super::*;

    #[test]
    fn test_extracts_content_with_real_newlines() {
        let content = PatternDecoder::extract_content(RAW_RESPONSE);
        assert!(content.starts_with("Here are options:\n\n## Breville Bambino\n"));
        assert!(!content.contains("\\n"));
    }

    #[test]
    fn test_citations_keep_order_and_duplicates() {
        assert_eq!(
            PatternDecoder::extract_citations(RAW_RESPONSE),
            vec![
                "https://a.com/review",
                "https://b.com/list",
                "https://a.com/review"
            ]
        );
    }

    #[test]
    fn test_empty_citation_list() {
        assert!(PatternDecoder::extract_citations("citations=[], usage=").is_empty());
    }

    #[test]
    fn test_usage() {
        assert_eq!(
            PatternDecoder::extract_usage(RAW_RESPONSE),
            Usage {
                completion_tokens: 512,
                prompt_tokens: 64,
                total_tokens: 576
            }
        );
    }

    #[test]
    fn test_overflowing_counter_zeroes_all_usage() {
        let text = "usage=CompletionUsage(completion_tokens=99999999999999999999999, \
            prompt_tokens=2, total_tokens=3)";
        assert_eq!(PatternDecoder::extract_usage(text), Usage::default());
    }

    #[test]
    fn test_missing_markers_fall_back_to_defaults() {
        let response = PatternDecoder.decode("nothing recognizable here");
        assert!(response.success);
        assert_eq!(response.message_content, "");
        assert!(response.citations.is_empty());
        assert_eq!(response.usage, Usage::default());
    }

    #[test]
    fn test_missing_usage_only() {
        let text = RAW_RESPONSE.replace("usage=", "usage_removed=");
        let response = load_response_from_str(&text, &PatternDecoder);
        assert!(response.success);
        assert_eq!(response.usage, Usage::default());
        assert_eq!(response.citations.len(), 3);
    }
}

#[cfg(test)]
mod file_loading {
    use super::*;

    #[test]
    fn test_load_from_file() -> anyhow::Result<()> {
        let path = unique_temp_path("prodscout_loader");
        std::fs::write(&path, RAW_RESPONSE)?;

        let response = load_response(&path, &PatternDecoder)?;
        std::fs::remove_file(&path).ok();

        assert!(response.success);
        assert_eq!(response.usage.total_tokens, 576);

        let parsed = parse_response(&response)?;
        assert_eq!(parsed.products.len(), 1);
        assert_eq!(parsed.products[0].name, "Breville Bambino");
        assert_eq!(parsed.products[0].description, "Fast heat-up");
        assert_eq!(parsed.products[0].retailers, vec!["Amazon", "Target"]);
        assert_eq!(parsed.products[0].purchase_links[0].url, "https://amazon.com/b");
        Ok(())
    }

    #[test]
    fn test_nonexistent_file_reports_error() {
        let path = unique_temp_path("prodscout_missing");
        let err = load_response(&path, &PatternDecoder).unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
        assert!(!err.to_string().is_empty());
        assert!(err.to_string().contains(&path.display().to_string()));
    }

    #[test]
    fn test_custom_decoder_can_replace_patterns() {
        struct Plain;
        impl ResponseDecoder for Plain {
            fn decode(&self, text: &str) -> prodscout::data_models::ParsedApiResponse {
                prodscout::data_models::ParsedApiResponse::new(
                    text.to_string(),
                    vec![],
                    Usage::default(),
                )
            }
        }

        let response = load_response_from_str("## Direct", &Plain);
        let parsed = parse_response(&response).unwrap();
        assert_eq!(parsed.products[0].name, "Direct");
    }
}
