use std::fmt;
use std::path::Path;

use crate::data_models::ParseResult;
use crate::error::{PipelineError, Result};

/// Renders the plain-text report. Products are numbered from 1; the
/// enricher relies on that numbering to find product names again.
pub fn render_report(parsed: &ParseResult) -> String {
    let mut out = String::new();
    write_report(&mut out, parsed).expect("writing to a String cannot fail");
    out
}

pub fn write_report(out: &mut impl fmt::Write, parsed: &ParseResult) -> fmt::Result {
    writeln!(out, "=== Parsing Results ===\n")?;
    writeln!(out, "Found {} product recommendations:", parsed.products.len())?;

    for (i, product) in parsed.products.iter().enumerate() {
        writeln!(out, "\n{}. {}", i + 1, product.name)?;
        writeln!(out, "Description: {}", product.description)?;
        if !product.retailers.is_empty() {
            writeln!(out, "Available at: {}", product.retailers.join(", "))?;
        }
        if !product.purchase_links.is_empty() {
            writeln!(out, "Purchase Links:")?;
            for link in &product.purchase_links {
                writeln!(out, "  - {}: {}", link.label, link.url)?;
            }
        }
    }

    writeln!(out, "\nCitations: {} sources", parsed.citations.len())?;
    for citation in &parsed.citations {
        writeln!(out, "  - {citation}")?;
    }

    writeln!(out, "\nToken Usage:")?;
    writeln!(out, "  Completion tokens: {}", parsed.usage.completion_tokens)?;
    writeln!(out, "  Prompt tokens: {}", parsed.usage.prompt_tokens)?;
    writeln!(out, "  Total tokens: {}", parsed.usage.total_tokens)
}

pub fn save_parsed_results(parsed: &ParseResult, output_file: impl AsRef<Path>) -> Result<()> {
    let output_file = output_file.as_ref();
    std::fs::write(output_file, render_report(parsed)).map_err(|e| {
        log::error!("error saving results to {}: {}", output_file.display(), e);
        PipelineError::io(output_file, e)
    })?;
    log::info!("results have been saved to {}", output_file.display());
    Ok(())
}
