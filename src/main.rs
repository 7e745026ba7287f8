use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use prodscout::config::{CONFIG, Config};
use prodscout::enricher::Enricher;
use prodscout::loader::{PatternDecoder, load_response};
use prodscout::parser::parse_response;
use prodscout::report::save_parsed_results;
use prodscout::scrapper::HttpFetcher;
use prodscout::search::SerperClient;

#[derive(Parser, Debug)]
#[command(about = "Parse product recommendations and enrich them with search results")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a raw response dump into a recommendations report
    Parse {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Search buy links and reviews for every product in a report
    Enrich {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Parse, then enrich
    Run,
}

fn parse_stage(config: &Config) -> anyhow::Result<()> {
    let response = load_response(&config.input_path, &PatternDecoder)
        .with_context(|| format!("failed to load {}", config.input_path.display()))?;
    let parsed = parse_response(&response).context("failed to parse response content")?;
    tracing::info!(products = parsed.products.len(), "parsed recommendations");

    // A failed write is reported but does not fail the stage.
    if let Err(e) = save_parsed_results(&parsed, &config.report_path) {
        tracing::error!("{:#}", e);
    }
    Ok(())
}

async fn enrich_stage(config: &Config) -> anyhow::Result<()> {
    let api_key = config
        .api_key
        .clone()
        .ok_or(prodscout::PipelineError::MissingApiKey)?;
    let search = SerperClient::new(api_key, config.request_timeout)?;
    let fetcher = HttpFetcher::new(config.request_timeout)?;
    let enricher = Enricher::new(search, fetcher, config.clone());

    let results = enricher
        .run(&config.report_path, &config.output_path)
        .await
        .context("enrichment failed")?;
    tracing::info!(products = results.len(), "enrichment done");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    // Bridge log crate -> tracing (library code logs through `log`)
    tracing_log::LogTracer::init()?;

    let cli = Cli::parse();
    let mut config = Config::clone(&CONFIG);

    match cli.command {
        Command::Parse { input, output } => {
            if let Some(input) = input {
                config.input_path = input;
            }
            if let Some(output) = output {
                config.report_path = output;
            }
            parse_stage(&config)?;
        }
        Command::Enrich { input, output } => {
            if let Some(input) = input {
                config.report_path = input;
            }
            if let Some(output) = output {
                config.output_path = output;
            }
            enrich_stage(&config).await?;
        }
        Command::Run => {
            parse_stage(&config)?;
            enrich_stage(&config).await?;
        }
    }
    Ok(())
}
