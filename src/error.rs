//! Error types for the pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the public operations of each stage.
///
/// Missing markers in the raw response are not errors: the loader falls back
/// to empty values for those and never produces one of these.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// File could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Structural fault while turning content into products
    #[error("parsing error: {0}")]
    Parse(String),

    /// Search or page request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response or output serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Enrichment needs a search API key
    #[error("no search API key configured (set SERPER_API_KEY)")]
    MissingApiKey,
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
