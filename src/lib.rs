pub mod config;
pub mod data_models;
pub mod enricher;
pub mod error;
pub mod loader;
pub mod parser;
pub mod report;
pub mod scrapper;
pub mod search;

pub use error::{PipelineError, Result};
