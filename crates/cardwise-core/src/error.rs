//! Error types for Cardwise
//!
//! Only `Validation` is meant to reach a caller. `Provider` and `Generator`
//! are produced by backends and absorbed at the ingestion and synthesizer
//! boundaries respectively.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Account provider error: {0}")]
    Provider(String),

    #[error("Text generator error: {0}")]
    Generator(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;
