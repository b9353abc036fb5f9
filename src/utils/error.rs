// src/utils/error.rs
use thiserror::Error;

// Errors raised while obtaining pages from the source document
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parsing failed: {0}")]
    Pdf(String),

    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode),

    #[error("Document not found: {0}")]
    NotFound(String),
}

#[derive(Error, Debug)]
pub enum RulesError {
    #[error("Could not read rules file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse rules file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid pattern for {name}: {message}")]
    InvalidPattern { name: String, message: String },

    #[error("No rule configured for section {0}")]
    MissingSection(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document loading failed: {0}")]
    Document(#[from] DocumentError),

    #[error("Extraction rules invalid: {0}")]
    Rules(#[from] RulesError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
