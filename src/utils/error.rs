// src/utils/error.rs
#![allow(dead_code)]
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum ClerkError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 404 Not Found, 403 Forbidden

    #[error("Clerk rate limit likely exceeded")]
    RateLimited,

    #[error("No filing index published for year {0}")]
    IndexNotFound(u32),

    #[error("Could not find PTR document: {0}")]
    DocumentNotFound(String),

    #[error("Failed to unpack filing archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Failed to parse filing index: {0}")]
    Parse(String),
}

/// Document-level structural failures. Any of these discards the whole
/// document. Rows dropped by filtering policy are not errors and are carried
/// as `extractors::transactions::FilteredRow` values instead.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to read PDF: {0}")]
    Pdf(#[from] pdfplumber::PdfError),

    #[error("No transaction table found in document")]
    NoTableFound,

    #[error("Expected 8 header rectangles, found {found}")]
    MissingHeaderRects { found: usize },

    #[error("Expected 8 columns in table row, found {found}")]
    RowShape { found: usize },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Clerk interaction failed: {0}")]
    Clerk(#[from] ClerkError), // Automatically convert Clerk errors

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
