/*!
 * Error types for the dramatis application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur during TEI speech extraction
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Error when parsing a TEI document fails
    #[error("Failed to parse document: {0}")]
    Parse(String),
}

/// Errors that can occur during works-metadata aggregation
#[derive(Error, Debug)]
pub enum StatsError {
    /// A required column is missing from a works table header
    #[error("Column '{column}' not found in {file}")]
    MissingColumn {
        /// Name of the required column
        column: String,
        /// Table the column was expected in
        file: String,
    },

    /// No row in either works table carried a usable year
    #[error("No valid year data found in the works tables")]
    NoYearData,

    /// Error when reading or deserializing a works table
    #[error("Table error: {0}")]
    Table(String),
}

/// Errors that can occur when talking to the Wikidata entity-data endpoint
#[derive(Error, Debug)]
pub enum WikidataError {
    /// Error when making an entity lookup fails
    #[error("Entity request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an entity-data document fails
    #[error("Failed to parse entity data: {0}")]
    ParseError(String),

    /// Error returned by the endpoint itself
    #[error("Endpoint responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the endpoint
        message: String,
    },

    /// The configured endpoint is not a valid URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Error when reading or writing the works table being enriched
    #[error("Table error: {0}")]
    Table(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from speech extraction
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Error from works-metadata aggregation
    #[error("Stats error: {0}")]
    Stats(#[from] StatsError),

    /// Error from a Wikidata lookup
    #[error("Wikidata error: {0}")]
    Wikidata(#[from] WikidataError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
