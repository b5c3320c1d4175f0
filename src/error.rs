//! Error types returned at the crate's boundaries.
//!
//! Each boundary (network call, XML parse, record parse, URI building, startup
//! configuration) has its own enum so callers can decide whether to log, skip,
//! or abort.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single request/response exchange.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Server answered with a non-success status.
    #[error("Http Error: {0}")]
    Status(reqwest::StatusCode),

    /// Connection could not be established.
    #[error("Connection Error: {0}")]
    Connect(#[source] reqwest::Error),

    /// Request did not complete within the configured timeout.
    #[error("Timeout Error: {0}")]
    Timeout(#[source] reqwest::Error),

    /// Any other transport failure (invalid URL, body read, redirect loop...).
    #[error("Request Error: {0}")]
    Request(#[source] reqwest::Error),

    /// Body is not a well-formed XML document.
    #[error("Payload is not well-formed XML: {0}")]
    NotXml(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            FetchError::Status(status)
        } else if e.is_timeout() {
            FetchError::Timeout(e)
        } else if e.is_connect() {
            FetchError::Connect(e)
        } else {
            FetchError::Request(e)
        }
    }
}

/// Why a single `element` of a payload could not become a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("country entry has no id attribute")]
    MissingId,

    #[error("element has no {0} field")]
    MissingField(&'static str),

    #[error("invalid {field} '{value}'")]
    InvalidField { field: &'static str, value: String },
}

/// Why a query URI could not be composed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// None of the requested countries resolved to a usable code.
    #[error("Invalid indicator arguments: no country codes resolved")]
    NoCountries,

    /// None of the requested indicators resolved to an index.
    #[error("Invalid indicator arguments: no indicator indexes resolved")]
    NoIndicators,
}

/// Startup failures while loading credentials and lookup tables.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid credentials file {path}: {source}")]
    Credentials {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid lookup table {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot build http client: {0}")]
    Http(#[from] reqwest::Error),
}
