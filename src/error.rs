use thiserror::Error;

use crate::model::space::StatusType;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{operation} request failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{operation} returned HTTP {status}: {body}")]
    Status {
        operation: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to parse {operation} response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{operation} failed: {}", .messages.join("; "))]
    GraphQl {
        operation: &'static str,
        messages: Vec<String>,
    },

    #[error("no data in {operation} response")]
    MissingData { operation: &'static str },
}

#[derive(Debug, Error)]
pub enum ConsolidateError {
    #[error("destination space has no status of type {0}")]
    NoMatchingStatus(StatusType),

    #[error("label '{0}' was not registered after creation")]
    UnresolvedLabel(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "could not find a Kitemaker token; set KITEMAKER_TOKEN or add `token` under [kitemaker] in {0}"
    )]
    MissingToken(String),

    #[error("page size must be at least 1")]
    ZeroPageSize,
}
