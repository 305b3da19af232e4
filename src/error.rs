//! Error types for fetching and marker placement

use thiserror::Error;

/// Failure while talking to the flight API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("invalid payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid API URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Failure while building a single marker during reconciliation.
#[derive(Debug, Error, PartialEq)]
pub enum PlacementError {
    #[error("aircraft {hex} has invalid coordinates ({lat}, {lng})")]
    InvalidCoordinates { hex: String, lat: f64, lng: f64 },
    #[error("aircraft entry without hex identifier")]
    MissingHex,
    #[allow(dead_code)]
    #[error("layer rejected marker {hex}: {reason}")]
    Layer { hex: String, reason: String },
}
