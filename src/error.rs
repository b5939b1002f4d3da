//! Error types for fetching, decoding and storing activities.

use reqwest::StatusCode;
use thiserror::Error;

/// Error fetching an activity record from the server.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP request itself failed (connection, timeout, protocol).
    #[error("network error fetching activity: {0}")]
    Network(#[from] reqwest::Error),
    /// The server replied with a non-OK status code.
    #[error("server replied with status code {0}")]
    Status(StatusCode),
    /// The response body was not a valid activity record.
    #[error(transparent)]
    Malformed(#[from] MalformedActivityError),
}

/// Error produced by the schema validator at the fetch boundary.
///
/// A record failing validation is rejected before any rendering happens, so
/// a bad fetch never clears the previously displayed activity.
#[derive(Debug, Error)]
pub enum MalformedActivityError {
    /// The body was not valid JSON, or a required field was missing.
    #[error("invalid activity record: {0}")]
    Json(#[from] serde_json::Error),
    /// A coordinate was not a finite number.
    #[error("non-finite coordinate at index {index}")]
    NonFiniteCoordinate {
        /// Index of the offending point in the coordinate sequence.
        index: usize,
    },
    /// A latitude or longitude was outside the valid range.
    #[error("coordinate out of range at index {index}: ({lat}, {lng})")]
    CoordinateOutOfRange {
        /// Index of the offending point in the coordinate sequence.
        index: usize,
        /// Latitude of the offending point, in degrees.
        lat: f64,
        /// Longitude of the offending point, in degrees.
        lng: f64,
    },
}

/// Error listing or loading activities from local FIT files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The activity identifier is not a plain file name.
    #[error("invalid activity identifier: {0}")]
    InvalidId(String),
    /// No activity with this identifier exists.
    #[error("no such activity: {0}")]
    NotFound(String),
    /// The activity file could not be read.
    #[error("failed to read activity file: {0}")]
    Io(#[from] std::io::Error),
    /// The FIT data could not be parsed.
    #[error("failed to parse FIT file: {0}")]
    Fit(String),
    /// The FIT data parsed, but doesn't describe a single activity.
    #[error("unsupported FIT file: {0}")]
    UnsupportedFit(String),
}
