use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfluxError {
    /// Network-level failure: connection refused, timeout, TLS failure.
    /// Distinct from any HTTP-level classification.
    #[error("{0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("{0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    UrlError(#[from] url::ParseError),

    /// Malformed caller input, detected before any network call.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// The server answered with a status other than the expected one (and not
    /// a 5xx).
    #[error("InfluxDB responded with non-expected code: {0}. response message is: {1}")]
    ClientError(StatusCode, String),

    /// 5xx response, body verbatim.
    #[error("InfluxDB server error: {0}")]
    ServerError(String),

    /// Per-statement error embedded in an otherwise successful query
    /// response, promoted when `raise_errors` is on.
    #[error("query returned an error: {0}")]
    QueryError(String),
}
