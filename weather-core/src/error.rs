use reqwest::StatusCode;
use thiserror::Error;

/// The only failure message a user ever sees for a lookup.
pub const CITY_NOT_FOUND: &str = "City not found. Please try again.";

/// Rejected input: the city name was empty or whitespace-only.
///
/// Never reaches the network layer and never touches view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Enter City Name")]
pub struct EmptyCity;

/// Everything that can go wrong between issuing a lookup and having a
/// snapshot plus forecast in hand.
///
/// The variants exist for diagnostics only; they all collapse into
/// [`CITY_NOT_FOUND`] at the view layer.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The request never produced a response (DNS, connect, TLS, body read).
    /// The source carries no URL, since the query string holds the API key.
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with a non-2xx status.
    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    /// The body or one of its fields did not have the expected shape.
    #[error("malformed {endpoint} response: {reason}")]
    Malformed {
        endpoint: &'static str,
        reason: String,
    },
}

impl LookupError {
    pub fn endpoint(&self) -> &'static str {
        match self {
            LookupError::Request { endpoint, .. }
            | LookupError::Status { endpoint, .. }
            | LookupError::Malformed { endpoint, .. } => endpoint,
        }
    }
}
