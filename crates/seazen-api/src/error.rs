use thiserror::Error;

/// Top-level error type for the `seazen-api` crate.
///
/// Only transport-level failures live here. A lamp that answers with a
/// non-2xx status is *reachable*, so that case is reported through
/// [`LampResponse`](crate::LampResponse) instead of an error.
/// `seazen-core` maps these into its discovery taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// The request did not complete within its hard timeout.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Connection refused, DNS failure, host unreachable, reset mid-body.
    #[error("Lamp unreachable at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    /// Any other HTTP transport error.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The underlying `reqwest::Client` could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization into a typed model failed, with the raw body.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Classify a `reqwest` failure for `url` into timeout / unreachable / other.
    pub(crate) fn from_reqwest(err: reqwest::Error, url: &str, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_ms }
        } else if err.is_connect() || err.is_request() || err.is_body() {
            Self::Unreachable {
                url: url.to_owned(),
                reason: err.to_string(),
            }
        } else {
            Self::Transport(err)
        }
    }

    /// Returns `true` if the request ran out of time.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Returns `true` if the lamp could not be reached at all.
    ///
    /// These are the failures that suggest the address is stale, as
    /// opposed to a lamp that answered with an error.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Unreachable { .. } => true,
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
