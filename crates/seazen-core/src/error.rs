// ── Core error types ──
//
// The discovery taxonomy. Consumers never see reqwest errors directly:
// the `From<seazen_api::Error>` impl folds transport failures into
// `Timeout` / `NetworkUnreachable`, which are the only two variants that
// suggest the lamp's address has changed.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Reachability ─────────────────────────────────────────────────
    /// `timeout_ms` is `None` when the deadline came from the HTTP stack
    /// rather than from a known per-request timeout.
    #[error(
        "Lamp did not answer{}",
        .timeout_ms.map_or_else(String::new, |ms| format!(" within {ms}ms"))
    )]
    Timeout { timeout_ms: Option<u64> },

    #[error("Cannot reach lamp at {url}: {reason}")]
    NetworkUnreachable { url: String, reason: String },

    // ── Lamp answered, but not usefully ──────────────────────────────
    #[error("Lamp rejected the request (HTTP {status}): {message}")]
    HttpError { status: u16, message: String },

    #[error("Lamp sent a malformed response: {message}")]
    MalformedResponse { message: String },

    // ── Discovery ────────────────────────────────────────────────────
    #[error("Lamp address not found during {stage}")]
    AddressNotFound { stage: String },

    #[error("No lamp address is active -- run discovery first")]
    NoActiveOrigin,

    #[error("Invalid lamp address: {input:?}")]
    InvalidAddress { input: String },

    #[error("Discovery was superseded by a newer request")]
    Superseded,

    // ── Collaborators ────────────────────────────────────────────────
    #[error("Persistent store error: {message}")]
    Store { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Only a lamp that cannot be reached at all warrants re-discovery.
    /// HTTP errors mean the address is right and the lamp said no.
    pub fn triggers_rediscovery(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::NetworkUnreachable { .. })
    }

    /// Build an `HttpError` from a status and a raw body preview.
    pub(crate) fn http(status: u16, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            "empty response".to_owned()
        } else {
            body.chars().take(200).collect()
        };
        Self::HttpError { status, message }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<seazen_api::Error> for CoreError {
    fn from(err: seazen_api::Error) -> Self {
        match err {
            seazen_api::Error::Timeout { timeout_ms } => CoreError::Timeout {
                timeout_ms: Some(timeout_ms),
            },
            seazen_api::Error::Unreachable { url, reason } => {
                CoreError::NetworkUnreachable { url, reason }
            }
            seazen_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_ms: None }
                } else {
                    CoreError::NetworkUnreachable {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            seazen_api::Error::InvalidUrl(e) => CoreError::InvalidAddress {
                input: e.to_string(),
            },
            seazen_api::Error::Client(message) => CoreError::Internal(message),
            seazen_api::Error::Deserialization { message, body: _ } => {
                CoreError::MalformedResponse { message }
            }
        }
    }
}
