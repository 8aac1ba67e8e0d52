// ── Single probe attempt ──

use std::fmt;
use std::time::Duration;

use seazen_api::{LampClient, LampResponse};

use crate::error::CoreError;

/// Outcome of one `GET /json/info` attempt.
#[derive(Debug)]
pub enum ProbeResult {
    /// 2xx with a JSON body.
    Success { body: serde_json::Value },
    /// 2xx, but the body is not JSON.
    SuccessUnparsed { raw: String },
    /// Lamp answered with a non-2xx status.
    HttpError { status: u16, raw: String },
    /// Timed out or could not connect.
    Failed(CoreError),
}

impl ProbeResult {
    pub fn from_response(result: Result<LampResponse, seazen_api::Error>) -> Self {
        match result {
            Ok(resp) if resp.ok => match resp.json {
                Some(body) => Self::Success { body },
                None => Self::SuccessUnparsed { raw: resp.text },
            },
            Ok(resp) => Self::HttpError {
                status: resp.status,
                raw: resp.text,
            },
            Err(e) => Self::Failed(e.into()),
        }
    }

    /// Any 2xx answer, parseable or not.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::SuccessUnparsed { .. })
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Success { body } => Some(body),
            _ => None,
        }
    }

    /// Convert a non-success into the error it represents.
    pub fn into_error(self) -> Option<CoreError> {
        match self {
            Self::Success { .. } | Self::SuccessUnparsed { .. } => None,
            Self::HttpError { status, raw } => Some(CoreError::http(status, &raw)),
            Self::Failed(e) => Some(e),
        }
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { .. } => f.write_str("ok"),
            Self::SuccessUnparsed { .. } => f.write_str("ok (body is not JSON)"),
            Self::HttpError { status, .. } => write!(f, "HTTP {status}"),
            Self::Failed(e) => write!(f, "{e}"),
        }
    }
}

/// Probe the info endpoint under a hard timeout.
pub(crate) async fn probe_info(client: &LampClient, timeout: Duration) -> ProbeResult {
    ProbeResult::from_response(client.info(timeout).await)
}
