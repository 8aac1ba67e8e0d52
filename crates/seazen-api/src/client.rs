// Lamp HTTP client
//
// Wraps `reqwest::Client` with origin-relative URL construction, a hard
// per-request timeout, and response classification. Non-2xx answers are
// returned as data, not errors: the lamp was reachable, it just said no.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::StateUpdate;
use crate::transport::TransportConfig;

pub const INFO_PATH: &str = "/json/info";
pub const STATE_PATH: &str = "/json/state";

/// A classified HTTP response from the lamp.
///
/// `json` is `None` when the body is not valid JSON; the raw body is
/// always kept in `text`.
#[derive(Debug, Clone, PartialEq)]
pub struct LampResponse {
    pub ok: bool,
    pub status: u16,
    pub json: Option<serde_json::Value>,
    pub text: String,
    pub content_type: String,
}

impl LampResponse {
    /// Deserialize the parsed body into `T`.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let value = self.json.clone().ok_or_else(|| Error::Deserialization {
            message: format!("HTTP {} body is not JSON", self.status),
            body: self.text.clone(),
        })?;
        serde_json::from_value(value).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: self.text.clone(),
        })
    }
}

/// HTTP client bound to one lamp origin.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct LampClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl LampClient {
    /// Create a client for `base_url` (e.g. `http://4.3.2.1`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
        })
    }

    /// Same pool and timeout, different origin.
    pub fn rebased(&self, base_url: Url) -> Self {
        Self {
            http: self.http.clone(),
            base_url,
            timeout: self.timeout,
        }
    }

    /// The origin this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The default per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build a full URL for an origin-relative API path.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /json/info` with an explicit probe timeout.
    pub async fn info(&self, timeout: Duration) -> Result<LampResponse, Error> {
        self.get(INFO_PATH, Some(timeout)).await
    }

    /// `GET /json/state`.
    pub async fn state(&self) -> Result<LampResponse, Error> {
        self.get(STATE_PATH, None).await
    }

    /// `POST /json/state` with a mutation body.
    pub async fn set_state(&self, update: &StateUpdate) -> Result<LampResponse, Error> {
        self.post(STATE_PATH, update, None).await
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request. `timeout` overrides the client default.
    pub async fn get(&self, path: &str, timeout: Option<Duration>) -> Result<LampResponse, Error> {
        let url = self.url(path)?;
        debug!("GET {}", url);

        let builder = self.http.get(url.clone());
        self.send(builder, &url, timeout.unwrap_or(self.timeout))
            .await
    }

    /// Send a POST request with a JSON body. `timeout` overrides the client default.
    pub async fn post(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
        timeout: Option<Duration>,
    ) -> Result<LampResponse, Error> {
        let url = self.url(path)?;
        debug!("POST {}", url);

        let builder = self.http.post(url.clone()).json(body);
        self.send(builder, &url, timeout.unwrap_or(self.timeout))
            .await
    }

    /// Dispatch under a hard deadline and classify the response.
    ///
    /// The deadline covers connect, headers and body. `reqwest`'s own
    /// timeout is set too so the connection is torn down on expiry.
    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        url: &Url,
        timeout: Duration,
    ) -> Result<LampResponse, Error> {
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        let exchange = async {
            let resp = builder
                .timeout(timeout)
                .send()
                .await
                .map_err(|e| Error::from_reqwest(e, url.as_str(), timeout_ms))?;
            classify(resp, url, timeout_ms).await
        };

        match tokio::time::timeout(timeout, exchange).await {
            Ok(result) => result,
            Err(_) => {
                debug!(url = %url, timeout_ms, "request deadline elapsed");
                Err(Error::Timeout { timeout_ms })
            }
        }
    }
}

/// Read the body and classify into `{ok, status, json|null, text}`.
async fn classify(resp: reqwest::Response, url: &Url, timeout_ms: u64) -> Result<LampResponse, Error> {
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();

    let text = resp
        .text()
        .await
        .map_err(|e| Error::from_reqwest(e, url.as_str(), timeout_ms))?;

    let json = serde_json::from_str::<serde_json::Value>(&text).ok();
    if json.is_none() && !text.is_empty() {
        trace!(status = status.as_u16(), "response body is not JSON");
    }

    Ok(LampResponse {
        ok: status.is_success(),
        status: status.as_u16(),
        json,
        text,
        content_type,
    })
}
