// Shared transport configuration for building reqwest::Client instances.
//
// Every lamp client (AP, mDNS, resolved IP) is built from the same
// settings so probes behave identically regardless of the origin.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

const USER_AGENT: &str = concat!("seazen/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Default request timeout. Individual calls may pass a shorter one.
    pub timeout: Duration,
    /// Upper bound on TCP connect. Lamps on a LAN answer fast or not at all.
    pub connect_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(4500),
            connect_timeout: Duration::from_millis(4500),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    ///
    /// Responses are never cached and redirects are not followed: the
    /// lamp's JSON API never redirects, and a captive portal that does
    /// should read as "not the lamp".
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            reqwest::header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        );

        reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| crate::error::Error::Client(e.to_string()))
    }

    /// Same config with a different default timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
