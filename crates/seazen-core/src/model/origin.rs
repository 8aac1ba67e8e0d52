// ── Lamp origin ──
//
// Scheme + host (+ port) identifying where the lamp's JSON API answers.
// Provenance records how we learned it.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

use crate::error::CoreError;

/// How an origin was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Provenance {
    /// The lamp's fixed factory access-point address.
    Ap,
    /// The lamp's fixed mDNS hostname.
    Mdns,
    /// A discovered or user-entered IP address.
    Resolved,
}

/// Base URL of the lamp's HTTP API. Never carries a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    url: Url,
    provenance: Provenance,
}

impl Origin {
    /// Build an origin from any URL, discarding path, query and fragment.
    pub fn new(url: &Url, provenance: Provenance) -> Result<Self, CoreError> {
        if url.host_str().is_none_or(str::is_empty) {
            return Err(CoreError::InvalidAddress {
                input: url.to_string(),
            });
        }
        let mut url = url.clone();
        url.set_path("/");
        url.set_query(None);
        url.set_fragment(None);
        Ok(Self { url, provenance })
    }

    /// The AP origin from configuration.
    pub fn ap(url: &Url) -> Result<Self, CoreError> {
        Self::new(url, Provenance::Ap)
    }

    /// `http://{host}` for the lamp's mDNS name.
    pub fn mdns(host: &str) -> Result<Self, CoreError> {
        let url = parse_http_host(host)?;
        Self::new(&url, Provenance::Mdns)
    }

    /// Parse what a user typed (`10.0.0.5`, `http://10.0.0.5/`, `lamp.local:8080`).
    ///
    /// Surrounding whitespace, a leading `http://` or `https://` in any
    /// case, and trailing slashes are stripped; the lamp is always spoken
    /// to over plain HTTP.
    pub fn from_user_input(input: &str) -> Result<Self, CoreError> {
        let host = normalize_host(input);
        if host.is_empty() {
            return Err(CoreError::InvalidAddress {
                input: input.to_owned(),
            });
        }
        let url = parse_http_host(&host)?;
        Self::new(&url, Provenance::Resolved)
    }

    /// Restore a persisted origin string; provenance is re-derived.
    pub fn from_persisted(value: &str, mdns_host: &str) -> Result<Self, CoreError> {
        let url = Url::parse(value).map_err(|_| CoreError::InvalidAddress {
            input: value.to_owned(),
        })?;
        let is_mdns = parse_http_host(mdns_host).is_ok_and(|mdns| mdns.origin() == url.origin());
        let provenance = if is_mdns {
            Provenance::Mdns
        } else {
            Provenance::Resolved
        };
        Self::new(&url, provenance)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// `http://host[:port]`, without a trailing slash.
    pub fn as_origin_string(&self) -> String {
        self.url.origin().ascii_serialization()
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_origin_string())
    }
}

/// Strip scheme and trailing slashes from user input.
pub fn normalize_host(input: &str) -> String {
    let trimmed = input.trim();
    let without_scheme = ["http://", "https://"]
        .iter()
        .find_map(|scheme| {
            trimmed
                .get(..scheme.len())
                .filter(|prefix| prefix.eq_ignore_ascii_case(scheme))
                .map(|_| &trimmed[scheme.len()..])
        })
        .unwrap_or(trimmed);
    without_scheme.trim_end_matches('/').to_owned()
}

fn parse_http_host(host: &str) -> Result<Url, CoreError> {
    let url = Url::parse(&format!("http://{host}")).map_err(|_| CoreError::InvalidAddress {
        input: host.to_owned(),
    })?;
    // Reject "host/path" style input instead of silently dropping the path.
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(CoreError::InvalidAddress {
            input: host.to_owned(),
        });
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_scheme_and_slashes() {
        assert_eq!(normalize_host("  HTTP://10.0.0.5///  "), "10.0.0.5");
        assert_eq!(normalize_host("https://lamp.local/"), "lamp.local");
        assert_eq!(normalize_host("192.168.1.9"), "192.168.1.9");
        assert_eq!(normalize_host("   "), "");
    }

    #[test]
    fn user_input_becomes_resolved_http_origin() {
        let origin = Origin::from_user_input(" https://192.168.1.20/ ").unwrap();
        assert_eq!(origin.as_origin_string(), "http://192.168.1.20");
        assert_eq!(origin.provenance(), Provenance::Resolved);
    }

    #[test]
    fn user_input_keeps_port() {
        let origin = Origin::from_user_input("10.0.0.5:8080").unwrap();
        assert_eq!(origin.to_string(), "http://10.0.0.5:8080");
    }

    #[test]
    fn empty_or_pathy_input_is_rejected() {
        assert!(matches!(
            Origin::from_user_input(""),
            Err(CoreError::InvalidAddress { .. })
        ));
        assert!(matches!(
            Origin::from_user_input("10.0.0.5/json/info"),
            Err(CoreError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn new_discards_path() {
        let url = Url::parse("http://4.3.2.1/json/info?x=1").unwrap();
        let origin = Origin::ap(&url).unwrap();
        assert_eq!(origin.url().as_str(), "http://4.3.2.1/");
    }

    #[test]
    fn persisted_mdns_origin_keeps_provenance() {
        let origin = Origin::from_persisted("http://seazencity.local", "seazencity.local").unwrap();
        assert_eq!(origin.provenance(), Provenance::Mdns);

        let origin = Origin::from_persisted("http://10.0.0.5", "seazencity.local").unwrap();
        assert_eq!(origin.provenance(), Provenance::Resolved);
    }
}
