// ── Runtime discovery configuration ──
//
// These types describe *where* the lamp may live and *how long* to look.
// They never touch disk: seazen-config builds a `DiscoveryConfig` and
// hands it to the `Coordinator`.

use std::time::Duration;

use url::Url;

/// Factory access-point origin of the lamp.
pub const DEFAULT_AP_ORIGIN: &str = "http://4.3.2.1";
/// mDNS hostname the lamp announces once joined to a network.
pub const DEFAULT_MDNS_HOST: &str = "seazencity.local";

/// Timeouts and stage windows.
///
/// Representative defaults, all tunable per profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryTimings {
    /// Deliberate single probe (check availability, continue by IP, remembered address).
    pub probe_timeout: Duration,
    /// Opportunistic AP probe at session start.
    pub quick_probe_timeout: Duration,
    /// Per-attempt timeout inside polling stages.
    pub poll_probe_timeout: Duration,
    /// Delay between polling attempts.
    pub poll_interval: Duration,
    /// Total window for the mDNS stage.
    pub mdns_window: Duration,
    /// Total window for the AP fallback stage.
    pub ap_fallback_window: Duration,
}

impl Default for DiscoveryTimings {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_millis(4500),
            quick_probe_timeout: Duration::from_millis(1200),
            poll_probe_timeout: Duration::from_millis(2000),
            poll_interval: Duration::from_millis(1200),
            mdns_window: Duration::from_secs(12),
            ap_fallback_window: Duration::from_secs(30),
        }
    }
}

/// Configuration for one lamp.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Lamp's factory AP origin.
    pub ap_origin: Url,
    /// Lamp's mDNS hostname (no scheme).
    pub mdns_host: String,
    pub timings: DiscoveryTimings,
    /// Key prefix in the persistent store, so several lamps can share one.
    pub store_namespace: String,
    /// How many diagnostic trace entries to keep.
    pub trace_capacity: usize,
}

impl DiscoveryConfig {
    /// Origin reached through the mDNS hostname.
    pub fn mdns_origin(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("http://{}", self.mdns_host))
    }

    /// Page on the AP where the user enters Wi-Fi credentials.
    pub fn wifi_settings_url(&self) -> Result<Url, url::ParseError> {
        self.ap_origin.join("/settings/wifi")
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            ap_origin: Url::parse(DEFAULT_AP_ORIGIN).expect("default AP origin is a valid URL"),
            mdns_host: DEFAULT_MDNS_HOST.into(),
            timings: DiscoveryTimings::default(),
            store_namespace: String::new(),
            trace_capacity: 200,
        }
    }
}
