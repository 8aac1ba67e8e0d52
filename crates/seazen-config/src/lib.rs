//! Shared configuration for the seazen CLI.
//!
//! TOML profiles (one per lamp), translation to
//! `seazen_core::DiscoveryConfig`, and the file-backed store where the
//! last known-good lamp address is remembered between runs.

mod file_store;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use seazen_core::{DEFAULT_AP_ORIGIN, DEFAULT_MDNS_HOST, DiscoveryConfig, DiscoveryTimings};

pub use file_store::FileStore;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named lamp profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: explicit choice, else `default_profile`.
    pub fn profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| DEFAULT_PROFILE.into())
    }

    /// Look up a profile. The default profile may be absent from the file,
    /// in which case built-in values apply.
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        match self.profiles.get(name) {
            Some(profile) => Ok(profile.clone()),
            None if name == DEFAULT_PROFILE => Ok(Profile::default()),
            None => Err(ConfigError::ProfileNotFound { name: name.into() }),
        }
    }
}

pub const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Deliberate probe and control timeout, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout_ms() -> u64 {
    4500
}

/// A named lamp profile. Every field falls back to a built-in default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Lamp's factory access-point origin (e.g., "http://4.3.2.1").
    pub ap_origin: Option<String>,

    /// mDNS hostname the lamp announces (e.g., "seazencity.local").
    pub mdns_host: Option<String>,

    /// Deliberate single-probe timeout. Overrides `defaults.timeout_ms`.
    pub probe_timeout_ms: Option<u64>,

    /// Opportunistic AP probe at session start.
    pub quick_probe_timeout_ms: Option<u64>,

    /// Per-attempt timeout while polling.
    pub poll_probe_timeout_ms: Option<u64>,

    /// Delay between polling attempts.
    pub poll_interval_ms: Option<u64>,

    /// Total mDNS polling window.
    pub mdns_window_ms: Option<u64>,

    /// Total AP fallback polling window.
    pub ap_fallback_window_ms: Option<u64>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("app", "seazencity", "seazen")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where the remembered lamp address lives.
pub fn state_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share").join("state.toml"),
        |dirs| dirs.data_dir().join("state.toml"),
    )
}

fn dirs_fallback(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("seazen");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, then `SEAZEN_*` env vars.
///
/// Nested keys use a double underscore: `SEAZEN_DEFAULTS__OUTPUT=json`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SEAZEN_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `DiscoveryConfig` from a profile, validating every value.
///
/// Persisted state is namespaced per profile so several lamps can share
/// one state file.
pub fn profile_to_discovery_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<DiscoveryConfig, ConfigError> {
    let raw_origin = profile.ap_origin.as_deref().unwrap_or(DEFAULT_AP_ORIGIN);
    let ap_origin = parse_origin(raw_origin)?;

    let mdns_host = seazen_core::model::normalize_host(
        profile.mdns_host.as_deref().unwrap_or(DEFAULT_MDNS_HOST),
    );
    if mdns_host.is_empty() || mdns_host.contains('/') {
        return Err(ConfigError::Validation {
            field: "mdns_host".into(),
            reason: format!("expected a bare hostname, got '{mdns_host}'"),
        });
    }

    let builtin = DiscoveryTimings::default();
    let timings = DiscoveryTimings {
        probe_timeout: millis(
            "probe_timeout_ms",
            profile.probe_timeout_ms.or(Some(defaults.timeout_ms)),
            builtin.probe_timeout,
        )?,
        quick_probe_timeout: millis(
            "quick_probe_timeout_ms",
            profile.quick_probe_timeout_ms,
            builtin.quick_probe_timeout,
        )?,
        poll_probe_timeout: millis(
            "poll_probe_timeout_ms",
            profile.poll_probe_timeout_ms,
            builtin.poll_probe_timeout,
        )?,
        poll_interval: millis("poll_interval_ms", profile.poll_interval_ms, builtin.poll_interval)?,
        mdns_window: millis("mdns_window_ms", profile.mdns_window_ms, builtin.mdns_window)?,
        ap_fallback_window: millis(
            "ap_fallback_window_ms",
            profile.ap_fallback_window_ms,
            builtin.ap_fallback_window,
        )?,
    };

    Ok(DiscoveryConfig {
        ap_origin,
        mdns_host,
        timings,
        store_namespace: format!("{profile_name}/"),
        ..DiscoveryConfig::default()
    })
}

fn parse_origin(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Validation {
        field: "ap_origin".into(),
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(format!("invalid URL '{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("expected http:// URL, got '{raw}'")));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid(format!("URL '{raw}' has no host")));
    }
    Ok(url)
}

fn millis(field: &str, value: Option<u64>, fallback: Duration) -> Result<Duration, ConfigError> {
    match value {
        None => Ok(fallback),
        Some(0) => Err(ConfigError::Validation {
            field: field.into(),
            reason: "must be greater than zero".into(),
        }),
        Some(ms) => Ok(Duration::from_millis(ms)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_profile_uses_builtin_values() {
        let cfg =
            profile_to_discovery_config(&Profile::default(), "default", &Defaults::default())
                .unwrap();
        assert_eq!(cfg.ap_origin.as_str(), "http://4.3.2.1/");
        assert_eq!(cfg.mdns_host, "seazencity.local");
        assert_eq!(cfg.timings, DiscoveryTimings::default());
        assert_eq!(cfg.store_namespace, "default/");
    }

    #[test]
    fn profile_overrides_defaults() {
        let profile = Profile {
            ap_origin: Some("http://192.168.4.1".into()),
            mdns_host: Some("https://kitchen.local/".into()),
            poll_interval_ms: Some(500),
            ..Profile::default()
        };
        let defaults = Defaults {
            timeout_ms: 9000,
            ..Defaults::default()
        };
        let cfg = profile_to_discovery_config(&profile, "kitchen", &defaults).unwrap();
        assert_eq!(cfg.ap_origin.host_str(), Some("192.168.4.1"));
        assert_eq!(cfg.mdns_host, "kitchen.local");
        assert_eq!(cfg.timings.poll_interval, Duration::from_millis(500));
        assert_eq!(cfg.timings.probe_timeout, Duration::from_millis(9000));
        assert_eq!(cfg.store_namespace, "kitchen/");
    }

    #[test]
    fn zero_durations_are_rejected() {
        let profile = Profile {
            mdns_window_ms: Some(0),
            ..Profile::default()
        };
        let err = profile_to_discovery_config(&profile, "default", &Defaults::default())
            .unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation { ref field, .. } if field == "mdns_window_ms"),
            "{err}"
        );
    }

    #[test]
    fn bad_ap_origin_is_rejected() {
        for raw in ["4.3.2.1", "ftp://4.3.2.1", "not a url"] {
            let profile = Profile {
                ap_origin: Some(raw.into()),
                ..Profile::default()
            };
            assert!(
                profile_to_discovery_config(&profile, "default", &Defaults::default()).is_err(),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "hall"

[defaults]
output = "json"

[profiles.hall]
mdns_host = "hall.local"
mdns_window_ms = 20000
"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.profile_name(None), "hall");
        assert_eq!(config.defaults.output, "json");
        assert_eq!(config.defaults.timeout_ms, 4500);

        let hall = config.profile("hall").unwrap();
        assert_eq!(hall.mdns_host.as_deref(), Some("hall.local"));
        assert_eq!(hall.mdns_window_ms, Some(20000));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.profile_name(None), DEFAULT_PROFILE);
        assert_eq!(config.profile(DEFAULT_PROFILE).unwrap(), Profile::default());
        assert!(matches!(
            config.profile("attic"),
            Err(ConfigError::ProfileNotFound { .. })
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        let mut config = Config::default();
        config.profiles.insert(
            "default".into(),
            Profile {
                ap_origin: Some("http://4.3.2.1".into()),
                ..Profile::default()
            },
        );
        save_config_to(&config, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles["default"], config.profiles["default"]);
    }
}
