//! Per-run configuration: the config-file profile, overlaid with flags and
//! `SEAZEN_*` environment variables, translated to a `DiscoveryConfig`.

use std::sync::Arc;

use seazen_config::{Config, ConfigError, FileStore, Profile};
use seazen_core::{DiscoveryConfig, KeyValueStore, MemoryStore};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Profile selected by `--profile`, else the file's `default_profile`.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    cfg.profile_name(global.profile.as_deref())
}

/// Comma-separated profile names, sorted, for help text.
pub fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort_unstable();
    names.join(", ")
}

/// Look up the active profile and apply command-line overrides to it.
pub fn resolve_profile(cfg: &Config, global: &GlobalOpts) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, cfg);
    let mut profile = cfg.profile(&name).map_err(|err| match err {
        ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
            name,
            available: available_profiles(cfg),
        },
        other => other.into(),
    })?;

    if let Some(ref origin) = global.ap_origin {
        profile.ap_origin = Some(origin.clone());
    }
    if let Some(ref host) = global.mdns_host {
        profile.mdns_host = Some(host.clone());
    }
    if let Some(ms) = global.timeout {
        profile.probe_timeout_ms = Some(ms);
    }
    Ok((name, profile))
}

/// Build the coordinator configuration for this run.
pub fn build_discovery_config(global: &GlobalOpts) -> Result<DiscoveryConfig, CliError> {
    let cfg = seazen_config::load_config()?;
    let (name, profile) = resolve_profile(&cfg, global)?;
    tracing::debug!(profile = %name, "resolved lamp profile");
    Ok(seazen_config::profile_to_discovery_config(
        &profile,
        &name,
        &cfg.defaults,
    )?)
}

/// Where the last working lamp address lives. `--no-save` keeps it in
/// memory for this run only.
pub fn open_store(global: &GlobalOpts) -> Result<Arc<dyn KeyValueStore>, CliError> {
    if global.no_save {
        return Ok(Arc::new(MemoryStore::new()));
    }
    Ok(Arc::new(FileStore::open_default()?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["seazen"];
        argv.extend_from_slice(args);
        argv.push("where");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with(names: &[&str]) -> Config {
        let mut cfg = Config::default();
        for name in names {
            cfg.profiles.insert(
                (*name).to_owned(),
                Profile {
                    mdns_host: Some(format!("{name}.local")),
                    ..Profile::default()
                },
            );
        }
        cfg
    }

    #[test]
    fn flags_override_profile_values() {
        let cfg = config_with(&["hall"]);
        let opts = global(&[
            "--profile",
            "hall",
            "--ap-origin",
            "http://192.168.4.1",
            "--timeout",
            "900",
        ]);

        let (name, profile) = resolve_profile(&cfg, &opts).unwrap();
        assert_eq!(name, "hall");
        assert_eq!(profile.ap_origin.as_deref(), Some("http://192.168.4.1"));
        assert_eq!(profile.mdns_host.as_deref(), Some("hall.local"));
        assert_eq!(profile.probe_timeout_ms, Some(900));
    }

    #[test]
    fn default_profile_needs_no_file_entry() {
        let (name, profile) = resolve_profile(&Config::default(), &global(&[])).unwrap();
        assert_eq!(name, "default");
        assert_eq!(profile, Profile::default());
    }

    #[test]
    fn unknown_profile_lists_alternatives() {
        let cfg = config_with(&["kitchen", "hall"]);
        let err = resolve_profile(&cfg, &global(&["-p", "attic"])).unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "attic");
                assert_eq!(available, "hall, kitchen");
            }
            other => panic!("expected ProfileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn no_save_uses_memory() {
        let store = open_store(&global(&["--no-save"])).unwrap();
        store.set("default/host", "http://10.0.0.5").unwrap();
        assert_eq!(
            store.get("default/host").unwrap().as_deref(),
            Some("http://10.0.0.5")
        );
    }
}
