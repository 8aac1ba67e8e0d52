//! Config subcommand handlers.

use dialoguer::Input;

use seazen_config::{Config, DEFAULT_PROFILE, Profile};
use seazen_core::{DEFAULT_AP_ORIGIN, DEFAULT_MDNS_HOST};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

fn format_config(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# failed to render config: {e}"))
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = seazen_config::config_path();
            eprintln!("Seazen lamp setup");
            eprintln!("   Config path: {}\n", config_path.display());

            let mut cfg = seazen_config::load_config()?;

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default(DEFAULT_PROFILE.into())
                .interact_text()
                .map_err(prompt_err)?;

            let existing = cfg.profiles.get(&profile_name).cloned().unwrap_or_default();

            let ap_origin: String = Input::new()
                .with_prompt("Lamp access-point address")
                .default(
                    existing
                        .ap_origin
                        .clone()
                        .unwrap_or_else(|| DEFAULT_AP_ORIGIN.into()),
                )
                .interact_text()
                .map_err(prompt_err)?;

            let mdns_host: String = Input::new()
                .with_prompt("Lamp mDNS hostname")
                .default(
                    existing
                        .mdns_host
                        .clone()
                        .unwrap_or_else(|| DEFAULT_MDNS_HOST.into()),
                )
                .interact_text()
                .map_err(prompt_err)?;

            let profile = Profile {
                ap_origin: Some(ap_origin),
                mdns_host: Some(mdns_host),
                ..existing
            };

            // Reject bad values now rather than on the next lamp command.
            seazen_config::profile_to_discovery_config(&profile, &profile_name, &cfg.defaults)?;

            cfg.profiles.insert(profile_name.clone(), profile);
            if cfg.default_profile.is_none() || cfg.profiles.len() == 1 {
                cfg.default_profile = Some(profile_name.clone());
            }
            seazen_config::save_config_to(&cfg, &config_path)?;

            output::print_success(
                &format!("Configuration written to {}", config_path.display()),
                output::should_color(&global.color),
                false,
            );
            eprintln!("  Profile: {profile_name}");
            eprintln!("\n  Next: seazen onboard");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = seazen_config::load_config()?;
            let out = output::render_single(&global.output, &cfg, format_config, |c| {
                config::active_profile_name(global, c)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            let out = [
                format!("config: {}", seazen_config::config_path().display()),
                format!("state:  {}", seazen_config::state_path().display()),
            ]
            .join("\n");
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = seazen_config::load_config()?;
            let default = cfg.profile_name(None);
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: seazen config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if *name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = seazen_config::load_config()?;

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: config::available_profiles(&cfg),
                });
            }

            cfg.default_profile = Some(name.clone());
            seazen_config::save_config(&cfg)?;
            output::print_success(
                &format!("Default profile set to '{name}'"),
                output::should_color(&global.color),
                global.quiet,
            );
            Ok(())
        }
    }
}
