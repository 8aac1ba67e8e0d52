//! Discovery commands: discover, check, use-ip, where, forget.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use seazen_core::{Coordinator, Origin, Phase, Provenance, Stage};

use crate::cli::{DiscoverArgs, GlobalOpts, UseIpArgs};
use crate::error::CliError;
use crate::output;

use super::util::with_progress;

// ── Output shapes ────────────────────────────────────────────────────

#[derive(Serialize)]
struct LampAddress {
    origin: String,
    provenance: Provenance,
}

impl From<&Origin> for LampAddress {
    fn from(origin: &Origin) -> Self {
        Self {
            origin: origin.as_origin_string(),
            provenance: origin.provenance(),
        }
    }
}

fn address_detail(a: &LampAddress) -> String {
    let found_via = match a.provenance {
        Provenance::Ap => "lamp access point",
        Provenance::Mdns => "mDNS hostname",
        Provenance::Resolved => "IP address",
    };
    [
        format!("Origin:      {}", a.origin),
        format!("Found via:   {found_via}"),
    ]
    .join("\n")
}

fn print_address(origin: &Origin, global: &GlobalOpts) {
    let out = output::render_single(
        &global.output,
        &LampAddress::from(origin),
        address_detail,
        |a| a.origin.clone(),
    );
    output::print_output(&out, global.quiet);
}

#[derive(Serialize)]
struct AccessPoint {
    ap_origin: String,
    reachable: bool,
    wifi_settings_url: String,
}

#[derive(Serialize)]
struct Remembered {
    origin: String,
    last_success: Option<DateTime<Utc>>,
}

fn remembered_detail(r: &Remembered) -> String {
    let seen = r.last_success.map_or_else(
        || "-".to_owned(),
        |at| {
            at.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        },
    );
    [
        format!("Origin:         {}", r.origin),
        format!("Last success:   {seen}"),
    ]
    .join("\n")
}

// ── Handlers ─────────────────────────────────────────────────────────

/// Non-interactive discovery: remembered address, AP probe, mDNS window,
/// then optionally the AP fallback.
pub async fn discover(
    coordinator: &Coordinator,
    args: DiscoverArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut phase = with_progress(coordinator, global, coordinator.start_session()).await?;

    if matches!(phase, Phase::ApSetup) {
        return Err(CliError::NoLamp {
            hint: format!(
                "The lamp is still in setup mode. Give it your Wi-Fi at {}",
                coordinator.wifi_settings_url()
            ),
            command: "discover".into(),
        });
    }
    if !phase.is_resolved() {
        phase = with_progress(coordinator, global, coordinator.confirm_connected()).await?;
    }
    if matches!(phase, Phase::MdnsNotFound) && args.ap_fallback {
        phase = with_progress(coordinator, global, coordinator.fetch_ip_from_ap()).await?;
    }

    let Phase::Resolved { origin } = phase else {
        return Err(CliError::AddressNotFound {
            stage: Stage::Mdns.to_string(),
        });
    };
    print_address(&origin, global);
    Ok(())
}

/// One deliberate probe of the lamp's access point.
pub async fn check(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    let phase = with_progress(coordinator, global, coordinator.check_availability()).await?;
    let ap_origin = coordinator.config().ap_origin.to_string();

    if !matches!(phase, Phase::ApSetup) {
        return Err(CliError::AccessPointUnreachable { url: ap_origin });
    }

    let ap = AccessPoint {
        ap_origin,
        reachable: true,
        wifi_settings_url: coordinator.wifi_settings_url().to_string(),
    };
    let out = output::render_single(
        &global.output,
        &ap,
        |a| {
            [
                format!("Access point:    {} (answering)", a.ap_origin),
                format!("Wi-Fi settings:  {}", a.wifi_settings_url),
            ]
            .join("\n")
        },
        |a| a.wifi_settings_url.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn use_ip(
    coordinator: &Coordinator,
    args: UseIpArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let phase = with_progress(
        coordinator,
        global,
        coordinator.continue_by_ip(&args.address),
    )
    .await?;
    let origin = phase.origin().ok_or_else(|| CliError::InvalidAddress {
        input: args.address.clone(),
    })?;
    print_address(origin, global);
    Ok(())
}

pub fn show_remembered(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    let Some(saved) = coordinator.persisted_address()? else {
        if !global.quiet {
            eprintln!("No lamp address remembered. Run: seazen discover");
        }
        return Ok(());
    };

    let remembered = Remembered {
        origin: saved.origin,
        last_success: saved.last_success,
    };
    let out = output::render_single(&global.output, &remembered, remembered_detail, |r| {
        r.origin.clone()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn forget(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    coordinator.forget_address()?;
    output::print_success(
        "Forgot the remembered lamp address",
        output::should_color(&global.color),
        global.quiet,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn detail_names_the_discovery_route() {
        let Ok(origin) = Origin::from_user_input("10.0.0.5") else {
            panic!("valid address rejected");
        };
        let detail = address_detail(&LampAddress::from(&origin));
        assert_eq!(
            detail,
            "Origin:      http://10.0.0.5\nFound via:   IP address"
        );
    }

    #[test]
    fn missing_timestamp_renders_dash() {
        let detail = remembered_detail(&Remembered {
            origin: "http://seazencity.local".into(),
            last_success: None,
        });
        assert!(detail.ends_with("Last success:   -"));
    }
}
