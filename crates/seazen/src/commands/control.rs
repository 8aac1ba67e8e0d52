//! Lamp control commands: info, state, on/off/toggle, brightness, preset.
//!
//! Each command resolves the lamp first (see `util::ensure_lamp`). When a
//! call cannot reach the lamp the coordinator starts searching for it
//! again; the command waits for that search and retries once.

use std::future::Future;

use seazen_core::{Coordinator, CoreError, LampInfo, LampState, LinkStatus, PowerCommand};

use crate::cli::{BrightnessArgs, GlobalOpts, PresetArgs};
use crate::error::CliError;
use crate::output;

use super::util::{ensure_lamp, spinner};

// ── Formatting ───────────────────────────────────────────────────────

/// Brightness as a rounded percentage of 255.
fn percent(bri: u8) -> u32 {
    (u32::from(bri) * 100 + 127) / 255
}

fn power_label(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

fn state_detail(s: &LampState) -> String {
    let preset = if s.ps < 0 {
        "none".to_owned()
    } else {
        s.ps.to_string()
    };
    [
        format!("Power:        {}", power_label(s.on)),
        format!("Brightness:   {} ({}%)", s.bri, percent(s.bri)),
        format!("Preset:       {preset}"),
    ]
    .join("\n")
}

fn led_count(info: &LampInfo) -> Option<u64> {
    info.extra
        .get("leds")
        .and_then(|leds| leds.get("count"))
        .and_then(serde_json::Value::as_u64)
}

fn info_detail(info: &LampInfo) -> String {
    let or_dash = |v: Option<&str>| v.unwrap_or("-").to_owned();
    [
        format!("Name:       {}", or_dash(info.name.as_deref())),
        format!("Firmware:   {}", or_dash(info.ver.as_deref())),
        format!("MAC:        {}", or_dash(info.mac.as_deref())),
        format!("IP:         {}", or_dash(info.station_ip())),
        format!(
            "LEDs:       {}",
            led_count(info).map_or_else(|| "-".to_owned(), |n| n.to_string())
        ),
    ]
    .join("\n")
}

fn print_state(state: &LampState, global: &GlobalOpts) {
    let out = output::render_single(&global.output, state, state_detail, |s| {
        power_label(s.on).to_owned()
    });
    output::print_output(&out, global.quiet);
}

/// Mutations answer with the new state when the firmware supports it.
fn print_mutation(result: Option<LampState>, done: &str, global: &GlobalOpts) {
    match result {
        Some(state) => print_state(&state, global),
        None => output::print_success(done, output::should_color(&global.color), global.quiet),
    }
}

// ── Retry around re-discovery ────────────────────────────────────────

async fn with_rediscovery<T, F, Fut>(
    coordinator: &Coordinator,
    global: &GlobalOpts,
    op: F,
) -> Result<T, CliError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, CoreError>>,
{
    let err = match op().await {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };
    if !(err.triggers_rediscovery() && coordinator.is_rediscovering()) {
        return Err(err.into());
    }

    output::print_warning(
        &format!("{err}. Searching for the lamp again"),
        output::should_color(&global.color),
    );
    let bar = spinner("Searching for the lamp", global);
    let link = coordinator.rediscovery_settled().await;
    bar.finish_and_clear();

    let (LinkStatus::Online, Some(origin)) = (link, coordinator.active_origin()) else {
        return Err(err.into());
    };
    tracing::info!(%origin, "lamp found again, retrying");
    op().await.map_err(Into::into)
}

// ── Handlers ─────────────────────────────────────────────────────────

pub async fn info(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    ensure_lamp(coordinator, global, "info").await?;
    let info = with_rediscovery(coordinator, global, || coordinator.read_info()).await?;
    let out = output::render_single(&global.output, &info, info_detail, |i| {
        i.name.clone().unwrap_or_default()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn state(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    ensure_lamp(coordinator, global, "state").await?;
    let state = with_rediscovery(coordinator, global, || coordinator.read_state()).await?;
    print_state(&state, global);
    Ok(())
}

pub async fn power(
    coordinator: &Coordinator,
    command: PowerCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (name, done) = match command {
        PowerCommand::On => ("on", "Lamp turned on"),
        PowerCommand::Off => ("off", "Lamp turned off"),
        PowerCommand::Toggle => ("toggle", "Lamp toggled"),
    };
    ensure_lamp(coordinator, global, name).await?;
    let result = with_rediscovery(coordinator, global, || coordinator.set_power(command)).await?;
    print_mutation(result, done, global);
    Ok(())
}

pub async fn brightness(
    coordinator: &Coordinator,
    args: BrightnessArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    ensure_lamp(coordinator, global, "brightness").await?;
    let result = with_rediscovery(coordinator, global, || {
        coordinator.set_brightness(args.value)
    })
    .await?;
    print_mutation(
        result,
        &format!("Brightness set to {}", args.value),
        global,
    );
    Ok(())
}

pub async fn preset(
    coordinator: &Coordinator,
    args: PresetArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    ensure_lamp(coordinator, global, "preset").await?;
    let result = with_rediscovery(coordinator, global, || coordinator.select_preset(args.id))
        .await?;
    print_mutation(result, &format!("Preset {} selected", args.id), global);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn percent_rounds_to_nearest() {
        assert_eq!(percent(0), 0);
        assert_eq!(percent(128), 50);
        assert_eq!(percent(255), 100);
    }

    #[test]
    fn state_detail_hides_negative_preset() {
        let state: LampState = serde_json::from_str(r#"{"on":true,"bri":64}"#).unwrap();
        assert_eq!(
            state_detail(&state),
            "Power:        on\nBrightness:   64 (25%)\nPreset:       none"
        );
    }

    #[test]
    fn info_detail_reads_led_count_from_extra_fields() {
        let info: LampInfo = serde_json::from_str(
            r#"{"ver":"0.14.4","name":"Seazen","ip":"","leds":{"count":60}}"#,
        )
        .unwrap();
        let detail = info_detail(&info);
        assert!(detail.contains("Firmware:   0.14.4"));
        assert!(detail.contains("IP:         -"));
        assert!(detail.contains("LEDs:       60"));
    }
}
