//! Interactive onboarding wizard.
//!
//! Renders whatever `Screen` the coordinator publishes, offers that
//! screen's actions, and feeds the choice back. Runs until the user quits;
//! once the lamp is resolved the control actions stay on offer.

use std::io::IsTerminal;

use dialoguer::{Confirm, Input, Select};

use seazen_core::{Coordinator, CoreError, LampState, Phase, PowerCommand, Screen, UserAction};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util::{prompt_err, spinner, with_progress};

const QUIT: &str = "Quit";

pub async fn handle(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    if !std::io::stdin().is_terminal() || !std::io::stderr().is_terminal() {
        return Err(CliError::Validation {
            field: "onboard".into(),
            reason: "needs an interactive terminal; use `seazen discover` or `seazen use-ip` \
                     in scripts"
                .into(),
        });
    }
    let color = output::should_color(&global.color);

    let mut outcome = with_progress(coordinator, global, coordinator.start_session()).await;
    let mut announced = false;

    loop {
        if let Err(err) = &outcome {
            report_failure(coordinator, err, global, color);
        }

        let screen = coordinator.screen();
        output::print_screen(&screen, color);
        if let Screen::Control { origin, .. } = &screen {
            if !announced {
                output::print_success(&format!("Lamp ready at {origin}"), color, global.quiet);
                announced = true;
            }
        }

        let actions = screen.actions();
        if actions.is_empty() {
            // Only transient screens offer nothing; a finished step never
            // leaves one behind unless it was superseded.
            return Err(CliError::Cancelled);
        }
        let Some(action) = choose(actions)? else {
            return if matches!(screen, Screen::Control { .. }) {
                Ok(())
            } else {
                coordinator.cancel().await;
                Err(CliError::Cancelled)
            };
        };

        outcome = perform(coordinator, action, global).await?;

        if coordinator.is_rediscovering() {
            let bar = spinner("Lost the lamp, searching again", global);
            let link = coordinator.rediscovery_settled().await;
            bar.finish_and_clear();
            tracing::debug!(%link, "re-discovery settled");
        }
    }
}

/// Offer the screen's actions plus quit. `None` means quit.
fn choose(actions: &[UserAction]) -> Result<Option<UserAction>, CliError> {
    let mut labels: Vec<&str> = actions.iter().copied().map(UserAction::label).collect();
    labels.push(QUIT);

    let picked = Select::new()
        .with_prompt("Next step")
        .items(&labels)
        .default(0)
        .interact_opt()
        .map_err(prompt_err)?;
    Ok(picked.and_then(|i| actions.get(i).copied()))
}

/// Run one action. The outer error is a prompt failure; the inner result is
/// the coordinator's answer, which the loop reports and moves past.
async fn perform(
    coordinator: &Coordinator,
    action: UserAction,
    global: &GlobalOpts,
) -> Result<Result<Phase, CoreError>, CliError> {
    tracing::debug!(%action, "user action");
    let step = match action {
        UserAction::CheckAvailability => {
            with_progress(coordinator, global, coordinator.check_availability()).await
        }
        UserAction::OpenWifiSettings => {
            eprintln!(
                "Open {} in a browser while on the lamp's Wi-Fi, then enter your network \
                 name and password.",
                coordinator.wifi_settings_url()
            );
            Ok(coordinator.phase())
        }
        UserAction::ConfirmConnected => {
            with_progress(coordinator, global, coordinator.confirm_connected()).await
        }
        UserAction::FetchIpFromAp => {
            let joined = Confirm::new()
                .with_prompt("Is this computer connected to the lamp's Wi-Fi network?")
                .default(true)
                .interact()
                .map_err(prompt_err)?;
            if joined {
                with_progress(coordinator, global, coordinator.fetch_ip_from_ap()).await
            } else {
                eprintln!("Join the lamp's network first, then pick this step again.");
                Ok(coordinator.phase())
            }
        }
        UserAction::ContinueByIp => {
            let address: String = Input::new()
                .with_prompt("Lamp IP address")
                .interact_text()
                .map_err(prompt_err)?;
            with_progress(coordinator, global, coordinator.continue_by_ip(&address)).await
        }
        UserAction::RetryHandoff => {
            with_progress(coordinator, global, coordinator.retry_handoff()).await
        }
        UserAction::TogglePower => {
            let result = coordinator.set_power(PowerCommand::Toggle).await;
            show_state(coordinator, result.map(Option::unwrap_or_default), global)
        }
        UserAction::SetBrightness => {
            let bri: u8 = Input::new()
                .with_prompt("Brightness (0-255)")
                .interact_text()
                .map_err(prompt_err)?;
            let result = coordinator.set_brightness(bri).await;
            show_state(coordinator, result.map(Option::unwrap_or_default), global)
        }
        UserAction::SelectPreset => {
            let id: i32 = Input::new()
                .with_prompt("Preset id")
                .interact_text()
                .map_err(prompt_err)?;
            let result = coordinator.select_preset(id).await;
            show_state(coordinator, result.map(Option::unwrap_or_default), global)
        }
        UserAction::Refresh => {
            let result = coordinator.read_state().await;
            show_state(coordinator, result, global)
        }
    };
    Ok(step)
}

/// Echo a control result. A lamp that answered without its state (older
/// firmware) shows as the default, which is never printed.
fn show_state(
    coordinator: &Coordinator,
    result: Result<LampState, CoreError>,
    global: &GlobalOpts,
) -> Result<Phase, CoreError> {
    let state = result?;
    if state != LampState::default() && !global.quiet {
        let preset = if state.ps < 0 {
            String::new()
        } else {
            format!(", preset {}", state.ps)
        };
        eprintln!(
            "Power {}, brightness {}{preset}",
            if state.on { "on" } else { "off" },
            state.bri
        );
    }
    Ok(coordinator.phase())
}

fn report_failure(coordinator: &Coordinator, err: &CoreError, global: &GlobalOpts, color: bool) {
    output::print_warning(&err.to_string(), color);

    // A search that came up empty is where the trace earns its keep.
    let exhausted = matches!(err, CoreError::AddressNotFound { .. })
        || matches!(coordinator.phase(), Phase::Unreachable { .. });
    if exhausted && !global.trace {
        output::print_trace(&coordinator.trace().snapshot(), &global.output, color);
    }
}
