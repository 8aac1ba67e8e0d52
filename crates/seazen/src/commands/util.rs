//! Shared helpers for command handlers.

use std::future::Future;
use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use seazen_core::{Coordinator, CoreError, Origin, Phase};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Stderr spinner, hidden when quiet or not attached to a terminal.
pub fn spinner(message: impl Into<String>, global: &GlobalOpts) -> ProgressBar {
    if global.quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.into());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Drive a discovery step while a spinner mirrors the published screen,
/// so polling stages show their attempt count as they go.
pub async fn with_progress<F>(
    coordinator: &Coordinator,
    global: &GlobalOpts,
    step: F,
) -> Result<Phase, CoreError>
where
    F: Future<Output = Result<Phase, CoreError>>,
{
    let bar = spinner(coordinator.screen().headline(), global);
    let mut screens = coordinator.screens();
    tokio::pin!(step);

    let result = loop {
        tokio::select! {
            result = &mut step => break result,
            changed = screens.changed() => {
                if changed.is_err() {
                    break (&mut step).await;
                }
                let screen = screens.borrow_and_update().clone();
                match screen.subline() {
                    Some(sub) => bar.set_message(format!("{} ({sub})", screen.headline())),
                    None => bar.set_message(screen.headline()),
                }
            }
        }
    };
    bar.finish_and_clear();
    result
}

/// Resolve the lamp for a one-shot command: `--address` if given, else the
/// remembered address, else whatever the session start finds.
pub async fn ensure_lamp(
    coordinator: &Coordinator,
    global: &GlobalOpts,
    command: &str,
) -> Result<Origin, CliError> {
    let phase = match global.address.as_deref() {
        Some(address) => {
            with_progress(coordinator, global, coordinator.continue_by_ip(address)).await?
        }
        None => with_progress(coordinator, global, coordinator.start_session()).await?,
    };

    match phase {
        Phase::Resolved { origin } => Ok(origin),
        Phase::ApSetup => Err(CliError::NoLamp {
            hint: format!(
                "The lamp is still in setup mode (its access point answered at {}).",
                coordinator.config().ap_origin
            ),
            command: command.into(),
        }),
        _ => Err(CliError::NoLamp {
            hint: "No lamp address is remembered and the lamp's access point is not answering."
                .into(),
            command: command.into(),
        }),
    }
}
