//! Command dispatch: bridges CLI args to `Coordinator` calls and output
//! formatting.

pub mod config_cmd;
pub mod control;
pub mod discovery;
pub mod onboard;
pub mod util;

use seazen_core::{Coordinator, PowerCommand};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a lamp-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    coordinator: &Coordinator,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Onboard => onboard::handle(coordinator, global).await,
        Command::Discover(args) => discovery::discover(coordinator, args, global).await,
        Command::Check => discovery::check(coordinator, global).await,
        Command::UseIp(args) => discovery::use_ip(coordinator, args, global).await,
        Command::Where => discovery::show_remembered(coordinator, global),
        Command::Forget => discovery::forget(coordinator, global),
        Command::Info => control::info(coordinator, global).await,
        Command::State => control::state(coordinator, global).await,
        Command::On => control::power(coordinator, PowerCommand::On, global).await,
        Command::Off => control::power(coordinator, PowerCommand::Off, global).await,
        Command::Toggle => control::power(coordinator, PowerCommand::Toggle, global).await,
        Command::Brightness(args) => control::brightness(coordinator, args, global).await,
        Command::Preset(args) => control::preset(coordinator, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
