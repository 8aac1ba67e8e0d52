//! Clap derive structures for the `seazen` CLI.
//!
//! Kept free of crate-internal imports so `build.rs` can include it to
//! render man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// seazen -- find, onboard and drive a Seazen WLED lamp
#[derive(Debug, Parser)]
#[command(
    name = "seazen",
    version,
    about = "Discover, onboard and control your Seazen lamp",
    long_about = "Finds a Seazen WLED lamp on the local network and drives it over\n\
        its JSON API.\n\n\
        A fresh lamp opens its own access point. `seazen onboard` walks you\n\
        through handing it your Wi-Fi, then locates it again over mDNS or,\n\
        failing that, asks the access point for the lamp's new address.\n\
        The last working address is remembered for the next run.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Lamp profile to use
    #[arg(long, short = 'p', env = "SEAZEN_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Lamp address, skipping discovery (IP, host or URL)
    #[arg(long, short = 'a', env = "SEAZEN_ADDRESS", global = true)]
    pub address: Option<String>,

    /// Factory access-point origin (overrides profile)
    #[arg(long, env = "SEAZEN_AP_ORIGIN", global = true)]
    pub ap_origin: Option<String>,

    /// mDNS hostname the lamp announces (overrides profile)
    #[arg(long, env = "SEAZEN_MDNS_HOST", global = true)]
    pub mdns_host: Option<String>,

    /// Probe timeout in milliseconds (overrides profile)
    #[arg(long, env = "SEAZEN_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SEAZEN_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Print the diagnostic trace when the command finishes
    #[arg(long, global = true)]
    pub trace: bool,

    /// Do not read or remember the lamp address for this run
    #[arg(long, global = true)]
    pub no_save: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Guided setup: join the lamp to Wi-Fi and find it again
    #[command(alias = "setup")]
    Onboard,

    /// Locate the lamp without prompting
    #[command(alias = "find")]
    Discover(DiscoverArgs),

    /// Check whether the lamp's access point is reachable
    Check,

    /// Use a known lamp address and remember it
    UseIp(UseIpArgs),

    /// Show lamp firmware and network details
    Info,

    /// Show power, brightness and preset
    #[command(alias = "st")]
    State,

    /// Turn the lamp on
    On,

    /// Turn the lamp off
    Off,

    /// Flip the lamp's power state
    Toggle,

    /// Set master brightness
    #[command(alias = "bri")]
    Brightness(BrightnessArgs),

    /// Activate a stored preset
    #[command(alias = "ps")]
    Preset(PresetArgs),

    /// Show the remembered lamp address
    Where,

    /// Forget the remembered lamp address
    Forget,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Discovery ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DiscoverArgs {
    /// Ask the lamp's access point for its address if mDNS finds nothing
    ///
    /// Requires this machine to be on the lamp's own Wi-Fi network.
    #[arg(long)]
    pub ap_fallback: bool,
}

#[derive(Debug, Args)]
pub struct UseIpArgs {
    /// IP address, hostname or http URL of the lamp
    pub address: String,
}

// ── Control ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BrightnessArgs {
    /// Brightness level, 0-255
    pub value: u8,
}

#[derive(Debug, Args)]
pub struct PresetArgs {
    /// Preset id as stored on the lamp
    pub id: i32,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Print config and state file locations
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
