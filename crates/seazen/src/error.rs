//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use seazen_config::ConfigError;
use seazen_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Reachability ─────────────────────────────────────────────────
    #[error("Could not reach the lamp at {url}")]
    #[diagnostic(
        code(seazen::unreachable),
        help(
            "Check that the lamp is powered and on the same network as this machine.\n\
             Reason: {reason}\n\
             Try: seazen discover"
        )
    )]
    LampUnreachable { url: String, reason: String },

    #[error("The lamp's access point at {url} is not answering")]
    #[diagnostic(
        code(seazen::ap_unreachable),
        help(
            "Join the lamp's own Wi-Fi network first, then run the check again.\n\
             If the lamp is already on your Wi-Fi, run: seazen discover"
        )
    )]
    AccessPointUnreachable { url: String },

    #[error(
        "Lamp did not answer{}",
        .timeout_ms.map_or_else(String::new, |ms| format!(" within {ms}ms"))
    )]
    #[diagnostic(
        code(seazen::timeout),
        help("Increase the probe timeout with --timeout, or move closer to the lamp.")
    )]
    Timeout { timeout_ms: Option<u64> },

    // ── Lamp answered ────────────────────────────────────────────────
    #[error("Lamp rejected the request (HTTP {status}): {message}")]
    #[diagnostic(code(seazen::http_error))]
    HttpError { status: u16, message: String },

    #[error("Lamp sent a malformed response: {message}")]
    #[diagnostic(
        code(seazen::malformed_response),
        help("Is the address really a Seazen lamp? Check with: seazen info -v")
    )]
    MalformedResponse { message: String },

    // ── Discovery ────────────────────────────────────────────────────
    #[error("Lamp address not found during {stage}")]
    #[diagnostic(
        code(seazen::address_not_found),
        help(
            "Rejoin the lamp's Wi-Fi and run: seazen onboard\n\
             Or, if you know the lamp's address: seazen use-ip <ADDRESS>"
        )
    )]
    AddressNotFound { stage: String },

    #[error("No lamp found")]
    #[diagnostic(
        code(seazen::no_lamp),
        help(
            "{hint}\n\
             Set the lamp up with: seazen onboard\n\
             Or point at it directly: seazen --address <ADDRESS> {command}"
        )
    )]
    NoLamp { hint: String, command: String },

    #[error("Invalid lamp address: {input:?}")]
    #[diagnostic(
        code(seazen::invalid_address),
        help("Use an IPv4 address, a hostname, or an http:// URL.")
    )]
    InvalidAddress { input: String },

    #[error("Stopped before the lamp was found")]
    #[diagnostic(code(seazen::cancelled))]
    Cancelled,

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(seazen::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(seazen::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: seazen config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(seazen::config))]
    Config(ConfigError),

    #[error("Could not remember the lamp address: {message}")]
    #[diagnostic(
        code(seazen::store),
        help("Check permissions on the state file (seazen config path), or pass --no-save.")
    )]
    Store { message: String },

    // ── IO / Internal ────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(seazen::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::LampUnreachable { .. } | Self::AccessPointUnreachable { .. } => {
                exit_code::CONNECTION
            }
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AddressNotFound { .. } | Self::NoLamp { .. } => exit_code::NOT_FOUND,
            Self::InvalidAddress { .. } | Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Timeout { timeout_ms } => CliError::Timeout { timeout_ms },
            CoreError::NetworkUnreachable { url, reason } => {
                CliError::LampUnreachable { url, reason }
            }
            CoreError::HttpError { status, message } => CliError::HttpError { status, message },
            CoreError::MalformedResponse { message } => CliError::MalformedResponse { message },
            CoreError::AddressNotFound { stage } => CliError::AddressNotFound { stage },
            CoreError::NoActiveOrigin => CliError::NoLamp {
                hint: "No lamp address is active.".into(),
                command: "state".into(),
            },
            CoreError::InvalidAddress { input } => CliError::InvalidAddress { input },
            CoreError::Superseded => CliError::Cancelled,
            CoreError::Store { message } => CliError::Store { message },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: "see `seazen config profiles`".into(),
            },
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reachability_errors_use_connection_codes() {
        let unreachable: CliError = CoreError::NetworkUnreachable {
            url: "http://10.0.0.5".into(),
            reason: "connection refused".into(),
        }
        .into();
        assert_eq!(unreachable.exit_code(), exit_code::CONNECTION);

        let timeout: CliError = CoreError::Timeout {
            timeout_ms: Some(4500),
        }
        .into();
        assert_eq!(timeout.exit_code(), exit_code::TIMEOUT);
    }

    #[test]
    fn discovery_failures_are_not_found() {
        let err: CliError = CoreError::AddressNotFound {
            stage: "mDNS probe".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(err.to_string(), "Lamp address not found during mDNS probe");
    }

    #[test]
    fn bad_input_is_a_usage_error() {
        let err: CliError = CoreError::InvalidAddress {
            input: "ftp://lamp".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::USAGE);

        let err: CliError = ConfigError::Validation {
            field: "ap_origin".into(),
            reason: "expected an http:// URL".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn http_errors_are_general() {
        let err: CliError = CoreError::HttpError {
            status: 500,
            message: "boom".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }
}
