use serde::Serialize;
use strum::{Display, IntoStaticStr};

use crate::model::Origin;

/// Where the onboarding / discovery state machine currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, IntoStaticStr)]
#[serde(tag = "phase", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// Session not started yet.
    Idle,
    /// Single read against a remembered or user-entered origin.
    Verifying { origin: Origin },
    /// Single probe of the AP origin.
    ApProbe,
    /// The AP answered: the user should enter Wi-Fi credentials on the lamp.
    ApSetup,
    /// Waiting for the user to confirm the Wi-Fi hand-off. Nothing polls here.
    AwaitWifiHandoff,
    /// Polling the mDNS origin.
    MdnsProbe { attempt: u32 },
    /// mDNS window exhausted; the user picks AP fallback or manual IP.
    MdnsNotFound,
    /// Polling the AP for the station IP the lamp obtained.
    ApFallbackPoll { attempt: u32 },
    /// An origin answered; control calls go here.
    Resolved { origin: Origin },
    /// AP fallback exhausted. Terminal until the user restarts the hand-off.
    Unreachable { reason: String },
}

impl Phase {
    pub fn name(&self) -> &'static str {
        self.into()
    }

    pub fn origin(&self) -> Option<&Origin> {
        match self {
            Self::Resolved { origin } | Self::Verifying { origin } => Some(origin),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    /// Phases that only exist while a probe or poll is in flight.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Verifying { .. }
                | Self::ApProbe
                | Self::MdnsProbe { .. }
                | Self::ApFallbackPoll { .. }
        )
    }
}

/// Health of the link to a resolved lamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(tag = "status", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LinkStatus {
    Online,
    /// A control call failed to reach the lamp; searching again.
    Rediscovering { attempt: u32 },
    /// Last control call failed to reach the lamp and no search is running.
    Lost,
}

/// The polling stages: the two onboarding searches and the background
/// re-discovery after a lost lamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Stage {
    #[strum(serialize = "mDNS probe")]
    Mdns,
    #[strum(serialize = "AP fallback")]
    ApFallback,
    #[strum(serialize = "re-discovery")]
    Rediscovery,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn phase_names_are_snake_case() {
        assert_eq!(Phase::AwaitWifiHandoff.name(), "await_wifi_handoff");
        assert_eq!(Phase::MdnsProbe { attempt: 2 }.name(), "mdns_probe");
    }

    #[test]
    fn phase_serializes_with_tag() {
        let value = serde_json::to_value(Phase::ApFallbackPoll { attempt: 4 }).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "phase": "ap_fallback_poll", "attempt": 4 })
        );
    }

    #[test]
    fn stage_labels() {
        assert_eq!(Stage::Mdns.to_string(), "mDNS probe");
        assert_eq!(Stage::ApFallback.to_string(), "AP fallback");
    }
}
