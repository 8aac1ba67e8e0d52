// ── Declarative screens ──
//
// The coordinator never draws anything. After every state change it
// publishes a `Screen` describing what the user should see and which
// actions are on offer; a renderer (the CLI wizard, a TUI, a web page)
// turns that into pixels and feeds the chosen `UserAction` back.

use strum::Display;
use url::Url;

use crate::discovery::{LinkStatus, Phase, Stage};
use crate::model::Origin;

/// Something the user can ask the coordinator to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum UserAction {
    CheckAvailability,
    OpenWifiSettings,
    ConfirmConnected,
    FetchIpFromAp,
    ContinueByIp,
    TogglePower,
    SetBrightness,
    SelectPreset,
    RetryHandoff,
    Refresh,
}

impl UserAction {
    /// Button text.
    pub fn label(self) -> &'static str {
        match self {
            Self::CheckAvailability => "Check lamp availability",
            Self::OpenWifiSettings => "Open the lamp's Wi-Fi settings",
            Self::ConfirmConnected => "I connected",
            Self::FetchIpFromAp => "Fetch IP from the lamp's network",
            Self::ContinueByIp => "Continue by IP",
            Self::TogglePower => "Toggle power",
            Self::SetBrightness => "Set brightness",
            Self::SelectPreset => "Select preset",
            Self::RetryHandoff => "Retry Wi-Fi hand-off",
            Self::Refresh => "Refresh",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Loading,
    /// A single deliberate probe is running.
    Checking { target: String },
    /// The lamp's AP answered; credentials go in on the lamp's own page.
    ApSetup { wifi_settings_url: Url },
    /// The AP did not answer: either join the lamp's network, or confirm
    /// the lamp has already been moved to the home network.
    ConnectToLampNetwork,
    Searching { stage: Stage, attempt: u32 },
    MdnsNotFound,
    Control {
        origin: Origin,
        /// `false` shows the "no connection" indicator.
        online: bool,
        /// Last control error, if any.
        notice: Option<String>,
    },
    Unreachable { reason: String },
}

impl Screen {
    pub(crate) fn describe(
        phase: &Phase,
        link: LinkStatus,
        notice: Option<&str>,
        wifi_settings_url: &Url,
    ) -> Self {
        match phase {
            Phase::Idle => Self::Loading,
            Phase::Verifying { origin } => Self::Checking {
                target: origin.to_string(),
            },
            Phase::ApProbe => Self::Checking {
                target: wifi_settings_url.origin().ascii_serialization(),
            },
            Phase::ApSetup => Self::ApSetup {
                wifi_settings_url: wifi_settings_url.clone(),
            },
            Phase::AwaitWifiHandoff => Self::ConnectToLampNetwork,
            Phase::MdnsProbe { attempt } => Self::Searching {
                stage: Stage::Mdns,
                attempt: *attempt,
            },
            Phase::MdnsNotFound => Self::MdnsNotFound,
            Phase::ApFallbackPoll { attempt } => Self::Searching {
                stage: Stage::ApFallback,
                attempt: *attempt,
            },
            Phase::Resolved { origin } => Self::Control {
                origin: origin.clone(),
                online: link == LinkStatus::Online,
                notice: notice.map(str::to_owned),
            },
            Phase::Unreachable { reason } => Self::Unreachable {
                reason: reason.clone(),
            },
        }
    }

    pub fn headline(&self) -> String {
        match self {
            Self::Loading => "Starting up".into(),
            Self::Checking { target } => format!("Checking {target}"),
            Self::ApSetup { .. } => "Configure the lamp's Wi-Fi".into(),
            Self::ConnectToLampNetwork => "Connect to the lamp's network".into(),
            Self::Searching { stage, attempt } => format!("Searching ({stage}, attempt {attempt})"),
            Self::MdnsNotFound => "Lamp not found on your network".into(),
            Self::Control { origin, online, .. } => {
                if *online {
                    format!("Lamp at {origin}")
                } else {
                    format!("Lamp at {origin} (no connection)")
                }
            }
            Self::Unreachable { .. } => "Lamp unreachable".into(),
        }
    }

    pub fn subline(&self) -> Option<String> {
        match self {
            Self::Loading | Self::Checking { .. } | Self::Searching { .. } => None,
            Self::ApSetup { wifi_settings_url } => Some(format!(
                "Enter your home Wi-Fi credentials at {wifi_settings_url}, then rejoin your home network."
            )),
            Self::ConnectToLampNetwork => Some(
                "Join the lamp's own Wi-Fi to set it up, or confirm once it is on your home network."
                    .into(),
            ),
            Self::MdnsNotFound => Some(
                "Rejoin the lamp's Wi-Fi so it can report its address, or enter the address yourself."
                    .into(),
            ),
            Self::Control { notice, .. } => notice.clone(),
            Self::Unreachable { reason } => Some(reason.clone()),
        }
    }

    pub fn actions(&self) -> &'static [UserAction] {
        use UserAction as A;
        match self {
            Self::Loading | Self::Checking { .. } | Self::Searching { .. } => &[],
            Self::ApSetup { .. } => &[A::OpenWifiSettings, A::ConfirmConnected],
            Self::ConnectToLampNetwork => {
                &[A::CheckAvailability, A::ConfirmConnected, A::ContinueByIp]
            }
            Self::MdnsNotFound => &[A::FetchIpFromAp, A::ContinueByIp],
            Self::Control { .. } => &[
                A::TogglePower,
                A::SetBrightness,
                A::SelectPreset,
                A::Refresh,
            ],
            Self::Unreachable { .. } => &[A::RetryHandoff, A::ContinueByIp],
        }
    }

    /// Screens where nothing is running and the user must pick an action.
    pub fn awaits_user(&self) -> bool {
        !self.actions().is_empty()
    }
}
