// Wire models for the WLED JSON API.
//
// Only the fields this workspace acts on are typed; everything else the
// firmware reports is kept in `extra` so nothing is lost on display.

use serde::{Deserialize, Serialize, Serializer};

/// `GET /json/info` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LampInfo {
    /// Firmware version string, e.g. `"0.14.4"`.
    #[serde(default)]
    pub ver: Option<String>,
    /// Friendly device name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mac: Option<String>,
    /// Station-mode IP. Empty while the lamp is not joined to a network.
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LampInfo {
    /// The station IP, if the lamp reported a non-empty one.
    pub fn station_ip(&self) -> Option<&str> {
        self.ip.as_deref().map(str::trim).filter(|ip| !ip.is_empty())
    }
}

/// `GET /json/state` payload (and the body returned by `POST /json/state`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LampState {
    pub on: bool,
    /// Master brightness, 0-255.
    #[serde(default)]
    pub bri: u8,
    /// Active preset id, `-1` when none.
    #[serde(default = "no_preset")]
    pub ps: i32,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn no_preset() -> i32 {
    -1
}

/// Power mutation. WLED accepts a boolean or the literal `"t"` to toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerCommand {
    On,
    Off,
    Toggle,
}

impl Serialize for PowerCommand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::On => serializer.serialize_bool(true),
            Self::Off => serializer.serialize_bool(false),
            Self::Toggle => serializer.serialize_str("t"),
        }
    }
}

/// `POST /json/state` body. Absent fields are left untouched by the lamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<PowerCommand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bri: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<i32>,
    /// Ask the lamp to answer with its full state instead of `{"success":true}`.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub v: bool,
}

impl StateUpdate {
    pub fn power(cmd: PowerCommand) -> Self {
        Self {
            on: Some(cmd),
            ..Self::default()
        }
    }

    pub fn brightness(bri: u8) -> Self {
        Self {
            bri: Some(bri),
            ..Self::default()
        }
    }

    pub fn preset(id: i32) -> Self {
        Self {
            ps: Some(id),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn verbose(mut self) -> Self {
        self.v = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.on.is_none() && self.bri.is_none() && self.ps.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn power_command_serializes_like_wled_expects() {
        let body = serde_json::to_value(StateUpdate::power(PowerCommand::Toggle)).unwrap();
        assert_eq!(body, json!({ "on": "t" }));

        let body = serde_json::to_value(StateUpdate::power(PowerCommand::Off)).unwrap();
        assert_eq!(body, json!({ "on": false }));
    }

    #[test]
    fn state_update_omits_untouched_fields() {
        let body = serde_json::to_value(StateUpdate::brightness(128)).unwrap();
        assert_eq!(body, json!({ "bri": 128 }));
        assert!(StateUpdate::default().is_empty());
    }

    #[test]
    fn verbose_flag_only_when_requested() {
        let body = serde_json::to_value(StateUpdate::preset(3).verbose()).unwrap();
        assert_eq!(body, json!({ "ps": 3, "v": true }));
        assert!(StateUpdate::default().verbose().is_empty());
    }

    #[test]
    fn lamp_state_keeps_unknown_fields() {
        let state: LampState = serde_json::from_value(json!({
            "on": true,
            "bri": 42,
            "transition": 7,
            "seg": []
        }))
        .unwrap();

        assert!(state.on);
        assert_eq!(state.bri, 42);
        assert_eq!(state.ps, -1);
        assert_eq!(state.extra.get("transition"), Some(&json!(7)));
    }

    #[test]
    fn empty_station_ip_is_none() {
        let info: LampInfo = serde_json::from_value(json!({ "ip": "  " })).unwrap();
        assert_eq!(info.station_ip(), None);

        let info: LampInfo = serde_json::from_value(json!({ "ip": "10.0.0.5" })).unwrap();
        assert_eq!(info.station_ip(), Some("10.0.0.5"));
    }
}
