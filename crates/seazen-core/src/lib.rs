//! Lamp discovery, onboarding and control between `seazen-api` and UI
//! consumers (the CLI wizard, or any other renderer).
//!
//! - **[`Coordinator`]**: cloneable session handle driving the onboarding
//!   state machine (AP probe, Wi-Fi hand-off, mDNS polling, AP fallback,
//!   manual IP) and the control calls once an origin is resolved. A
//!   control call that cannot reach the lamp starts a background
//!   re-discovery.
//!
//! - **[`Screen`]**: declarative description of what the user should see
//!   next, published on a `watch` channel after every state change, along
//!   with the [`UserAction`]s it offers.
//!
//! - **[`AddressBook`]**: last known-good origin over any [`KeyValueStore`],
//!   read once per session so a remembered lamp skips discovery entirely.
//!
//! - **[`DiagnosticTrace`]**: bounded, timestamped record of every probe
//!   and failure, mirrored to `tracing`.

pub mod config;
pub mod discovery;
pub mod error;
pub mod model;
pub mod screen;
pub mod store;
pub mod trace;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_AP_ORIGIN, DEFAULT_MDNS_HOST, DiscoveryConfig, DiscoveryTimings};
pub use discovery::{Coordinator, LinkStatus, Phase, ProbeResult, Stage, pick_station_ip};
pub use error::CoreError;
pub use model::{LampInfo, LampState, Origin, PowerCommand, Provenance, StateUpdate};
pub use screen::{Screen, UserAction};
pub use store::{AddressBook, KeyValueStore, MemoryStore, PersistedAddress};
pub use trace::{DiagnosticTrace, TraceEntry, TraceLevel};
