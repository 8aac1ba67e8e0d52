// ── Domain model ──

pub mod origin;

pub use origin::{Origin, Provenance, normalize_host};

// Wire types are used as-is; the lamp's JSON is already the domain shape.
pub use seazen_api::{LampInfo, LampState, PowerCommand, StateUpdate};
