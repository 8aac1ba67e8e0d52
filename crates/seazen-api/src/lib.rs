// seazen-api: Async Rust client for the WLED JSON API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{INFO_PATH, LampClient, LampResponse, STATE_PATH};
pub use error::Error;
pub use models::{LampInfo, LampState, PowerCommand, StateUpdate};
pub use transport::TransportConfig;
