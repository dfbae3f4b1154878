//! Realtime chat core.
//!
//! - [`presence`]: the in-process registry mapping authenticated users to
//!   live connection handles.
//! - [`server`]: connection authentication and end-to-end routing of
//!   `send_message` events (validate, persist, deliver, acknowledge).
//!
//! The transport (WebSocket upgrade, frame parsing, the per-connection
//! task) lives in mindspace-api; this module owns all state and policy.

pub mod presence;
pub mod server;

pub use presence::{ConnectionHandle, PresenceRegistry};
pub use server::ChatServer;
