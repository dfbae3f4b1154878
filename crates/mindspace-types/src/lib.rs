//! Shared domain types for MindSpace.
//!
//! This crate contains the core domain types used across the MindSpace
//! platform: User, Conversation, Message, Booking, Material, the WebSocket
//! wire events, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod booking;
pub mod chat;
pub mod error;
pub mod event;
pub mod material;
pub mod user;
