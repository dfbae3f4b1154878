//! HTTP request handlers.

pub mod auth;
pub mod booking;
pub mod conversation;
pub mod material;
pub mod user;
pub mod ws;
