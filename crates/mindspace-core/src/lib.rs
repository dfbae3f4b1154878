//! Business logic for MindSpace.
//!
//! This crate defines the repository traits implemented by
//! `mindspace-infra`, the services that orchestrate them, and the realtime
//! chat core: presence registry, connection authentication, and message
//! routing. It never depends on infrastructure crates; everything is
//! generic over the repository and auth seams.

pub mod auth;
pub mod realtime;
pub mod repository;
pub mod service;
