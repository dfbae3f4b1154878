//! Repository trait definitions.
//!
//! Implementations live in mindspace-infra. All traits use native async fn
//! in traits (RPITIT, Rust 2024 edition) with explicit `Send` bounds so
//! services stay spawnable.

pub mod booking;
pub mod chat;
pub mod material;
pub mod user;

pub use booking::BookingRepository;
pub use chat::ChatRepository;
pub use material::MaterialRepository;
pub use user::UserRepository;
