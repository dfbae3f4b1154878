//! Services orchestrating repositories and auth seams.

pub mod auth;
pub mod booking;
pub mod chat;
pub mod material;

pub use auth::AuthService;
pub use booking::BookingService;
pub use chat::ChatService;
pub use material::MaterialService;
