//! PANDAMONIUM App - Application Services
//!
//! The request-facing layer minus the HTTP surface: client sessions,
//! registration and login, realtime fan-out of posted messages, and the
//! application configuration. An HTTP framework plugs in above this crate;
//! everything here is plain synchronous Rust over a `Store` and an
//! `EventBus`.

pub mod auth;
pub mod config;
pub mod realtime;
pub mod session;

pub use auth::NewUser;
pub use config::AppConfig;
pub use session::Session;
