//! # Quill API Server
//!
//! HTTP surface of the blogging backend. The binary in `main.rs` wires these
//! pieces into an actix-web server; integration tests mount the same routes.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;

pub use config::AppConfig;
pub use state::AppState;
