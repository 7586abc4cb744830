//! # Quill Core
//!
//! The domain layer of the Quill blogging backend.
//! Entities, ports and the account/post services live here; nothing in this
//! crate knows about HTTP, SQL or the filesystem.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
