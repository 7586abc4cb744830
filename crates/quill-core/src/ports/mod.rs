//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod content;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use content::{CoverStorage, HtmlSanitizer, StorageError};
pub use repository::{BaseRepository, PostRepository, UserRepository};
