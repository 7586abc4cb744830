//! Post content: HTML sanitizing and cover image storage.

mod sanitize;
mod storage;

pub use sanitize::AmmoniaSanitizer;
pub use storage::LocalCoverStorage;
